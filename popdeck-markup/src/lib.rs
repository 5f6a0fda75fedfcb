//! # popdeck-markup
//!
//! A parser and serializer for the popdeck markup dialect: a restricted,
//! indentation-based block/inline format describing nested trees of
//! mappings, sequences, and scalars.
//!
//! The crate is built for round-trip stability: a tree produced by
//! [`markup::parse`] serializes through [`markup::stringify`] back into text
//! that parses to a structurally equal tree. That property is what makes
//! templated editing of large documents safe.

pub mod markup;

pub use markup::{parse, stringify, walk_mut, Mapping, SyntaxError, Value};
