//! Main module for the markup engine
//!
//! Leaf-first layout: scalar grammar, flow (inline) collection grammar, the
//! indentation-sensitive block parser, and the block serializer. The parser
//! and serializer agree on conventions so parse/stringify round-trips are
//! stable.

pub mod error;
pub mod flow;
pub mod parser;
pub mod scalars;
pub mod serializer;
pub mod value;

pub use error::SyntaxError;
pub use parser::parse;
pub use scalars::{parse_scalar, serialize_scalar};
pub use serializer::stringify;
pub use value::{walk_mut, Mapping, Value};
