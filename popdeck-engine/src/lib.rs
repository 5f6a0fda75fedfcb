//! # popdeck-engine
//!
//! The editing engine on top of [`popdeck_markup`]: locates pop-up stacks
//! inside a parsed dashboard document, instantiates a template per room,
//! and splices the results back in. Each batch run validates both documents
//! before touching anything and edits a deep clone, so a failing run never
//! leaves a caller with a half-edited tree.

pub mod error;
pub mod matcher;
pub mod process;
pub mod schema;
pub mod slug;
pub mod template;

pub use error::{EngineError, ValidationError};
pub use matcher::{find_match, DetectStrategy, MatchResult};
pub use process::{
    process_rooms, rewrite_document, Action, EditOptions, InsertMode, Outcome, Report,
};
pub use schema::{
    check_template_source, parse_icon_map, parse_rooms, validate_grid, validate_template,
};
pub use slug::slugify_area;
pub use template::{anchor_token, apply_template, TemplateApplication};
