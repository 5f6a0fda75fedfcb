//! Error types for the editing engine
//!
//! Validation failures are checked before any mutation begins, so a failed
//! batch never produces partial output. Duplicate matches are deliberately
//! not errors; they surface in the per-room reports instead.

use popdeck_markup::SyntaxError;
use std::fmt;

/// Any failure that aborts a batch edit.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The document or template text failed to parse.
    Syntax(SyntaxError),
    /// A structural contract on the inputs was violated.
    Validation(ValidationError),
    /// An unrecognized detection strategy name.
    UnsupportedStrategy(String),
    /// An unrecognized insert mode name.
    UnsupportedInsertMode(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Syntax(err) => write!(f, "{}", err),
            EngineError::Validation(err) => write!(f, "{}", err),
            EngineError::UnsupportedStrategy(name) => {
                write!(f, "unknown detection strategy: {}", name)
            }
            EngineError::UnsupportedInsertMode(name) => {
                write!(f, "unknown insert mode: {}", name)
            }
        }
    }
}

impl std::error::Error for EngineError {}

impl From<SyntaxError> for EngineError {
    fn from(err: SyntaxError) -> Self {
        EngineError::Syntax(err)
    }
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Validation(err)
    }
}

/// Structural contract violations, named after the missing or invalid field.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    GridRootNotMapping,
    GridWrongType,
    GridCardsNotSequence,
    TemplateRootNotMapping,
    TemplateWrongType,
    TemplateCardsEmpty,
    TemplateFirstCardNotMapping,
    TemplateFirstCardNotPopup,
    RoomsPayloadInvalid { message: String },
    RoomsNotStringArray,
    IconMapInvalid { message: String },
    IconMapNotObject,
    MissingPlaceholders { placeholders: Vec<String> },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::GridRootNotMapping => {
                write!(f, "grid document root must be a mapping")
            }
            ValidationError::GridWrongType => write!(f, "grid root must have type: grid"),
            ValidationError::GridCardsNotSequence => {
                write!(f, "grid must contain a 'cards' sequence")
            }
            ValidationError::TemplateRootNotMapping => {
                write!(f, "template root must be a mapping")
            }
            ValidationError::TemplateWrongType => {
                write!(f, "template root must have type: vertical-stack")
            }
            ValidationError::TemplateCardsEmpty => {
                write!(f, "template must contain a non-empty 'cards' sequence")
            }
            ValidationError::TemplateFirstCardNotMapping => {
                write!(f, "template first card must be a mapping")
            }
            ValidationError::TemplateFirstCardNotPopup => {
                write!(f, "template must start with a custom:bubble-card pop-up")
            }
            ValidationError::RoomsPayloadInvalid { message } => {
                write!(f, "failed to parse rooms payload: {}", message)
            }
            ValidationError::RoomsNotStringArray => {
                write!(f, "rooms payload must be a JSON array of strings")
            }
            ValidationError::IconMapInvalid { message } => {
                write!(f, "failed to parse icon map: {}", message)
            }
            ValidationError::IconMapNotObject => {
                write!(f, "icon map must be a JSON object mapping room names to icon strings")
            }
            ValidationError::MissingPlaceholders { placeholders } => {
                write!(f, "template is missing placeholders: {}", placeholders.join(", "))
            }
        }
    }
}

impl std::error::Error for ValidationError {}
