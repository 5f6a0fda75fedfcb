//! Error types for parsing
//!
//! Every failure is fatal to the current parse call and carries either the
//! 1-based line number of the offending line or the offending fragment text.

use std::fmt;

/// Errors raised while parsing markup text into a tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxError {
    /// A line with neither a sequence prefix nor a key/value separator.
    MalformedLine { line: usize },
    /// A `:` split produced an empty key (e.g. `- : x`).
    MissingKey { line: usize },
    /// A `-` item appeared while the open container is a mapping.
    ListItemOutsideSequence { line: usize },
    /// A plain key/value line appeared while the open container is a sequence.
    KeyInsideSequence { line: usize },
    /// A flow collection opener without its matching closer.
    UnterminatedFlow { fragment: String },
    /// An inline mapping fragment with no `:` separator.
    MalformedFragment { fragment: String },
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxError::MalformedLine { line } => {
                write!(f, "unable to parse line {}", line)
            }
            SyntaxError::MissingKey { line } => {
                write!(f, "no resolvable key on line {}", line)
            }
            SyntaxError::ListItemOutsideSequence { line } => {
                write!(f, "list item without array context on line {}", line)
            }
            SyntaxError::KeyInsideSequence { line } => {
                write!(f, "key/value entry inside a sequence on line {}", line)
            }
            SyntaxError::UnterminatedFlow { fragment } => {
                write!(f, "unterminated flow collection: {}", fragment)
            }
            SyntaxError::MalformedFragment { fragment } => {
                write!(f, "malformed inline mapping fragment: {}", fragment)
            }
        }
    }
}

impl std::error::Error for SyntaxError {}
