//! Batch processing
//!
//! The top-level operation: for each room, in input order, derive the area
//! identifier, locate the existing stack, instantiate the template, and
//! splice the result in. Updates keep their slot position; creations append,
//! so output order is deterministic and equals input order.

use popdeck_markup::{parse, stringify, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{EngineError, ValidationError};
use crate::matcher::{find_match, DetectStrategy};
use crate::schema::{validate_grid, validate_template};
use crate::slug::slugify_area;
use crate::template::apply_template;

/// Where an instantiated stack lands when no existing slot matches.
///
/// All three modes overwrite the matched slot on a hit and append on a
/// miss; the distinct names are kept for configuration compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsertMode {
    Append,
    KeepIndex,
    Replace,
}

impl FromStr for InsertMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "append" => Ok(InsertMode::Append),
            "keep-index" => Ok(InsertMode::KeepIndex),
            "replace" => Ok(InsertMode::Replace),
            other => Err(EngineError::UnsupportedInsertMode(other.to_string())),
        }
    }
}

/// What happened to one room's slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Created,
    Updated,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Created => write!(f, "created"),
            Action::Updated => write!(f, "updated"),
        }
    }
}

/// Per-room outcome of a batch edit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub room: String,
    pub area_id: String,
    pub action: Action,
    /// Final position of the room's stack in the card sequence.
    pub index: usize,
    /// Positions of additional matches that were left untouched.
    pub duplicates: Vec<usize>,
    pub placeholders_used: bool,
}

/// Knobs for one batch edit.
#[derive(Debug, Clone)]
pub struct EditOptions {
    pub detect_by: DetectStrategy,
    pub insert_mode: InsertMode,
    /// Indent width for the serialized output.
    pub indent: usize,
    pub icon_map: Option<HashMap<String, String>>,
}

impl Default for EditOptions {
    fn default() -> Self {
        EditOptions {
            detect_by: DetectStrategy::Name,
            insert_mode: InsertMode::Append,
            indent: 2,
            icon_map: None,
        }
    }
}

/// The result of rewriting one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// The input document, rendered with the same conventions as `after`.
    pub before: String,
    /// The rewritten document.
    pub after: String,
    pub reports: Vec<Report>,
}

/// Edit a deep clone of `document`, applying `template` once per room.
///
/// Both inputs are validated before any mutation; the caller's trees are
/// never touched.
pub fn process_rooms(
    document: &Value,
    rooms: &[String],
    template: &Value,
    options: &EditOptions,
) -> Result<(Value, Vec<Report>), EngineError> {
    validate_grid(document)?;
    validate_template(template)?;

    let mut edited = document.clone();
    let mut reports = Vec::with_capacity(rooms.len());
    for room in rooms {
        let area_id = slugify_area(room);
        let matched = find_match(&edited, room, &area_id, options.detect_by)?;
        let application = apply_template(template, room, &area_id, options.icon_map.as_ref());

        let cards = edited
            .as_mapping_mut()
            .and_then(|root| root.get_mut("cards"))
            .and_then(Value::as_sequence_mut)
            .ok_or(ValidationError::GridCardsNotSequence)?;
        let (index, action) = splice(cards, application.stack, matched.index, options.insert_mode);

        reports.push(Report {
            room: room.clone(),
            area_id,
            action,
            index,
            duplicates: matched.duplicates,
            placeholders_used: application.placeholders_used,
        });
    }
    Ok((edited, reports))
}

/// Overwrite the matched slot, or append when there is none.
fn splice(
    cards: &mut Vec<Value>,
    stack: Value,
    index: Option<usize>,
    mode: InsertMode,
) -> (usize, Action) {
    if let Some(index) = index.filter(|&index| index < cards.len()) {
        cards[index] = stack;
        return (index, Action::Updated);
    }
    // without an existing slot, keep-index and replace have no position to
    // keep; every mode appends
    match mode {
        InsertMode::Append | InsertMode::KeepIndex | InsertMode::Replace => {
            cards.push(stack);
            (cards.len() - 1, Action::Created)
        }
    }
}

/// Parse, validate, edit, and re-serialize a document in one call.
pub fn rewrite_document(
    document: &str,
    template: &str,
    rooms: &[String],
    options: &EditOptions,
) -> Result<Outcome, EngineError> {
    let parsed_document = parse(document)?;
    let parsed_template = parse(template)?;
    let before = stringify(&parsed_document, options.indent);
    let (edited, reports) = process_rooms(&parsed_document, rooms, &parsed_template, options)?;
    let after = stringify(&edited, options.indent);
    Ok(Outcome {
        before,
        after,
        reports,
    })
}
