//! Pattern matcher
//!
//! Locates the pop-up stack belonging to a room inside the grid's card
//! sequence. Every slot is tested against the structural pop-up predicate
//! first, then against the configured strategy. The first match wins; any
//! further matches are reported as duplicates, never merged.

use popdeck_markup::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{EngineError, ValidationError};
use crate::template::anchor_token;

/// How existing stacks are recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectStrategy {
    /// Case- and space-normalized label equality on the pop-up card's name.
    Name,
    /// Exact equality on the pop-up card's anchor token.
    Hash,
    /// Recursive search for an explicit area identifier in the subtree.
    Area,
}

impl FromStr for DetectStrategy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(DetectStrategy::Name),
            "hash" => Ok(DetectStrategy::Hash),
            "area" => Ok(DetectStrategy::Area),
            other => Err(EngineError::UnsupportedStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for DetectStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DetectStrategy::Name => "name",
            DetectStrategy::Hash => "hash",
            DetectStrategy::Area => "area",
        };
        write!(f, "{}", name)
    }
}

/// Where a room's stack sits in the card sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchResult {
    /// Position of the matched stack, if any.
    pub index: Option<usize>,
    /// Positions of additional matches, in ascending order.
    pub duplicates: Vec<usize>,
}

/// Is this slot a vertical stack wrapping a pop-up card?
pub fn is_popup_stack(slot: &Value) -> bool {
    let Some(stack) = slot.as_mapping() else {
        return false;
    };
    if stack.get_str("type") != Some("vertical-stack") {
        return false;
    }
    let Some(cards) = stack.get("cards").and_then(Value::as_sequence) else {
        return false;
    };
    let Some(first) = cards.first().and_then(Value::as_mapping) else {
        return false;
    };
    first.get_str("type") == Some("custom:bubble-card")
        && first.get_str("card_type") == Some("pop-up")
}

/// Depth-first search for an explicit area identifier inside a subtree: an
/// `area` string field wins over a `target.area_id`, both win over deeper
/// recursion. Empty strings are skipped.
pub fn extract_area(node: &Value) -> Option<&str> {
    match node {
        Value::Mapping(map) => {
            if let Some(area) = map.get_str("area") {
                if !area.is_empty() {
                    return Some(area);
                }
            }
            if let Some(target) = map.get("target").and_then(Value::as_mapping) {
                if let Some(area_id) = target.get_str("area_id") {
                    if !area_id.is_empty() {
                        return Some(area_id);
                    }
                }
            }
            for (_, child) in map.iter() {
                if let Some(found) = extract_area(child) {
                    return Some(found);
                }
            }
            None
        }
        Value::Sequence(items) => items.iter().find_map(extract_area),
        _ => None,
    }
}

/// Scan the grid's card sequence for the room's stack.
pub fn find_match(
    grid: &Value,
    room: &str,
    area_id: &str,
    strategy: DetectStrategy,
) -> Result<MatchResult, ValidationError> {
    let cards = grid
        .as_mapping()
        .and_then(|root| root.get("cards"))
        .and_then(Value::as_sequence)
        .ok_or(ValidationError::GridCardsNotSequence)?;

    let wanted_name = normalize_label(room);
    let wanted_hash = anchor_token(area_id);

    let mut result = MatchResult::default();
    for (index, slot) in cards.iter().enumerate() {
        if !is_popup_stack(slot) {
            continue;
        }
        let matched = match strategy {
            DetectStrategy::Name => first_card(slot)
                .and_then(|card| card.get_str("name"))
                .map_or(false, |name| normalize_label(name) == wanted_name),
            DetectStrategy::Hash => first_card(slot)
                .and_then(|card| card.get_str("hash"))
                .map_or(false, |hash| hash == wanted_hash),
            DetectStrategy::Area => extract_area(slot) == Some(area_id),
        };
        if matched {
            match result.index {
                None => result.index = Some(index),
                Some(_) => result.duplicates.push(index),
            }
        }
    }
    Ok(result)
}

fn first_card(slot: &Value) -> Option<&popdeck_markup::Mapping> {
    slot.as_mapping()
        .and_then(|stack| stack.get("cards"))
        .and_then(Value::as_sequence)
        .and_then(|cards| cards.first())
        .and_then(Value::as_mapping)
}

fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}
