//! Structural validation of the engine's inputs
//!
//! Every contract is checked before a batch edit mutates anything: the grid
//! document, the template, the rooms payload, and the icon map. Failures
//! name the missing or invalid field.

use popdeck_markup::{parse, Value};
use std::collections::HashMap;

use crate::error::{EngineError, ValidationError};
use crate::template::{AREA_ID_PLACEHOLDER, AREA_NAME_PLACEHOLDER, HASH_PLACEHOLDER};

/// The grid document must be a mapping of `type: grid` with a `cards`
/// sequence.
pub fn validate_grid(document: &Value) -> Result<(), ValidationError> {
    let Some(root) = document.as_mapping() else {
        return Err(ValidationError::GridRootNotMapping);
    };
    if root.get_str("type") != Some("grid") {
        return Err(ValidationError::GridWrongType);
    }
    match root.get("cards") {
        Some(Value::Sequence(_)) => Ok(()),
        _ => Err(ValidationError::GridCardsNotSequence),
    }
}

/// The template must be a vertical stack whose non-empty `cards` sequence
/// starts with a pop-up bubble card.
pub fn validate_template(template: &Value) -> Result<(), ValidationError> {
    let Some(root) = template.as_mapping() else {
        return Err(ValidationError::TemplateRootNotMapping);
    };
    if root.get_str("type") != Some("vertical-stack") {
        return Err(ValidationError::TemplateWrongType);
    }
    let cards = match root.get("cards") {
        Some(Value::Sequence(cards)) if !cards.is_empty() => cards,
        _ => return Err(ValidationError::TemplateCardsEmpty),
    };
    let Some(first) = cards[0].as_mapping() else {
        return Err(ValidationError::TemplateFirstCardNotMapping);
    };
    if first.get_str("type") != Some("custom:bubble-card")
        || first.get_str("card_type") != Some("pop-up")
    {
        return Err(ValidationError::TemplateFirstCardNotPopup);
    }
    Ok(())
}

/// Parse the rooms payload: a JSON array of strings, nothing else.
pub fn parse_rooms(payload: &str) -> Result<Vec<String>, EngineError> {
    let data: serde_json::Value = serde_json::from_str(payload).map_err(|err| {
        ValidationError::RoomsPayloadInvalid {
            message: err.to_string(),
        }
    })?;
    let Some(items) = data.as_array() else {
        return Err(ValidationError::RoomsNotStringArray.into());
    };
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| EngineError::from(ValidationError::RoomsNotStringArray))
        })
        .collect()
}

/// Parse an icon map payload: a JSON object of room name to icon string.
pub fn parse_icon_map(payload: &str) -> Result<HashMap<String, String>, EngineError> {
    let data: serde_json::Value = serde_json::from_str(payload).map_err(|err| {
        ValidationError::IconMapInvalid {
            message: err.to_string(),
        }
    })?;
    let Some(entries) = data.as_object() else {
        return Err(ValidationError::IconMapNotObject.into());
    };
    entries
        .iter()
        .map(|(room, icon)| {
            icon.as_str()
                .map(|icon| (room.clone(), icon.to_string()))
                .ok_or_else(|| EngineError::from(ValidationError::IconMapNotObject))
        })
        .collect()
}

/// Validate template source text: the three identity placeholders must be
/// present, and the parsed structure must pass [`validate_template`].
pub fn check_template_source(text: &str) -> Result<(), EngineError> {
    let missing: Vec<String> = [AREA_NAME_PLACEHOLDER, AREA_ID_PLACEHOLDER, HASH_PLACEHOLDER]
        .iter()
        .filter(|token| !text.contains(*token))
        .map(|token| token.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingPlaceholders {
            placeholders: missing,
        }
        .into());
    }
    let template = parse(text)?;
    validate_template(&template)?;
    Ok(())
}
