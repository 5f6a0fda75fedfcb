//! Template engine
//!
//! Instantiates a pop-up stack template for one room. Two passes run over a
//! deep clone of the template: a placeholder substitution pass for the
//! literal tokens, and a structural heuristic pass that binds identity
//! fields whether or not the template used placeholders. Templates without
//! a single placeholder still come out bound to the right room.

use popdeck_markup::{walk_mut, Value};
use std::collections::HashMap;

/// Replaced by the raw room name.
pub const AREA_NAME_PLACEHOLDER: &str = "__AREA_NAME__";
/// Replaced by the derived area identifier.
pub const AREA_ID_PLACEHOLDER: &str = "__AREA_ID__";
/// Replaced by the formatted anchor token.
pub const HASH_PLACEHOLDER: &str = "__HASH__";
/// Replaced by the icon-map entry for the room, when one exists.
pub const ICON_PLACEHOLDER: &str = "__ICON__";

/// The anchor token embedding a derived area identifier.
pub fn anchor_token(area_id: &str) -> String {
    format!("#{}-popup", area_id)
}

/// A template instantiated for one room.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateApplication {
    /// The rewritten stack, ready to splice into the grid.
    pub stack: Value,
    /// Whether any placeholder token was substituted.
    pub placeholders_used: bool,
    /// Whether an `__ICON__` token was resolved from the icon map.
    pub icon_resolved: bool,
}

/// Clone the template and rewrite it for the given room.
pub fn apply_template(
    template: &Value,
    room: &str,
    area_id: &str,
    icon_map: Option<&HashMap<String, String>>,
) -> TemplateApplication {
    let mut stack = template.clone();
    let icon = icon_map.and_then(|map| map.get(room)).cloned();
    let hash = anchor_token(area_id);

    // pass 1: literal placeholder tokens
    let mut placeholders_used = false;
    let mut icon_resolved = false;
    walk_mut(&mut stack, &mut |node| {
        let Value::String(text) = node else {
            return;
        };
        let replacement = match text.as_str() {
            AREA_NAME_PLACEHOLDER => Some(room.to_string()),
            AREA_ID_PLACEHOLDER => Some(area_id.to_string()),
            HASH_PLACEHOLDER => Some(hash.clone()),
            // an icon token without a mapped icon stays in place
            ICON_PLACEHOLDER => icon.clone().map(|icon| {
                icon_resolved = true;
                icon
            }),
            _ => None,
        };
        if let Some(replacement) = replacement {
            *text = replacement;
            placeholders_used = true;
        }
    });

    // pass 2: structural heuristics, independent of placeholders
    walk_mut(&mut stack, &mut |node| {
        let Value::Mapping(map) = node else {
            return;
        };
        for (key, child) in map.iter_mut() {
            if key == "area" {
                *child = Value::String(area_id.to_string());
            } else if key == "target" {
                if let Value::Mapping(target) = child {
                    if target.contains_key("area_id") {
                        target.insert("area_id".to_string(), Value::String(area_id.to_string()));
                    }
                }
            }
        }
    });

    bind_first_card(&mut stack, room, &hash, icon.as_deref());

    TemplateApplication {
        stack,
        placeholders_used,
        icon_resolved,
    }
}

/// Pin the pop-up card's identity fields: name, hash, and (when an icon is
/// available) icon. Fields absent from the template stay absent.
fn bind_first_card(stack: &mut Value, room: &str, hash: &str, icon: Option<&str>) {
    let Some(first) = stack
        .as_mapping_mut()
        .and_then(|root| root.get_mut("cards"))
        .and_then(Value::as_sequence_mut)
        .and_then(|cards| cards.first_mut())
        .and_then(Value::as_mapping_mut)
    else {
        return;
    };
    if first.contains_key("name") {
        first.insert("name".to_string(), Value::String(room.to_string()));
    }
    if first.contains_key("hash") {
        first.insert("hash".to_string(), Value::String(hash.to_string()));
    }
    if let Some(icon) = icon {
        if first.contains_key("icon") {
            first.insert("icon".to_string(), Value::String(icon.to_string()));
        }
    }
}
