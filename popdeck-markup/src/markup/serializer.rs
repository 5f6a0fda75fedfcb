//! Serializer
//!
//! Walks a tree and emits indented block markup matching the parser's
//! conventions, so parse/stringify round-trips are stable.

use super::flow;
use super::scalars::{serialize_key, serialize_scalar};
use super::value::Value;

/// Serialize a tree to block markup with the given indent width.
pub fn stringify(value: &Value, indent_size: usize) -> String {
    // a zero width would flatten nesting into unparseable output
    let indent_size = indent_size.max(1);
    match inline_text(value) {
        Some(text) => text,
        None => render_block(value, indent_size, 0),
    }
}

/// The single-token rendering of a value, if it has one: scalars always,
/// collections only when empty.
fn inline_text(value: &Value) -> Option<String> {
    match value {
        Value::Sequence(items) if items.is_empty() => Some("[]".to_string()),
        Value::Mapping(map) if map.is_empty() => Some("{}".to_string()),
        Value::Sequence(_) | Value::Mapping(_) => None,
        scalar => Some(serialize_scalar(scalar)),
    }
}

fn render_block(value: &Value, indent_size: usize, level: usize) -> String {
    let pad = " ".repeat(indent_size * level);
    let mut lines: Vec<String> = Vec::new();
    match value {
        Value::Mapping(map) => {
            for (key, child) in map.iter() {
                let key = serialize_key(key);
                match inline_text(child) {
                    Some(text) => lines.push(format!("{pad}{key}: {text}")),
                    None => {
                        lines.push(format!("{pad}{key}:"));
                        lines.push(render_block(child, indent_size, level + 1));
                    }
                }
            }
        }
        Value::Sequence(items) => {
            for item in items {
                match item {
                    // a block sequence nested directly under a dash would
                    // not re-parse as nesting; use the flow form
                    Value::Sequence(nested) if !nested.is_empty() => {
                        lines.push(format!("{pad}- {}", flow::serialize_sequence(nested)));
                    }
                    _ => match inline_text(item) {
                        Some(text) => lines.push(format!("{pad}- {text}")),
                        None => {
                            let nested = render_block(item, indent_size, level + 1);
                            lines.push(splice_dash(&pad, &nested, indent_size * (level + 1)));
                        }
                    },
                }
            }
        }
        _ => {}
    }
    lines.join("\n")
}

/// Flatten a nested block so its first line follows the dash inline while
/// the continuation lines keep their deeper indentation.
fn splice_dash(pad: &str, nested: &str, inner_pad: usize) -> String {
    match nested.split_once('\n') {
        Some((first, rest)) => format!("{pad}- {}\n{rest}", &first[inner_pad..]),
        None => format!("{pad}- {}", &nested[inner_pad..]),
    }
}
