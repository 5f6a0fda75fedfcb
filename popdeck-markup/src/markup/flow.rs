//! Flow collection grammar
//!
//! Parses and serializes inline `[...]` sequences and `{...}` mappings.
//! Separator scanning is stateful: commas inside quoted spans or nested
//! brackets never split, matching the block parser's comment detection.

use super::error::SyntaxError;
use super::scalars;
use super::value::{Mapping, Value};

/// Parse the body (text between `[` and `]`) of an inline sequence.
pub fn parse_inline_array(body: &str) -> Result<Vec<Value>, SyntaxError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    split_top_level(body)
        .iter()
        .map(|fragment| scalars::parse_scalar(fragment))
        .collect()
}

/// Parse the body (text between `{` and `}`) of an inline mapping.
///
/// Each fragment splits once on its first unquoted `:`; a fragment without
/// one fails, naming the offending fragment.
pub fn parse_inline_object(body: &str) -> Result<Mapping, SyntaxError> {
    let mut map = Mapping::new();
    if body.trim().is_empty() {
        return Ok(map);
    }
    for fragment in split_top_level(body) {
        let Some(split_at) = find_separator(&fragment) else {
            return Err(SyntaxError::MalformedFragment { fragment });
        };
        let raw_key = fragment[..split_at].trim();
        if raw_key.is_empty() {
            return Err(SyntaxError::MalformedFragment { fragment });
        }
        let key = scalars::decode_key(raw_key);
        let value = scalars::parse_scalar(&fragment[split_at + 1..])?;
        map.insert(key, value);
    }
    Ok(map)
}

/// Render a sequence in flow form: `[a, b, c]`.
pub fn serialize_sequence(items: &[Value]) -> String {
    let rendered: Vec<String> = items.iter().map(scalars::serialize_scalar).collect();
    format!("[{}]", rendered.join(", "))
}

/// Render a mapping in flow form: `{k: v, ...}`.
pub fn serialize_mapping(map: &Mapping) -> String {
    let rendered: Vec<String> = map
        .iter()
        .map(|(key, value)| {
            format!(
                "{}: {}",
                scalars::serialize_key(key),
                scalars::serialize_scalar(value)
            )
        })
        .collect();
    format!("{{{}}}", rendered.join(", "))
}

/// Split a flow body on top-level commas.
///
/// A comma only separates when it sits outside both quote kinds and at
/// bracket depth zero. Fragments come back trimmed.
fn split_top_level(body: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut current = String::new();
    let mut state = ScanState::new();
    for c in body.chars() {
        if c == ',' && state.at_top_level() {
            fragments.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(c);
        }
        state.step(c);
    }
    fragments.push(current.trim().to_string());
    fragments
}

/// Byte position of the first `target` outside any quoted span.
///
/// Used for comment stripping: a `#` starts a comment wherever it sits, as
/// long as no quote encloses it.
pub(crate) fn find_unquoted(s: &str, target: char) -> Option<usize> {
    let mut state = ScanState::new();
    for (pos, c) in s.char_indices() {
        if c == target && !state.in_quotes() {
            return Some(pos);
        }
        state.step(c);
    }
    None
}

/// Byte position of the first key/value `:` separator: outside quotes and
/// outside any bracket nesting, so flow tokens never split internally.
pub(crate) fn find_separator(s: &str) -> Option<usize> {
    let mut state = ScanState::new();
    for (pos, c) in s.char_indices() {
        if c == ':' && state.at_top_level() {
            return Some(pos);
        }
        state.step(c);
    }
    None
}

/// Quote and bracket-depth tracking for one left-to-right scan.
///
/// A double quote only toggles when preceded by an even run of backslashes;
/// a single quote toggles unconditionally outside double quotes. Bracket
/// depth floors at zero.
struct ScanState {
    in_single: bool,
    in_double: bool,
    depth: usize,
    backslashes: usize,
}

impl ScanState {
    fn new() -> Self {
        ScanState {
            in_single: false,
            in_double: false,
            depth: 0,
            backslashes: 0,
        }
    }

    fn in_quotes(&self) -> bool {
        self.in_single || self.in_double
    }

    fn at_top_level(&self) -> bool {
        !self.in_quotes() && self.depth == 0
    }

    fn step(&mut self, c: char) {
        match c {
            '\'' if !self.in_double => self.in_single = !self.in_single,
            '"' if !self.in_single && self.backslashes % 2 == 0 => {
                self.in_double = !self.in_double
            }
            '[' | '{' if !self.in_quotes() => self.depth += 1,
            ']' | '}' if !self.in_quotes() => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
        self.backslashes = if c == '\\' { self.backslashes + 1 } else { 0 };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_simple_fragments() {
        assert_eq!(
            parse_inline_array("1, two, 3.5").unwrap(),
            vec![
                Value::Int(1),
                Value::String("two".to_string()),
                Value::Float(3.5)
            ]
        );
    }

    #[test]
    fn empty_bodies_yield_empty_containers() {
        assert_eq!(parse_inline_array("   ").unwrap(), Vec::new());
        assert!(parse_inline_object("").unwrap().is_empty());
    }

    #[test]
    fn commas_inside_quotes_do_not_split() {
        assert_eq!(
            parse_inline_array("\"a, b\", 'c, d'").unwrap(),
            vec![
                Value::String("a, b".to_string()),
                Value::String("c, d".to_string())
            ]
        );
    }

    #[test]
    fn commas_inside_nested_brackets_do_not_split() {
        assert_eq!(
            parse_inline_array("[1, 2], {a: 3, b: 4}").unwrap(),
            vec![
                Value::Sequence(vec![Value::Int(1), Value::Int(2)]),
                Value::Mapping(Mapping::from_iter([
                    ("a".to_string(), Value::Int(3)),
                    ("b".to_string(), Value::Int(4)),
                ])),
            ]
        );
    }

    #[test]
    fn escaped_double_quote_does_not_toggle() {
        // the quote after the backslash stays inside the string
        assert_eq!(
            parse_inline_array(r#""a\",b", 2"#).unwrap(),
            vec![Value::String("a\",b".to_string()), Value::Int(2)]
        );
    }

    #[test]
    fn object_fragment_without_separator_fails() {
        let err = parse_inline_object("a: 1, nope").unwrap_err();
        assert_eq!(
            err,
            SyntaxError::MalformedFragment {
                fragment: "nope".to_string()
            }
        );
    }

    #[test]
    fn object_values_may_contain_colons() {
        let map = parse_inline_object("type: custom:bubble-card").unwrap();
        assert_eq!(map.get_str("type"), Some("custom:bubble-card"));
    }

    #[test]
    fn quoted_keys_decode() {
        let map = parse_inline_object("\"a b\": 1").unwrap();
        assert_eq!(map.get("a b"), Some(&Value::Int(1)));
    }

    #[test]
    fn flow_round_trip() {
        let items = vec![
            Value::Int(1),
            Value::String("a, b".to_string()),
            Value::Sequence(vec![Value::Bool(true)]),
        ];
        let text = serialize_sequence(&items);
        assert_eq!(parse_inline_array(&text[1..text.len() - 1]).unwrap(), items);
    }
}
