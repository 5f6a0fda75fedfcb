//! Scalar grammar
//!
//! Recognizes and converts leaf tokens (null, boolean, integer, float,
//! quoted/bare string) to typed values and back. Flow-collection tokens are
//! delegated to the flow grammar.

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::SyntaxError;
use super::flow;
use super::value::Value;

/// Integer tokens: optional sign, digits only.
static INT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?[0-9]+$").unwrap());

/// Float tokens: optional sign, optional integer part, mandatory fraction.
static FLOAT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?[0-9]*\.[0-9]+$").unwrap());

/// Words that may be emitted without quotes.
static BARE_WORD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-A-Za-z0-9_.]+$").unwrap());

/// Parse one trimmed leaf token into a typed value.
///
/// Recognition order is fixed: null forms, booleans, integers, floats,
/// quoted strings, flow collections, and finally the bare string fallback
/// which returns the token verbatim.
pub fn parse_scalar(raw: &str) -> Result<Value, SyntaxError> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "null" || raw == "~" {
        return Ok(Value::Null);
    }
    if raw == "true" || raw == "True" {
        return Ok(Value::Bool(true));
    }
    if raw == "false" || raw == "False" {
        return Ok(Value::Bool(false));
    }
    if INT_REGEX.is_match(raw) {
        // tokens wider than i64 degrade to the float representation
        if let Ok(n) = raw.parse::<i64>() {
            return Ok(Value::Int(n));
        }
        if let Ok(x) = raw.parse::<f64>() {
            return Ok(Value::Float(x));
        }
    }
    if FLOAT_REGEX.is_match(raw) {
        if let Ok(x) = raw.parse::<f64>() {
            return Ok(Value::Float(x));
        }
    }
    if let Some(body) = quoted_body(raw, '"') {
        return Ok(Value::String(decode_double_quoted(body)));
    }
    if let Some(body) = quoted_body(raw, '\'') {
        return Ok(Value::String(decode_single_quoted(body)));
    }
    if raw.starts_with('[') {
        let body = flow_body(raw, ']')?;
        return flow::parse_inline_array(body).map(Value::Sequence);
    }
    if raw.starts_with('{') {
        let body = flow_body(raw, '}')?;
        return flow::parse_inline_object(body).map(Value::Mapping);
    }
    Ok(Value::String(raw.to_string()))
}

/// Render one value as a single inline token.
///
/// Non-finite floats degrade to `null`. Strings are emitted bare when they
/// are safe bare words, quoted otherwise. Collections render in flow form.
pub fn serialize_scalar(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(x) => {
            if !x.is_finite() {
                "null".to_string()
            } else if x.fract() == 0.0 {
                // force one decimal so the token re-parses as a float
                format!("{:.1}", x)
            } else {
                format!("{}", x)
            }
        }
        Value::String(s) => {
            if needs_quoting(s) {
                encode_double_quoted(s)
            } else {
                s.clone()
            }
        }
        Value::Sequence(items) => flow::serialize_sequence(items),
        Value::Mapping(map) => flow::serialize_mapping(map),
    }
}

/// Render a mapping key, quoting when the bare form would not re-parse.
///
/// Keys follow the scalar needs-quoting rule, plus a leading dash forces
/// quotes: a bare dash-led key line would read back as a sequence item.
pub fn serialize_key(key: &str) -> String {
    if needs_quoting(key) || key.starts_with('-') {
        encode_double_quoted(key)
    } else {
        key.to_string()
    }
}

/// Decode a key token, stripping one level of quoting when present.
pub fn decode_key(raw: &str) -> String {
    if let Some(body) = quoted_body(raw, '"') {
        decode_double_quoted(body)
    } else if let Some(body) = quoted_body(raw, '\'') {
        decode_single_quoted(body)
    } else {
        raw.to_string()
    }
}

/// A string must be quoted when empty, containing a key/value separator,
/// failing the bare-word shape, or when its bare rendering would re-parse
/// as a non-string scalar.
fn needs_quoting(s: &str) -> bool {
    s.is_empty() || s.contains(": ") || !BARE_WORD_REGEX.is_match(s) || is_scalar_lookalike(s)
}

fn is_scalar_lookalike(s: &str) -> bool {
    matches!(s, "null" | "~" | "true" | "True" | "false" | "False")
        || INT_REGEX.is_match(s)
        || FLOAT_REGEX.is_match(s)
}

fn quoted_body(raw: &str, quote: char) -> Option<&str> {
    if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
        Some(&raw[1..raw.len() - 1])
    } else {
        None
    }
}

fn flow_body(raw: &str, closer: char) -> Result<&str, SyntaxError> {
    if raw.len() >= 2 && raw.ends_with(closer) {
        Ok(&raw[1..raw.len() - 1])
    } else {
        Err(SyntaxError::UnterminatedFlow {
            fragment: raw.to_string(),
        })
    }
}

/// Minimal double-quote encoder: escape backslashes and double quotes.
fn encode_double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Double-quoted bodies understand `\n`, `\"`, and `\\`; any other escape
/// is kept literally.
fn decode_double_quoted(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Single-quoted bodies understand the doubled quote and nothing else.
fn decode_single_quoted(body: &str) -> String {
    body.replace("''", "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::value::Mapping;

    #[test]
    fn null_forms() {
        assert_eq!(parse_scalar("").unwrap(), Value::Null);
        assert_eq!(parse_scalar("~").unwrap(), Value::Null);
        assert_eq!(parse_scalar("null").unwrap(), Value::Null);
    }

    #[test]
    fn booleans_accept_both_cases() {
        assert_eq!(parse_scalar("true").unwrap(), Value::Bool(true));
        assert_eq!(parse_scalar("True").unwrap(), Value::Bool(true));
        assert_eq!(parse_scalar("false").unwrap(), Value::Bool(false));
        assert_eq!(parse_scalar("False").unwrap(), Value::Bool(false));
        // other casings fall through to bare strings
        assert_eq!(
            parse_scalar("TRUE").unwrap(),
            Value::String("TRUE".to_string())
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_scalar("03").unwrap(), Value::Int(3));
        assert_eq!(parse_scalar("-7").unwrap(), Value::Int(-7));
        assert_eq!(parse_scalar("+7").unwrap(), Value::Int(7));
        assert_eq!(parse_scalar("3.0").unwrap(), Value::Float(3.0));
        assert_eq!(parse_scalar(".5").unwrap(), Value::Float(0.5));
        assert_eq!(parse_scalar("-0.25").unwrap(), Value::Float(-0.25));
        // not numbers
        assert_eq!(
            parse_scalar("1.2.3").unwrap(),
            Value::String("1.2.3".to_string())
        );
    }

    #[test]
    fn quoted_strings_decode_their_escape_set() {
        assert_eq!(
            parse_scalar("\"a\\nb\"").unwrap(),
            Value::String("a\nb".to_string())
        );
        assert_eq!(
            parse_scalar("\"say \\\"hi\\\"\"").unwrap(),
            Value::String("say \"hi\"".to_string())
        );
        assert_eq!(
            parse_scalar("\"back\\\\slash\"").unwrap(),
            Value::String("back\\slash".to_string())
        );
        // unknown escapes stay literal
        assert_eq!(
            parse_scalar("\"a\\tb\"").unwrap(),
            Value::String("a\\tb".to_string())
        );
        assert_eq!(
            parse_scalar("'it''s'").unwrap(),
            Value::String("it's".to_string())
        );
    }

    #[test]
    fn bare_strings_are_verbatim() {
        assert_eq!(
            parse_scalar("custom:bubble-card").unwrap(),
            Value::String("custom:bubble-card".to_string())
        );
    }

    #[test]
    fn unterminated_flow_is_an_error() {
        assert!(matches!(
            parse_scalar("[1, 2"),
            Err(SyntaxError::UnterminatedFlow { .. })
        ));
        assert!(matches!(
            parse_scalar("{a: 1"),
            Err(SyntaxError::UnterminatedFlow { .. })
        ));
    }

    #[test]
    fn serialize_scalars() {
        assert_eq!(serialize_scalar(&Value::Null), "null");
        assert_eq!(serialize_scalar(&Value::Bool(true)), "true");
        assert_eq!(serialize_scalar(&Value::Int(42)), "42");
        assert_eq!(serialize_scalar(&Value::Float(3.0)), "3.0");
        assert_eq!(serialize_scalar(&Value::Float(0.25)), "0.25");
        assert_eq!(serialize_scalar(&Value::Float(f64::NAN)), "null");
        assert_eq!(serialize_scalar(&Value::Float(f64::INFINITY)), "null");
    }

    #[test]
    fn strings_quote_when_unsafe() {
        assert_eq!(serialize_scalar(&Value::String("plain".to_string())), "plain");
        assert_eq!(serialize_scalar(&Value::String(String::new())), "\"\"");
        assert_eq!(
            serialize_scalar(&Value::String("a: b".to_string())),
            "\"a: b\""
        );
        assert_eq!(
            serialize_scalar(&Value::String("#saloon-popup".to_string())),
            "\"#saloon-popup\""
        );
        // lookalikes must not flip type on re-parse
        assert_eq!(serialize_scalar(&Value::String("true".to_string())), "\"true\"");
        assert_eq!(serialize_scalar(&Value::String("03".to_string())), "\"03\"");
        assert_eq!(serialize_scalar(&Value::String("3.5".to_string())), "\"3.5\"");
    }

    #[test]
    fn empty_collections_render_inline() {
        assert_eq!(serialize_scalar(&Value::Sequence(Vec::new())), "[]");
        assert_eq!(serialize_scalar(&Value::Mapping(Mapping::new())), "{}");
    }
}
