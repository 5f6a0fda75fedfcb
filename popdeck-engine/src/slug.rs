//! Area identifier derivation
//!
//! Turns a human-readable room name into the anchor-safe token the rest of
//! the engine keys on. The rule is deliberately literal: lowercase, trim,
//! transliterate the four German specials, keep ASCII `[a-z0-9]`, map space
//! and `/` each to `_`, drop everything else.

/// Derive the area identifier for a room name. Deterministic: repeated
/// calls always agree.
pub fn slugify_area(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().to_lowercase().chars() {
        match c {
            'ä' => slug.push_str("ae"),
            'ö' => slug.push_str("oe"),
            'ü' => slug.push_str("ue"),
            'ß' => slug.push_str("ss"),
            'a'..='z' | '0'..='9' => slug.push(c),
            ' ' | '/' => slug.push('_'),
            _ => {}
        }
    }
    slug
}
