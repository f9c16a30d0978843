//! Locale-aware string ordering for titles. Approximates the default `en-US`
//! collation: letters compare alphabetically regardless of accents and case,
//! then accents break ties, then case (lowercase first).

use deunicode::deunicode_char;
use std::cmp::Ordering;

/// A precomputed sort key. Comparing keys is equivalent to calling
/// [`compare`] on the source strings, so callers sorting many strings can
/// build each key once.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    // Field order is comparison order.
    primary: String,
    secondary: String,
    tertiary: Vec<u8>,
    raw: String,
}

/// Builds the [`CollationKey`] for `s`.
pub fn key(s: &str) -> CollationKey {
    CollationKey {
        primary: fold_latin(s).to_lowercase(),
        secondary: s.to_lowercase(),
        tertiary: s
            .chars()
            .map(|c| if c.is_uppercase() { 1 } else { 0 })
            .collect(),
        raw: s.to_owned(),
    }
}

// Latin letters with diacritics fold to their ASCII base. Other scripts keep
// their own characters and so sort after the Latin alphabet.
fn fold_latin(s: &str) -> String {
    let mut folded = String::with_capacity(s.len());
    for c in s.chars() {
        match deunicode_char(c) {
            Some(base) if is_accented_latin(c) => folded.push_str(base),
            _ => folded.push(c),
        }
    }
    folded
}

fn is_accented_latin(c: char) -> bool {
    c.is_alphabetic() && matches!(c, '\u{00C0}'..='\u{024F}' | '\u{1E00}'..='\u{1EFF}')
}

/// Compares two strings in alphabetical order.
pub fn compare(a: &str, b: &str) -> Ordering {
    key(a).cmp(&key(b))
}
