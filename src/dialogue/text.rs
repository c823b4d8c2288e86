//! City and name text normalization and validation.

/// Unicode hyphen/dash variants folded into the plain ASCII hyphen:
/// non-breaking hyphen, hyphen, figure dash, en dash, em dash, minus
/// sign.
const DASH_VARIANTS: [char; 6] = [
    '\u{2011}', '\u{2010}', '\u{2012}', '\u{2013}', '\u{2014}', '\u{2212}',
];

/// Replaces every dash variant with `-` and trims surrounding
/// whitespace. Idempotent.
#[must_use]
pub fn normalize_city_name(raw: &str) -> String {
    raw.chars()
        .map(|c| if DASH_VARIANTS.contains(&c) { '-' } else { c })
        .collect::<String>()
        .trim()
        .to_owned()
}

/// Checks whether a name or city string is acceptable: trimmed length
/// between 1 and 32 characters, every character a Latin or Cyrillic
/// letter, digit, underscore, apostrophe, hyphen, or space.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    let name = name.trim();
    let len = name.chars().count();
    (1..=32).contains(&len) && name.chars().all(is_allowed_char)
}

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || ('\u{0400}'..='\u{04FF}').contains(&c)
        || matches!(c, '_' | '\'' | '-' | ' ')
}
