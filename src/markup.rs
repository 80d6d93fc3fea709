/*!
 * Plain text view of subtitle markup.
 *
 * Subtitle rows carry inline formatting: HTML-like tags (`<i>`, `<font ...>`,
 * WebVTT `<v Name>` and `<c.class>`), override blocks (`{\an8}`) and
 * character references (`&amp;`, `&rlm;`). Direction is decided on the text a
 * viewer sees, so markup is removed before classification. The row itself is
 * never rewritten here.
 */

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// @const: Tags and override blocks
static MARKUP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^<>]*>|\{\\[^{}]*\}").expect("Markup pattern is valid")
});

// @const: Character references
static ENTITY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("Entity pattern is valid")
});

fn decode_entity(name: &str) -> String {
    let decoded = match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        "lrm" => Some('\u{200E}'),
        "rlm" => Some('\u{200F}'),
        _ => name
            .strip_prefix("#x")
            .or_else(|| name.strip_prefix("#X"))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .or_else(|| name.strip_prefix('#').and_then(|dec| dec.parse().ok()))
            .and_then(char::from_u32),
    };

    // Unknown references carry no direction
    decoded.map(String::from).unwrap_or_default()
}

/// The text of `row` as displayed: tags and override blocks removed,
/// character references decoded.
pub fn plain_text(row: &str) -> Cow<'_, str> {
    if !row.contains(['<', '{', '&']) {
        return Cow::Borrowed(row);
    }

    let stripped = MARKUP_REGEX.replace_all(row, "");
    let decoded = match ENTITY_REGEX.replace_all(&stripped, |caps: &Captures| decode_entity(&caps[1])) {
        Cow::Borrowed(_) => None,
        Cow::Owned(decoded) => Some(decoded),
    };

    match decoded {
        Some(decoded) => Cow::Owned(decoded),
        None => stripped,
    }
}
