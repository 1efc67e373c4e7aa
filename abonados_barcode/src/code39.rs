//! The Code 39 barcode symbology.
//!
//! Each character consists of five bars and four spaces, three of which are wide. Narrow elements
//! are one module and wide elements two modules wide, which makes every character 12 modules. A
//! narrow space separates consecutive characters.

use tracing::debug;

use crate::pattern::{ModulePattern, PatternBuilder};


/// The start and stop character. It is not valid as data.
pub const SENTINEL: char = '*';

pub const CHAR_MODULES: usize = 12;

const GAP: bool = false;

const PATTERNS: [(char, &str); 44] = [
    ('0', "101001101101"), ('1', "110100101011"), ('2', "101100101011"), ('3', "110110010101"),
    ('4', "101001101011"), ('5', "110100110101"), ('6', "101100110101"), ('7', "101001011011"),
    ('8', "110100101101"), ('9', "101100101101"),
    ('A', "110101001011"), ('B', "101101001011"), ('C', "110110100101"), ('D', "101011001011"),
    ('E', "110101100101"), ('F', "101101100101"), ('G', "101010011011"), ('H', "110101001101"),
    ('I', "101101001101"), ('J', "101011001101"), ('K', "110101010011"), ('L', "101101010011"),
    ('M', "110110101001"), ('N', "101011010011"), ('O', "110101101001"), ('P', "101101101001"),
    ('Q', "101010110011"), ('R', "110101011001"), ('S', "101101011001"), ('T', "101011011001"),
    ('U', "110010101011"), ('V', "100110101011"), ('W', "110011010101"), ('X', "100101101011"),
    ('Y', "110010110101"), ('Z', "100110110101"),
    ('-', "100101011011"), ('.', "110010101101"), (' ', "100110101101"), ('$', "100100100101"),
    ('/', "100100101001"), ('+', "100101001001"), ('%', "101001001001"),
    (SENTINEL, "100101101101"),
];


/// Returns the pattern for the given character. The character must already be uppercase.
pub fn pattern_for(c: char) -> Option<&'static str> {
    PATTERNS.iter()
        .find(|(pc, _)| *pc == c)
        .map(|(_, p)| *p)
}

/// Uppercases a single character, keeping it as-is if its uppercase form is not a single
/// character.
pub(crate) fn to_upper(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// Returns whether the character is part of the data alphabet (after uppercasing).
pub fn is_encodable(c: char) -> bool {
    let upper = to_upper(c);
    upper != SENTINEL && pattern_for(upper).is_some()
}

fn substitutes_unknown(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '.' || c == ' '
}


/// Encodes the text as a Code 39 barcode, wrapped in start and stop characters.
///
/// The text is uppercased first. Unknown letters and digits are replaced by the pattern of
/// [`SENTINEL`]; all other unknown characters are dropped.
pub fn encode(text: &str) -> ModulePattern {
    let sentinel = pattern_for(SENTINEL)
        .unwrap_or_default();

    let char_count = text.chars().count();
    let mut builder = PatternBuilder::with_capacity((CHAR_MODULES + 1) * (char_count + 2));
    builder.push_str(sentinel);
    builder.push(GAP);

    let mut substituted = 0usize;
    let mut dropped = 0usize;
    for c in text.chars().map(to_upper) {
        if let Some(pattern) = pattern_for(c) {
            builder.push_str(pattern);
            builder.push(GAP);
        } else if substitutes_unknown(c) {
            substituted += 1;
            builder.push_str(sentinel);
            builder.push(GAP);
        } else {
            dropped += 1;
        }
    }
    if substituted > 0 || dropped > 0 {
        debug!(
            "Code 39 encoding of {:?}: {} character(s) substituted, {} dropped",
            text, substituted, dropped,
        );
    }

    builder.push_str(sentinel);
    builder.finish()
}
