//! The EAN-13 barcode symbology.

use std::borrow::Cow;
use std::fmt;

use crate::EncodeError;
use crate::pattern::{ModulePattern, PatternBuilder};


pub const DIGIT_COUNT: usize = 13;
pub const MODULE_COUNT: usize = 95;

const START_GUARD: &str = "101";
const CENTER_GUARD: &str = "01010";
const END_GUARD: &str = "101";

/// The L (odd parity) encoding for digits 0-9, used in the left half.
const L_DIGITS: [&str; 10] = [
    "0001101", "0011001", "0010011", "0111101", "0100011",
    "0110001", "0101111", "0111011", "0110111", "0001011",
];

/// The G (even parity) encoding for digits 0-9, used in the left half.
const G_DIGITS: [&str; 10] = [
    "0100111", "0110011", "0011011", "0100001", "0011101",
    "0111001", "0000101", "0010001", "0001001", "0010111",
];

/// The R encoding for digits 0-9, used for the whole right half.
const R_DIGITS: [&str; 10] = [
    "1110010", "1100110", "1101100", "1000010", "1011100",
    "1001110", "1010000", "1000100", "1001000", "1110100",
];

/// Which of L and G encodes each left-half digit, selected by the leading digit.
///
/// The leading digit has no bars of its own; it is only recoverable from this parity sequence.
const LEFT_PARITY: [&str; 10] = [
    "LLLLLL", "LLGLGG", "LLGGLG", "LLGGGL", "LGLLGG",
    "LGGLLG", "LGGGLL", "LGLGLG", "LGLGGL", "LGGLGL",
];


/// A single decimal digit.
#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Digit(u8);
impl Digit {
    pub const fn as_u8(&self) -> u8 { self.0 }
    pub const fn as_usize(&self) -> usize { self.0 as usize }
    pub const fn try_from_u8(value: u8) -> Option<Self> {
        if value < 10 {
            Some(Self(value))
        } else {
            None
        }
    }
    pub fn try_from_char(c: char) -> Option<Self> {
        // to_digit only accepts ASCII digits
        c.to_digit(10)
            .and_then(|d| Self::try_from_u8(d as u8))
    }
}
impl fmt::Debug for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}


/// Brings the text to exactly 13 characters: shorter text is padded with zeroes on the left,
/// longer text is cut down to its rightmost 13 characters.
pub fn normalize(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() >= DIGIT_COUNT {
        chars[chars.len()-DIGIT_COUNT..].iter().collect()
    } else {
        let mut padded = "0".repeat(DIGIT_COUNT - chars.len());
        padded.extend(chars);
        padded
    }
}

/// Normalizes the text (see [`normalize`]) and converts it into digits.
pub fn parse_digits(text: &str) -> Result<[Digit; DIGIT_COUNT], EncodeError> {
    let normalized = normalize(text);
    let mut digits = [Digit::default(); DIGIT_COUNT];
    for (i, (digit, c)) in digits.iter_mut().zip(normalized.chars()).enumerate() {
        *digit = Digit::try_from_char(c)
            .ok_or_else(|| EncodeError::InvalidInput {
                reason: Cow::Owned(format!("EAN-13 position {} is {:?}, not a digit", i, c)),
            })?;
    }
    Ok(digits)
}

/// Calculates the check digit for the first twelve digits.
pub fn calculate_check_digit(digits: &[Digit]) -> Digit {
    // weights alternate 1, 3, 1, ... from the left
    let weighted_sum: u32 = digits.iter()
        .take(DIGIT_COUNT - 1)
        .enumerate()
        .map(|(i, d)| u32::from(d.as_u8()) * if i % 2 == 0 { 1 } else { 3 })
        .sum();
    Digit(((10 - (weighted_sum % 10)) % 10) as u8)
}

/// Encodes thirteen digits. The check digit is taken as it is.
///
/// Layout: start guard (modules 0..=2), six left digits (3..=44), center guard (45..=49), six
/// right digits (50..=91), end guard (92..=94).
pub fn encode_digits(digits: &[Digit; DIGIT_COUNT]) -> ModulePattern {
    let mut builder = PatternBuilder::with_capacity(MODULE_COUNT);
    builder.push_str(START_GUARD);

    let parity = LEFT_PARITY[digits[0].as_usize()];
    for (digit, kind) in digits[1..7].iter().zip(parity.chars()) {
        let table = if kind == 'G' { &G_DIGITS } else { &L_DIGITS };
        builder.push_str(table[digit.as_usize()]);
    }

    builder.push_str(CENTER_GUARD);
    for digit in &digits[7..] {
        builder.push_str(R_DIGITS[digit.as_usize()]);
    }
    builder.push_str(END_GUARD);

    builder.finish()
}

/// Encodes the text as an EAN-13 barcode after normalizing it to 13 characters.
pub fn encode(text: &str) -> Result<ModulePattern, EncodeError> {
    let digits = parse_digits(text)?;
    Ok(encode_digits(&digits))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_wikipedia_example() {
        let expected = [
            "101",
            "0001101", // 0, L
            "0100111", // 0, G
            "0111101", // 3, L
            "0001011", // 9, L
            "0010111", // 9, G
            "0011101", // 4, G
            "01010",
            "1100110", // 1
            "1001110", // 5
            "1001110", // 5
            "1011100", // 4
            "1001000", // 8
            "1010000", // 6
            "101",
        ].concat();

        let encoded = encode("4003994155486").unwrap();
        assert_eq!(encoded.to_string(), expected);
    }

    #[test]
    fn test_length_and_guards() {
        for text in ["0000000000000", "9999999999999", "4006381333931", "123456789012"] {
            let pattern = encode(text).unwrap().to_string();
            assert_eq!(pattern.len(), MODULE_COUNT);
            assert!(pattern.starts_with("101"));
            assert!(pattern.ends_with("101"));
            assert_eq!(&pattern[45..50], "01010");
        }
    }

    #[test]
    fn test_padding() {
        assert_eq!(encode("5").unwrap(), encode("0000000000005").unwrap());
        assert_eq!(normalize("123456789012"), "0123456789012");
    }

    #[test]
    fn test_truncation() {
        assert_eq!(normalize("994006381333931"), "4006381333931");
        assert_eq!(encode("XY4006381333931").unwrap(), encode("4006381333931").unwrap());
    }

    #[test]
    fn test_non_digits() {
        assert!(encode("40063813339A1").is_err());
        assert!(encode("12 34").is_err());
        assert!(encode("٣").is_err());
    }

    #[test]
    fn test_check_digit() {
        let digits = parse_digits("4006381333931").unwrap();
        assert_eq!(calculate_check_digit(&digits), Digit(1));

        let digits = parse_digits("4003994155486").unwrap();
        assert_eq!(calculate_check_digit(&digits), Digit(6));
    }
}
