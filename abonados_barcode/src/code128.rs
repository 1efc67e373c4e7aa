//! The Code 128 barcode symbology, restricted to code set B.
//!
//! Code set B covers the printable ASCII range from space (value 0) to tilde (value 94). Every
//! symbol is 11 modules wide, except for the stop symbol, which has a trailing two-module bar and
//! is 13 modules wide.

use tracing::debug;

use crate::EncodeError;
use crate::pattern::{ModulePattern, PatternBuilder};


/// The symbol patterns for the values 0 to 106.
///
/// Values 0 to 102 are data (and checksum) symbols, 103 to 105 are the three start symbols and 106
/// is the stop symbol.
const PATTERNS: [&str; 107] = [
    "11011001100", "11001101100", "11001100110", "10010011000", "10010001100",
    "10001001100", "10011001000", "10011000100", "10001100100", "11001001000",
    "11001000100", "11000100100", "10110011100", "10011011100", "10011001110",
    "10111001100", "10011101100", "10011100110", "11001110010", "11001011100",
    "11001001110", "11011100100", "11001110100", "11101101110", "11101001100",
    "11100101100", "11100100110", "11101100100", "11100110100", "11100110010",
    "11011011000", "11011000110", "11000110110", "10100011000", "10001011000",
    "10001000110", "10110001000", "10001101000", "10001100010", "11010001000",
    "11000101000", "11000100010", "10110111000", "10110001110", "10001101110",
    "10111011000", "10111000110", "10001110110", "11101110110", "11010001110",
    "11000101110", "11011101000", "11011100010", "11011101110", "11101011000",
    "11101000110", "11100010110", "11101101000", "11101100010", "11100011010",
    "11101111010", "11001000010", "11110001010", "10100110000", "10100001100",
    "10010110000", "10010000110", "10000101100", "10000100110", "10110010000",
    "10110000100", "10011010000", "10011000010", "10000110100", "10000110010",
    "11000010010", "11001010000", "11110111010", "11000010100", "10001111010",
    "10100111100", "10010111100", "10010011110", "10111100100", "10011110100",
    "10011110010", "11110100100", "11110010100", "11110010010", "11011011110",
    "11011110110", "11110110110", "10101111000", "10100011110", "10001011110",
    "10111101000", "10111100010", "11110101000", "11110100010", "10111011110",
    "10111101110", "11101011110", "11110101110", "11010000100", "11010010000",
    "11010011100", "1100011101011",
];

pub const START_B_VALUE: u32 = 104;
pub const STOP_VALUE: u32 = 106;
const CHECKSUM_MODULUS: u32 = 103;

/// Stands in for characters outside code set B.
pub const SUBSTITUTE: char = '?';

/// Modules taken up by the start and checksum symbols (11 each) and the stop symbol (13).
pub const OVERHEAD_MODULES: usize = 11 + 11 + 13;
pub const SYMBOL_MODULES: usize = 11;


/// Returns the code set B value of the given character, or `None` if it is not part of code set B.
pub fn value_of(c: char) -> Option<u32> {
    let code = u32::from(c);
    if (0x20..=0x7E).contains(&code) {
        Some(code - 0x20)
    } else {
        None
    }
}

/// Returns whether the character can be encoded in code set B as-is.
pub fn is_encodable(c: char) -> bool {
    value_of(c).is_some()
}

fn value_or_substitute(c: char) -> u32 {
    value_of(c)
        .or_else(|| value_of(SUBSTITUTE))
        .unwrap_or(0)
}

/// Returns the pattern for the given symbol value, or `None` if the value is beyond the table.
pub fn pattern_for_value(value: u32) -> Option<&'static str> {
    let index = usize::try_from(value).ok()?;
    PATTERNS.get(index).copied()
}

/// Calculates the checksum value of the given text as it would be encoded.
///
/// The start symbol counts with weight 1 and each data character with its one-based position.
/// Characters outside code set B contribute as [`SUBSTITUTE`].
pub fn checksum(text: &str) -> u32 {
    let mut sum = START_B_VALUE;
    for (i, c) in text.chars().enumerate() {
        // reducing as we go keeps the sum bounded for arbitrarily long input
        let weight = ((i as u64 + 1) % u64::from(CHECKSUM_MODULUS)) as u32;
        sum = (sum + value_or_substitute(c) * weight) % CHECKSUM_MODULUS;
    }
    sum % CHECKSUM_MODULUS
}


/// Encodes the text as a Code 128 (set B) barcode.
///
/// Characters outside code set B are encoded as [`SUBSTITUTE`] instead of failing the whole
/// barcode.
pub fn encode(text: &str) -> Result<ModulePattern, EncodeError> {
    let char_count = text.chars().count();
    let mut builder = PatternBuilder::with_capacity(OVERHEAD_MODULES + SYMBOL_MODULES * char_count);

    let start = pattern_for_value(START_B_VALUE)
        .ok_or(EncodeError::ChecksumTableMiss { checksum: START_B_VALUE })?;
    builder.push_str(start);

    let mut substituted = 0usize;
    for c in text.chars() {
        let value = match value_of(c) {
            Some(v) => v,
            None => {
                substituted += 1;
                value_or_substitute(c)
            },
        };
        let pattern = pattern_for_value(value)
            .ok_or(EncodeError::ChecksumTableMiss { checksum: value })?;
        builder.push_str(pattern);
    }
    if substituted > 0 {
        debug!("substituted {} character(s) outside code set B in {:?}", substituted, text);
    }

    let checksum_value = checksum(text);
    let checksum_pattern = pattern_for_value(checksum_value)
        .ok_or(EncodeError::ChecksumTableMiss { checksum: checksum_value })?;
    builder.push_str(checksum_pattern);

    let stop = pattern_for_value(STOP_VALUE)
        .ok_or(EncodeError::ChecksumTableMiss { checksum: STOP_VALUE })?;
    builder.push_str(stop);

    Ok(builder.finish())
}


#[cfg(test)]
mod tests {
    use super::*;

    fn checksum_from_pattern(pattern: &str, char_count: usize) -> Option<u32> {
        let offset = SYMBOL_MODULES * (1 + char_count);
        let symbol = &pattern[offset..offset+SYMBOL_MODULES];
        PATTERNS.iter()
            .position(|p| *p == symbol)
            .map(|p| p as u32)
    }

    #[test]
    fn test_table_shape() {
        for (value, pattern) in PATTERNS.iter().enumerate() {
            let expected_len = if value == 106 { 13 } else { 11 };
            assert_eq!(pattern.len(), expected_len, "length of pattern {}", value);
            assert!(pattern.starts_with('1'));
        }
        assert_eq!(PATTERNS[START_B_VALUE as usize], "11010010000");
        assert_eq!(PATTERNS[STOP_VALUE as usize], "1100011101011");
    }

    #[test]
    fn test_values() {
        assert_eq!(value_of(' '), Some(0));
        assert_eq!(value_of('?'), Some(31));
        assert_eq!(value_of('A'), Some(33));
        assert_eq!(value_of('~'), Some(94));
        assert_eq!(value_of('\u{7F}'), None);
        assert_eq!(value_of('é'), None);
        assert_eq!(value_of('\n'), None);
    }

    #[test]
    fn test_encode_hello() {
        let pattern = encode("HELLO").unwrap().to_string();
        assert_eq!(pattern.len(), 11 + 11*5 + 11 + 13);
        assert!(pattern.starts_with("11010010000"));
        assert!(pattern.ends_with("1100011101011"));

        // H=40, E=37, L=44, L=44, O=47
        // (104 + 40*1 + 37*2 + 44*3 + 44*4 + 47*5) % 103 = 761 % 103 = 40
        let expected = (104 + 40 + 37*2 + 44*3 + 44*4 + 47*5) % 103;
        assert_eq!(checksum("HELLO"), expected);
        assert_eq!(checksum_from_pattern(&pattern, 5), Some(expected));
        assert_eq!(&pattern[11..22], PATTERNS[40]);
    }

    #[test]
    fn test_checksum_law() {
        let samples = ["", "A", "ABO-0042", "Socio 12345", "~}|{ zyx", "The quick brown fox"];
        for sample in samples {
            let mut expected: u64 = 104;
            for (i, c) in sample.chars().enumerate() {
                expected += u64::from(value_of(c).unwrap()) * (i as u64 + 1);
            }
            let expected = (expected % 103) as u32;

            assert_eq!(checksum(sample), expected, "checksum of {:?}", sample);

            let pattern = encode(sample).unwrap().to_string();
            let char_count = sample.chars().count();
            assert_eq!(pattern.len(), OVERHEAD_MODULES + SYMBOL_MODULES * char_count);
            assert_eq!(checksum_from_pattern(&pattern, char_count), Some(expected));
        }
    }

    #[test]
    fn test_long_input_checksum() {
        let long_text: String = std::iter::repeat('~').take(10_000).collect();
        let mut expected: u64 = 104;
        for i in 0..10_000u64 {
            expected += 94 * (i + 1);
        }
        assert_eq!(u64::from(checksum(&long_text)), expected % 103);
    }

    #[test]
    fn test_substitution() {
        // out-of-set characters are encoded exactly like a question mark
        assert_eq!(encode("é").unwrap(), encode("?").unwrap());
        assert_eq!(encode("a\tb").unwrap(), encode("a?b").unwrap());
        assert_eq!(checksum("ü1"), checksum("?1"));
    }

    #[test]
    fn test_astral_character_is_one_symbol() {
        // U+1F600 is one character, so it becomes one substitute rather than two
        let pattern = encode("\u{1F600}").unwrap();
        assert_eq!(pattern.len(), OVERHEAD_MODULES + SYMBOL_MODULES);
        assert_eq!(pattern, encode("?").unwrap());
        assert_eq!(checksum("\u{1F600}A"), checksum("?A"));
    }

    #[test]
    fn test_determinism() {
        assert_eq!(encode("Abonado 0815").unwrap(), encode("Abonado 0815").unwrap());
    }
}
