//! Validation, sanitization and diagnostics for barcode data.

use std::fmt::Write;

use crate::{code128, code39, ean13, EncodeError, Symbology};
use crate::pattern::ModulePattern;


/// Checks that every character of the text belongs to the symbology's alphabet.
///
/// This is stricter than the encoders, which substitute or drop characters they cannot encode.
pub fn check(text: &str, symbology: Symbology) -> Result<(), EncodeError> {
    match symbology {
        Symbology::Code128 => {
            match text.chars().find(|c| !code128::is_encodable(*c)) {
                Some(symbol) => Err(EncodeError::UnmappedSymbol { symbol }),
                None => Ok(()),
            }
        },
        Symbology::Code39 => {
            match text.chars().find(|c| !code39::is_encodable(*c)) {
                Some(symbol) => Err(EncodeError::UnmappedSymbol { symbol }),
                None => Ok(()),
            }
        },
        Symbology::Ean13 => ean13::parse_digits(text).map(|_| ()),
    }
}

/// Returns whether the text can be encoded in the symbology without any substitutions.
pub fn validate(text: &str, symbology: Symbology) -> bool {
    check(text, symbology).is_ok()
}


/// Makes the text more palatable to Code 128.
///
/// Characters in code set B are kept. Other letters and digits are uppercased, everything else
/// becomes a question mark. Uppercasing does not necessarily bring a character into code set B,
/// so the result may still fail [`validate`].
pub fn sanitize_for_code128(text: &str) -> String {
    text.chars()
        .map(|c| {
            if code128::is_encodable(c) {
                c
            } else if c.is_alphanumeric() {
                code39::to_upper(c)
            } else {
                code128::SUBSTITUTE
            }
        })
        .collect()
}


/// Encodes the text with the given symbology.
pub fn encode(text: &str, symbology: Symbology) -> Result<ModulePattern, EncodeError> {
    match symbology {
        Symbology::Code128 => code128::encode(text),
        Symbology::Code39 => Ok(code39::encode(text)),
        Symbology::Ean13 => ean13::encode(text),
    }
}


/// Produces a human-readable summary of how the text would be encoded.
pub fn describe(text: &str, symbology: Symbology) -> String {
    let mut ret = String::new();
    // writing to a String cannot fail
    let _ = write_description(&mut ret, text, symbology);
    ret
}

fn write_description(out: &mut String, text: &str, symbology: Symbology) -> std::fmt::Result {
    writeln!(out, "Symbology: {}", symbology)?;
    writeln!(out, "Data: {:?} ({} characters)", text, text.chars().count())?;

    match encode(text, symbology) {
        Ok(pattern) => {
            writeln!(out, "Pattern: {}", pattern)?;
            writeln!(out, "Modules: {} ({} bars)", pattern.len(), pattern.bar_count())?;
        },
        Err(e) => {
            writeln!(out, "Pattern: none ({})", e)?;
        },
    }

    match symbology {
        Symbology::Code128 => {
            writeln!(out, "Checksum: {}", code128::checksum(text))?;
        },
        Symbology::Code39 => {
            writeln!(out, "Checksum: none")?;
        },
        Symbology::Ean13 => {
            let normalized = ean13::normalize(text);
            writeln!(out, "Normalized: {}", normalized)?;
            if let Ok(digits) = ean13::parse_digits(text) {
                let expected = ean13::calculate_check_digit(&digits);
                let present = digits[ean13::DIGIT_COUNT - 1];
                if expected == present {
                    writeln!(out, "Check digit: {} (correct)", present)?;
                } else {
                    writeln!(out, "Check digit: {} (expected {})", present, expected)?;
                }
            }
        },
    }

    match check(text, symbology) {
        Ok(()) => writeln!(out, "Valid: yes")?,
        Err(e) => writeln!(out, "Valid: no ({})", e)?,
    }
    Ok(())
}
