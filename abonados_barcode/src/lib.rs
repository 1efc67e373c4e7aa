//! Barcode generation for membership cards.
//!
//! Card templates place barcodes holding a member's number or other data. This crate encodes text
//! as Code 128, Code 39 or EAN-13 module patterns and rasterizes them into transparent RGBA images
//! at print resolution. It also draws the decorative pseudo-QR square used on some card designs.
//!
//! The functions at the crate root never fail loudly: anything that cannot be rendered comes back
//! as `None`, and the card renderer is expected to draw a placeholder instead.

pub mod bitmap;
pub mod code128;
pub mod code39;
pub mod ean13;
pub mod info;
pub mod pattern;
pub mod pseudo_qr;
pub mod raster;
pub mod symbology;


use std::borrow::Cow;
use std::fmt;

use tracing::warn;

pub use crate::bitmap::{BitmapError, RasterImage};
pub use crate::info::{describe, encode, sanitize_for_code128, validate};
pub use crate::pattern::ModulePattern;
pub use crate::raster::RasterOptions;
pub use crate::symbology::{Symbology, UnknownSymbology};


#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum EncodeError {
    InvalidInput { reason: Cow<'static, str> },
    UnmappedSymbol { symbol: char },
    ChecksumTableMiss { checksum: u32 },
}
impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { reason }
                => write!(f, "invalid input: {}", reason),
            Self::UnmappedSymbol { symbol }
                => write!(f, "symbol {:?} is not part of the alphabet", symbol),
            Self::ChecksumTableMiss { checksum }
                => write!(f, "no pattern for symbol value {}", checksum),
        }
    }
}
impl std::error::Error for EncodeError {
}


/// Encodes and rasterizes a barcode with the default [`RasterOptions`].
///
/// Returns `None` if the data is empty or consists only of whitespace, or if it cannot be encoded
/// in the given symbology.
pub fn generate_barcode(data: &str, width: u32, height: u32, symbology: Symbology) -> Option<RasterImage> {
    generate_barcode_with_options(data, width, height, symbology, &RasterOptions::default())
}

/// Encodes and rasterizes a barcode.
pub fn generate_barcode_with_options(
    data: &str,
    width: u32,
    height: u32,
    symbology: Symbology,
    options: &RasterOptions,
) -> Option<RasterImage> {
    if data.trim().is_empty() {
        warn!("not generating {} barcode for blank data {:?}", symbology, data);
        return None;
    }

    let pattern = match encode(data, symbology) {
        Ok(p) => p,
        Err(e) => {
            warn!("failed to encode {:?} as {}: {}", data, symbology, e);
            return None;
        },
    };

    raster::rasterize(&pattern, width, height, options)
}

/// Draws the decorative pseudo-QR square for the data with the default [`RasterOptions`].
///
/// Oversized requests are scaled down rather than refused, so this only returns `None` if the
/// pixels cannot be allocated.
pub fn generate_qr_like_pattern(data: &str, size: u32) -> Option<RasterImage> {
    match pseudo_qr::rasterize_pseudo_qr(data, size, &RasterOptions::default()) {
        Ok(image) => Some(image),
        Err(e) => {
            warn!("failed to render pseudo-QR for {:?}: {}", data, e);
            None
        },
    }
}

/// Returns whether the data can be encoded in Code 128 without substitutions.
pub fn validate_code128(data: &str) -> bool {
    validate(data, Symbology::Code128)
}

/// Describes how the data would be encoded in the format given by name (e.g. `"EAN13"`).
pub fn describe_barcode(data: &str, format: &str) -> String {
    match Symbology::from_name(format) {
        Some(symbology) => describe(data, symbology),
        None => format!("Symbology: {:?} is not supported\nData: {:?}\n", format, data),
    }
}
