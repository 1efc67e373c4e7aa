//! A decorative, QR-lookalike square pattern.
//!
//! The grid borrows the finder and timing patterns of a QR code, but its data area is a simple
//! function of the input's character codes. No reader will decode it.

use tracing::debug;

use crate::bitmap::{BitmapError, ModuleGrid, RasterImage, ScaleOptions};
use crate::raster::RasterOptions;


/// Modules per side.
pub const GRID_SIZE: usize = 25;
const FINDER_SIZE: usize = 7;
const TIMING_FIRST: usize = 8;
const TIMING_LAST: usize = 16;
const TIMING_LINE: usize = 6;


fn in_finder_zone(x: usize, y: usize) -> bool {
    let far = GRID_SIZE - FINDER_SIZE;
    (x < FINDER_SIZE && y < FINDER_SIZE)
        || (x >= far && y < FINDER_SIZE)
        || (x < FINDER_SIZE && y >= far)
}

fn finder_module(x: usize, y: usize) -> bool {
    let (fx, fy) = (x % FINDER_SIZE, y % FINDER_SIZE);
    let ring = fx == 0 || fx == FINDER_SIZE - 1 || fy == 0 || fy == FINDER_SIZE - 1;
    let core = (2..=4).contains(&fx) && (2..=4).contains(&fy);
    ring || core
}

fn in_timing_line(x: usize, y: usize) -> bool {
    let span = TIMING_FIRST..=TIMING_LAST;
    (x == TIMING_LINE && span.contains(&y)) || (y == TIMING_LINE && span.contains(&x))
}

/// Whether the module at `(x, y)` is ink. `codes` are the character codes of the input text.
fn module_at(x: usize, y: usize, codes: &[u32]) -> bool {
    if in_finder_zone(x, y) {
        finder_module(x, y)
    } else if in_timing_line(x, y) {
        (x + y) % 2 == 0
    } else {
        // empty text reads as code 0 everywhere
        let code = if codes.is_empty() {
            0
        } else {
            codes[(y * GRID_SIZE + x) % codes.len()]
        };
        (code as usize + x + y) % 2 == 0
    }
}

/// Builds the 25x25 module grid for the text.
pub fn grid(text: &str) -> ModuleGrid {
    let codes: Vec<u32> = text.chars().map(u32::from).collect();
    ModuleGrid::from_fn(GRID_SIZE, GRID_SIZE, |x, y| module_at(x, y, &codes))
}

/// The largest module edge whose square image stays within `max_pixels`.
fn largest_module_within(max_pixels: u64) -> usize {
    let mut side = (max_pixels as f64).sqrt() as u64;
    while side.saturating_mul(side) > max_pixels {
        side -= 1;
    }
    (side / GRID_SIZE as u64) as usize
}

/// Picks the edge length of a single module, in pixels.
///
/// Large requests are scaled down to stay within [`RasterOptions::max_pixels`]; the minimum module
/// size always wins, though.
pub fn module_size(requested_size: u32, options: &RasterOptions) -> usize {
    let effective = requested_size.max(options.qr_min_size) as usize;
    (effective / GRID_SIZE)
        .min(largest_module_within(options.max_pixels))
        .max(options.qr_min_module_pixels as usize)
}

/// Renders the pattern as a square image `25 * module_size` pixels wide.
///
/// Only fails if the pixels cannot be allocated.
pub fn rasterize_pseudo_qr(text: &str, requested_size: u32, options: &RasterOptions) -> Result<RasterImage, BitmapError> {
    let size = module_size(requested_size, options);
    debug!("rendering pseudo-QR for {:?} with {} px modules", text, size);
    grid(text).render(&ScaleOptions::new(size, size, options.dpi))
}
