//! Turning module patterns into print-resolution images.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bitmap::{ModuleGrid, RasterImage, ScaleOptions};
use crate::pattern::ModulePattern;


/// Module widths from this value upward use all available resolution.
const GENEROUS_MODULE_WIDTH: usize = 4;
const MEDIUM_MODULE_WIDTH: usize = 3;

/// Modules are never rendered thinner than this, even if the image ends up wider than requested.
pub const MIN_MODULE_WIDTH: usize = 2;


/// Limits and resolution used when rasterizing barcodes.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(default)]
pub struct RasterOptions {
    /// Requested widths below this are raised to it.
    pub min_width: u32,

    /// Requested heights below this are raised to it.
    pub min_height: u32,

    /// The resolution the images are tagged with.
    pub dpi: u32,

    /// Requested pseudo-QR sizes below this are raised to it.
    pub qr_min_size: u32,

    /// The smallest edge of a pseudo-QR module, in pixels.
    pub qr_min_module_pixels: u32,

    /// The largest image area, in pixels, that will be rendered.
    pub max_pixels: u64,
}
impl RasterOptions {
    pub fn effective_width(&self, requested_width: u32) -> usize {
        requested_width.max(self.min_width) as usize
    }

    pub fn effective_height(&self, requested_height: u32) -> usize {
        requested_height.max(self.min_height) as usize
    }

    /// Returns whether an image of the given dimensions stays within `max_pixels`.
    pub fn fits(&self, width: usize, height: usize) -> bool {
        width.checked_mul(height)
            .and_then(|area| u64::try_from(area).ok())
            .map(|area| area <= self.max_pixels)
            .unwrap_or(false)
    }
}
impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            min_width: 200,
            min_height: 60,
            dpi: 300,
            qr_min_size: 100,
            qr_min_module_pixels: 4,
            // 64 megapixels
            max_pixels: 1 << 26,
        }
    }
}


/// Picks the width of a single module, in pixels, for a pattern of the given length squeezed into
/// the given width.
pub fn module_width(effective_width: usize, pattern_len: usize) -> usize {
    let raw = if pattern_len == 0 { 0 } else { effective_width / pattern_len };
    if raw >= GENEROUS_MODULE_WIDTH {
        raw
    } else if raw >= MEDIUM_MODULE_WIDTH {
        MEDIUM_MODULE_WIDTH
    } else {
        MIN_MODULE_WIDTH
    }
}


/// Renders a linear barcode as full-height bars.
///
/// The image is exactly `pattern.len() * module_width` pixels wide, which may exceed the requested
/// width. Returns `None` if the pattern is empty, if the image would exceed
/// [`RasterOptions::max_pixels`] or if its pixels cannot be allocated.
pub fn rasterize(
    pattern: &ModulePattern,
    requested_width: u32,
    requested_height: u32,
    options: &RasterOptions,
) -> Option<RasterImage> {
    if pattern.is_empty() {
        return None;
    }

    let effective_width = options.effective_width(requested_width);
    let height = options.effective_height(requested_height);
    let width_per_module = module_width(effective_width, pattern.len());
    debug!(
        "rasterizing {} modules at {} px each, {} px high (requested {}x{})",
        pattern.len(), width_per_module, height, requested_width, requested_height,
    );

    let grid = ModuleGrid::from_pattern(pattern);
    let scale = ScaleOptions::new(width_per_module, height, options.dpi);
    let fits = grid.rendered_dimensions(&scale)
        .map(|(w, h)| options.fits(w, h))
        .unwrap_or(false);
    if !fits {
        warn!(
            "{} modules at {} px each, {} px high exceed the limit of {} pixels",
            pattern.len(), width_per_module, height, options.max_pixels,
        );
        return None;
    }

    match grid.render(&scale) {
        Ok(image) => Some(image),
        Err(e) => {
            warn!("failed to render barcode: {}", e);
            None
        },
    }
}
