use std::collections::TryReserveError;
use std::convert::TryInto;
use std::fmt;
use std::num::TryFromIntError;

use crate::pattern::ModulePattern;


/// Fully opaque black.
pub const INK: [u8; 4] = [0x00, 0x00, 0x00, 0xFF];

/// Fully transparent; the card background shows through.
pub const BACKGROUND: [u8; 4] = [0x00, 0x00, 0x00, 0x00];

const METERS_PER_INCH: f64 = 0.0254;


#[derive(Debug)]
pub enum BitmapError {
    IncorrectPixelCount { expected: usize, obtained: usize },
    DimensionConversion { dimension: &'static str, value: usize, target_type: &'static str, error: TryFromIntError },
    TooLarge { module_count: usize, module_pixels: usize },
    Allocation { bytes: usize, error: TryReserveError },
    PngEncoding(png::EncodingError),
}
impl fmt::Display for BitmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncorrectPixelCount { expected, obtained }
                => write!(f, "incorrect pixel count; expected {}, obtained {}", expected, obtained),
            Self::DimensionConversion { dimension, value, target_type, error }
                => write!(f, "failed to convert {} ({}) to {}: {}", dimension, value, target_type, error),
            Self::TooLarge { module_count, module_pixels }
                => write!(f, "{} modules of {} pixels each do not fit into memory", module_count, module_pixels),
            Self::Allocation { bytes, error }
                => write!(f, "failed to allocate {} bytes of pixels: {}", bytes, error),
            Self::PngEncoding(e)
                => write!(f, "PNG encoding failed: {}", e),
        }
    }
}
impl std::error::Error for BitmapError {
}


/// How large each module of a [`ModuleGrid`] becomes when it is rendered.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ScaleOptions {
    module_width_pixels: usize,
    module_height_pixels: usize,
    quiet_horizontal_pixels: usize,
    quiet_vertical_pixels: usize,
    dpi: u32,
}
impl ScaleOptions {
    pub fn new(module_width_pixels: usize, module_height_pixels: usize, dpi: u32) -> Self {
        Self {
            module_width_pixels,
            module_height_pixels,
            quiet_horizontal_pixels: 0,
            quiet_vertical_pixels: 0,
            dpi,
        }
    }

    /// Surrounds the rendered grid with a transparent margin.
    pub fn with_quiet(mut self, horizontal_pixels: usize, vertical_pixels: usize) -> Self {
        self.quiet_horizontal_pixels = horizontal_pixels;
        self.quiet_vertical_pixels = vertical_pixels;
        self
    }
}


/// A rectangular grid of modules; `true` is ink.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ModuleGrid {
    width: usize,
    height: usize,
    modules: Vec<bool>,
}
impl ModuleGrid {
    pub fn new(
        width: usize,
        height: usize,
        modules: Vec<bool>,
    ) -> Result<Self, BitmapError> {
        if width * height != modules.len() {
            return Err(BitmapError::IncorrectPixelCount { expected: width * height, obtained: modules.len() });
        }
        Ok(Self {
            width,
            height,
            modules,
        })
    }

    /// A single-row grid holding the modules of a linear barcode.
    pub fn from_pattern(pattern: &ModulePattern) -> Self {
        Self {
            width: pattern.len(),
            height: 1,
            modules: pattern.modules().to_vec(),
        }
    }

    /// Builds a grid by asking `module_at(x, y)` for every module, row by row.
    pub(crate) fn from_fn<F: FnMut(usize, usize) -> bool>(width: usize, height: usize, mut module_at: F) -> Self {
        let mut modules = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                modules.push(module_at(x, y));
            }
        }
        Self {
            width,
            height,
            modules,
        }
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }

    pub fn get(&self, x: usize, y: usize) -> Option<bool> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.modules[y * self.width + x])
    }

    /// Returns the dimensions of the image [`render`](Self::render) would produce, or `None` if
    /// they overflow.
    pub fn rendered_dimensions(&self, options: &ScaleOptions) -> Option<(usize, usize)> {
        let width = options.module_width_pixels.checked_mul(self.width)?
            .checked_add(options.quiet_horizontal_pixels.checked_mul(2)?)?;
        let height = options.module_height_pixels.checked_mul(self.height)?
            .checked_add(options.quiet_vertical_pixels.checked_mul(2)?)?;
        Some((width, height))
    }

    /// Renders the grid into an RGBA image, each module becoming a solid block of ink or
    /// background.
    ///
    /// Fails instead of aborting if the pixel buffer cannot be allocated.
    pub fn render(&self, options: &ScaleOptions) -> Result<RasterImage, BitmapError> {
        let too_large = || BitmapError::TooLarge {
            module_count: self.modules.len(),
            module_pixels: options.module_width_pixels.saturating_mul(options.module_height_pixels),
        };
        let (new_width, new_height) = self.rendered_dimensions(options)
            .ok_or_else(too_large)?;
        let row_bytes = new_width.checked_mul(4)
            .ok_or_else(too_large)?;
        let total_bytes = row_bytes.checked_mul(new_height)
            .ok_or_else(too_large)?;

        let mut pixels: Vec<u8> = Vec::new();
        pixels.try_reserve_exact(total_bytes)
            .map_err(|error| BitmapError::Allocation { bytes: total_bytes, error })?;

        let mut this_row: Vec<u8> = Vec::new();
        this_row.try_reserve_exact(row_bytes)
            .map_err(|error| BitmapError::Allocation { bytes: row_bytes, error })?;

        // BACKGROUND is all zeroes, so the quiet rows are plain zero bytes
        let quiet_rows = options.quiet_vertical_pixels * row_bytes;
        pixels.resize(quiet_rows, 0x00);

        for y in 0..self.height {
            let row_start = y * self.width;

            this_row.clear();
            for _ in 0..options.quiet_horizontal_pixels {
                this_row.extend_from_slice(&BACKGROUND);
            }
            for module in &self.modules[row_start..row_start+self.width] {
                let color = if *module { INK } else { BACKGROUND };
                for _ in 0..options.module_width_pixels {
                    this_row.extend_from_slice(&color);
                }
            }
            this_row.resize(row_bytes, 0x00);

            for _ in 0..options.module_height_pixels {
                pixels.extend_from_slice(&this_row);
            }
        }

        pixels.resize(total_bytes, 0x00);

        Ok(RasterImage {
            width: new_width,
            height: new_height,
            dpi: options.dpi,
            pixels,
        })
    }
}


/// A finished RGBA image, 8 bits per channel, rows top to bottom.
///
/// Every pixel is either [`INK`] or [`BACKGROUND`]; there is no anti-aliasing.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct RasterImage {
    width: usize,
    height: usize,
    dpi: u32,
    pixels: Vec<u8>,
}
impl RasterImage {
    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn dpi(&self) -> u32 { self.dpi }

    /// The raw RGBA bytes, `4 * width * height` of them.
    pub fn pixels(&self) -> &[u8] { self.pixels.as_slice() }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = 4 * (y * self.width + x);
        self.pixels[offset..offset+4].try_into().ok()
    }

    pub fn is_ink(&self, x: usize, y: usize) -> bool {
        self.pixel(x, y) == Some(INK)
    }

    /// Encodes the image as an RGBA PNG, recording its resolution in the `pHYs` chunk.
    pub fn to_png(&self) -> Result<Vec<u8>, BitmapError> {
        let mut png = Vec::new();

        let width_u32 = self.width.try_into()
            .map_err(|e| BitmapError::DimensionConversion { dimension: "width", value: self.width, target_type: "u32", error: e })?;
        let height_u32 = self.height.try_into()
            .map_err(|e| BitmapError::DimensionConversion { dimension: "height", value: self.height, target_type: "u32", error: e })?;
        let pixels_per_meter = (f64::from(self.dpi) / METERS_PER_INCH).round() as u32;

        {
            let mut png_encoder = png::Encoder::new(&mut png, width_u32, height_u32);
            png_encoder.set_color(png::ColorType::Rgba);
            png_encoder.set_depth(png::BitDepth::Eight);
            png_encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: pixels_per_meter,
                yppu: pixels_per_meter,
                unit: png::Unit::Meter,
            }));
            let mut writer = png_encoder.write_header()
                .map_err(|e| BitmapError::PngEncoding(e))?;
            writer.write_image_data(&self.pixels)
                .map_err(|e| BitmapError::PngEncoding(e))?;
        }

        Ok(png)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard() -> ModuleGrid {
        ModuleGrid::new(
            3, 3, vec![
                true, false, true,
                false, true, false,
                true, false, true,
            ],
        ).unwrap()
    }

    #[test]
    fn test_incorrect_pixel_count() {
        assert!(matches!(
            ModuleGrid::new(2, 2, vec![true; 3]),
            Err(BitmapError::IncorrectPixelCount { expected: 4, obtained: 3 }),
        ));
    }

    #[test]
    fn test_render_scales_modules() {
        let image = checkerboard().render(&ScaleOptions::new(2, 3, 300)).unwrap();
        assert_eq!(image.width(), 6);
        assert_eq!(image.height(), 9);
        assert_eq!(image.pixels().len(), 6 * 9 * 4);

        for y in 0..9 {
            for x in 0..6 {
                let expected = checkerboard().get(x / 2, y / 3).unwrap();
                assert_eq!(image.is_ink(x, y), expected, "pixel ({}, {})", x, y);
            }
        }
        assert_eq!(image.pixel(1, 0), Some(INK));
        assert_eq!(image.pixel(2, 0), Some(BACKGROUND));
        assert_eq!(image.pixel(6, 0), None);
    }

    #[test]
    fn test_render_quiet_zone() {
        let image = checkerboard().render(&ScaleOptions::new(1, 1, 300).with_quiet(2, 1)).unwrap();
        assert_eq!(image.width(), 7);
        assert_eq!(image.height(), 5);
        assert!(!image.is_ink(0, 1));
        assert!(!image.is_ink(1, 1));
        assert!(image.is_ink(2, 1));
        assert!((0..7).all(|x| !image.is_ink(x, 0)));
    }

    #[test]
    fn test_render_overflow() {
        let grid = checkerboard();
        let huge = ScaleOptions::new(usize::MAX / 2, 1, 300);
        assert_eq!(grid.rendered_dimensions(&huge), None);
        assert!(matches!(grid.render(&huge), Err(BitmapError::TooLarge { module_count: 9, .. })));
    }

    #[test]
    fn test_render_unallocatable() {
        // the dimensions fit into usize but the buffer cannot be reserved
        let grid = ModuleGrid::from_fn(1, 1, |_, _| true);
        let huge = ScaleOptions::new(usize::MAX / 6, 1, 300);
        assert!(matches!(grid.render(&huge), Err(BitmapError::Allocation { .. })));
    }

    #[test]
    fn test_from_fn() {
        let grid = ModuleGrid::from_fn(3, 3, |x, y| (x + y) % 2 == 0);
        assert_eq!(grid, checkerboard());
    }

    #[test]
    fn test_from_pattern() {
        let pattern = crate::ean13::encode("4006381333931").unwrap();
        let grid = ModuleGrid::from_pattern(&pattern);
        assert_eq!(grid.width(), 95);
        assert_eq!(grid.height(), 1);
        assert_eq!(grid.get(0, 0), Some(true));
        assert_eq!(grid.get(1, 0), Some(false));
    }

    #[test]
    fn test_to_png() {
        let png = checkerboard().render(&ScaleOptions::new(4, 4, 300)).unwrap().to_png().unwrap();
        assert_eq!(&png[0..8], b"\x89PNG\r\n\x1a\n");

        let decoder = png::Decoder::new(png.as_slice());
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!(info.width, 12);
        assert_eq!(info.height, 12);
        assert_eq!(info.color_type, png::ColorType::Rgba);
        let dims = info.pixel_dims.unwrap();
        assert_eq!(dims.xppu, 11811);
        assert_eq!(dims.unit, png::Unit::Meter);
    }
}
