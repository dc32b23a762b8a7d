//! Raster to character-grid rendering.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use thiserror::Error;

use super::frame::AsciiFrame;
use super::quantize::quantize;

/// Character cells are roughly twice as tall as they are wide, so the
/// derived height is halved to keep the picture's proportions.
const ASPECT_CORRECTION: f32 = 0.5;

/// Options controlling how a raster becomes a character grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Output width in characters. Must be at least 1.
    pub width: u32,
    /// Map near-black pixels to blank cells instead of the densest glyph.
    pub black_as_space: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 80,
            black_as_space: false,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("output width must be at least 1 character")]
    InvalidWidth,
    #[error("source raster has no pixels")]
    EmptyRaster,
}

/// Render one grayscale raster into a character grid.
///
/// The grid is `options.width` characters wide; height follows the source
/// aspect ratio with [`ASPECT_CORRECTION`] applied and is rounded to the
/// nearest line. A rounded height of zero yields an empty frame. The raster
/// is resampled with Lanczos3 before each pixel is quantized.
pub fn render_frame(raster: &GrayImage, options: &RenderOptions) -> Result<AsciiFrame, RenderError> {
    if options.width == 0 {
        return Err(RenderError::InvalidWidth);
    }
    let (src_w, src_h) = raster.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(RenderError::EmptyRaster);
    }

    let aspect = src_h as f32 / src_w as f32;
    let height = (options.width as f32 * aspect * ASPECT_CORRECTION).round() as u32;
    if height == 0 {
        return Ok(AsciiFrame::new());
    }

    let resized = imageops::resize(raster, options.width, height, FilterType::Lanczos3);
    let mut lines = Vec::with_capacity(height as usize);
    for y in 0..height {
        let mut line = String::with_capacity(options.width as usize);
        for x in 0..options.width {
            let Luma([luminance]) = *resized.get_pixel(x, y);
            line.push(quantize(luminance, options.black_as_space));
        }
        lines.push(line);
    }
    Ok(AsciiFrame::from_lines(lines))
}
