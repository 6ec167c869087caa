use std::sync::Arc;

use glyphmask_text::raster::check_pixel_size;
use glyphmask_text::{GlyphRasterizer, LINE_HEIGHT_FACTOR, RasterResult};
use image::{Rgba, RgbaImage};

/// Rasterizer that draws each character as an opaque white block.
///
/// Cell height is `ceil(size * 1.2)`. Ink spans rows `[size / 5, size)` and
/// leaves one transparent column on each side of the cell. Spaces have no
/// ink.
#[derive(Debug, Clone, Default)]
pub struct BlockRasterizer {
    /// When set, every character uses this width factor instead of the
    /// per-character table.
    uniform_width: Option<f32>,
}

impl BlockRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// All characters get a cell `factor * size` pixels wide.
    pub fn uniform(factor: f32) -> Self {
        Self {
            uniform_width: Some(factor),
        }
    }

    pub fn cell_width(&self, ch: char, pixel_size: u32) -> u32 {
        let factor = self.uniform_width.unwrap_or_else(|| width_factor(ch));
        ((pixel_size as f32 * factor).round() as u32).max(3)
    }

    pub fn cell_height(pixel_size: u32) -> u32 {
        (pixel_size as f32 * LINE_HEIGHT_FACTOR).ceil() as u32
    }

    /// Rows `[top, bottom)` covered by ink.
    pub fn ink_rows(pixel_size: u32) -> (u32, u32) {
        (pixel_size / 5, pixel_size)
    }
}

fn width_factor(ch: char) -> f32 {
    match ch {
        'I' | 'J' | 'L' | '1' | '.' | ',' | '\'' => 0.35,
        'M' | 'W' => 1.0,
        _ => 0.6,
    }
}

impl GlyphRasterizer for BlockRasterizer {
    fn render(&mut self, _font: &str, pixel_size: u32, ch: char) -> RasterResult<Arc<RgbaImage>> {
        check_pixel_size(pixel_size)?;
        let width = self.cell_width(ch, pixel_size);
        let height = Self::cell_height(pixel_size);
        let mut image = RgbaImage::new(width, height);
        if !ch.is_whitespace() {
            let (top, bottom) = Self::ink_rows(pixel_size);
            for y in top..bottom.min(height) {
                for x in 1..width - 1 {
                    image.put_pixel(x, y, Rgba([255, 255, 255, 255]));
                }
            }
        }
        Ok(Arc::new(image))
    }

    fn line_height(&mut self, _font: &str, pixel_size: u32) -> RasterResult<f32> {
        check_pixel_size(pixel_size)?;
        Ok(pixel_size as f32 * LINE_HEIGHT_FACTOR)
    }
}
