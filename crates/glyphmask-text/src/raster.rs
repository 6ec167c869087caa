//! Glyph rasterization.
//!
//! A [`GlyphRasterizer`] turns `(font, pixel_size, char)` into an RGBA bitmap.
//! Every glyph image of one font and size shares the same height and
//! baseline, and its width is the glyph's advance (widened if the ink
//! overhangs it). Colour channels are white; alpha carries coverage.

use std::sync::Arc;

use cosmic_text::{Attrs, Buffer, FontSystem, Metrics, Shaping, SwashCache, SwashContent};
use glyphmask_core::profiling::profile_function;
use image::{Rgba, RgbaImage};

use crate::error::{RasterError, RasterResult};
use crate::font::{FontDatabase, family_for};

/// Line height as a multiple of the pixel size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Largest pixel size any rasterizer is asked for.
pub const MAX_PIXEL_SIZE: u32 = 4096;

/// Capability that renders single characters.
///
/// Implementations must be deterministic for identical inputs within one
/// process run so that results can be cached.
pub trait GlyphRasterizer {
    fn render(&mut self, font: &str, pixel_size: u32, ch: char) -> RasterResult<Arc<RgbaImage>>;

    /// Line height of `font` at `pixel_size`, in pixels.
    fn line_height(&mut self, font: &str, pixel_size: u32) -> RasterResult<f32>;
}

impl<R: GlyphRasterizer + ?Sized> GlyphRasterizer for &mut R {
    fn render(&mut self, font: &str, pixel_size: u32, ch: char) -> RasterResult<Arc<RgbaImage>> {
        (**self).render(font, pixel_size, ch)
    }

    fn line_height(&mut self, font: &str, pixel_size: u32) -> RasterResult<f32> {
        (**self).line_height(font, pixel_size)
    }
}

impl<R: GlyphRasterizer + ?Sized> GlyphRasterizer for Box<R> {
    fn render(&mut self, font: &str, pixel_size: u32, ch: char) -> RasterResult<Arc<RgbaImage>> {
        (**self).render(font, pixel_size, ch)
    }

    fn line_height(&mut self, font: &str, pixel_size: u32) -> RasterResult<f32> {
        (**self).line_height(font, pixel_size)
    }
}

pub fn check_pixel_size(pixel_size: u32) -> RasterResult<()> {
    if pixel_size == 0 || pixel_size > MAX_PIXEL_SIZE {
        Err(RasterError::InvalidSize(pixel_size))
    } else {
        Ok(())
    }
}

/// Rasterizer backed by cosmic-text shaping and swash rendering.
///
/// Holds stateful font-system and swash caches, so one instance must not be
/// shared between threads.
pub struct CosmicRasterizer {
    font_system: FontSystem,
    swash_cache: SwashCache,
}

impl CosmicRasterizer {
    pub fn new(db: FontDatabase) -> Self {
        Self {
            font_system: db.into_font_system(),
            swash_cache: SwashCache::new(),
        }
    }

    /// Rasterizer over the system fonts.
    pub fn with_system_fonts() -> Self {
        Self::new(FontDatabase::new())
    }
}

/// One rasterized glyph positioned inside the character cell.
struct InkLayer {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    content: SwashContent,
    data: Vec<u8>,
}

impl InkLayer {
    fn coverage(&self, px: u32, py: u32) -> u8 {
        let i = (py * self.width + px) as usize;
        match self.content {
            SwashContent::Mask => self.data.get(i).copied().unwrap_or(0),
            SwashContent::Color => self.data.get(i * 4 + 3).copied().unwrap_or(0),
            SwashContent::SubpixelMask => self
                .data
                .get(i * 3..i * 3 + 3)
                .map(|rgb| rgb.iter().copied().max().unwrap_or(0))
                .unwrap_or(0),
        }
    }
}

impl GlyphRasterizer for CosmicRasterizer {
    fn render(&mut self, font: &str, pixel_size: u32, ch: char) -> RasterResult<Arc<RgbaImage>> {
        profile_function!();
        check_pixel_size(pixel_size)?;

        let size = pixel_size as f32;
        let metrics = Metrics::new(size, size * LINE_HEIGHT_FACTOR);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        let mut utf8 = [0u8; 4];
        buffer.set_text(
            &mut self.font_system,
            ch.encode_utf8(&mut utf8),
            Attrs::new().family(family_for(font)),
            Shaping::Advanced,
        );
        buffer.shape_until_scroll(&mut self.font_system, false);

        let mut advance = 0.0_f32;
        let mut line_height = metrics.line_height;
        let mut layers = Vec::new();
        let mut found = false;

        for run in buffer.layout_runs() {
            line_height = line_height.max(run.line_height);
            for glyph in run.glyphs.iter() {
                found = true;
                advance = advance.max(glyph.x + glyph.w);
                let physical = glyph.physical((0.0, 0.0), 1.0);
                let Some(image) = self
                    .swash_cache
                    .get_image(&mut self.font_system, physical.cache_key)
                else {
                    continue;
                };
                if image.placement.width == 0 || image.placement.height == 0 {
                    continue;
                }
                layers.push(InkLayer {
                    x: physical.x + image.placement.left,
                    y: run.line_y as i32 + physical.y - image.placement.top,
                    width: image.placement.width,
                    height: image.placement.height,
                    content: image.content,
                    data: image.data.clone(),
                });
            }
        }

        if !found {
            return Err(RasterError::GlyphNotFound {
                font: font.to_string(),
                ch,
            });
        }

        // The cell is the advance box, grown to hold any ink overhang.
        let mut min_x = 0;
        let mut min_y = 0;
        let mut max_x = advance.ceil().max(1.0) as i32;
        let mut max_y = line_height.ceil().max(1.0) as i32;
        for layer in &layers {
            min_x = min_x.min(layer.x);
            min_y = min_y.min(layer.y);
            max_x = max_x.max(layer.x + layer.width as i32);
            max_y = max_y.max(layer.y + layer.height as i32);
        }

        let mut cell = RgbaImage::new((max_x - min_x) as u32, (max_y - min_y) as u32);
        for layer in &layers {
            for py in 0..layer.height {
                for px in 0..layer.width {
                    let alpha = layer.coverage(px, py);
                    if alpha == 0 {
                        continue;
                    }
                    let x = (layer.x - min_x) as u32 + px;
                    let y = (layer.y - min_y) as u32 + py;
                    let dst = cell.get_pixel_mut(x, y);
                    *dst = Rgba([255, 255, 255, dst[3].max(alpha)]);
                }
            }
        }

        tracing::trace!(
            "Rasterized {:?} in '{}' at {}px -> {}x{}",
            ch,
            font,
            pixel_size,
            cell.width(),
            cell.height()
        );
        Ok(Arc::new(cell))
    }

    fn line_height(&mut self, _font: &str, pixel_size: u32) -> RasterResult<f32> {
        check_pixel_size(pixel_size)?;
        Ok(pixel_size as f32 * LINE_HEIGHT_FACTOR)
    }
}
