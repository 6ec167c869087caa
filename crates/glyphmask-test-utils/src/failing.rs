use std::sync::Arc;

use glyphmask_text::{GlyphRasterizer, RasterError, RasterResult};
use image::RgbaImage;

use crate::block::BlockRasterizer;

/// Block rasterizer that reports [`RasterError::GlyphNotFound`] for chosen
/// characters.
#[derive(Debug, Clone)]
pub struct FailingRasterizer {
    inner: BlockRasterizer,
    fail_on: Vec<char>,
    fail_all: bool,
}

impl FailingRasterizer {
    pub fn new(fail_on: impl IntoIterator<Item = char>) -> Self {
        Self {
            inner: BlockRasterizer::new(),
            fail_on: fail_on.into_iter().collect(),
            fail_all: false,
        }
    }

    /// Fails on every character.
    pub fn always() -> Self {
        Self {
            fail_all: true,
            ..Self::new([])
        }
    }

    fn fails(&self, ch: char) -> bool {
        self.fail_all || self.fail_on.contains(&ch)
    }
}

impl GlyphRasterizer for FailingRasterizer {
    fn render(&mut self, font: &str, pixel_size: u32, ch: char) -> RasterResult<Arc<RgbaImage>> {
        if self.fails(ch) {
            return Err(RasterError::GlyphNotFound {
                font: font.to_string(),
                ch,
            });
        }
        self.inner.render(font, pixel_size, ch)
    }

    fn line_height(&mut self, font: &str, pixel_size: u32) -> RasterResult<f32> {
        self.inner.line_height(font, pixel_size)
    }
}
