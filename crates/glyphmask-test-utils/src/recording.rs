//! Rasterizer wrapper that records calls for verification in tests.

use std::sync::Arc;

use glyphmask_text::{GlyphRasterizer, RasterResult};
use image::RgbaImage;
use parking_lot::Mutex;

/// A recorded rasterizer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterCall {
    Render { font: String, pixel_size: u32, ch: char },
    LineHeight { font: String, pixel_size: u32 },
}

/// Forwards to an inner rasterizer and records every call.
///
/// The call log is shared, so a handle obtained with [`RecordingRasterizer::log`]
/// stays valid after the rasterizer has been moved into an engine.
pub struct RecordingRasterizer<R> {
    inner: R,
    calls: Arc<Mutex<Vec<RasterCall>>>,
}

impl<R: GlyphRasterizer> RecordingRasterizer<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn log(&self) -> Arc<Mutex<Vec<RasterCall>>> {
        self.calls.clone()
    }

    pub fn calls(&self) -> Vec<RasterCall> {
        self.calls.lock().clone()
    }

    pub fn count_renders(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, RasterCall::Render { .. }))
            .count()
    }

    /// Pixel sizes requested for `ch`, in call order.
    pub fn sizes_for(&self, ch: char) -> Vec<u32> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                RasterCall::Render {
                    pixel_size, ch: c, ..
                } if *c == ch => Some(*pixel_size),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl<R: GlyphRasterizer> GlyphRasterizer for RecordingRasterizer<R> {
    fn render(&mut self, font: &str, pixel_size: u32, ch: char) -> RasterResult<Arc<RgbaImage>> {
        self.calls.lock().push(RasterCall::Render {
            font: font.to_string(),
            pixel_size,
            ch,
        });
        self.inner.render(font, pixel_size, ch)
    }

    fn line_height(&mut self, font: &str, pixel_size: u32) -> RasterResult<f32> {
        self.calls.lock().push(RasterCall::LineHeight {
            font: font.to_string(),
            pixel_size,
        });
        self.inner.line_height(font, pixel_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BlockRasterizer;

    #[test]
    fn test_records_calls() {
        let mut raster = RecordingRasterizer::new(BlockRasterizer::new());
        let log = raster.log();
        raster.render("f", 20, 'A').unwrap();
        raster.render("f", 30, 'A').unwrap();
        raster.line_height("f", 20).unwrap();

        assert_eq!(raster.count_renders(), 2);
        assert_eq!(raster.sizes_for('A'), vec![20, 30]);
        assert_eq!(log.lock().len(), 3);

        raster.clear();
        assert!(raster.calls().is_empty());
    }
}
