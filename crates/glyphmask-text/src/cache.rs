//! Font-bitmap cache.
//!
//! Rasterized glyphs are keyed by font, pixel size and character and shared
//! as `Arc<RgbaImage>`. Failures are never cached, so a transient error is
//! retried on the next request.

use std::sync::Arc;

use glyphmask_core::alloc::HashMap;
use image::RgbaImage;

use crate::error::RasterResult;
use crate::raster::GlyphRasterizer;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlyphKey {
    pub font: String,
    pub pixel_size: u32,
    pub ch: char,
}

impl GlyphKey {
    pub fn new(font: &str, pixel_size: u32, ch: char) -> Self {
        Self {
            font: font.to_string(),
            pixel_size,
            ch,
        }
    }
}

/// Storage for rasterized glyphs and line heights.
pub struct GlyphCache {
    glyphs: HashMap<GlyphKey, Arc<RgbaImage>>,
    line_heights: HashMap<(String, u32), f32>,
    /// Statistics for monitoring cache performance
    pub hits: u64,
    pub misses: u64,
}

impl GlyphCache {
    pub fn new() -> Self {
        Self {
            glyphs: HashMap::with_capacity(256),
            line_heights: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Get the cached glyph or rasterize it with `render_fn`.
    pub fn get_or_render<F>(&mut self, key: GlyphKey, render_fn: F) -> RasterResult<Arc<RgbaImage>>
    where
        F: FnOnce(&GlyphKey) -> RasterResult<Arc<RgbaImage>>,
    {
        if let Some(cached) = self.glyphs.get(&key) {
            self.hits += 1;
            return Ok(cached.clone());
        }

        self.misses += 1;
        let image = render_fn(&key)?;
        self.glyphs.insert(key, image.clone());
        Ok(image)
    }

    pub fn get(&self, key: &GlyphKey) -> Option<Arc<RgbaImage>> {
        self.glyphs.get(key).cloned()
    }

    pub fn clear(&mut self) {
        self.glyphs.clear();
        self.line_heights.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn hit_rate(&self) -> f32 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f32 / total as f32
        }
    }

    /// Number of cached glyph bitmaps.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Total bytes held by cached bitmaps.
    pub fn memory_bytes(&self) -> usize {
        self.glyphs.values().map(|image| image.as_raw().len()).sum()
    }

    pub fn stats_string(&self) -> String {
        format!(
            "GlyphCache: {} glyphs ({} KiB), {:.1}% hit rate ({} hits, {} misses)",
            self.len(),
            self.memory_bytes() / 1024,
            self.hit_rate() * 100.0,
            self.hits,
            self.misses
        )
    }
}

impl Default for GlyphCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Wraps any rasterizer with a [`GlyphCache`].
pub struct CachedRasterizer<R> {
    inner: R,
    cache: GlyphCache,
}

impl<R: GlyphRasterizer> CachedRasterizer<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: GlyphCache::new(),
        }
    }

    pub fn cache(&self) -> &GlyphCache {
        &self.cache
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Rasterize every character of `text` at each size ahead of time.
    ///
    /// Returns the number of glyphs that failed to render.
    pub fn warm(&mut self, font: &str, sizes: impl IntoIterator<Item = u32>, text: &str) -> usize {
        let mut failed = 0;
        for size in sizes {
            for ch in text.chars() {
                if self.render(font, size, ch).is_err() {
                    failed += 1;
                }
            }
        }
        failed
    }
}

impl<R: GlyphRasterizer> GlyphRasterizer for CachedRasterizer<R> {
    fn render(&mut self, font: &str, pixel_size: u32, ch: char) -> RasterResult<Arc<RgbaImage>> {
        let inner = &mut self.inner;
        self.cache
            .get_or_render(GlyphKey::new(font, pixel_size, ch), |key| {
                inner.render(&key.font, key.pixel_size, key.ch)
            })
    }

    fn line_height(&mut self, font: &str, pixel_size: u32) -> RasterResult<f32> {
        let key = (font.to_string(), pixel_size);
        if let Some(height) = self.cache.line_heights.get(&key) {
            return Ok(*height);
        }
        let height = self.inner.line_height(font, pixel_size)?;
        self.cache.line_heights.insert(key, height);
        Ok(height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RasterError;

    struct Counting {
        renders: usize,
    }

    impl GlyphRasterizer for Counting {
        fn render(&mut self, _font: &str, pixel_size: u32, ch: char) -> RasterResult<Arc<RgbaImage>> {
            self.renders += 1;
            if ch == '!' {
                return Err(RasterError::GlyphNotFound {
                    font: "test".into(),
                    ch,
                });
            }
            Ok(Arc::new(RgbaImage::new(pixel_size / 2, pixel_size)))
        }

        fn line_height(&mut self, _font: &str, pixel_size: u32) -> RasterResult<f32> {
            Ok(pixel_size as f32)
        }
    }

    #[test]
    fn test_cache_hits_and_misses() {
        let mut raster = CachedRasterizer::new(Counting { renders: 0 });
        let a = raster.render("f", 20, 'A').unwrap();
        let b = raster.render("f", 20, 'A').unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(raster.cache().hits, 1);
        assert_eq!(raster.cache().misses, 1);
        assert_eq!(raster.inner().renders, 1);

        raster.render("f", 21, 'A').unwrap();
        raster.render("g", 20, 'A').unwrap();
        assert_eq!(raster.cache().len(), 3);
    }

    #[test]
    fn test_errors_not_cached() {
        let mut raster = CachedRasterizer::new(Counting { renders: 0 });
        assert!(raster.render("f", 20, '!').is_err());
        assert!(raster.render("f", 20, '!').is_err());
        assert_eq!(raster.inner().renders, 2);
        assert!(raster.cache().is_empty());
    }

    #[test]
    fn test_warm_counts_failures() {
        let mut raster = CachedRasterizer::new(Counting { renders: 0 });
        let failed = raster.warm("f", [10, 20], "AB!");
        assert_eq!(failed, 2);
        assert_eq!(raster.cache().len(), 4);
    }

    #[test]
    fn test_stats_string() {
        let mut cache = GlyphCache::new();
        assert_eq!(cache.hit_rate(), 0.0);
        cache
            .get_or_render(GlyphKey::new("f", 4, 'x'), |_| Ok(Arc::new(RgbaImage::new(2, 4))))
            .unwrap();
        let stats = cache.stats_string();
        assert!(stats.contains("1 glyphs"));
        assert!(stats.contains("1 misses"));
    }
}
