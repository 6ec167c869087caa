//! Occupancy masks of a finished layout.
//!
//! The preview mask is assembled from the exact masks the layout already
//! holds. The full-resolution mask re-renders every sprite at the original
//! image's scale, so it stays sharp instead of being an upscaled preview.

use glyphmask_core::profiling::profile_function;
use glyphmask_core::{CanvasGeometry, Pos, Rect, Size};
use glyphmask_text::GlyphRasterizer;
use image::{GrayImage, RgbaImage, imageops};

use crate::bitmap::BitMask;
use crate::compose::WordComposer;
use crate::error::EngineResult;
use crate::sprite::GlyphSprite;

/// Full-resolution artifacts of a layout.
#[derive(Debug, Clone)]
pub struct HighResOutput {
    /// Placed sprites composited over transparency.
    pub overlay: RgbaImage,
    pub mask: GrayImage,
}

/// Grow `mask` by `grow` pixels. A failed growth logs and keeps the
/// ungrown mask.
pub fn grow_or_keep(mask: BitMask, grow: u32) -> BitMask {
    match mask.grow_square(grow) {
        Ok(grown) => grown,
        Err(err) => {
            tracing::warn!("{}; keeping the ungrown mask", err);
            mask
        }
    }
}

/// Preview-resolution mask: black canvas, every sprite's exact mask in
/// white, then grown by `grow` pixels.
pub fn build_mask(sprites: &[GlyphSprite], canvas: &CanvasGeometry, grow: u32) -> GrayImage {
    profile_function!();
    let mut mask = BitMask::new(canvas.size.width, canvas.size.height);
    for sprite in sprites {
        mask.blit(
            &sprite.mask,
            sprite.rect.x - canvas.offset.x,
            sprite.rect.y - canvas.offset.y,
        );
    }
    grow_or_keep(mask, grow).to_gray_image()
}

/// Growth in original-image pixels for a preview growth of `grow`.
pub fn scale_growth(grow: u32, scale: f32) -> u32 {
    if grow == 0 {
        return 0;
    }
    ((grow as f32 * scale).round() as u32).max(1)
}

/// Rebuild the layout at the original image's resolution.
///
/// The scale is `original.width / preview.width`. Glyphs are re-rendered at
/// their scaled size and re-centred on their scaled centres; growth is
/// scaled the same way. At a scale of one the sprites' own pixels are used,
/// which makes the mask identical to [`build_mask`]. A glyph that fails to
/// re-render is left out with a warning.
pub fn build_high_res_mask<R: GlyphRasterizer + ?Sized>(
    original: Size<u32>,
    sprites: &[GlyphSprite],
    preview: &CanvasGeometry,
    grow: u32,
    composer: &WordComposer,
    raster: &mut R,
) -> EngineResult<HighResOutput> {
    profile_function!();
    let scale = if preview.size.width == 0 {
        1.0
    } else {
        original.width as f32 / preview.size.width as f32
    };
    let identity = (scale - 1.0).abs() < f32::EPSILON;

    let mut overlay = RgbaImage::new(original.width, original.height);
    let mut mask = BitMask::new(original.width, original.height);

    for sprite in sprites {
        let rendered;
        let image = if identity {
            &sprite.image
        } else {
            match composer.rerender(sprite, scale, raster) {
                Ok(image) => {
                    rendered = image;
                    &rendered
                }
                Err(err) => {
                    tracing::warn!("Leaving {} out of the saved mask: {}", sprite.meta.source.label(), err);
                    continue;
                }
            }
        };

        let center = sprite.rect.center() - preview.offset;
        let scaled_center = Pos::new(
            (center.x as f32 * scale) as i32,
            (center.y as f32 * scale) as i32,
        );
        let rect = Rect::new(0, 0, image.width() as i32, image.height() as i32)
            .with_center(scaled_center);

        imageops::overlay(&mut overlay, image, rect.x as i64, rect.y as i64);
        let exact = if identity {
            sprite.mask.clone()
        } else {
            BitMask::from_alpha(image, composer.alpha_threshold())
        };
        mask.blit(&exact, rect.x, rect.y);
    }

    let mask = grow_or_keep(mask, scale_growth(grow, scale)).to_gray_image();
    tracing::debug!(
        "Rebuilt {} sprites at {}x{} (scale {:.3})",
        sprites.len(),
        original.width,
        original.height,
        scale
    );
    Ok(HighResOutput { overlay, mask })
}
