//! Pixel transforms applied to rasterized glyphs and assets.

use glyphmask_core::Size;
use glyphmask_core::geometry::{inverse_rotation, rotated_extent};
use glyphmask_core::math::Vec2;
use image::imageops::{self, FilterType};
use image::{Rgb, Rgba, RgbaImage};

/// Multiply colour channels by `color`, keeping alpha.
pub fn tint(image: &RgbaImage, color: Rgb<u8>) -> RgbaImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        for c in 0..3 {
            pixel[c] = ((pixel[c] as u16 * color[c] as u16 + 127) / 255) as u8;
        }
    }
    out
}

/// Rotate counter-clockwise by `degrees` into an expanded canvas, sampling
/// the nearest source pixel.
pub fn rotate_rgba(image: &RgbaImage, degrees: f32) -> RgbaImage {
    if degrees == 0.0 {
        return image.clone();
    }
    let src_size = Size::new(image.width(), image.height());
    let dst_size = rotated_extent(src_size, degrees);
    let inverse = inverse_rotation(degrees);
    let src_center = Vec2::new(src_size.width as f32, src_size.height as f32) * 0.5;
    let dst_center = Vec2::new(dst_size.width as f32, dst_size.height as f32) * 0.5;

    RgbaImage::from_fn(dst_size.width, dst_size.height, |x, y| {
        let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - dst_center;
        let s = inverse * p + src_center;
        if s.x < 0.0 || s.y < 0.0 {
            return Rgba([0, 0, 0, 0]);
        }
        let (sx, sy) = (s.x as u32, s.y as u32);
        if sx >= src_size.width || sy >= src_size.height {
            Rgba([0, 0, 0, 0])
        } else {
            *image.get_pixel(sx, sy)
        }
    })
}

/// Scale to `height` pixels, preserving aspect ratio (width truncated, at
/// least one pixel).
pub fn scale_to_height(image: &RgbaImage, height: u32) -> RgbaImage {
    let height = height.max(1);
    let width = ((image.width() as f64 * height as f64 / image.height().max(1) as f64) as u32).max(1);
    imageops::resize(image, width, height, FilterType::Triangle)
}
