//! Image fixtures.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage, Rgba, RgbaImage};

/// A deterministic gradient background.
pub fn gradient_background(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        Rgb([r, g, 128])
    })
}

/// An opaque RGBA rectangle, used as an image asset.
pub fn solid_asset(width: u32, height: u32, color: [u8; 3]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([color[0], color[1], color[2], 255]))
}

/// Write a gradient background PNG named `name` into `dir`.
pub fn write_background(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    gradient_background(width, height)
        .save(&path)
        .unwrap_or_else(|err| panic!("failed to write fixture {}: {}", path.display(), err));
    path
}

/// Write a solid asset PNG named `name` into `dir`.
pub fn write_asset(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    solid_asset(width, height, [200, 40, 40])
        .save(&path)
        .unwrap_or_else(|err| panic!("failed to write fixture {}: {}", path.display(), err));
    path
}
