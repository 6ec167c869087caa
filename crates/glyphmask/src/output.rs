//! Saved dataset samples.
//!
//! Each save writes three PNGs sharing one file name:
//!
//! | Directory | Content |
//! |-----------|---------|
//! | `after/`  | Binary occupancy mask |
//! | `before/` | Background with the text overlay composited |
//! | `debug/`  | `before` darkened under the mask |

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use image::imageops::{self, FilterType};
use image::{GrayImage, Rgb, RgbImage, RgbaImage};

use crate::error::{EngineError, EngineResult};
use crate::mask::HighResOutput;

/// Opacity of the mask tint in debug images.
pub const DEBUG_TINT_ALPHA: f32 = 0.7;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `{timestamp}_{stem}` or, in batch runs, `{timestamp}_{stem}_{index:03}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName {
    timestamp: String,
    stem: String,
    index: Option<usize>,
}

impl ArtifactName {
    /// Name stamped with the current local time.
    pub fn now(stem: impl Into<String>) -> Self {
        Self::at(Local::now(), stem)
    }

    pub fn at(time: DateTime<Local>, stem: impl Into<String>) -> Self {
        Self {
            timestamp: time.format(TIMESTAMP_FORMAT).to_string(),
            stem: stem.into(),
            index: None,
        }
    }

    /// Name for the background at `path`; `layout` when it has no stem.
    pub fn for_image(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "layout".to_string());
        Self::now(stem)
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn file_name(&self) -> String {
        format!("{}.png", self)
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}_{}_{:03}", self.timestamp, self.stem, index),
            None => write!(f, "{}_{}", self.timestamp, self.stem),
        }
    }
}

/// Paths written by [`save_artifacts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifacts {
    pub after: PathBuf,
    pub before: PathBuf,
    pub debug: PathBuf,
}

/// Alpha-composite `overlay` onto `background`. Sizes are expected to match;
/// overlay pixels outside the background are ignored.
pub fn composite_before(background: &RgbImage, overlay: &RgbaImage) -> RgbImage {
    let mut out = background.clone();
    let width = background.width().min(overlay.width());
    let height = background.height().min(overlay.height());
    for y in 0..height {
        for x in 0..width {
            let src = overlay.get_pixel(x, y);
            let alpha = src[3] as f32 / 255.0;
            if alpha == 0.0 {
                continue;
            }
            let dst = out.get_pixel_mut(x, y);
            for c in 0..3 {
                dst[c] = (dst[c] as f32 * (1.0 - alpha) + src[c] as f32 * alpha) as u8;
            }
        }
    }
    out
}

/// Darken `before` wherever `mask` is set.
pub fn composite_debug(before: &RgbImage, mask: &GrayImage) -> RgbImage {
    let keep = 1.0 - DEBUG_TINT_ALPHA;
    let mut out = before.clone();
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        if x < mask.width() && y < mask.height() && mask.get_pixel(x, y)[0] > 0 {
            *pixel = Rgb(pixel.0.map(|v| (v as f32 * keep) as u8));
        }
    }
    out
}

fn artifact_path(out_dir: &Path, kind: &str, name: &ArtifactName) -> EngineResult<PathBuf> {
    let dir = out_dir.join(kind);
    std::fs::create_dir_all(&dir).map_err(|source| EngineError::Io {
        path: dir.clone(),
        source,
    })?;
    Ok(dir.join(name.file_name()))
}

fn image_error(path: &Path) -> impl FnOnce(image::ImageError) -> EngineError + '_ {
    move |source| EngineError::Image {
        path: path.to_path_buf(),
        source,
    }
}

/// Write the three artifacts of one sample under `out_dir`.
///
/// Returns `Ok(None)` without touching the disk when nothing was placed.
pub fn save_artifacts(
    out_dir: &Path,
    name: &ArtifactName,
    background: &RgbImage,
    output: &HighResOutput,
    placed: usize,
) -> EngineResult<Option<SavedArtifacts>> {
    if placed == 0 {
        tracing::debug!("Nothing placed; skipping save of {}", name);
        return Ok(None);
    }

    let after = artifact_path(out_dir, "after", name)?;
    output.mask.save(&after).map_err(image_error(&after))?;

    let before_image = composite_before(background, &output.overlay);
    let before = artifact_path(out_dir, "before", name)?;
    before_image.save(&before).map_err(image_error(&before))?;

    let debug = artifact_path(out_dir, "debug", name)?;
    composite_debug(&before_image, &output.mask)
        .save(&debug)
        .map_err(image_error(&debug))?;

    tracing::info!("Saved {} ({} sprites) to {}", name, placed, out_dir.display());
    Ok(Some(SavedArtifacts {
        after,
        before,
        debug,
    }))
}

/// Resize to fit inside `width` x `height`, preserving aspect ratio.
pub fn fit_image_to_canvas(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    if image.width() == 0 || image.height() == 0 {
        return image.clone();
    }
    let scale = (width as f64 / image.width() as f64).min(height as f64 / image.height() as f64);
    let new_width = ((image.width() as f64 * scale) as u32).max(1);
    let new_height = ((image.height() as f64 * scale) as u32).max(1);
    imageops::resize(image, new_width, new_height, FilterType::Lanczos3)
}
