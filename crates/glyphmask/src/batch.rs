//! Sequential batch runs over a directory of backgrounds.
//!
//! Images are processed one at a time: the rasterizer is stateful and its
//! glyph cache is shared by every image of the run.

use std::path::{Path, PathBuf};

use glyphmask_core::{CanvasGeometry, Size};
use glyphmask_text::GlyphRasterizer;
use image::RgbImage;
use image::imageops::{self, FilterType};
use rand::Rng;

use crate::config::SupportedExtensions;
use crate::error::{EngineError, EngineResult};
use crate::mask::build_high_res_mask;
use crate::output::{ArtifactName, SavedArtifacts, fit_image_to_canvas, save_artifacts};
use crate::placement::{LayoutEngine, LayoutInputs, LayoutMode};
use crate::region::{Region, RegionStore};

/// Image files in `dir` with a supported extension, sorted by path.
pub fn collect_images(dir: &Path, extensions: &SupportedExtensions) -> EngineResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|source| EngineError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut images: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && extensions.is_image(path))
        .collect();
    images.sort();
    Ok(images)
}

/// Shrink `image` to at most `megapixels`, preserving aspect ratio. Images
/// already within budget are returned unchanged.
pub fn downscale_to_megapixels(image: RgbImage, megapixels: f64) -> RgbImage {
    let current = image.width() as f64 * image.height() as f64 / 1_000_000.0;
    if megapixels <= 0.0 || current <= megapixels {
        return image;
    }
    let factor = (megapixels / current).sqrt();
    let width = ((image.width() as f64 * factor) as u32).max(1);
    let height = ((image.height() as f64 * factor) as u32).max(1);
    tracing::debug!(
        "Downscaling {}x{} to {}x{} ({} MP)",
        image.width(),
        image.height(),
        width,
        height,
        megapixels
    );
    imageops::resize(&image, width, height, FilterType::Lanczos3)
}

/// Outcome counts of a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub saved: usize,
    pub failed: usize,
}

/// Which regions each image of a batch uses.
#[derive(Clone, Copy)]
pub enum BatchRegions<'a> {
    Fixed(&'a [Region]),
    /// A random template from the store per image.
    RandomTemplate(&'a dyn RegionStore),
}

pub struct BatchRunner<'a> {
    engine: LayoutEngine,
    inputs: LayoutInputs<'a>,
    regions: BatchRegions<'a>,
    mode: LayoutMode,
    out_dir: PathBuf,
    preview_area: Size<u32>,
    megapixels: Option<f64>,
}

impl<'a> BatchRunner<'a> {
    pub fn new(
        engine: LayoutEngine,
        inputs: LayoutInputs<'a>,
        regions: BatchRegions<'a>,
        out_dir: impl Into<PathBuf>,
        preview_area: Size<u32>,
    ) -> Self {
        let mode = LayoutMode::from_regions_only(engine.config().debug.force_regions_only);
        Self {
            engine: engine.with_batch(true),
            inputs,
            regions,
            mode,
            out_dir: out_dir.into(),
            preview_area,
            megapixels: None,
        }
    }

    pub fn with_mode(mut self, mode: LayoutMode) -> Self {
        self.mode = mode;
        self
    }

    /// Downscale every background to at most `megapixels` before layout.
    pub fn with_megapixels(mut self, megapixels: f64) -> Self {
        self.megapixels = Some(megapixels);
        self
    }

    /// Process `images` in order. A failing image is logged and counted; the
    /// run continues with the next one.
    pub fn run<R, G>(&self, images: &[PathBuf], raster: &mut R, rng: &mut G) -> BatchSummary
    where
        R: GlyphRasterizer + ?Sized,
        G: Rng,
    {
        tracing::info!("Starting batch of {} images", images.len());
        let mut summary = BatchSummary::default();
        for (index, path) in images.iter().enumerate() {
            summary.processed += 1;
            match self.process_image(Some(index), path, raster, rng) {
                Ok(Some(saved)) => {
                    summary.saved += 1;
                    tracing::info!(
                        "Image {}/{}: {}",
                        index + 1,
                        images.len(),
                        saved.after.display()
                    );
                }
                Ok(None) => {
                    tracing::info!(
                        "Image {}/{}: nothing placed on {}",
                        index + 1,
                        images.len(),
                        path.display()
                    );
                }
                Err(err) => {
                    summary.failed += 1;
                    tracing::error!("Image {}/{}: {}", index + 1, images.len(), err);
                }
            }
        }
        tracing::info!(
            "Batch finished: {} processed, {} saved, {} failed",
            summary.processed,
            summary.saved,
            summary.failed
        );
        summary
    }

    /// Layout and save a single background. `index` is appended to the
    /// artifact names inside batch runs.
    pub fn process_image<R, G>(
        &self,
        index: Option<usize>,
        path: &Path,
        raster: &mut R,
        rng: &mut G,
    ) -> EngineResult<Option<SavedArtifacts>>
    where
        R: GlyphRasterizer + ?Sized,
        G: Rng,
    {
        let original = image::open(path)
            .map_err(|source| EngineError::Image {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgb8();
        let original = match self.megapixels {
            Some(megapixels) => downscale_to_megapixels(original, megapixels),
            None => original,
        };

        let preview = fit_image_to_canvas(&original, self.preview_area.width, self.preview_area.height);
        let canvas = CanvasGeometry::centered(
            Size::new(preview.width(), preview.height()),
            self.preview_area,
        );

        let template_regions;
        let regions: &[Region] = match self.regions {
            BatchRegions::Fixed(regions) => regions,
            BatchRegions::RandomTemplate(store) => {
                template_regions = store
                    .choose_template(rng)
                    .map(|name| store.load_template(&name))
                    .unwrap_or_default();
                &template_regions
            }
        };

        let layout = self
            .engine
            .generate_layout(self.mode, regions, &canvas, &self.inputs, raster, rng)?;
        let output = build_high_res_mask(
            Size::new(original.width(), original.height()),
            &layout.sprites,
            &canvas,
            self.engine.config().mask.grow_pixels,
            self.engine.composer(),
            raster,
        )?;

        let name = match index {
            Some(index) => ArtifactName::for_image(path).with_index(index),
            None => ArtifactName::for_image(path),
        };
        save_artifacts(&self.out_dir, &name, &original, &output, layout.sprites.len())
    }
}
