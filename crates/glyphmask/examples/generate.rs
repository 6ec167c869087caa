//! Generate samples from a config file.
//!
//! ```text
//! cargo run --example generate -- [config.yaml] [image-or-directory]
//! ```
//!
//! With a single image, one layout is placed and saved. With a directory
//! (or no path, which uses `paths.image_dir`), every image is processed in a
//! batch with a random region template per image.
//!
//! Set `GLYPHMASK_PROFILE=1` to serve puffin scopes on port 8585.

use std::path::PathBuf;

use glyphmask::batch::{BatchRegions, BatchRunner, collect_images};
use glyphmask::prelude::*;
use glyphmask_core::logging;
use glyphmask_core::profiling::{ProfilingBackend, init_profiling};
use glyphmask_text::{CachedRasterizer, CosmicRasterizer, FontDatabase};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const PREVIEW_AREA: Size<u32> = Size::new(1024, 768);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| "config.yaml".to_string());
    let config = EngineConfig::load_or_default(&config_path);
    logging::init_with_level(config.log_level());
    if std::env::var_os("GLYPHMASK_PROFILE").is_some() {
        init_profiling(ProfilingBackend::PuffinHttp);
    }

    let mut db = FontDatabase::new();
    let loaded = db.load_fonts_dir(&config.paths.font_dir);
    tracing::info!("Loaded {} font files from {}", loaded, config.paths.font_dir.display());
    let fonts = db.list_families();
    let mut raster = CachedRasterizer::new(CosmicRasterizer::new(db));

    let words = WordList::load_or_fallback(&config.paths.words_file, &config.text.fallback_words);
    let assets = AssetLibrary::load_dir(&config.paths.asset_dir);
    let store = JsonRegionStore::open(&config.paths.templates_file);
    let mut rng = match config.layout.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    };

    let target = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| config.paths.image_dir.clone());
    let out_dir = config.paths.output_dir.clone();
    let extensions = config.supported_extensions.clone();
    let inputs = LayoutInputs {
        words: &words,
        fonts: &fonts,
        assets: &assets,
    };
    let runner = BatchRunner::new(
        LayoutEngine::new(config)?,
        inputs,
        BatchRegions::RandomTemplate(&store),
        out_dir,
        PREVIEW_AREA,
    );

    if target.is_dir() {
        let images = collect_images(&target, &extensions)?;
        let summary = runner.run(&images, &mut raster, &mut rng);
        tracing::info!(
            "{} of {} images saved ({} failed)",
            summary.saved,
            summary.processed,
            summary.failed
        );
    } else {
        match runner.process_image(None, &target, &mut raster, &mut rng)? {
            Some(saved) => tracing::info!("Mask written to {}", saved.after.display()),
            None => tracing::warn!("Nothing could be placed on {}", target.display()),
        }
    }
    tracing::debug!("{}", raster.cache().stats_string());
    Ok(())
}
