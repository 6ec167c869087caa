//! End-to-end batch runs over temporary image directories.

use std::path::Path;

use glyphmask::assets::AssetLibrary;
use glyphmask::batch::{BatchRegions, BatchRunner, BatchSummary, collect_images};
use glyphmask::config::{EngineConfig, SupportedExtensions};
use glyphmask::placement::{LayoutEngine, LayoutInputs, LayoutMode};
use glyphmask::region::{JsonRegionStore, RangeRule, Region, RegionRules, StyleRule};
use glyphmask::sprite::TextStyle;
use glyphmask::words::WordList;
use glyphmask_core::Size;
use glyphmask_core::math::Vec2;
use glyphmask_test_utils::{BlockRasterizer, write_background};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn everywhere() -> Region {
    Region::new(
        "Everywhere",
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ],
        RegionRules {
            size_range: RangeRule::new(24, 32),
            word_count_range: RangeRule::new(2, 2),
            text_type: StyleRule::Only(TextStyle::Normal),
            ..RegionRules::default()
        },
    )
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ==== Fixed regions ====

#[test]
fn test_batch_saves_each_background() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_background(input.path(), "a_small.png", 600, 400);
    std::fs::write(input.path().join("b_broken.png"), b"not a png").unwrap();
    write_background(input.path(), "c_large.png", 1200, 800);
    std::fs::write(input.path().join("notes.txt"), b"skip me").unwrap();

    let images = collect_images(input.path(), &SupportedExtensions::default()).unwrap();
    assert_eq!(images.len(), 3);

    let words = WordList::new(["BATCH", "RUN"]);
    let assets = AssetLibrary::default();
    let inputs = LayoutInputs {
        words: &words,
        fonts: &[],
        assets: &assets,
    };
    let regions = [everywhere()];
    let runner = BatchRunner::new(
        LayoutEngine::new(EngineConfig::default()).unwrap(),
        inputs,
        BatchRegions::Fixed(&regions),
        output.path(),
        Size::new(600, 400),
    )
    .with_mode(LayoutMode::RegionConstrained);

    let summary = runner.run(
        &images,
        &mut BlockRasterizer::new(),
        &mut ChaCha8Rng::seed_from_u64(5),
    );
    assert_eq!(
        summary,
        BatchSummary {
            processed: 3,
            saved: 2,
            failed: 1
        }
    );

    for kind in ["after", "before", "debug"] {
        let names = files_in(&output.path().join(kind));
        assert_eq!(names.len(), 2, "{kind}: {names:?}");
        assert!(names[0].ends_with("_a_small_000.png"));
        assert!(names[1].ends_with("_c_large_002.png"));
    }

    // Masks are written at the original resolution.
    let after = output.path().join("after");
    let names = files_in(&after);
    let small = image::open(after.join(&names[0])).unwrap();
    let large = image::open(after.join(&names[1])).unwrap();
    assert_eq!((small.width(), small.height()), (600, 400));
    assert_eq!((large.width(), large.height()), (1200, 800));
    assert!(large.to_luma8().pixels().any(|p| p[0] == 255));
}

#[test]
fn test_megapixel_budget_shrinks_output() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let path = write_background(input.path(), "wide.png", 2000, 1000);

    let words = WordList::new(["SHRINK"]);
    let assets = AssetLibrary::default();
    let inputs = LayoutInputs {
        words: &words,
        fonts: &[],
        assets: &assets,
    };
    let regions = [everywhere()];
    let runner = BatchRunner::new(
        LayoutEngine::new(EngineConfig::default()).unwrap(),
        inputs,
        BatchRegions::Fixed(&regions),
        output.path(),
        Size::new(500, 500),
    )
    .with_mode(LayoutMode::RegionConstrained)
    .with_megapixels(0.5);

    let saved = runner
        .process_image(
            None,
            &path,
            &mut BlockRasterizer::new(),
            &mut ChaCha8Rng::seed_from_u64(2),
        )
        .unwrap()
        .unwrap();
    let mask = image::open(&saved.after).unwrap();
    assert_eq!((mask.width(), mask.height()), (1000, 500));
    assert!(saved.before.exists());
    assert!(saved.debug.exists());
}

// ==== Template regions ====

#[test]
fn test_random_template_per_image() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let store_dir = tempfile::tempdir().unwrap();
    for name in ["one.png", "two.png"] {
        write_background(input.path(), name, 640, 480);
    }
    let store = JsonRegionStore::open(store_dir.path().join("regions.json"));

    let words = WordList::new(["TEMPLATE"]);
    let assets = AssetLibrary::default();
    let inputs = LayoutInputs {
        words: &words,
        fonts: &[],
        assets: &assets,
    };
    let runner = BatchRunner::new(
        LayoutEngine::new(EngineConfig::default()).unwrap(),
        inputs,
        BatchRegions::RandomTemplate(&store),
        output.path(),
        Size::new(640, 480),
    );

    let images = collect_images(input.path(), &SupportedExtensions::default()).unwrap();
    let summary = runner.run(
        &images,
        &mut BlockRasterizer::new(),
        &mut ChaCha8Rng::seed_from_u64(31),
    );
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.failed, 0);
    assert!(summary.saved <= 2);
}

#[test]
fn test_empty_layout_writes_nothing() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let path = write_background(input.path(), "quiet.png", 300, 200);

    let words = WordList::new(Vec::<String>::new());
    let assets = AssetLibrary::default();
    let inputs = LayoutInputs {
        words: &words,
        fonts: &[],
        assets: &assets,
    };
    let regions = [everywhere()];
    let runner = BatchRunner::new(
        LayoutEngine::new(EngineConfig::default()).unwrap(),
        inputs,
        BatchRegions::Fixed(&regions),
        output.path(),
        Size::new(300, 200),
    )
    .with_mode(LayoutMode::RegionConstrained);

    let saved = runner
        .process_image(
            None,
            &path,
            &mut BlockRasterizer::new(),
            &mut ChaCha8Rng::seed_from_u64(0),
        )
        .unwrap();
    assert!(saved.is_none());
    assert!(!output.path().join("after").exists());
}
