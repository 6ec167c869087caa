//! Mask pipeline tests.
//!
//! Preview and full-resolution masks must agree at unit scale, growth only
//! ever adds pixels, and upscaled output re-renders glyphs at scaled sizes.

use std::sync::Arc;

use glyphmask::bitmap::DiskKernel;
use glyphmask::config::EngineConfig;
use glyphmask::mask::{build_high_res_mask, build_mask};
use glyphmask::placement::{LayoutEngine, LayoutInputs, LayoutMode, LayoutResult};
use glyphmask::sprite::{GlyphSprite, SpriteMeta, SpriteSource, TextStyle};
use glyphmask::{assets::AssetLibrary, words::WordList};
use glyphmask_core::{CanvasGeometry, Pos, Size};
use glyphmask_test_utils::{BlockRasterizer, FailingRasterizer, RecordingRasterizer};
use image::{GrayImage, Rgb, Rgba, RgbaImage};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn normal_engine() -> LayoutEngine {
    let mut config = EngineConfig::default();
    config.text.types = vec![TextStyle::Normal];
    config.text.type_weights = vec![1.0];
    config.fonts.min_size = 20;
    config.fonts.max_size = 36;
    LayoutEngine::new(config).unwrap()
}

fn layout(engine: &LayoutEngine, canvas: &CanvasGeometry, words: &[&str], seed: u64) -> LayoutResult {
    let words = WordList::new(words.iter().copied());
    let assets = AssetLibrary::default();
    let inputs = LayoutInputs {
        words: &words,
        fonts: &[],
        assets: &assets,
    };
    engine
        .generate_layout(
            LayoutMode::Freeform,
            &[],
            canvas,
            &inputs,
            &mut BlockRasterizer::new(),
            &mut ChaCha8Rng::seed_from_u64(seed),
        )
        .unwrap()
}

fn white(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p[0] == 255).count()
}

// ==== Preview / full resolution agreement ====

#[test]
fn test_unit_scale_matches_preview_mask() {
    let engine = normal_engine();
    let canvas = CanvasGeometry::at_origin(400, 300);
    let result = layout(&engine, &canvas, &["MASK", "PIXEL"], 6);
    assert!(!result.is_empty());

    for grow in [0, 3] {
        let preview = build_mask(&result.sprites, &canvas, grow);
        let full = build_high_res_mask(
            Size::new(400, 300),
            &result.sprites,
            &canvas,
            grow,
            engine.composer(),
            &mut FailingRasterizer::always(),
        )
        .unwrap();
        assert_eq!(preview, full.mask);
    }
}

#[test]
fn test_unit_scale_on_offset_canvas() {
    let engine = normal_engine();
    let canvas = CanvasGeometry::centered(Size::new(300, 200), Size::new(400, 400));
    assert_eq!(canvas.offset, Pos::new(50, 100));
    let result = layout(&engine, &canvas, &["SHIFT"], 14);
    assert!(!result.is_empty());

    let preview = build_mask(&result.sprites, &canvas, 2);
    let full = build_high_res_mask(
        Size::new(300, 200),
        &result.sprites,
        &canvas,
        2,
        engine.composer(),
        &mut BlockRasterizer::new(),
    )
    .unwrap();
    assert_eq!(preview.dimensions(), (300, 200));
    assert_eq!(preview, full.mask);
}

#[test]
fn test_overlay_alpha_follows_mask() {
    let engine = normal_engine();
    let canvas = CanvasGeometry::at_origin(320, 240);
    let result = layout(&engine, &canvas, &["INK"], 2);

    let full = build_high_res_mask(
        Size::new(320, 240),
        &result.sprites,
        &canvas,
        0,
        engine.composer(),
        &mut BlockRasterizer::new(),
    )
    .unwrap();
    for (overlay, mask) in full.overlay.pixels().zip(full.mask.pixels()) {
        if mask[0] == 255 {
            assert!(overlay[3] > 0);
        }
    }
}

// ==== Growth ====

#[test]
fn test_growth_is_monotonic() {
    let engine = normal_engine();
    let canvas = CanvasGeometry::at_origin(400, 300);
    let result = layout(&engine, &canvas, &["GROW", "MORE"], 9);

    let masks: Vec<_> = [0, 1, 3, 6]
        .into_iter()
        .map(|grow| build_mask(&result.sprites, &canvas, grow))
        .collect();
    for pair in masks.windows(2) {
        assert!(white(&pair[1]) > white(&pair[0]));
        for (small, large) in pair[0].pixels().zip(pair[1].pixels()) {
            if small[0] == 255 {
                assert_eq!(large[0], 255);
            }
        }
    }
}

#[test]
fn test_growth_stays_monotonic_at_large_scale() {
    let engine = normal_engine();
    let canvas = CanvasGeometry::at_origin(10, 10);
    let block = Arc::new(RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255])));
    let sprite = GlyphSprite::new(
        (*block).clone(),
        Pos::new(4, 4),
        &DiskKernel::new(1),
        10,
        SpriteMeta {
            source: SpriteSource::Asset {
                name: "block".into(),
                image: block,
            },
            size: 2,
            style: TextStyle::Asset,
            color: Rgb([255, 255, 255]),
            arc_angle: None,
            rotation: 0.0,
        },
    );
    let sprites = [sprite];

    // A scale of 150 turns preview growth 1, 2 and 4 into 150, 300 and 600.
    let counts: Vec<_> = [0, 1, 2, 4]
        .into_iter()
        .map(|grow| {
            let full = build_high_res_mask(
                Size::new(1500, 1500),
                &sprites,
                &canvas,
                grow,
                engine.composer(),
                &mut FailingRasterizer::always(),
            )
            .unwrap();
            white(&full.mask)
        })
        .collect();
    assert_eq!(counts[0], 300 * 300);
    for pair in counts.windows(2) {
        assert!(pair[1] > pair[0], "{counts:?}");
    }
}

// ==== Upscaling ====

#[test]
fn test_double_scale_rerenders_at_double_size() {
    let engine = normal_engine();
    let canvas = CanvasGeometry::at_origin(300, 200);
    let result = layout(&engine, &canvas, &["HEX"], 4);
    assert!(!result.is_empty());

    let mut raster = RecordingRasterizer::new(BlockRasterizer::new());
    let full = build_high_res_mask(
        Size::new(600, 400),
        &result.sprites,
        &canvas,
        0,
        engine.composer(),
        &mut raster,
    )
    .unwrap();

    assert_eq!(full.mask.dimensions(), (600, 400));
    assert_eq!(raster.count_renders(), result.sprites.len());
    for word in &result.words {
        for ch in word.word.chars() {
            assert!(raster.sizes_for(ch).iter().all(|&s| s == word.size * 2));
        }
    }

    let preview = build_mask(&result.sprites, &canvas, 0);
    let ratio = white(&full.mask) as f64 / white(&preview) as f64;
    assert!((3.0..5.0).contains(&ratio), "area ratio {ratio}");
}

#[test]
fn test_failed_rerender_leaves_sprite_out() {
    let engine = normal_engine();
    let canvas = CanvasGeometry::at_origin(300, 200);
    let result = layout(&engine, &canvas, &["AB"], 4);
    assert!(!result.is_empty());

    let full = build_high_res_mask(
        Size::new(600, 400),
        &result.sprites,
        &canvas,
        2,
        engine.composer(),
        &mut FailingRasterizer::always(),
    )
    .unwrap();
    assert_eq!(white(&full.mask), 0);
    assert!(full.overlay.pixels().all(|p| p[3] == 0));
}
