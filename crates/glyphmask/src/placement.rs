//! The layout pass.
//!
//! [`LayoutEngine::generate_layout`] scatters words over a canvas in one of
//! two modes:
//!
//! - **Region-constrained**: every region draws its own word count and each
//!   word is tried at random anchors inside the region's polygon.
//! - **Freeform**: a global word target is filled with anchors anywhere on
//!   the padded canvas; regions only veto words that break their rules at
//!   the anchor.
//!
//! All state of a pass lives in a `PlacementSession`; nothing survives
//! between calls except what the caller keeps (typically a glyph cache
//! inside the rasterizer).

use std::time::{Duration, Instant};

use glyphmask_core::geometry::{from_region_space, rect_within_canvas, to_region_space};
use glyphmask_core::math::Vec2;
use glyphmask_core::profiling::{self, profile_function, profile_scope};
use glyphmask_core::{CanvasGeometry, Pos, Rect};
use glyphmask_text::{DEFAULT_FONT, GlyphRasterizer};
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::seq::IndexedRandom;

use crate::assets::AssetLibrary;
use crate::collision::{CollisionIndex, CollisionStats, find_overlap_between};
use crate::compose::{WordComposer, WordComposition, WordRequest, random_color};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::region::{Region, StyleRule};
use crate::sprite::{GlyphSprite, TextStyle};
use crate::words::WordSource;

/// Inner attempts at drawing a point inside a region's polygon.
const POLYGON_SAMPLE_TRIES: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    RegionConstrained,
    Freeform,
}

impl LayoutMode {
    pub fn from_regions_only(regions_only: bool) -> Self {
        if regions_only {
            LayoutMode::RegionConstrained
        } else {
            LayoutMode::Freeform
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlacementPhase {
    Idle,
    GeneratingWords,
    RegionConstrained,
    Freeform,
    Finalized,
}

impl PlacementPhase {
    fn can_advance_to(self, next: PlacementPhase) -> bool {
        use PlacementPhase::*;
        matches!(
            (self, next),
            (Idle, GeneratingWords)
                | (GeneratingWords, RegionConstrained)
                | (GeneratingWords, Freeform)
                | (RegionConstrained, Finalized)
                | (Freeform, Finalized)
        )
    }
}

/// Weighted choice over the configured text styles.
#[derive(Debug, Clone)]
pub struct StylePicker {
    styles: Vec<TextStyle>,
    weights: Option<WeightedIndex<f64>>,
}

impl StylePicker {
    /// Unusable weights degrade to a uniform choice.
    pub fn new(styles: &[TextStyle], weights: &[f64]) -> Self {
        let weights = if styles.len() == weights.len() {
            WeightedIndex::new(weights).ok()
        } else {
            None
        };
        if weights.is_none() {
            tracing::warn!("Text style weights unusable; choosing styles uniformly");
        }
        Self {
            styles: styles.to_vec(),
            weights,
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> TextStyle {
        match &self.weights {
            Some(weights) => self.styles[weights.sample(rng)],
            None => self.styles.choose(rng).copied().unwrap_or(TextStyle::Normal),
        }
    }
}

/// External inputs of a layout pass.
#[derive(Clone, Copy)]
pub struct LayoutInputs<'a> {
    pub words: &'a dyn WordSource,
    /// Font identifiers to choose from; empty means the default font.
    pub fonts: &'a [String],
    pub assets: &'a AssetLibrary,
}

/// One committed word.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub word: String,
    pub style: TextStyle,
    pub font: String,
    pub size: u32,
    pub anchor: Pos<i32>,
    pub bounds: Rect<i32>,
    /// Index of the region the word was placed in (region-constrained mode).
    pub region: Option<usize>,
    /// Range of this word's sprites in [`LayoutResult::sprites`].
    pub sprites: std::ops::Range<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionReport {
    pub name: String,
    pub attempted: u32,
    pub placed: u32,
    pub skipped: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementReport {
    pub mode: LayoutMode,
    pub regions: Vec<RegionReport>,
    /// Words drawn for placement. In freeform mode this is the number of
    /// total attempts used.
    pub attempted: u32,
    pub placed: u32,
    /// Word target of a freeform pass.
    pub target: Option<u32>,
    pub collisions: CollisionStats,
    pub elapsed: Duration,
}

impl PlacementReport {
    fn new(mode: LayoutMode) -> Self {
        Self {
            mode,
            regions: Vec::new(),
            attempted: 0,
            placed: 0,
            target: None,
            collisions: CollisionStats::default(),
            elapsed: Duration::ZERO,
        }
    }

    /// Log the report. Per-region lines drop to `debug` inside batch runs.
    pub fn log(&self, batch: bool) {
        for region in &self.regions {
            if region.skipped {
                tracing::debug!("  - {}: skipped (degenerate)", region.name);
            } else if batch {
                tracing::debug!(
                    "  - {}: Placed {} out of {} attempted words.",
                    region.name,
                    region.placed,
                    region.attempted
                );
            } else {
                tracing::info!(
                    "  - {}: Placed {} out of {} attempted words.",
                    region.name,
                    region.placed,
                    region.attempted
                );
            }
        }
        match self.mode {
            LayoutMode::RegionConstrained => tracing::info!(
                "Total: Placed {} out of {} attempted words across all regions in {:.1} ms",
                self.placed,
                self.attempted,
                self.elapsed.as_secs_f64() * 1000.0
            ),
            LayoutMode::Freeform => tracing::info!(
                "Placed {} of {} target words using {} attempts in {:.1} ms",
                self.placed,
                self.target.unwrap_or(0),
                self.attempted,
                self.elapsed.as_secs_f64() * 1000.0
            ),
        }
        tracing::debug!(
            "Collision tests: {} broad ({:.0}% rejected), {} narrow, {} hits",
            self.collisions.broad_tests,
            self.collisions.broad_reject_rate() * 100.0,
            self.collisions.narrow_tests,
            self.collisions.narrow_hits
        );
    }
}

/// Output of one layout pass.
#[derive(Debug)]
pub struct LayoutResult {
    pub sprites: Vec<GlyphSprite>,
    pub anchors: Vec<Pos<i32>>,
    pub words: Vec<PlacedWord>,
    pub report: PlacementReport,
}

impl LayoutResult {
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Re-run the narrow phase over every pair of sprites from different
    /// words. True when no such pair's padded masks overlap.
    pub fn verify_no_overlap(&self) -> bool {
        let groups: Vec<_> = self.words.iter().map(|w| w.sprites.clone()).collect();
        match find_overlap_between(&self.sprites, &groups) {
            Some((a, b)) => {
                tracing::error!("Placed sprites {} and {} overlap", a, b);
                false
            }
            None => true,
        }
    }
}

/// Mutable state of one layout pass.
#[derive(Debug)]
pub(crate) struct PlacementSession {
    phase: PlacementPhase,
    index: CollisionIndex,
    anchors: Vec<Pos<i32>>,
    words: Vec<PlacedWord>,
    report: PlacementReport,
    started: Instant,
}

impl PlacementSession {
    fn new(mode: LayoutMode) -> Self {
        Self {
            phase: PlacementPhase::Idle,
            index: CollisionIndex::new(),
            anchors: Vec::new(),
            words: Vec::new(),
            report: PlacementReport::new(mode),
            started: Instant::now(),
        }
    }

    fn advance(&mut self, next: PlacementPhase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "illegal placement phase transition {:?} -> {:?}",
            self.phase,
            next
        );
        tracing::trace!("Placement phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    /// Whether `word`, already centred on its anchor, clears every placed
    /// sprite.
    fn collides(&mut self, word: &WordComposition) -> bool {
        self.index.would_collide(&word.sprites)
    }

    fn commit(&mut self, word: WordComposition, anchor: Pos<i32>, region: Option<usize>) {
        let start = self.index.len();
        let end = start + word.sprites.len();
        self.words.push(PlacedWord {
            word: word.word,
            style: word.style,
            font: word.font,
            size: word.size,
            anchor,
            bounds: word.bounds,
            region,
            sprites: start..end,
        });
        self.index.insert(word.sprites);
        self.anchors.push(anchor);
        self.report.placed += 1;
    }

    fn finalize(mut self) -> LayoutResult {
        self.advance(PlacementPhase::Finalized);
        self.report.collisions = self.index.stats();
        self.report.elapsed = self.started.elapsed();
        LayoutResult {
            sprites: self.index.into_sprites(),
            anchors: self.anchors,
            words: self.words,
            report: self.report,
        }
    }
}

/// Drives layout passes with a fixed configuration.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    config: EngineConfig,
    composer: WordComposer,
    styles: StylePicker,
    batch: bool,
}

impl LayoutEngine {
    /// Validates `config` first, so ranges built in code get the same
    /// normalisation as ones loaded from YAML.
    pub fn new(mut config: EngineConfig) -> EngineResult<Self> {
        config
            .validate()
            .map_err(|message| EngineError::Config { path: None, message })?;
        let composer = WordComposer::new(&config);
        let styles = StylePicker::new(&config.text.types, &config.text.type_weights);
        Ok(Self {
            config,
            composer,
            styles,
            batch: false,
        })
    }

    /// Mark passes as part of a batch run, which quiets per-region logging.
    pub fn with_batch(mut self, batch: bool) -> Self {
        self.batch = batch;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn composer(&self) -> &WordComposer {
        &self.composer
    }

    /// Run one layout pass.
    ///
    /// Only an empty canvas is an error. Words that cannot be composed or
    /// placed are counted and skipped, so an empty result is a valid outcome.
    pub fn generate_layout<R, G>(
        &self,
        mode: LayoutMode,
        regions: &[Region],
        canvas: &CanvasGeometry,
        inputs: &LayoutInputs<'_>,
        raster: &mut R,
        rng: &mut G,
    ) -> EngineResult<LayoutResult>
    where
        R: GlyphRasterizer + ?Sized,
        G: Rng,
    {
        profile_function!();
        if canvas.is_empty() {
            return Err(EngineError::InvalidCanvas {
                width: canvas.size.width,
                height: canvas.size.height,
            });
        }

        let mut session = PlacementSession::new(mode);
        session.advance(PlacementPhase::GeneratingWords);
        match mode {
            LayoutMode::RegionConstrained => {
                session.advance(PlacementPhase::RegionConstrained);
                self.place_in_regions(&mut session, regions, canvas, inputs, raster, rng)?;
            }
            LayoutMode::Freeform => {
                session.advance(PlacementPhase::Freeform);
                self.place_freeform(&mut session, regions, canvas, inputs, raster, rng)?;
            }
        }

        let result = session.finalize();
        result.report.log(self.batch);
        profiling::new_frame();
        Ok(result)
    }

    /// Draw and compose one word. Recoverable failures yield `None`.
    fn compose_word<R, G>(
        &self,
        style: TextStyle,
        size: u32,
        inputs: &LayoutInputs<'_>,
        raster: &mut R,
        rng: &mut G,
    ) -> EngineResult<Option<WordComposition>>
    where
        R: GlyphRasterizer + ?Sized,
        G: Rng,
    {
        let Some(word) = inputs.words.sample_word(rng) else {
            return Ok(None);
        };
        let font = inputs
            .fonts
            .choose(rng)
            .map(String::as_str)
            .unwrap_or(DEFAULT_FONT);
        let color = random_color(rng, &self.config.text.color);
        let request = WordRequest {
            word: &word,
            style,
            font,
            size,
            color,
        };

        match self.composer.compose(&request, raster, inputs.assets, rng) {
            Ok(composition) if composition.is_empty() => Ok(None),
            Ok(composition) => Ok(Some(composition)),
            Err(err) if err.is_recoverable() => {
                tracing::warn!("Skipping '{}' ({}, {}px): {}", word, style.as_str(), size, err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn place_in_regions<R, G>(
        &self,
        session: &mut PlacementSession,
        regions: &[Region],
        canvas: &CanvasGeometry,
        inputs: &LayoutInputs<'_>,
        raster: &mut R,
        rng: &mut G,
    ) -> EngineResult<()>
    where
        R: GlyphRasterizer + ?Sized,
        G: Rng,
    {
        profile_scope!("place_in_regions");
        for (region_index, region) in regions.iter().enumerate() {
            let mut region_report = RegionReport {
                name: region.name.clone(),
                ..Default::default()
            };
            if region.is_degenerate() {
                region_report.skipped = true;
                session.report.regions.push(region_report);
                continue;
            }

            let target = region.rules.word_count_range.sample(rng);
            region_report.attempted = target;
            session.report.attempted += target;

            for _ in 0..target {
                let size = region.rules.size_range.sample(rng);
                let style = match region.rules.text_type {
                    StyleRule::Only(style) => style,
                    StyleRule::Any => self.styles.sample(rng),
                };
                let Some(mut word) = self.compose_word(style, size, inputs, raster, rng)? else {
                    continue;
                };

                match self.place_word_in_region(session, &mut word, region, canvas, rng) {
                    Some(anchor) => {
                        session.commit(word, anchor, Some(region_index));
                        region_report.placed += 1;
                    }
                    None => {
                        let err = EngineError::UnplaceableWord {
                            word: word.word,
                            style,
                            tries: self.config.layout.max_placement_tries,
                        };
                        tracing::debug!("{} in region '{}'", err, region.name);
                    }
                }
            }
            session.report.regions.push(region_report);
        }
        Ok(())
    }

    /// Find an anchor for `word` inside `region`. On success the word has
    /// been moved onto the returned anchor.
    fn place_word_in_region<G: Rng>(
        &self,
        session: &mut PlacementSession,
        word: &mut WordComposition,
        region: &Region,
        canvas: &CanvasGeometry,
        rng: &mut G,
    ) -> Option<Pos<i32>> {
        let (lo, hi) = region.bbox()?;
        let mode = region.rules.placement_mode;

        for _ in 0..self.config.layout.max_placement_tries {
            let Some(anchor) = sample_in_polygon(region, lo, hi, rng)
                .map(|p| from_region_space(p, mode, canvas))
            else {
                continue;
            };

            let rect = word.bounds.with_center(anchor);
            if region.rules.enforce_boundaries && !corners_inside(region, rect, canvas) {
                continue;
            }
            if !rect_within_canvas(rect, canvas.size, self.config.canvas.padding, canvas.offset) {
                continue;
            }
            word.center_on(anchor);
            if session.collides(word) {
                continue;
            }
            return Some(anchor);
        }
        None
    }

    fn place_freeform<R, G>(
        &self,
        session: &mut PlacementSession,
        regions: &[Region],
        canvas: &CanvasGeometry,
        inputs: &LayoutInputs<'_>,
        raster: &mut R,
        rng: &mut G,
    ) -> EngineResult<()>
    where
        R: GlyphRasterizer + ?Sized,
        G: Rng,
    {
        profile_scope!("place_freeform");
        let layout = &self.config.layout;
        let [lo, hi] = layout.freeform_word_range;
        let target = rng.random_range(lo..=hi);
        session.report.target = Some(target);

        let padding = self.config.canvas.padding as i32;
        let (width, height) = (canvas.size.width as i32, canvas.size.height as i32);
        let mut placed = 0;

        for _ in 0..layout.max_attempts_total {
            if placed >= target {
                break;
            }
            session.report.attempted += 1;

            let size = rng.random_range(self.config.fonts.min_size..=self.config.fonts.max_size);
            let style = self.styles.sample(rng);
            let Some(mut word) = self.compose_word(style, size, inputs, raster, rng)? else {
                continue;
            };

            let half_w = word.bounds.width / 2;
            let half_h = word.bounds.height / 2;
            let (x_min, x_max) = (padding + half_w, width - padding - half_w);
            let (y_min, y_max) = (padding + half_h, height - padding - half_h);
            if x_min >= x_max || y_min >= y_max {
                tracing::trace!("'{}' at {}px does not fit the canvas", word.word, size);
                continue;
            }

            for _ in 0..layout.max_attempts_per_word {
                let anchor = Pos::new(
                    rng.random_range(x_min..=x_max) + canvas.offset.x,
                    rng.random_range(y_min..=y_max) + canvas.offset.y,
                );
                if !regions_allow(regions, anchor, style, size, canvas) {
                    continue;
                }
                let rect = word.bounds.with_center(anchor);
                if !rect_within_canvas(rect, canvas.size, self.config.canvas.padding, canvas.offset) {
                    continue;
                }
                word.center_on(anchor);
                if session.collides(&word) {
                    continue;
                }
                session.commit(word, anchor, None);
                placed += 1;
                break;
            }
        }
        Ok(())
    }
}

/// Uniform samples over the region's bounding box until one lands inside
/// the polygon.
fn sample_in_polygon<G: Rng + ?Sized>(region: &Region, lo: Vec2, hi: Vec2, rng: &mut G) -> Option<Vec2> {
    (0..POLYGON_SAMPLE_TRIES).find_map(|_| {
        let p = Vec2::new(
            rng.random_range(lo.x..=hi.x),
            rng.random_range(lo.y..=hi.y),
        );
        region.contains(p).then_some(p)
    })
}

/// All four corners of `rect` inside the region polygon.
fn corners_inside(region: &Region, rect: Rect<i32>, canvas: &CanvasGeometry) -> bool {
    rect.corners().iter().all(|&corner| {
        to_region_space(corner, region.rules.placement_mode, canvas)
            .is_some_and(|p| region.contains(p))
    })
}

/// Freeform veto: every region containing `anchor` must accept the word.
/// Only the anchor is tested, not the word's full bounds.
fn regions_allow(
    regions: &[Region],
    anchor: Pos<i32>,
    style: TextStyle,
    size: u32,
    canvas: &CanvasGeometry,
) -> bool {
    regions.iter().filter(|r| !r.is_degenerate()).all(|region| {
        let Some(p) = to_region_space(anchor, region.rules.placement_mode, canvas) else {
            return true;
        };
        let in_unit_square = (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y);
        !(in_unit_square && region.contains(p)) || region.allows(style, size)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::{RangeRule, RegionRules};
    use crate::words::WordList;
    use glyphmask_core::PlacementMode;
    use glyphmask_test_utils::BlockRasterizer;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn unit_square(rules: RegionRules) -> Region {
        Region::new(
            "square",
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ],
            rules,
        )
    }

    #[test]
    fn test_phase_transitions() {
        use PlacementPhase::*;
        assert!(Idle.can_advance_to(GeneratingWords));
        assert!(GeneratingWords.can_advance_to(Freeform));
        assert!(RegionConstrained.can_advance_to(Finalized));
        assert!(!Idle.can_advance_to(Finalized));
        assert!(!Finalized.can_advance_to(Idle));
    }

    #[test]
    fn test_session_walks_phases_to_finalized() {
        let mut session = PlacementSession::new(LayoutMode::Freeform);
        assert_eq!(session.phase, PlacementPhase::Idle);
        session.advance(PlacementPhase::GeneratingWords);
        session.advance(PlacementPhase::Freeform);
        assert_eq!(session.phase, PlacementPhase::Freeform);

        let result = session.finalize();
        assert!(result.is_empty());
        assert_eq!(result.report.placed, 0);
    }

    #[test]
    fn test_style_picker_respects_zero_weight() {
        let picker = StylePicker::new(&[TextStyle::Normal, TextStyle::Arc], &[1.0, 0.0]);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert!((0..100).all(|_| picker.sample(&mut rng) == TextStyle::Normal));
    }

    #[test]
    fn test_style_picker_uniform_fallback() {
        let picker = StylePicker::new(&[TextStyle::Arc], &[]);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert_eq!(picker.sample(&mut rng), TextStyle::Arc);
    }

    #[test]
    fn test_regions_allow_checks_anchor_only() {
        let canvas = CanvasGeometry::at_origin(100, 100);
        let left_half = Region::new(
            "left",
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(0.5, 0.0),
                Vec2::new(0.5, 1.0),
                Vec2::new(0.0, 1.0),
            ],
            RegionRules {
                size_range: RangeRule::new(10, 20),
                text_type: StyleRule::Only(TextStyle::Arc),
                ..RegionRules::default()
            },
        );
        let regions = [left_half];
        assert!(!regions_allow(&regions, Pos::new(20, 50), TextStyle::Normal, 15, &canvas));
        assert!(!regions_allow(&regions, Pos::new(20, 50), TextStyle::Arc, 30, &canvas));
        assert!(regions_allow(&regions, Pos::new(20, 50), TextStyle::Arc, 15, &canvas));
        assert!(regions_allow(&regions, Pos::new(80, 50), TextStyle::Normal, 30, &canvas));
    }

    #[test]
    fn test_corners_inside() {
        let canvas = CanvasGeometry::at_origin(200, 100);
        let region = unit_square(RegionRules::default());
        assert!(corners_inside(&region, Rect::new(10, 10, 50, 20), &canvas));
        assert!(!corners_inside(&region, Rect::new(180, 10, 50, 20), &canvas));
    }

    #[test]
    fn test_fit_mode_anchor_in_square() {
        let canvas = CanvasGeometry::at_origin(400, 200);
        let region = unit_square(RegionRules {
            placement_mode: PlacementMode::Fit,
            ..RegionRules::default()
        });
        let (lo, hi) = region.bbox().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..50 {
            let p = sample_in_polygon(&region, lo, hi, &mut rng).unwrap();
            let anchor = from_region_space(p, PlacementMode::Fit, &canvas);
            assert!((100..=300).contains(&anchor.x));
            assert!((0..=200).contains(&anchor.y));
        }
    }

    #[test]
    fn test_empty_canvas_is_fatal() {
        let engine = LayoutEngine::new(EngineConfig::default()).unwrap();
        let words = WordList::new(["A"]);
        let inputs = LayoutInputs {
            words: &words,
            fonts: &[],
            assets: &AssetLibrary::default(),
        };
        let err = engine
            .generate_layout(
                LayoutMode::Freeform,
                &[],
                &CanvasGeometry::at_origin(0, 300),
                &inputs,
                &mut BlockRasterizer::new(),
                &mut ChaCha8Rng::seed_from_u64(1),
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidCanvas { width: 0, height: 300 }));
    }

    #[test]
    fn test_new_normalises_inverted_ranges() {
        let mut config = EngineConfig::default();
        config.fonts.min_size = 60;
        config.fonts.max_size = 20;
        config.fonts.max_arc_letter_rotation = -30.0;
        config.layout.freeform_word_range = [9, 2];
        let engine = LayoutEngine::new(config).unwrap();
        assert_eq!((engine.config().fonts.min_size, engine.config().fonts.max_size), (20, 60));
        assert_eq!(engine.config().fonts.max_arc_letter_rotation, 30.0);

        let words = WordList::new(["RANGE", "SWAP"]);
        let inputs = LayoutInputs {
            words: &words,
            fonts: &[],
            assets: &AssetLibrary::default(),
        };
        let result = engine
            .generate_layout(
                LayoutMode::Freeform,
                &[],
                &CanvasGeometry::at_origin(400, 300),
                &inputs,
                &mut BlockRasterizer::new(),
                &mut ChaCha8Rng::seed_from_u64(3),
            )
            .unwrap();
        assert!(result.words.iter().all(|w| (20..=60).contains(&w.size)));
    }

    #[test]
    fn test_new_rejects_unusable_config() {
        let mut config = EngineConfig::default();
        config.text.type_weights = vec![0.0, 0.0];
        assert!(matches!(
            LayoutEngine::new(config),
            Err(EngineError::Config { path: None, .. })
        ));
    }

    #[test]
    fn test_empty_word_source_yields_empty_layout() {
        let engine = LayoutEngine::new(EngineConfig::default()).unwrap();
        let words = WordList::default();
        let inputs = LayoutInputs {
            words: &words,
            fonts: &[],
            assets: &AssetLibrary::default(),
        };
        let result = engine
            .generate_layout(
                LayoutMode::Freeform,
                &[],
                &CanvasGeometry::at_origin(300, 300),
                &inputs,
                &mut BlockRasterizer::new(),
                &mut ChaCha8Rng::seed_from_u64(1),
            )
            .unwrap();
        assert!(result.is_empty());
        assert_eq!(result.report.placed, 0);
    }
}
