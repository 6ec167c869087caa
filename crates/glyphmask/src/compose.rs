//! Word composition.
//!
//! Turns a word into sprites in one of three styles and trims the group to
//! the tight bounding box of its ink, so every composition starts at the
//! origin.
//!
//! Arc layout runs in two phases. The first phase only moves angles around
//! and validates each proposal with throwaway collision footprints. Sprites
//! are materialized once, after an arrangement has been accepted.

use std::sync::Arc;

use glyphmask_core::geometry::clamp_rotation;
use glyphmask_core::profiling::{profile_function, profile_scope};
use glyphmask_core::{Pos, Rect};
use glyphmask_text::GlyphRasterizer;
use image::{Rgb, RgbaImage};
use rand::Rng;

use crate::assets::{Asset, AssetLibrary};
use crate::bitmap::{BitMask, DiskKernel};
use crate::config::{ArcConfig, ColorConfig, EngineConfig};
use crate::error::{EngineError, EngineResult};
use crate::sprite::{GlyphSprite, SpriteMeta, SpriteSource, TextStyle};
use crate::transform::{rotate_rgba, scale_to_height, tint};

/// What to compose.
#[derive(Debug, Clone)]
pub struct WordRequest<'a> {
    pub word: &'a str,
    pub style: TextStyle,
    pub font: &'a str,
    pub size: u32,
    pub color: Rgb<u8>,
}

/// Parameters of an accepted arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcLayout {
    pub radius: f32,
    /// Radii tried, including the accepted one.
    pub radius_attempts: u32,
    pub start_angle: f32,
    pub reversed: bool,
}

/// Sprites of one word, positioned relative to the word's trimmed bounds.
#[derive(Debug, Clone)]
pub struct WordComposition {
    pub word: String,
    pub style: TextStyle,
    pub font: String,
    pub size: u32,
    pub sprites: Vec<GlyphSprite>,
    /// Trimmed bounds. Starts at the origin until the word is moved.
    pub bounds: Rect<i32>,
    pub arc: Option<ArcLayout>,
}

impl WordComposition {
    fn empty(request: &WordRequest<'_>) -> Self {
        Self {
            word: request.word.to_string(),
            style: request.style,
            font: request.font.to_string(),
            size: request.size,
            sprites: Vec::new(),
            bounds: Rect::default(),
            arc: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Move the whole group so its bounds are centred on `anchor`.
    pub fn center_on(&mut self, anchor: Pos<i32>) {
        let target = self.bounds.with_center(anchor);
        let dx = target.x - self.bounds.x;
        let dy = target.y - self.bounds.y;
        for sprite in &mut self.sprites {
            sprite.translate(dx, dy);
        }
        self.bounds = target;
    }
}

/// Shift sprites so the union of their ink starts at the origin. Sprites
/// without ink are dropped.
pub fn trim_to_ink(sprites: &mut Vec<GlyphSprite>) -> Rect<i32> {
    sprites.retain(GlyphSprite::has_ink);
    let Some(ink) = sprites
        .iter()
        .filter_map(GlyphSprite::ink_rect)
        .reduce(|a, b| a.union(&b))
    else {
        return Rect::default();
    };
    for sprite in sprites.iter_mut() {
        sprite.translate(-ink.x, -ink.y);
    }
    Rect::new(0, 0, ink.width, ink.height)
}

/// Random word colour, or white when colours are disabled.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R, config: &ColorConfig) -> Rgb<u8> {
    if !config.random {
        return Rgb([255, 255, 255]);
    }
    let lo = config.min_value.min(config.max_value);
    let hi = config.min_value.max(config.max_value);
    Rgb([
        rng.random_range(lo..=hi),
        rng.random_range(lo..=hi),
        rng.random_range(lo..=hi),
    ])
}

/// Collision footprint of a proposed arc letter.
struct Footprint {
    rect: Rect<i32>,
    padded: BitMask,
}

impl Footprint {
    fn touches(&self, other: &Footprint) -> bool {
        self.rect.intersects(&other.rect)
            && self
                .padded
                .overlaps(&other.padded, (other.rect.x - self.rect.x, other.rect.y - self.rect.y))
    }
}

#[derive(Debug, Clone)]
pub struct WordComposer {
    letter_gap: u32,
    arc: ArcConfig,
    rotate_letters: bool,
    max_rotation: f32,
    alpha_threshold: u8,
    kernel: DiskKernel,
}

impl WordComposer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            letter_gap: config.text.normal.letter_gap,
            arc: config.text.arc.clone(),
            rotate_letters: config.fonts.rotate_letters_on_arc,
            max_rotation: config.fonts.max_arc_letter_rotation,
            alpha_threshold: config.mask.alpha_threshold,
            kernel: DiskKernel::new(config.mask.padding_size),
        }
    }

    pub fn kernel(&self) -> &DiskKernel {
        &self.kernel
    }

    pub fn alpha_threshold(&self) -> u8 {
        self.alpha_threshold
    }

    /// Compose `request` in its style.
    ///
    /// An asset request with an empty library yields an empty composition.
    pub fn compose<R, G>(
        &self,
        request: &WordRequest<'_>,
        raster: &mut R,
        assets: &AssetLibrary,
        rng: &mut G,
    ) -> EngineResult<WordComposition>
    where
        R: GlyphRasterizer + ?Sized,
        G: Rng + ?Sized,
    {
        profile_function!();
        match request.style {
            TextStyle::Normal => self.compose_normal(request, raster),
            TextStyle::Arc => self.compose_arc(request, raster, rng),
            TextStyle::Asset => match assets.choose(rng) {
                Some(asset) => Ok(self.compose_asset(request, asset)),
                None => Ok(WordComposition::empty(request)),
            },
        }
    }

    fn render<R: GlyphRasterizer + ?Sized>(
        &self,
        request: &WordRequest<'_>,
        raster: &mut R,
        ch: char,
    ) -> EngineResult<Arc<RgbaImage>> {
        raster
            .render(request.font, request.size, ch)
            .map_err(|source| EngineError::RasterFailure {
                word: request.word.to_string(),
                source,
            })
    }

    fn glyph_meta(&self, request: &WordRequest<'_>, ch: char) -> SpriteMeta {
        SpriteMeta {
            source: SpriteSource::Glyph {
                font: request.font.to_string(),
                ch,
            },
            size: request.size,
            style: request.style,
            color: request.color,
            arc_angle: None,
            rotation: 0.0,
        }
    }

    /// Letters left to right on a shared top line, `letter_gap` apart.
    pub fn compose_normal<R: GlyphRasterizer + ?Sized>(
        &self,
        request: &WordRequest<'_>,
        raster: &mut R,
    ) -> EngineResult<WordComposition> {
        let mut sprites = Vec::with_capacity(request.word.len());
        let mut x = 0;
        for ch in request.word.chars() {
            let glyph = self.render(request, raster, ch)?;
            let sprite = GlyphSprite::new(
                tint(&glyph, request.color),
                Pos::new(x, 0),
                &self.kernel,
                self.alpha_threshold,
                self.glyph_meta(request, ch),
            );
            x += sprite.rect.width + self.letter_gap as i32;
            sprites.push(sprite);
        }

        let bounds = trim_to_ink(&mut sprites);
        Ok(WordComposition {
            sprites,
            bounds,
            ..WordComposition::empty(request)
        })
    }

    /// A single asset scaled to the requested height.
    pub fn compose_asset(&self, request: &WordRequest<'_>, asset: &Asset) -> WordComposition {
        let scaled = scale_to_height(&asset.image, request.size);
        let sprite = GlyphSprite::new(
            scaled,
            Pos::new(0, 0),
            &self.kernel,
            self.alpha_threshold,
            SpriteMeta {
                source: SpriteSource::Asset {
                    name: asset.name.clone(),
                    image: asset.image.clone(),
                },
                size: request.size,
                style: TextStyle::Asset,
                color: Rgb([255, 255, 255]),
                arc_angle: None,
                rotation: 0.0,
            },
        );
        let bounds = Rect::new(0, 0, sprite.rect.width, sprite.rect.height);
        let sprites = if sprite.has_ink() { vec![sprite] } else { Vec::new() };
        WordComposition {
            sprites,
            bounds,
            ..WordComposition::empty(request)
        }
    }

    /// Rotation of a letter whose centre sits at `angle` on the arc.
    pub fn arc_rotation(&self, angle: f32) -> f32 {
        if !self.rotate_letters {
            return 0.0;
        }
        clamp_rotation(-angle.to_degrees() - 90.0, self.max_rotation)
    }

    fn footprint(&self, glyph: &RgbaImage, angle: f32, radius: f32) -> Footprint {
        let rotated = rotate_rgba(glyph, self.arc_rotation(angle));
        let padded = BitMask::from_alpha(&rotated, self.alpha_threshold).dilate(&self.kernel);
        let rect = arc_rect(&rotated, angle, radius).inflate(self.kernel.radius() as i32);
        Footprint { rect, padded }
    }

    /// Letters along a circular arc.
    ///
    /// Each radius attempt draws a fresh start angle and reading direction.
    /// Letter `i` is checked against every accepted letter before it; on a
    /// hit, letters `i..` advance by `nudge_step`. A letter that still
    /// collides after `max_nudges` fails the radius, and the next attempt
    /// widens it by `radius_step`.
    pub fn compose_arc<R, G>(
        &self,
        request: &WordRequest<'_>,
        raster: &mut R,
        rng: &mut G,
    ) -> EngineResult<WordComposition>
    where
        R: GlyphRasterizer + ?Sized,
        G: Rng + ?Sized,
    {
        profile_function!();
        let chars: Vec<char> = request.word.chars().collect();
        if chars.is_empty() {
            return Ok(WordComposition::empty(request));
        }
        let glyphs = chars
            .iter()
            .map(|&ch| self.render(request, raster, ch))
            .collect::<EngineResult<Vec<_>>>()?;
        let line_height = raster
            .line_height(request.font, request.size)
            .map_err(|source| EngineError::RasterFailure {
                word: request.word.to_string(),
                source,
            })?;

        let base_radius = rng.random_range(self.arc.min_radius..=self.arc.max_radius) as f32;
        for attempt in 0..self.arc.radius_attempts {
            let radius = base_radius + (attempt * self.arc.radius_step) as f32;
            let start_angle = (rng.random_range(0..=360) as f32).to_radians();
            let reversed = rng.random_bool(0.5);

            let order: Vec<usize> = if reversed {
                (0..chars.len()).rev().collect()
            } else {
                (0..chars.len()).collect()
            };

            let spacing = line_height * self.arc.spacing_factor / radius;
            let mut angles = Vec::with_capacity(order.len());
            let mut current = start_angle;
            for &i in &order {
                let width = glyphs[i].width() as f32;
                angles.push(current + width / 2.0 / radius);
                current += width / radius + spacing;
            }

            if self.resolve_arc(&order, &glyphs, &mut angles, radius) {
                let mut sprites =
                    self.materialize_arc(request, &chars, &glyphs, &order, &angles, radius);
                let bounds = trim_to_ink(&mut sprites);
                return Ok(WordComposition {
                    sprites,
                    bounds,
                    arc: Some(ArcLayout {
                        radius,
                        radius_attempts: attempt + 1,
                        start_angle,
                        reversed,
                    }),
                    ..WordComposition::empty(request)
                });
            }
            tracing::trace!(
                "Arc '{}' collides internally at radius {:.0}",
                request.word,
                radius
            );
        }

        Err(EngineError::ArcUnresolved {
            word: request.word.to_string(),
            radius_attempts: self.arc.radius_attempts,
        })
    }

    /// Sequential nudging. Returns false when some letter cannot be cleared.
    fn resolve_arc(
        &self,
        order: &[usize],
        glyphs: &[Arc<RgbaImage>],
        angles: &mut [f32],
        radius: f32,
    ) -> bool {
        profile_scope!("resolve_arc");
        let mut accepted: Vec<Footprint> = Vec::with_capacity(order.len());
        accepted.push(self.footprint(&glyphs[order[0]], angles[0], radius));

        for k in 1..order.len() {
            let glyph = &glyphs[order[k]];
            let mut nudges = 0;
            let placed = loop {
                let candidate = self.footprint(glyph, angles[k], radius);
                if !accepted.iter().any(|fp| candidate.touches(fp)) {
                    break Some(candidate);
                }
                if nudges >= self.arc.max_nudges {
                    break None;
                }
                for angle in &mut angles[k..] {
                    *angle += self.arc.nudge_step;
                }
                nudges += 1;
            };
            match placed {
                Some(fp) => accepted.push(fp),
                None => return false,
            }
        }
        true
    }

    fn materialize_arc(
        &self,
        request: &WordRequest<'_>,
        chars: &[char],
        glyphs: &[Arc<RgbaImage>],
        order: &[usize],
        angles: &[f32],
        radius: f32,
    ) -> Vec<GlyphSprite> {
        order
            .iter()
            .zip(angles)
            .map(|(&i, &angle)| {
                let rotation = self.arc_rotation(angle);
                let image = rotate_rgba(&tint(&glyphs[i], request.color), rotation);
                let pos = arc_rect(&image, angle, radius).pos();
                let mut meta = self.glyph_meta(request, chars[i]);
                meta.arc_angle = Some(angle);
                meta.rotation = rotation;
                GlyphSprite::new(image, pos, &self.kernel, self.alpha_threshold, meta)
            })
            .collect()
    }

    /// Re-render a placed sprite's pixels at `scale` times its size.
    pub fn rerender<R: GlyphRasterizer + ?Sized>(
        &self,
        sprite: &GlyphSprite,
        scale: f32,
        raster: &mut R,
    ) -> EngineResult<RgbaImage> {
        let size = ((sprite.meta.size as f32 * scale) as u32).max(1);
        match &sprite.meta.source {
            SpriteSource::Glyph { font, ch } => {
                let glyph = raster
                    .render(font, size, *ch)
                    .map_err(|source| EngineError::RasterFailure {
                        word: ch.to_string(),
                        source,
                    })?;
                Ok(rotate_rgba(&tint(&glyph, sprite.meta.color), sprite.meta.rotation))
            }
            SpriteSource::Asset { image, .. } => Ok(scale_to_height(image, size)),
        }
    }
}

/// Rectangle of `image` centred on the arc point at `angle`.
fn arc_rect(image: &RgbaImage, angle: f32, radius: f32) -> Rect<i32> {
    let center = Pos::new(
        (radius * angle.cos()).round() as i32,
        (radius * angle.sin()).round() as i32,
    );
    Rect::new(0, 0, image.width() as i32, image.height() as i32).with_center(center)
}
