//! Placed visual units.
//!
//! A [`GlyphSprite`] is one letter or one image asset together with its exact
//! occupancy mask and the padded mask used for spacing checks. Its `rect` is
//! expressed relative to the owning word until the word is anchored, and in
//! view space afterwards.

use std::sync::Arc;

use glyphmask_core::{Pos, Rect};
use image::{Rgb, RgbaImage};

use crate::bitmap::{BitMask, DiskKernel};

/// How a word is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextStyle {
    Normal,
    Arc,
    Asset,
}

impl TextStyle {
    pub const ALL: [TextStyle; 3] = [TextStyle::Normal, TextStyle::Arc, TextStyle::Asset];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "normal" => Some(TextStyle::Normal),
            "arc" => Some(TextStyle::Arc),
            "asset" => Some(TextStyle::Asset),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TextStyle::Normal => "normal",
            TextStyle::Arc => "arc",
            TextStyle::Asset => "asset",
        }
    }
}

/// What a sprite was rendered from, kept so it can be re-rendered at another
/// resolution.
#[derive(Debug, Clone)]
pub enum SpriteSource {
    Glyph { font: String, ch: char },
    Asset { name: String, image: Arc<RgbaImage> },
}

impl SpriteSource {
    pub fn label(&self) -> String {
        match self {
            SpriteSource::Glyph { font, ch } => format!("{:?} ({})", ch, font),
            SpriteSource::Asset { name, .. } => name.clone(),
        }
    }
}

/// Rendering metadata shared by every constructor.
#[derive(Debug, Clone)]
pub struct SpriteMeta {
    pub source: SpriteSource,
    pub size: u32,
    pub style: TextStyle,
    pub color: Rgb<u8>,
    /// Angular position on the arc, in radians.
    pub arc_angle: Option<f32>,
    /// Counter-clockwise rotation applied to the image, in degrees.
    pub rotation: f32,
}

#[derive(Debug, Clone)]
pub struct GlyphSprite {
    pub image: RgbaImage,
    pub mask: BitMask,
    /// `mask` dilated by `pad`; its origin sits at `rect.pos() - (pad, pad)`.
    pub padded: BitMask,
    pub pad: u32,
    pub rect: Rect<i32>,
    pub meta: SpriteMeta,
}

impl GlyphSprite {
    /// Derive both masks from `image` and place it with its top-left at `pos`.
    pub fn new(
        image: RgbaImage,
        pos: Pos<i32>,
        kernel: &DiskKernel,
        alpha_threshold: u8,
        meta: SpriteMeta,
    ) -> Self {
        let mask = BitMask::from_alpha(&image, alpha_threshold);
        let padded = mask.dilate(kernel);
        let rect = Rect::new(pos.x, pos.y, image.width() as i32, image.height() as i32);
        Self {
            image,
            mask,
            padded,
            pad: kernel.radius(),
            rect,
            meta,
        }
    }

    /// Rectangle covered by the padded mask.
    pub fn padded_rect(&self) -> Rect<i32> {
        self.rect.inflate(self.pad as i32)
    }

    /// Rectangle of the set pixels in `rect`'s coordinate space.
    pub fn ink_rect(&self) -> Option<Rect<i32>> {
        self.mask
            .bounding_rect()
            .map(|r| r.translate(self.rect.x, self.rect.y))
    }

    pub fn has_ink(&self) -> bool {
        !self.mask.is_blank()
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.rect = self.rect.translate(dx, dy);
    }

    /// Broad phase on the padded rectangles, then padded-versus-padded
    /// narrow phase.
    pub fn touches(&self, other: &GlyphSprite) -> bool {
        let a = self.padded_rect();
        let b = other.padded_rect();
        if !a.intersects(&b) {
            return false;
        }
        self.padded.overlaps(&other.padded, (b.x - a.x, b.y - a.y))
    }
}
