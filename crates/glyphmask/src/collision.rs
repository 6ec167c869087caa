//! Broad/narrow phase collision testing against the placed sprites.

use std::ops::Range;

use glyphmask_core::profiling::profile_function;

use crate::sprite::GlyphSprite;

/// Counters for the two collision phases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionStats {
    /// Candidate/placed pairs examined.
    pub broad_tests: u64,
    /// Pairs rejected by the rectangle test alone.
    pub broad_rejects: u64,
    /// Pairs that reached the mask test.
    pub narrow_tests: u64,
    pub narrow_hits: u64,
}

impl CollisionStats {
    /// Fraction of pairs eliminated by the broad phase.
    pub fn broad_reject_rate(&self) -> f32 {
        if self.broad_tests == 0 {
            return 0.0;
        }
        self.broad_rejects as f32 / self.broad_tests as f32
    }
}

/// Placed sprites of one layout pass.
#[derive(Debug, Default)]
pub struct CollisionIndex {
    sprites: Vec<GlyphSprite>,
    stats: CollisionStats,
}

impl CollisionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any candidate touches any placed sprite.
    pub fn would_collide(&mut self, candidates: &[GlyphSprite]) -> bool {
        profile_function!();
        for candidate in candidates {
            let padded = candidate.padded_rect();
            for placed in &self.sprites {
                self.stats.broad_tests += 1;
                if !padded.intersects(&placed.padded_rect()) {
                    self.stats.broad_rejects += 1;
                    continue;
                }
                self.stats.narrow_tests += 1;
                if candidate.touches(placed) {
                    self.stats.narrow_hits += 1;
                    return true;
                }
            }
        }
        false
    }

    /// Commit sprites. Callers test with [`CollisionIndex::would_collide`] first.
    pub fn insert(&mut self, sprites: impl IntoIterator<Item = GlyphSprite>) {
        self.sprites.extend(sprites);
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn stats(&self) -> CollisionStats {
        self.stats
    }

    pub fn into_sprites(self) -> Vec<GlyphSprite> {
        self.sprites
    }
}

/// Stateless form of [`CollisionIndex::would_collide`].
pub fn would_collide(candidates: &[GlyphSprite], placed: &[GlyphSprite]) -> bool {
    candidates
        .iter()
        .any(|candidate| placed.iter().any(|p| candidate.touches(p)))
}

/// First pair of sprites whose padded masks overlap.
pub fn find_overlap(sprites: &[GlyphSprite]) -> Option<(usize, usize)> {
    for (i, a) in sprites.iter().enumerate() {
        for (j, b) in sprites.iter().enumerate().skip(i + 1) {
            if a.touches(b) {
                return Some((i, j));
            }
        }
    }
    None
}

/// First pair of sprites from different groups whose padded masks overlap.
///
/// `groups` partitions `sprites` into words; letters of the same word are
/// spaced by the composer and never tested against each other.
pub fn find_overlap_between(sprites: &[GlyphSprite], groups: &[Range<usize>]) -> Option<(usize, usize)> {
    for (g, group) in groups.iter().enumerate() {
        for later in &groups[g + 1..] {
            for i in group.clone() {
                for j in later.clone() {
                    if sprites[i].touches(&sprites[j]) {
                        return Some((i, j));
                    }
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::DiskKernel;
    use crate::sprite::{SpriteMeta, SpriteSource, TextStyle};
    use glyphmask_core::Pos;
    use image::{Rgb, Rgba, RgbaImage};

    fn ring(x: i32, y: i32) -> GlyphSprite {
        // 20x20 with ink only on the border.
        let mut image = RgbaImage::new(20, 20);
        for i in 0..20 {
            for (px, py) in [(i, 0), (i, 19), (0, i), (19, i)] {
                image.put_pixel(px, py, Rgba([255, 255, 255, 255]));
            }
        }
        GlyphSprite::new(
            image,
            Pos::new(x, y),
            &DiskKernel::new(2),
            10,
            SpriteMeta {
                source: SpriteSource::Glyph {
                    font: "test".into(),
                    ch: 'O',
                },
                size: 20,
                style: TextStyle::Normal,
                color: Rgb([255, 255, 255]),
                arc_angle: None,
                rotation: 0.0,
            },
        )
    }

    #[test]
    fn test_far_apart_is_broad_reject() {
        let mut index = CollisionIndex::new();
        index.insert([ring(0, 0)]);
        assert!(!index.would_collide(&[ring(100, 100)]));
        let stats = index.stats();
        assert_eq!(stats.broad_tests, 1);
        assert_eq!(stats.broad_rejects, 1);
        assert_eq!(stats.narrow_tests, 0);
    }

    #[test]
    fn test_rect_overlap_without_ink_overlap() {
        // A small ring sitting inside a big ring's hollow: rectangles overlap
        // but the ink is far apart.
        let mut big = RgbaImage::new(60, 60);
        for i in 0..60 {
            for (px, py) in [(i, 0), (i, 59), (0, i), (59, i)] {
                big.put_pixel(px, py, Rgba([255, 255, 255, 255]));
            }
        }
        let mut index = CollisionIndex::new();
        let meta = ring(0, 0).meta;
        index.insert([GlyphSprite::new(big, Pos::new(0, 0), &DiskKernel::new(2), 10, meta)]);

        assert!(!index.would_collide(&[ring(20, 20)]));
        assert_eq!(index.stats().narrow_tests, 1);
        assert_eq!(index.stats().narrow_hits, 0);
    }

    #[test]
    fn test_padding_causes_collision() {
        let mut index = CollisionIndex::new();
        index.insert([ring(0, 0)]);
        // 3 px gap, padding 2 on each side: padded masks meet.
        assert!(index.would_collide(&[ring(23, 0)]));
        // 5 px gap clears both paddings.
        assert!(!index.would_collide(&[ring(25, 0)]));
        assert_eq!(index.stats().narrow_hits, 1);
    }

    #[test]
    fn test_free_function_and_overlap_scan() {
        let placed = vec![ring(0, 0), ring(40, 0)];
        assert!(would_collide(&[ring(10, 10)], &placed));
        assert!(!would_collide(&[ring(0, 40)], &placed));

        assert_eq!(find_overlap(&placed), None);
        let crowded = vec![ring(0, 0), ring(40, 0), ring(50, 5)];
        assert_eq!(find_overlap(&crowded), Some((1, 2)));
        assert_eq!(find_overlap_between(&crowded, &[0..1, 1..3]), None);
        assert_eq!(find_overlap_between(&crowded, &[0..2, 2..3]), Some((1, 2)));
    }

    #[test]
    fn test_reject_rate() {
        let stats = CollisionStats {
            broad_tests: 10,
            broad_rejects: 8,
            narrow_tests: 2,
            narrow_hits: 1,
        };
        assert!((stats.broad_reject_rate() - 0.8).abs() < f32::EPSILON);
        assert_eq!(CollisionStats::default().broad_reject_rate(), 0.0);
    }
}
