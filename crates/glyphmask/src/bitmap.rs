//! 1-bit occupancy masks.
//!
//! Rows are packed into `u64` words, least significant bit first. Collision
//! tests compare 64 columns per step, which keeps the narrow phase cheap
//! enough to run on every broad-phase hit.

use glyphmask_core::Rect;
use glyphmask_core::profiling::profile_function;
use image::{GrayImage, Luma, RgbaImage};

use crate::error::{EngineError, EngineResult};

/// Precomputed disk structuring element.
///
/// `half_widths[dy + radius]` is the horizontal reach of the disk at vertical
/// offset `dy`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskKernel {
    radius: u32,
    half_widths: Vec<u32>,
}

impl DiskKernel {
    pub fn new(radius: u32) -> Self {
        let r = radius as i64;
        let half_widths = (-r..=r)
            .map(|dy| {
                let reach = r * r - dy * dy;
                (reach as f64).sqrt().floor() as u32
            })
            .collect();
        Self {
            radius,
            half_widths,
        }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn half_widths(&self) -> &[u32] {
        &self.half_widths
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct BitMask {
    width: u32,
    height: u32,
    stride: usize,
    words: Vec<u64>,
}

impl std::fmt::Debug for BitMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitMask")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("set", &self.count_ones())
            .finish()
    }
}

/// Read `n` bits (at most 64) starting at bit `start` of a packed row.
fn extract(row: &[u64], start: usize, n: usize) -> u64 {
    let word = start / 64;
    let bit = start % 64;
    let mut value = row[word] >> bit;
    if bit != 0 && word + 1 < row.len() {
        value |= row[word + 1] << (64 - bit);
    }
    if n < 64 {
        value &= (1u64 << n) - 1;
    }
    value
}

/// Set bits `[start, end)` of a packed row.
fn fill_span(row: &mut [u64], start: usize, end: usize) {
    let mut x = start;
    while x < end {
        let word = x / 64;
        let bit = x % 64;
        let n = (64 - bit).min(end - x);
        let mask = if n == 64 { u64::MAX } else { ((1u64 << n) - 1) << bit };
        row[word] |= mask;
        x += n;
    }
}

impl BitMask {
    pub fn new(width: u32, height: u32) -> Self {
        let stride = (width as usize).div_ceil(64);
        Self {
            width,
            height,
            stride,
            words: vec![0; stride * height as usize],
        }
    }

    /// Pixels whose alpha exceeds `threshold` are set.
    pub fn from_alpha(image: &RgbaImage, threshold: u8) -> Self {
        let mut mask = Self::new(image.width(), image.height());
        for (x, y, pixel) in image.enumerate_pixels() {
            if pixel[3] > threshold {
                mask.set(x, y);
            }
        }
        mask
    }

    /// Pixels whose luma exceeds `threshold` are set.
    pub fn from_luma(image: &GrayImage, threshold: u8) -> Self {
        let mut mask = Self::new(image.width(), image.height());
        for (x, y, pixel) in image.enumerate_pixels() {
            if pixel[0] > threshold {
                mask.set(x, y);
            }
        }
        mask
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn row(&self, y: u32) -> &[u64] {
        let start = y as usize * self.stride;
        &self.words[start..start + self.stride]
    }

    fn row_mut(&mut self, y: u32) -> &mut [u64] {
        let start = y as usize * self.stride;
        &mut self.words[start..start + self.stride]
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let x = x as usize;
        (self.row(y)[x / 64] >> (x % 64)) & 1 == 1
    }

    pub fn set(&mut self, x: u32, y: u32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let x = x as usize;
        self.row_mut(y)[x / 64] |= 1 << (x % 64);
    }

    pub fn count_ones(&self) -> u64 {
        self.words.iter().map(|w| w.count_ones() as u64).sum()
    }

    pub fn is_blank(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// Tightest rectangle around the set pixels, in local coordinates.
    pub fn bounding_rect(&self) -> Option<Rect<i32>> {
        let mut min_x = u32::MAX;
        let mut min_y = u32::MAX;
        let mut max_x = 0;
        let mut max_y = 0;
        for y in 0..self.height {
            let row = self.row(y);
            for (i, word) in row.iter().enumerate() {
                if *word == 0 {
                    continue;
                }
                let first = i as u32 * 64 + word.trailing_zeros();
                let last = i as u32 * 64 + 63 - word.leading_zeros();
                min_x = min_x.min(first);
                max_x = max_x.max(last);
                min_y = min_y.min(y);
                max_y = max_y.max(y);
            }
        }
        (min_x != u32::MAX).then(|| {
            Rect::new(
                min_x as i32,
                min_y as i32,
                (max_x - min_x + 1) as i32,
                (max_y - min_y + 1) as i32,
            )
        })
    }

    /// Runs of set pixels `[start, end)` in row `y`.
    fn runs(&self, y: u32) -> Vec<(u32, u32)> {
        let mut runs = Vec::new();
        let mut start = None;
        for x in 0..self.width {
            match (self.get(x, y), start) {
                (true, None) => start = Some(x),
                (false, Some(s)) => {
                    runs.push((s, x));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push((s, self.width));
        }
        runs
    }

    /// True iff a set pixel of `self` coincides with a set pixel of `other`
    /// when `other`'s origin sits at `offset` in `self`'s coordinates.
    pub fn overlaps(&self, other: &BitMask, offset: (i32, i32)) -> bool {
        let (dx, dy) = offset;
        let x0 = dx.max(0);
        let x1 = (dx + other.width as i32).min(self.width as i32);
        let y0 = dy.max(0);
        let y1 = (dy + other.height as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return false;
        }

        for y in y0..y1 {
            let a = self.row(y as u32);
            let b = other.row((y - dy) as u32);
            let mut x = x0;
            while x < x1 {
                let n = (x1 - x).min(64) as usize;
                let bits_a = extract(a, x as usize, n);
                let bits_b = extract(b, (x - dx) as usize, n);
                if bits_a & bits_b != 0 {
                    return true;
                }
                x += n as i32;
            }
        }
        false
    }

    /// Dilation by `kernel`. The result is `2r` larger on each axis and its
    /// origin sits at `(-r, -r)` in this mask's coordinates.
    pub fn dilate(&self, kernel: &DiskKernel) -> BitMask {
        profile_function!();
        let r = kernel.radius();
        let mut out = BitMask::new(self.width + 2 * r, self.height + 2 * r);
        for y in 0..self.height {
            for (start, end) in self.runs(y) {
                for (i, reach) in kernel.half_widths().iter().enumerate() {
                    let out_y = y + i as u32;
                    let from = (start + r - reach) as usize;
                    let to = (end + r + reach) as usize;
                    fill_span(out.row_mut(out_y), from, to);
                }
            }
        }
        out
    }

    pub fn dilate_disk(&self, radius: u32) -> BitMask {
        self.dilate(&DiskKernel::new(radius))
    }

    /// Square max-filter of side `2n + 1`, clipped to the mask's own size.
    ///
    /// Any `n` is accepted; past the mask's longer side the result no longer
    /// changes, so the radius is clamped there.
    pub fn grow_square(&self, n: u32) -> EngineResult<BitMask> {
        profile_function!();
        if n == 0 {
            return Ok(self.clone());
        }
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::GrowthFailure {
                reason: format!("cannot grow an empty {}x{} mask", self.width, self.height),
            });
        }
        let n = n.min(self.width.max(self.height));

        let mut horizontal = BitMask::new(self.width, self.height);
        for y in 0..self.height {
            for (start, end) in self.runs(y) {
                let from = start.saturating_sub(n) as usize;
                let to = (end + n).min(self.width) as usize;
                fill_span(horizontal.row_mut(y), from, to);
            }
        }

        let mut out = BitMask::new(self.width, self.height);
        for y in 0..self.height {
            let lo = y.saturating_sub(n);
            let hi = (y + n).min(self.height - 1);
            let start = y as usize * out.stride;
            for src_y in lo..=hi {
                let src = src_y as usize * horizontal.stride;
                for i in 0..out.stride {
                    out.words[start + i] |= horizontal.words[src + i];
                }
            }
        }
        Ok(out)
    }

    /// OR `other` into this mask with its origin at `(x, y)`. Pixels falling
    /// outside are clipped.
    pub fn blit(&mut self, other: &BitMask, x: i32, y: i32) {
        for oy in 0..other.height {
            let ty = y + oy as i32;
            if ty < 0 || ty >= self.height as i32 {
                continue;
            }
            for (start, end) in other.runs(oy) {
                let from = (x + start as i32).max(0);
                let to = (x + end as i32).min(self.width as i32);
                if from < to {
                    fill_span(self.row_mut(ty as u32), from as usize, to as usize);
                }
            }
        }
    }

    /// Black background with set pixels in white.
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            if self.get(x, y) { Luma([255]) } else { Luma([0]) }
        })
    }
}
