//! Integer canvas geometry and the placement kernel.
//!
//! Canvas-space values are whole pixels ([`Rect`], [`Size`], [`Pos`]).
//! Region-space points are normalized [`Vec2`] values where `(0, 0)` and
//! `(1, 1)` are opposite corners of the canvas (or of its centred square in
//! [`PlacementMode::Fit`]).

use std::ops::{Add, Sub};

use glam::{Mat2, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect<T> {
    pub x: T,
    pub y: T,
    pub width: T,
    pub height: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pos<T> {
    pub x: T,
    pub y: T,
}

impl<T> Size<T> {
    pub const fn new(width: T, height: T) -> Self {
        Size { width, height }
    }
}

impl Size<u32> {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl<T> Pos<T> {
    pub const fn new(x: T, y: T) -> Self {
        Pos { x, y }
    }
}

impl Add for Pos<i32> {
    type Output = Pos<i32>;

    fn add(self, rhs: Self) -> Self::Output {
        Pos::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Pos<i32> {
    type Output = Pos<i32>;

    fn sub(self, rhs: Self) -> Self::Output {
        Pos::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl<T> Rect<T> {
    pub const fn new(x: T, y: T, width: T, height: T) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

impl Rect<i32> {
    pub fn from_pos_size(pos: Pos<i32>, size: Size<u32>) -> Self {
        Rect::new(pos.x, pos.y, size.width as i32, size.height as i32)
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn pos(&self) -> Pos<i32> {
        Pos::new(self.x, self.y)
    }

    pub fn size(&self) -> Size<u32> {
        Size::new(self.width.max(0) as u32, self.height.max(0) as u32)
    }

    /// Centre pixel, rounding towards the top-left.
    pub fn center(&self) -> Pos<i32> {
        Pos::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Same size, moved so that [`Rect::center`] equals `center`.
    pub fn with_center(self, center: Pos<i32>) -> Self {
        Rect::new(
            center.x - self.width / 2,
            center.y - self.height / 2,
            self.width,
            self.height,
        )
    }

    pub fn translate(self, dx: i32, dy: i32) -> Self {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Grow every side by `amount` pixels.
    pub fn inflate(self, amount: i32) -> Self {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.width + 2 * amount,
            self.height + 2 * amount,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Strict overlap test. Rectangles that only share an edge do not
    /// intersect, and empty rectangles never intersect anything.
    pub fn intersects(&self, other: &Rect<i32>) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn union(&self, other: &Rect<i32>) -> Rect<i32> {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Top-left, top-right, bottom-left, bottom-right.
    pub fn corners(&self) -> [Pos<i32>; 4] {
        [
            Pos::new(self.left(), self.top()),
            Pos::new(self.right(), self.top()),
            Pos::new(self.left(), self.bottom()),
            Pos::new(self.right(), self.bottom()),
        ]
    }
}

/// How a region's normalized polygon maps onto canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlacementMode {
    /// x scales with canvas width, y with canvas height.
    #[default]
    Stretch,
    /// Both axes scale with the shorter canvas side, centred.
    Fit,
}

impl PlacementMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "stretch" => Some(PlacementMode::Stretch),
            "fit" => Some(PlacementMode::Fit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementMode::Stretch => "stretch",
            PlacementMode::Fit => "fit",
        }
    }
}

/// The centred square used by [`PlacementMode::Fit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitSquare {
    pub side: u32,
    pub offset: Pos<i32>,
}

/// Where the canvas sits in view space.
///
/// Sprite rectangles are expressed in view space; `offset` is the canvas's
/// top-left corner in that space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CanvasGeometry {
    pub size: Size<u32>,
    pub offset: Pos<i32>,
}

impl CanvasGeometry {
    pub const fn new(size: Size<u32>, offset: Pos<i32>) -> Self {
        Self { size, offset }
    }

    /// A canvas whose top-left is the view origin.
    pub const fn at_origin(width: u32, height: u32) -> Self {
        Self::new(Size::new(width, height), Pos::new(0, 0))
    }

    /// An image of `image` size centred inside a view area of `area` size.
    pub fn centered(image: Size<u32>, area: Size<u32>) -> Self {
        let dx = (area.width as i32 - image.width as i32).div_euclid(2);
        let dy = (area.height as i32 - image.height as i32).div_euclid(2);
        Self::new(image, Pos::new(dx, dy))
    }

    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    pub fn bounds(&self) -> Rect<i32> {
        Rect::from_pos_size(self.offset, self.size)
    }

    pub fn fit_square(&self) -> FitSquare {
        let side = self.size.width.min(self.size.height);
        FitSquare {
            side,
            offset: Pos::new(
                self.offset.x + ((self.size.width - side) / 2) as i32,
                self.offset.y + ((self.size.height - side) / 2) as i32,
            ),
        }
    }

    /// Origin and per-axis scale of region space for `mode`.
    fn region_frame(&self, mode: PlacementMode) -> (Pos<i32>, Vec2) {
        match mode {
            PlacementMode::Stretch => (
                self.offset,
                Vec2::new(self.size.width as f32, self.size.height as f32),
            ),
            PlacementMode::Fit => {
                let square = self.fit_square();
                (square.offset, Vec2::splat(square.side as f32))
            }
        }
    }
}

/// Even-odd ray casting test for a normalized point against a polygon.
///
/// Polygons with fewer than three vertices contain nothing. An edge counts as
/// crossed when `y` lies in the half-open interval `(min_y, max_y]`, which a
/// horizontal edge can never satisfy, so the crossing abscissa is only ever
/// computed for edges with distinct end heights. Points exactly on an edge
/// may land on either side.
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut p1 = polygon[0];
    for i in 1..=n {
        let p2 = polygon[i % n];
        if point.y > p1.y.min(p2.y) && point.y <= p1.y.max(p2.y) && point.x <= p1.x.max(p2.x) {
            if p1.x == p2.x {
                inside = !inside;
            } else {
                let x_cross = (point.y - p1.y) * (p2.x - p1.x) / (p2.y - p1.y) + p1.x;
                if point.x <= x_cross {
                    inside = !inside;
                }
            }
        }
        p1 = p2;
    }
    inside
}

/// True iff `rect`, taken relative to `canvas_offset`, lies within
/// `[padding, canvas_size - padding]` on both axes. Bounds are inclusive.
pub fn rect_within_canvas(
    rect: Rect<i32>,
    canvas_size: Size<u32>,
    padding: u32,
    canvas_offset: Pos<i32>,
) -> bool {
    let local = rect.translate(-canvas_offset.x, -canvas_offset.y);
    let padding = padding as i32;
    local.left() >= padding
        && local.right() <= canvas_size.width as i32 - padding
        && local.top() >= padding
        && local.bottom() <= canvas_size.height as i32 - padding
}

/// Map a view-space pixel into a region's normalized coordinates.
///
/// Returns `None` when the canvas extent used by `mode` is zero.
pub fn to_region_space(point: Pos<i32>, mode: PlacementMode, canvas: &CanvasGeometry) -> Option<Vec2> {
    let (origin, scale) = canvas.region_frame(mode);
    if scale.x <= 0.0 || scale.y <= 0.0 {
        return None;
    }
    Some(Vec2::new(
        (point.x - origin.x) as f32 / scale.x,
        (point.y - origin.y) as f32 / scale.y,
    ))
}

/// Map a normalized region point to a view-space pixel, truncating towards
/// zero.
pub fn from_region_space(point: Vec2, mode: PlacementMode, canvas: &CanvasGeometry) -> Pos<i32> {
    let (origin, scale) = canvas.region_frame(mode);
    Pos::new(
        (point.x * scale.x + origin.x as f32) as i32,
        (point.y * scale.y + origin.y as f32) as i32,
    )
}

/// Normalize an angle in degrees into `(-180, 180]`.
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = (degrees + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 { 180.0 } else { wrapped }
}

/// Normalize, then clamp to `[-max_abs, max_abs]`.
pub fn clamp_rotation(degrees: f32, max_abs: f32) -> f32 {
    let max_abs = max_abs.abs();
    normalize_degrees(degrees).clamp(-max_abs, max_abs)
}

/// Destination-to-source mapping for a rotation of `degrees`
/// counter-clockwise as seen on a y-down canvas.
pub fn inverse_rotation(degrees: f32) -> Mat2 {
    Mat2::from_angle(degrees.to_radians())
}

/// Rotate a y-down offset counter-clockwise (as seen on screen) by `degrees`.
pub fn rotate_point(point: Vec2, degrees: f32) -> Vec2 {
    Mat2::from_angle(-degrees.to_radians()) * point
}

/// Size of the axis-aligned box that holds a `size` box rotated by `degrees`.
pub fn rotated_extent(size: Size<u32>, degrees: f32) -> Size<u32> {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (w, h) = (size.width as f32, size.height as f32);
    // Trim float noise so 90 degree turns do not gain a pixel.
    let width = (w * cos.abs() + h * sin.abs() - 1e-3).ceil().max(0.0);
    let height = (w * sin.abs() + h * cos.abs() - 1e-3).ceil().max(0.0);
    Size::new(width as u32, height as u32)
}
