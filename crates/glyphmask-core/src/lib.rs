//! Glyphmask Core
//!
//! Shared building blocks for the glyphmask crates: the integer geometry
//! types and placement kernel, collection aliases, math re-exports, logging
//! setup and profiling hooks.

pub mod alloc;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;

pub use geometry::{CanvasGeometry, FitSquare, PlacementMode, Pos, Rect, Size};
