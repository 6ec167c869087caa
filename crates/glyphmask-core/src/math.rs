//! Math re-exports.
//!
//! Region-space points, rotation matrices and arc positions use the
//! SIMD-accelerated [`glam`] types. Canvas pixels use the integer types in
//! [`crate::geometry`].
//!
//! ```
//! use glyphmask_core::math::{Mat2, Vec2};
//!
//! let tangent = Mat2::from_angle(std::f32::consts::FRAC_PI_2) * Vec2::X;
//! assert!((tangent.y - 1.0).abs() < 1e-6);
//! ```

pub use glam::*;
