//! Hash collections used across glyphmask.
//!
//! Glyph caches and per-pass bookkeeping are keyed by small values
//! (font name, pixel size, character), which AHash handles much faster
//! than SipHash.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};
