//! Error types for the placement engine.

use std::fmt;
use std::path::PathBuf;

use glyphmask_text::RasterError;

use crate::sprite::TextStyle;

/// Errors that can occur while generating, building or saving a layout.
#[derive(Debug)]
pub enum EngineError {
    /// A glyph of the word could not be rendered.
    RasterFailure {
        word: String,
        source: RasterError,
    },

    /// Morphological growth could not be applied.
    GrowthFailure { reason: String },

    /// No valid position was found within the try budget.
    UnplaceableWord {
        word: String,
        style: TextStyle,
        tries: u32,
    },

    /// Arc layout kept colliding internally at every radius tried.
    ArcUnresolved { word: String, radius_attempts: u32 },

    /// The layout pass has no usable canvas.
    InvalidCanvas { width: u32, height: u32 },

    /// An image asset could not be used.
    Asset { path: PathBuf, message: String },

    /// Configuration could not be read or failed validation.
    Config { path: Option<PathBuf>, message: String },

    /// The region store could not be read or written.
    Store { message: String },

    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    Image {
        path: PathBuf,
        source: image::ImageError,
    },
}

impl EngineError {
    /// Failures that are absorbed at the word or mask boundary.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EngineError::RasterFailure { .. }
                | EngineError::GrowthFailure { .. }
                | EngineError::UnplaceableWord { .. }
                | EngineError::ArcUnresolved { .. }
        )
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::RasterFailure { word, source } => {
                write!(f, "Failed to rasterize '{}': {}", word, source)
            }
            EngineError::GrowthFailure { reason } => {
                write!(f, "Mask growth failed: {}", reason)
            }
            EngineError::UnplaceableWord { word, style, tries } => {
                write!(
                    f,
                    "Could not place '{}' ({}) after {} tries",
                    word,
                    style.as_str(),
                    tries
                )
            }
            EngineError::ArcUnresolved {
                word,
                radius_attempts,
            } => write!(
                f,
                "Arc collisions for '{}' unresolved after {} radius attempts",
                word, radius_attempts
            ),
            EngineError::InvalidCanvas { width, height } => {
                write!(f, "Invalid canvas geometry: {}x{}", width, height)
            }
            EngineError::Asset { path, message } => {
                write!(f, "Asset error for '{}': {}", path.display(), message)
            }
            EngineError::Config {
                path: Some(path),
                message,
            } => write!(f, "Invalid config '{}': {}", path.display(), message),
            EngineError::Config {
                path: None,
                message,
            } => write!(f, "Invalid config: {}", message),
            EngineError::Store { message } => write!(f, "Region store error: {}", message),
            EngineError::Io { path, source } => {
                write!(f, "IO error at '{}': {}", path.display(), source)
            }
            EngineError::Image { path, source } => {
                write!(f, "Image error at '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::RasterFailure { source, .. } => Some(source),
            EngineError::Io { source, .. } => Some(source),
            EngineError::Image { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Io {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<image::ImageError> for EngineError {
    fn from(err: image::ImageError) -> Self {
        EngineError::Image {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Store {
            message: err.to_string(),
        }
    }
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_recoverable_variants() {
        assert!(
            EngineError::GrowthFailure {
                reason: "x".into()
            }
            .is_recoverable()
        );
        assert!(
            EngineError::ArcUnresolved {
                word: "HELLO".into(),
                radius_attempts: 15
            }
            .is_recoverable()
        );
        assert!(
            !EngineError::InvalidCanvas {
                width: 0,
                height: 10
            }
            .is_recoverable()
        );
    }

    #[test]
    fn test_raster_failure_source() {
        let err = EngineError::RasterFailure {
            word: "AB".into(),
            source: RasterError::InvalidSize(0),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("AB"));
    }
}
