use std::path::PathBuf;

/// Errors that can occur while rasterizing glyphs.
#[derive(Debug, Clone)]
pub enum RasterError {
    /// Font loading failed.
    FontLoadError(String),

    /// Font file not found.
    FontFileNotFound(PathBuf),

    /// The font produced no glyph for the character.
    GlyphNotFound { font: String, ch: char },

    /// Pixel size outside the supported range.
    InvalidSize(u32),

    /// Lock was poisoned (RwLock/Mutex).
    LockPoisoned(String),

    /// Generic IO error.
    IoError(String),
}

impl std::fmt::Display for RasterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RasterError::FontLoadError(msg) => write!(f, "Failed to load font: {}", msg),
            RasterError::FontFileNotFound(path) => {
                write!(f, "Font file not found: {}", path.display())
            }
            RasterError::GlyphNotFound { font, ch } => {
                write!(f, "No glyph for {:?} in font '{}'", ch, font)
            }
            RasterError::InvalidSize(size) => write!(f, "Invalid glyph pixel size: {}", size),
            RasterError::LockPoisoned(msg) => {
                write!(
                    f,
                    "Lock was poisoned (likely due to panic in another thread): {}",
                    msg
                )
            }
            RasterError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for RasterError {}

impl From<std::io::Error> for RasterError {
    fn from(err: std::io::Error) -> Self {
        RasterError::IoError(err.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for RasterError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        RasterError::LockPoisoned(err.to_string())
    }
}

/// Result type for rasterizer operations.
pub type RasterResult<T> = Result<T, RasterError>;
