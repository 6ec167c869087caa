//! Engine configuration.
//!
//! Loaded from a YAML document. Every section and field has a default, so a
//! partial file (or none at all) yields a working configuration. Validation
//! runs once in [`EngineConfig::load`]; the engine reads the result without
//! further checks.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::sprite::TextStyle;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub canvas: CanvasConfig,
    pub fonts: FontConfig,
    pub text: TextConfig,
    pub mask: MaskConfig,
    pub layout: LayoutConfig,
    pub debug: DebugConfig,
    pub logging: LoggingConfig,
    pub paths: PathsConfig,
    pub supported_extensions: SupportedExtensions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Margin kept free along every canvas edge, in pixels.
    pub padding: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self { padding: 10 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub min_size: u32,
    pub max_size: u32,
    pub rotate_letters_on_arc: bool,
    /// Largest absolute letter rotation on an arc, in degrees.
    pub max_arc_letter_rotation: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            min_size: 20,
            max_size: 80,
            rotate_letters_on_arc: true,
            max_arc_letter_rotation: 45.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub types: Vec<TextStyle>,
    pub type_weights: Vec<f64>,
    pub fallback_words: Vec<String>,
    pub normal: NormalTextConfig,
    pub arc: ArcConfig,
    pub color: ColorConfig,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            types: vec![TextStyle::Normal, TextStyle::Arc],
            type_weights: vec![0.7, 0.3],
            fallback_words: ["SAMPLE", "TEXT", "MASK", "GLYPH", "LAYOUT"]
                .into_iter()
                .map(String::from)
                .collect(),
            normal: NormalTextConfig::default(),
            arc: ArcConfig::default(),
            color: ColorConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalTextConfig {
    /// Horizontal gap between consecutive letters, in pixels.
    #[serde(alias = "padding")]
    pub letter_gap: u32,
}

impl Default for NormalTextConfig {
    fn default() -> Self {
        Self { letter_gap: 5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcConfig {
    pub min_radius: u32,
    pub max_radius: u32,
    /// Inter-letter spacing as a fraction of the line height.
    pub spacing_factor: f32,
    /// Angular nudge applied on an internal collision, in radians.
    pub nudge_step: f32,
    pub max_nudges: u32,
    pub radius_attempts: u32,
    pub radius_step: u32,
}

impl Default for ArcConfig {
    fn default() -> Self {
        Self {
            min_radius: 80,
            max_radius: 200,
            spacing_factor: 0.3,
            nudge_step: 0.01,
            max_nudges: 150,
            radius_attempts: 15,
            radius_step: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub random: bool,
    pub min_value: u8,
    pub max_value: u8,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            random: true,
            min_value: 50,
            max_value: 255,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    /// Growth applied to the emitted mask, in preview-canvas pixels.
    pub grow_pixels: u32,
    /// Radius of the collision structuring element.
    pub padding_size: u32,
    pub alpha_threshold: u8,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            grow_pixels: 3,
            padding_size: 5,
            alpha_threshold: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub max_attempts_per_word: u32,
    pub max_attempts_total: u32,
    /// Position tries per word in region-constrained mode.
    pub max_placement_tries: u32,
    pub freeform_word_range: [u32; 2],
    pub seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_attempts_per_word: 1000,
            max_attempts_total: 3000,
            max_placement_tries: 800,
            freeform_word_range: [5, 15],
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    pub force_regions_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("INFO"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub image_dir: PathBuf,
    pub font_dir: PathBuf,
    pub asset_dir: PathBuf,
    pub output_dir: PathBuf,
    pub words_file: PathBuf,
    pub templates_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("images"),
            font_dir: PathBuf::from("fonts"),
            asset_dir: PathBuf::from("assets"),
            output_dir: PathBuf::from("output"),
            words_file: PathBuf::from("words.json"),
            templates_file: PathBuf::from("region_templates.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportedExtensions {
    pub images: Vec<String>,
}

impl Default for SupportedExtensions {
    fn default() -> Self {
        Self {
            images: vec![".png".into(), ".jpg".into(), ".jpeg".into()],
        }
    }
}

impl SupportedExtensions {
    /// Case-insensitive extension match on `path`.
    pub fn is_image(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let ext = ext.to_ascii_lowercase();
        self.images
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(&ext))
    }
}

impl EngineConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml(text: &str) -> Result<Self, String> {
        let mut config: EngineConfig = serde_yaml::from_str(text).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&text).map_err(|message| EngineError::Config {
            path: Some(path.to_path_buf()),
            message,
        })?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Like [`EngineConfig::load`], falling back to defaults on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("{}; using default configuration", err);
                Self::default()
            }
        }
    }

    /// Swap inverted ranges and reject unusable style weights.
    pub fn validate(&mut self) -> Result<(), String> {
        sort_pair(&mut self.fonts.min_size, &mut self.fonts.max_size);
        sort_pair(&mut self.text.arc.min_radius, &mut self.text.arc.max_radius);
        sort_pair(&mut self.text.color.min_value, &mut self.text.color.max_value);
        let [lo, hi] = &mut self.layout.freeform_word_range;
        sort_pair(lo, hi);

        if !self.fonts.max_arc_letter_rotation.is_finite() {
            return Err("fonts.max_arc_letter_rotation must be finite".into());
        }
        self.fonts.max_arc_letter_rotation = self.fonts.max_arc_letter_rotation.abs();

        if self.fonts.min_size == 0 {
            return Err("fonts.min_size must be at least 1".into());
        }
        if self.text.arc.min_radius == 0 {
            return Err("text.arc.min_radius must be at least 1".into());
        }
        if self.text.types.is_empty() {
            return Err("text.types must not be empty".into());
        }
        if self.text.types.len() != self.text.type_weights.len() {
            return Err(format!(
                "text.types has {} entries but text.type_weights has {}",
                self.text.types.len(),
                self.text.type_weights.len()
            ));
        }
        if self.text.type_weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err("text.type_weights must be finite and non-negative".into());
        }
        if self.text.type_weights.iter().sum::<f64>() <= 0.0 {
            return Err("text.type_weights must have a positive sum".into());
        }
        self.text.fallback_words = self
            .text
            .fallback_words
            .iter()
            .map(|w| w.trim().to_uppercase())
            .filter(|w| !w.is_empty())
            .collect();
        Ok(())
    }

    /// The `tracing` level matching `logging.level`.
    pub fn log_level(&self) -> &'static str {
        match self.logging.level.to_ascii_uppercase().as_str() {
            "TRACE" => "trace",
            "DEBUG" => "debug",
            "WARN" | "WARNING" => "warn",
            "ERROR" | "CRITICAL" => "error",
            _ => "info",
        }
    }
}

fn sort_pair<T: PartialOrd>(lo: &mut T, hi: &mut T) {
    if *lo > *hi {
        std::mem::swap(lo, hi);
    }
}
