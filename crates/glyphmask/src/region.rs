//! Placement regions and their persistent templates.
//!
//! A [`Region`] is a polygon in normalized canvas coordinates plus the rules
//! that govern what may be placed inside it. Templates are named, ordered
//! lists of regions kept by a [`RegionStore`].
//!
//! Region files are hand-edited and written by older tools, so every field
//! is sanitized once when a template is loaded; the engine then trusts the
//! typed values.

use std::path::{Path, PathBuf};

use glyphmask_core::PlacementMode;
use glyphmask_core::geometry::point_in_polygon;
use glyphmask_core::math::Vec2;
use indexmap::IndexMap;
use rand::{Rng, RngCore};
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EngineError, EngineResult};
use crate::sprite::TextStyle;

/// Name of the template that can never be deleted.
pub const DEFAULT_TEMPLATE: &str = "Default";

const DEFAULT_SIZE_RANGE: RangeRule = RangeRule { min: 20, max: 50 };
const DEFAULT_WORD_COUNT_RANGE: RangeRule = RangeRule { min: 1, max: 3 };

/// Which text styles a region accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleRule {
    /// Any style; the style is drawn from the configured weights.
    #[default]
    Any,
    Only(TextStyle),
}

impl StyleRule {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "any" => Some(StyleRule::Any),
            other => TextStyle::parse(other).map(StyleRule::Only),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StyleRule::Any => "any",
            StyleRule::Only(style) => style.as_str(),
        }
    }

    pub fn allows(&self, style: TextStyle) -> bool {
        match self {
            StyleRule::Any => true,
            StyleRule::Only(only) => *only == style,
        }
    }
}

/// Inclusive integer range with `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRule {
    pub min: u32,
    pub max: u32,
}

impl RangeRule {
    /// Build a range, swapping the bounds when inverted.
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.random_range(self.min..=self.max)
    }

    fn to_array(self) -> [u32; 2] {
        [self.min, self.max]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionRules {
    pub size_range: RangeRule,
    pub word_count_range: RangeRule,
    pub text_type: StyleRule,
    pub placement_mode: PlacementMode,
    /// Require all four corners of a placed word inside the polygon.
    pub enforce_boundaries: bool,
}

impl Default for RegionRules {
    fn default() -> Self {
        Self {
            size_range: DEFAULT_SIZE_RANGE,
            word_count_range: DEFAULT_WORD_COUNT_RANGE,
            text_type: StyleRule::Any,
            placement_mode: PlacementMode::Stretch,
            enforce_boundaries: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    /// Closed polygon in region space.
    pub shape: Vec<Vec2>,
    pub rules: RegionRules,
}

impl Region {
    pub fn new(name: impl Into<String>, shape: Vec<Vec2>, rules: RegionRules) -> Self {
        Self {
            name: name.into(),
            shape,
            rules,
        }
    }

    /// Regions that cannot receive words: fewer than three vertices, or a
    /// size range that only admits zero.
    pub fn is_degenerate(&self) -> bool {
        self.shape.len() < 3 || self.rules.size_range.max == 0
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point_in_polygon(point, &self.shape)
    }

    /// Bounding box of the polygon in region space, as `(min, max)`.
    pub fn bbox(&self) -> Option<(Vec2, Vec2)> {
        let first = *self.shape.first()?;
        Some(
            self.shape
                .iter()
                .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p))),
        )
    }

    /// Whether a word of `style` and `size` satisfies this region's rules.
    pub fn allows(&self, style: TextStyle, size: u32) -> bool {
        self.rules.text_type.allows(style) && self.rules.size_range.contains(size)
    }

    /// Sanitize one region object from a template file.
    pub fn from_json(value: &Value, index: usize) -> Self {
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| format!("Region {}", index + 1));

        let shape = match value.get("shape") {
            Some(Value::Array(points)) => points.iter().filter_map(parse_point).collect(),
            _ => Vec::new(),
        };

        let empty = Value::Null;
        let rules = value.get("rules").unwrap_or(&empty);

        let placement_mode = first_str(rules.get("placement_mode"))
            .and_then(PlacementMode::parse)
            .unwrap_or_default();
        let text_type = first_str(rules.get("text_type"))
            .and_then(StyleRule::parse)
            .unwrap_or_default();
        let size_range = parse_range(rules.get("size_range")).unwrap_or(DEFAULT_SIZE_RANGE);
        let word_count_range =
            parse_range(rules.get("word_count_range")).unwrap_or(DEFAULT_WORD_COUNT_RANGE);
        let enforce_boundaries = rules
            .get("enforce_boundaries")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        Self {
            name,
            shape,
            rules: RegionRules {
                size_range,
                word_count_range,
                text_type,
                placement_mode,
                enforce_boundaries,
            },
        }
    }
}

/// A string, or the first element of a non-empty list.
fn first_str(value: Option<&Value>) -> Option<&str> {
    match value? {
        Value::String(s) => Some(s.as_str()),
        Value::Array(items) => items.first()?.as_str(),
        _ => None,
    }
}

fn parse_range(value: Option<&Value>) -> Option<RangeRule> {
    let Some(Value::Array(items)) = value else {
        return None;
    };
    let [a, b] = items.as_slice() else {
        return None;
    };
    let a = a.as_f64()?;
    let b = b.as_f64()?;
    Some(RangeRule::new(a.max(0.0) as u32, b.max(0.0) as u32))
}

fn parse_point(value: &Value) -> Option<Vec2> {
    let Value::Array(items) = value else {
        return None;
    };
    let [x, y] = items.as_slice() else {
        return None;
    };
    Some(Vec2::new(x.as_f64()? as f32, y.as_f64()? as f32))
}

/// On-disk form of a region.
#[derive(Debug, Serialize, Deserialize)]
struct RegionRecord {
    name: String,
    shape: Vec<[f32; 2]>,
    rules: RulesRecord,
}

#[derive(Debug, Serialize, Deserialize)]
struct RulesRecord {
    size_range: [u32; 2],
    text_type: String,
    word_count_range: [u32; 2],
    placement_mode: String,
    enforce_boundaries: bool,
}

impl From<&Region> for RegionRecord {
    fn from(region: &Region) -> Self {
        Self {
            name: region.name.clone(),
            shape: region.shape.iter().map(|p| [p.x, p.y]).collect(),
            rules: RulesRecord {
                size_range: region.rules.size_range.to_array(),
                text_type: region.rules.text_type.as_str().to_string(),
                word_count_range: region.rules.word_count_range.to_array(),
                placement_mode: region.rules.placement_mode.as_str().to_string(),
                enforce_boundaries: region.rules.enforce_boundaries,
            },
        }
    }
}

/// Persistent collection of region templates.
pub trait RegionStore {
    /// Regions of `name`, or an empty list when no such template exists.
    fn load_template(&self, name: &str) -> Vec<Region>;

    /// Insert or replace a template and persist the collection.
    fn save_template(&mut self, name: &str, regions: Vec<Region>) -> EngineResult<()>;

    /// Template names in insertion order.
    fn list_template_names(&self) -> Vec<String>;

    /// Remove a template. Returns false when it does not exist or is
    /// protected.
    fn delete_template(&mut self, name: &str) -> EngineResult<bool>;

    /// A uniformly random template name.
    fn choose_template(&self, rng: &mut dyn RngCore) -> Option<String> {
        self.list_template_names().choose(rng).cloned()
    }
}

/// Templates stored as a JSON object of `name -> [region]`.
#[derive(Debug, Clone)]
pub struct JsonRegionStore {
    path: PathBuf,
    templates: IndexMap<String, Vec<Region>>,
}

impl JsonRegionStore {
    /// Open `path`. A missing or unreadable file is replaced by the built-in
    /// templates.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let templates = match read_templates(&path) {
            Ok(templates) => {
                tracing::info!(
                    "Loaded {} region templates from {}",
                    templates.len(),
                    path.display()
                );
                templates
            }
            Err(err) => {
                tracing::warn!("{}; reverting to default region templates", err);
                let defaults = default_templates();
                if let Err(err) = write_templates(&path, &defaults) {
                    tracing::error!("Could not write default region templates: {}", err);
                }
                defaults
            }
        };
        Self { path, templates }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    fn persist(&self) -> EngineResult<()> {
        write_templates(&self.path, &self.templates)?;
        tracing::debug!(
            "Saved {} region templates to {}",
            self.templates.len(),
            self.path.display()
        );
        Ok(())
    }
}

impl RegionStore for JsonRegionStore {
    fn load_template(&self, name: &str) -> Vec<Region> {
        match self.templates.get(name) {
            Some(regions) => regions.clone(),
            None => {
                tracing::debug!("Region template '{}' not found", name);
                Vec::new()
            }
        }
    }

    fn save_template(&mut self, name: &str, regions: Vec<Region>) -> EngineResult<()> {
        self.templates.insert(name.to_string(), regions);
        self.persist()
    }

    fn list_template_names(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }

    fn delete_template(&mut self, name: &str) -> EngineResult<bool> {
        if name == DEFAULT_TEMPLATE {
            tracing::warn!("Cannot delete the '{}' template", DEFAULT_TEMPLATE);
            return Ok(false);
        }
        if self.templates.shift_remove(name).is_none() {
            tracing::warn!("Region template '{}' not found for deletion", name);
            return Ok(false);
        }
        self.persist()?;
        tracing::info!("Deleted region template '{}'", name);
        Ok(true)
    }
}

fn read_templates(path: &Path) -> EngineResult<IndexMap<String, Vec<Region>>> {
    let text = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: IndexMap<String, Value> = serde_json::from_str(&text)?;
    let mut templates = IndexMap::with_capacity(raw.len());
    for (name, regions) in raw {
        let Value::Array(regions) = regions else {
            return Err(EngineError::Store {
                message: format!("template '{}' is not a list of regions", name),
            });
        };
        let regions = regions
            .iter()
            .enumerate()
            .map(|(i, value)| Region::from_json(value, i))
            .collect();
        templates.insert(name, regions);
    }
    Ok(templates)
}

fn write_templates(path: &Path, templates: &IndexMap<String, Vec<Region>>) -> EngineResult<()> {
    let records: IndexMap<&str, Vec<RegionRecord>> = templates
        .iter()
        .map(|(name, regions)| (name.as_str(), regions.iter().map(RegionRecord::from).collect()))
        .collect();
    let text = serde_json::to_string_pretty(&records)?;
    std::fs::write(path, text).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn region(
    name: &str,
    shape: &[[f32; 2]],
    size: [u32; 2],
    text_type: StyleRule,
    words: [u32; 2],
    mode: PlacementMode,
) -> Region {
    Region::new(
        name,
        shape.iter().map(|&[x, y]| Vec2::new(x, y)).collect(),
        RegionRules {
            size_range: RangeRule::new(size[0], size[1]),
            word_count_range: RangeRule::new(words[0], words[1]),
            text_type,
            placement_mode: mode,
            enforce_boundaries: false,
        },
    )
}

/// Built-in templates written when no template file exists.
pub fn default_templates() -> IndexMap<String, Vec<Region>> {
    use PlacementMode::{Fit, Stretch};
    let normal = StyleRule::Only(TextStyle::Normal);

    let mut templates = IndexMap::new();
    templates.insert(
        DEFAULT_TEMPLATE.to_string(),
        vec![
            region(
                "Bottom Bar",
                &[[0.05, 0.8], [0.95, 0.8], [0.95, 0.95], [0.05, 0.95]],
                [10, 20],
                normal,
                [2, 5],
                Stretch,
            ),
            region(
                "Top-Left Triangle",
                &[[0.0, 0.0], [0.4, 0.0], [0.0, 0.4]],
                [5, 10],
                StyleRule::Any,
                [2, 5],
                Stretch,
            ),
            region(
                "Center hexagon polygon",
                &[
                    [0.5, 0.3],
                    [0.7, 0.4],
                    [0.7, 0.6],
                    [0.5, 0.7],
                    [0.3, 0.6],
                    [0.3, 0.4],
                ],
                [35, 45],
                normal,
                [1, 1],
                Fit,
            ),
        ],
    );
    templates.insert("Empty".to_string(), Vec::new());
    templates.insert(
        "Header and Footer".to_string(),
        vec![
            region(
                "Header",
                &[[0.05, 0.05], [0.95, 0.05], [0.95, 0.2], [0.05, 0.2]],
                [40, 80],
                normal,
                [1, 2],
                Stretch,
            ),
            region(
                "Footer",
                &[[0.05, 0.85], [0.95, 0.85], [0.95, 0.95], [0.05, 0.95]],
                [15, 25],
                normal,
                [2, 5],
                Stretch,
            ),
        ],
    );
    templates
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_loose_rules() {
        let value = json!({
            "name": "Loose",
            "shape": [[0, 0], [1, 0], "bad", [1, 1, 3], [0, 1]],
            "rules": {
                "placement_mode": ["fit"],
                "text_type": ["arc", "normal"],
                "size_range": [60, 30],
                "word_count_range": "three",
                "enforce_boundaries": true
            }
        });
        let region = Region::from_json(&value, 0);
        assert_eq!(region.shape.len(), 3);
        assert_eq!(region.rules.placement_mode, PlacementMode::Fit);
        assert_eq!(region.rules.text_type, StyleRule::Only(TextStyle::Arc));
        assert_eq!(region.rules.size_range, RangeRule::new(30, 60));
        assert_eq!(region.rules.word_count_range, DEFAULT_WORD_COUNT_RANGE);
        assert!(region.rules.enforce_boundaries);
    }

    #[test]
    fn test_unknown_values_fall_back() {
        let value = json!({
            "shape": [[0, 0], [1, 0], [0, 1]],
            "rules": { "placement_mode": "zoom", "text_type": 7 }
        });
        let region = Region::from_json(&value, 4);
        assert_eq!(region.name, "Region 5");
        assert_eq!(region.rules, RegionRules::default());
    }

    #[test]
    fn test_degenerate_region() {
        let line = Region::new(
            "line",
            vec![Vec2::ZERO, Vec2::ONE],
            RegionRules::default(),
        );
        assert!(line.is_degenerate());
        assert!(!line.contains(Vec2::splat(0.5)));
    }

    #[test]
    fn test_allows() {
        let region = region(
            "r",
            &[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            [10, 20],
            StyleRule::Only(TextStyle::Normal),
            [1, 1],
            PlacementMode::Stretch,
        );
        assert!(region.allows(TextStyle::Normal, 10));
        assert!(region.allows(TextStyle::Normal, 20));
        assert!(!region.allows(TextStyle::Normal, 21));
        assert!(!region.allows(TextStyle::Arc, 15));
    }

    #[test]
    fn test_bbox() {
        let templates = default_templates();
        let hexagon = &templates[DEFAULT_TEMPLATE][2];
        let (lo, hi) = hexagon.bbox().unwrap();
        assert_eq!(lo, Vec2::new(0.3, 0.3));
        assert_eq!(hi, Vec2::new(0.7, 0.7));
    }

    #[test]
    fn test_default_templates() {
        let templates = default_templates();
        let names: Vec<&String> = templates.keys().collect();
        assert_eq!(names, ["Default", "Empty", "Header and Footer"]);
        assert_eq!(templates[DEFAULT_TEMPLATE].len(), 3);
        assert!(templates["Empty"].is_empty());
    }
}
