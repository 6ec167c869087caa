//! Image assets placed as single-sprite "words".

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone)]
pub struct Asset {
    pub name: String,
    pub image: Arc<RgbaImage>,
}

impl Asset {
    pub fn new(name: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            name: name.into(),
            image: Arc::new(image),
        }
    }

    pub fn load(path: &Path) -> EngineResult<Self> {
        let image = image::open(path)
            .map_err(|source| EngineError::Image {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        if image.width() == 0 || image.height() == 0 {
            return Err(EngineError::Asset {
                path: path.to_path_buf(),
                message: "image has no pixels".into(),
            });
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, image))
    }
}

#[derive(Debug, Clone, Default)]
pub struct AssetLibrary {
    assets: Vec<Asset>,
}

impl AssetLibrary {
    pub fn new(assets: Vec<Asset>) -> Self {
        Self { assets }
    }

    /// Load every `.png` in `dir`, sorted by file name. Unreadable files are
    /// skipped; a missing directory yields an empty library.
    pub fn load_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!("Asset directory {} unavailable: {}", dir.display(), err);
                return Self::default();
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("png"))
            })
            .collect();
        paths.sort();

        let mut assets = Vec::with_capacity(paths.len());
        for path in paths {
            match Asset::load(&path) {
                Ok(asset) => assets.push(asset),
                Err(err) => tracing::warn!("Skipping asset: {}", err),
            }
        }
        tracing::info!("Loaded {} assets from {}", assets.len(), dir.display());
        Self { assets }
    }

    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Asset> {
        self.assets.choose(rng)
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphmask_test_utils::write_asset;

    #[test]
    fn test_load_dir_sorted_png_only() {
        let dir = tempfile::tempdir().unwrap();
        write_asset(dir.path(), "b.png", 4, 8);
        write_asset(dir.path(), "a.png", 6, 3);
        std::fs::write(dir.path().join("c.txt"), "nope").unwrap();
        std::fs::write(dir.path().join("d.png"), "corrupt").unwrap();

        let library = AssetLibrary::load_dir(dir.path());
        let names: Vec<&str> = library.assets().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["a.png", "b.png"]);
        assert_eq!(library.assets()[0].image.dimensions(), (6, 3));
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let library = AssetLibrary::load_dir("/no/such/assets");
        assert!(library.is_empty());
        let mut rng = rand::rng();
        assert!(library.choose(&mut rng).is_none());
    }
}
