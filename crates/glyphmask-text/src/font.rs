use std::path::Path;

use cosmic_text::fontdb;

use crate::error::{RasterError, RasterResult};

/// Font identifier that selects the generic sans-serif family.
pub const DEFAULT_FONT: &str = "default";

/// A font database that manages available fonts.
pub struct FontDatabase {
    inner: fontdb::Database,
}

impl FontDatabase {
    /// Create a new font database with system fonts loaded.
    pub fn new() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        Self { inner: db }
    }

    /// Create an empty font database.
    pub fn empty() -> Self {
        Self {
            inner: fontdb::Database::new(),
        }
    }

    /// Load a font from a .ttf or .otf file.
    pub fn load_font_file(&mut self, path: impl AsRef<Path>) -> RasterResult<()> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(RasterError::FontFileNotFound(path.to_path_buf()));
        }
        self.inner
            .load_font_file(path)
            .map_err(|err| RasterError::FontLoadError(format!("{}: {}", path.display(), err)))
    }

    /// Load every font found under `path`. Returns how many faces were added.
    pub fn load_fonts_dir(&mut self, path: impl AsRef<Path>) -> usize {
        let before = self.inner.len();
        self.inner.load_fonts_dir(path.as_ref());
        let added = self.inner.len() - before;
        tracing::debug!("Loaded {} font faces from {}", added, path.as_ref().display());
        added
    }

    /// Returns true if the font family is available.
    pub fn has_family(&self, family: &str) -> bool {
        self.inner
            .faces()
            .any(|face| face.families.iter().any(|(f, _)| f == family))
    }

    /// List all available font families, sorted and de-duplicated.
    pub fn list_families(&self) -> Vec<String> {
        let mut families: Vec<String> = self
            .inner
            .faces()
            .flat_map(|face| face.families.iter().map(|(family, _)| family.clone()))
            .collect();
        families.sort();
        families.dedup();
        families
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build a cosmic-text font system over this database using the system
    /// locale.
    pub fn into_font_system(self) -> cosmic_text::FontSystem {
        cosmic_text::FontSystem::new_with_locale_and_db(
            sys_locale::get_locale().unwrap_or_else(|| String::from("en-US")),
            self.inner,
        )
    }
}

impl Default for FontDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a font identifier onto a cosmic-text family.
pub(crate) fn family_for(font: &str) -> cosmic_text::Family<'_> {
    if font.is_empty() || font.eq_ignore_ascii_case(DEFAULT_FONT) {
        cosmic_text::Family::SansSerif
    } else {
        cosmic_text::Family::Name(font)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_database() {
        let db = FontDatabase::empty();
        assert!(db.is_empty());
        assert!(db.list_families().is_empty());
        assert!(!db.has_family("Noto Sans"));
    }

    #[test]
    fn test_missing_font_file() {
        let mut db = FontDatabase::empty();
        let err = db.load_font_file("/definitely/not/here.ttf").unwrap_err();
        assert!(matches!(err, RasterError::FontFileNotFound(_)));
    }

    #[test]
    fn test_family_for_default() {
        assert!(matches!(family_for("default"), cosmic_text::Family::SansSerif));
        assert!(matches!(family_for(""), cosmic_text::Family::SansSerif));
        assert!(matches!(family_for("Roboto"), cosmic_text::Family::Name("Roboto")));
    }
}
