//! Word dictionaries.

use std::path::Path;

use glyphmask_core::alloc::HashSet;
use rand::RngCore;
use rand::seq::IndexedRandom;
use serde_json::Value;

use crate::error::{EngineError, EngineResult};

/// Source of words to place.
pub trait WordSource {
    /// A uniformly random word, or `None` when the source is empty.
    fn sample_word(&self, rng: &mut dyn RngCore) -> Option<String>;
}

/// Upper-cased dictionary with duplicates removed, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::default();
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_uppercase())
            .filter(|w| !w.is_empty() && seen.insert(w.clone()))
            .collect();
        Self { words }
    }

    /// Parse a JSON object of `category -> [words]` or
    /// `category -> { sub_category -> [words] }`.
    pub fn from_json(text: &str) -> EngineResult<Self> {
        let root: Value = serde_json::from_str(text)?;
        let Value::Object(categories) = root else {
            return Err(EngineError::Store {
                message: "word list root must be a JSON object".into(),
            });
        };

        let mut collected = Vec::new();
        for (category, entry) in &categories {
            match entry {
                Value::Array(words) => collect_strings(words, &mut collected),
                Value::Object(sub) => {
                    for words in sub.values() {
                        if let Value::Array(words) = words {
                            collect_strings(words, &mut collected);
                        }
                    }
                }
                _ => tracing::warn!(
                    "Word category '{}' does not contain a list or an object",
                    category
                ),
            }
        }
        Ok(Self::new(collected))
    }

    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let list = Self::from_json(&text)?;
        tracing::info!("Loaded {} words from {}", list.len(), path.display());
        Ok(list)
    }

    /// Load `path`, or fall back to `fallback` on any error.
    pub fn load_or_fallback(path: impl AsRef<Path>, fallback: &[String]) -> Self {
        match Self::load(path.as_ref()) {
            Ok(list) if !list.is_empty() => list,
            Ok(_) => {
                tracing::warn!("Word list {} is empty; using fallback words", path.as_ref().display());
                Self::new(fallback)
            }
            Err(err) => {
                tracing::warn!("{}; using fallback words", err);
                Self::new(fallback)
            }
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

fn collect_strings(values: &[Value], out: &mut Vec<String>) {
    out.extend(values.iter().filter_map(|v| v.as_str()).map(String::from));
}

impl WordSource for WordList {
    fn sample_word(&self, rng: &mut dyn RngCore) -> Option<String> {
        self.words.choose(rng).cloned()
    }
}
