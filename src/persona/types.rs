//! Core types for the persona system.
//!
//! A persona is a named style profile: which words get replaced, with what,
//! and which filler phrases may open a sentence.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

// ─────────────────────────────────────────────────────────────────
// Replacements
// ─────────────────────────────────────────────────────────────────

/// Ordered `word → alternatives` mapping.
///
/// Keys are stored lower-case and are unique. Order is the order entries were
/// inserted, which for deserialized data is document order; the vocabulary
/// stage applies rules in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replacements {
    entries: Vec<(String, Vec<String>)>,
}

impl Replacements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry. Replacing keeps the original position.
    pub fn insert(&mut self, word: impl Into<String>, alternatives: Vec<String>) {
        let word = word.into().to_lowercase();
        match self.entries.iter_mut().find(|(w, _)| *w == word) {
            Some(entry) => entry.1 = alternatives,
            None => self.entries.push((word, alternatives)),
        }
    }

    pub fn get(&self, word: &str) -> Option<&[String]> {
        let word = word.to_lowercase();
        self.entries
            .iter()
            .find(|(w, _)| *w == word)
            .map(|(_, alts)| alts.as_slice())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.get(word).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(w, alts)| (w.as_str(), alts.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Vec<String>)> for Replacements {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut replacements = Self::new();
        for (word, alternatives) in iter {
            replacements.insert(word, alternatives);
        }
        replacements
    }
}

impl Serialize for Replacements {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (word, alternatives) in &self.entries {
            map.serialize_entry(word, alternatives)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Replacements {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ReplacementsVisitor;

        impl<'de> Visitor<'de> for ReplacementsVisitor {
            type Value = Replacements;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from word to a list of alternatives")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
                let mut replacements = Replacements::new();
                while let Some((word, alternatives)) = access.next_entry::<String, Vec<String>>()? {
                    replacements.insert(word, alternatives);
                }
                Ok(replacements)
            }
        }

        deserializer.deserialize_map(ReplacementsVisitor)
    }
}

// ─────────────────────────────────────────────────────────────────
// Persona Config
// ─────────────────────────────────────────────────────────────────

/// One persona's configuration, as found in a persona file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaConfig {
    /// Catalog key; filled in by the catalog, never read from the file body.
    #[serde(skip)]
    pub name: String,

    /// Short human-readable description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Words to replace and their candidate substitutes.
    pub replacements: Replacements,

    /// Sentence-opening interjections (may be empty).
    pub fillers: Vec<String>,
}

impl PersonaConfig {
    /// Check the persona is usable by the engine.
    pub fn validate(&self) -> Result<()> {
        for (word, alternatives) in self.replacements.iter() {
            if word.trim().is_empty() {
                return Err(Error::persona_invalid(&self.name, "replacement word must not be empty"));
            }
            if alternatives.is_empty() {
                return Err(Error::persona_invalid(
                    &self.name,
                    format!("replacement '{}' has no alternatives", word),
                ));
            }
        }

        if self.fillers.iter().any(|f| f.trim().is_empty()) {
            return Err(Error::persona_invalid(&self.name, "filler phrases must not be empty"));
        }

        Ok(())
    }
}

impl fmt::Display for PersonaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} replacements, {} fillers)",
            self.name,
            self.replacements.len(),
            self.fillers.len()
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
