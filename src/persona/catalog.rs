//! Persona catalog: load persona files and resolve personas by name.
//!
//! The catalog is read once and never mutated afterwards, so it can be shared
//! freely between concurrent requests.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::PersonaSettings;
use crate::error::{Error, Result};

use super::types::PersonaConfig;

/// Personas compiled into the binary.
const BUNDLED_PERSONAS: &str = include_str!("../../config/personas.toml");

// ─────────────────────────────────────────────────────────────────
// Catalog Source
// ─────────────────────────────────────────────────────────────────

/// Where a catalog's personas came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Bundled,
    File(PathBuf),
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Bundled => write!(f, "bundled"),
            CatalogSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Persona file encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonaFormat {
    Json,
    Toml,
}

impl PersonaFormat {
    /// `.json` files are JSON, everything else is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => PersonaFormat::Json,
            _ => PersonaFormat::Toml,
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Persona Catalog
// ─────────────────────────────────────────────────────────────────

/// Read-only set of personas keyed by name.
#[derive(Debug, Clone)]
pub struct PersonaCatalog {
    personas: BTreeMap<String, PersonaConfig>,
    source: CatalogSource,
}

impl PersonaCatalog {
    /// Catalog of the personas shipped with the binary.
    pub fn bundled() -> Result<Self> {
        Self::parse(BUNDLED_PERSONAS, PersonaFormat::Toml, CatalogSource::Bundled)
    }

    /// Load a persona file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::ConfigNotFound {
            path: path.to_path_buf(),
            source: Some(e),
        })?;
        debug!(path = %path.display(), "Loading persona file");

        Self::parse(
            &content,
            PersonaFormat::from_path(path),
            CatalogSource::File(path.to_path_buf()),
        )
    }

    /// Catalog selected by settings: the configured file, else the bundled set.
    pub fn from_settings(settings: &PersonaSettings) -> Result<Self> {
        match settings.file.as_deref() {
            Some(file) => Self::load(Path::new(file)),
            None => Self::bundled(),
        }
    }

    /// Parse persona definitions and validate every entry.
    pub fn parse(content: &str, format: PersonaFormat, source: CatalogSource) -> Result<Self> {
        let mut personas: BTreeMap<String, PersonaConfig> = match format {
            PersonaFormat::Json => serde_json::from_str(content).map_err(|e| {
                Error::config_parse(format!("invalid persona JSON in {}: {}", source, e))
            })?,
            PersonaFormat::Toml => toml::from_str(content).map_err(|e| {
                Error::config_parse(format!("invalid persona TOML in {}: {}", source, e))
            })?,
        };

        for (name, persona) in personas.iter_mut() {
            persona.name = name.clone();
            persona.validate()?;
        }

        info!(source = %source, personas = personas.len(), "Persona catalog loaded");
        Ok(Self { personas, source })
    }

    /// Look a persona up by its exact name.
    pub fn resolve(&self, name: &str) -> Result<&PersonaConfig> {
        self.personas
            .get(name)
            .ok_or_else(|| Error::persona_not_found(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.personas.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.personas.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersonaConfig> {
        self.personas.values()
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_bundled_personas() {
        let catalog = PersonaCatalog::bundled().unwrap();
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, vec!["College", "Creative", "High School"]);
        assert_eq!(catalog.source(), &CatalogSource::Bundled);

        for persona in catalog.iter() {
            assert!(!persona.fillers.is_empty(), "{} has no fillers", persona.name);
            assert!(!persona.replacements.is_empty());
        }
    }

    #[test]
    fn test_resolve_sets_name() {
        let catalog = PersonaCatalog::bundled().unwrap();
        let persona = catalog.resolve("High School").unwrap();
        assert_eq!(persona.name, "High School");
    }

    #[test]
    fn test_unknown_persona() {
        let catalog = PersonaCatalog::bundled().unwrap();
        let err = catalog.resolve("Pirate").unwrap_err();
        assert!(matches!(err, Error::PersonaNotFound { ref name } if name == "Pirate"));
        assert!(!catalog.contains("college"));
    }

    #[test]
    fn test_load_json_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(
            &path,
            r#"{"College": {"replacements": {"delve": ["X"]}, "fillers": ["honestly"]}, "Empty": {}}"#,
        )
        .unwrap();

        let catalog = PersonaCatalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.resolve("College").unwrap().replacements.get("delve").unwrap(), &["X".to_string()]);
        assert!(catalog.resolve("Empty").unwrap().fillers.is_empty());
        assert_eq!(catalog.source(), &CatalogSource::File(path));
    }

    #[test]
    fn test_load_missing_file() {
        let err = PersonaCatalog::load(Path::new("/nonexistent/personas.json")).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = PersonaCatalog::parse("{not json", PersonaFormat::Json, CatalogSource::Bundled)
            .unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_invalid_persona_rejected_at_load() {
        let err = PersonaCatalog::parse(
            r#"{"College": {"replacements": {"delve": []}}}"#,
            PersonaFormat::Json,
            CatalogSource::Bundled,
        )
        .unwrap_err();
        assert!(matches!(err, Error::PersonaInvalid { ref name, .. } if name == "College"));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(PersonaFormat::from_path(Path::new("a/config.json")), PersonaFormat::Json);
        assert_eq!(PersonaFormat::from_path(Path::new("a/CONFIG.JSON")), PersonaFormat::Json);
        assert_eq!(PersonaFormat::from_path(Path::new("personas.toml")), PersonaFormat::Toml);
        assert_eq!(PersonaFormat::from_path(Path::new("personas")), PersonaFormat::Toml);
    }
}
