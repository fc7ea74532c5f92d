//! Configuration system for StudentVibe
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (STUDENTVIBE_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Persona used when a caller does not name one
pub const DEFAULT_PERSONA: &str = "College";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Persona catalog settings
    pub personas: PersonaSettings,

    /// Transformation pipeline tuning
    pub engine: EngineSettings,

    /// HTTP adapter settings
    pub server: ServerSettings,

    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Persona catalog settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaSettings {
    /// Persona file (JSON or TOML); bundled personas when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Persona used when none is requested
    pub default: String,
}

/// Transformation pipeline tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Chance that an eligible long sentence is split
    pub split_probability: f64,

    /// Chance that a sentence gets a filler prefix
    pub filler_probability: f64,

    /// Sentences with more words than this are eligible for splitting
    pub long_sentence_words: usize,
}

/// HTTP adapter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind address
    pub host: String,

    /// Listen port
    pub port: u16,

    /// Longest accepted request text, in characters (0 = no limit)
    pub max_input_chars: usize,

    /// Runtime worker threads (0 = auto)
    pub worker_threads: usize,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Maximum log file size in MB before rotation
    pub max_file_size_mb: u64,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

// Default implementations

impl Default for PersonaSettings {
    fn default() -> Self {
        Self {
            file: None,
            default: DEFAULT_PERSONA.to_string(),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            split_probability: 0.3,
            filler_probability: 0.15,
            long_sentence_words: 15,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_input_chars: 60_000,
            worker_threads: 0, // Auto-detect
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            max_file_size_mb: 100,
            max_files: 5,
            json_format: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = Self::find_config_file(config_path)? {
            debug!(path = %path.display(), "Loading configuration file");
            let content = fs::read_to_string(&path).map_err(|e| Error::ConfigNotFound {
                path: path.clone(),
                source: Some(e),
            })?;
            config = toml::from_str(&content).map_err(|e| {
                Error::config_parse(format!("{}: {}", path.display(), e))
            })?;
            info!(path = %path.display(), "Configuration loaded from file");
        }

        config.apply_env_overrides();
        config.expand_paths();
        config.validate()?;

        Ok(config)
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            return if path.exists() {
                Ok(Some(path))
            } else {
                Err(Error::config_not_found(path))
            };
        }

        let search_paths = [
            PathBuf::from("studentvibe.toml"),
            dirs::config_dir()
                .map(|p| p.join("studentvibe").join("config.toml"))
                .unwrap_or_default(),
            dirs::home_dir()
                .map(|p| p.join(".studentvibe").join("config.toml"))
                .unwrap_or_default(),
            PathBuf::from("/etc/studentvibe/config.toml"),
        ];

        for path in &search_paths {
            if !path.as_os_str().is_empty() && path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any `STUDENTVIBE_*` lookup
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Persona settings
        if let Some(val) = lookup("STUDENTVIBE_PERSONAS_FILE") {
            self.personas.file = Some(val);
        }
        if let Some(val) = lookup("STUDENTVIBE_DEFAULT_PERSONA") {
            self.personas.default = val;
        }

        // Engine settings
        if let Some(n) = lookup("STUDENTVIBE_SPLIT_PROBABILITY").and_then(|v| v.parse().ok()) {
            self.engine.split_probability = n;
        }
        if let Some(n) = lookup("STUDENTVIBE_FILLER_PROBABILITY").and_then(|v| v.parse().ok()) {
            self.engine.filler_probability = n;
        }
        if let Some(n) = lookup("STUDENTVIBE_LONG_SENTENCE_WORDS").and_then(|v| v.parse().ok()) {
            self.engine.long_sentence_words = n;
        }

        // Server settings
        if let Some(val) = lookup("STUDENTVIBE_HOST") {
            self.server.host = val;
        }
        if let Some(n) = lookup("STUDENTVIBE_PORT").and_then(|v| v.parse().ok()) {
            self.server.port = n;
        }
        if let Some(n) = lookup("STUDENTVIBE_MAX_INPUT_CHARS").and_then(|v| v.parse().ok()) {
            self.server.max_input_chars = n;
        }

        // Logging settings
        if let Some(val) = lookup("STUDENTVIBE_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Some(val) = lookup("STUDENTVIBE_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Some(val) = lookup("STUDENTVIBE_LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        if let Some(ref file) = self.personas.file {
            self.personas.file = Some(expand_path(file));
        }
        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.personas.default.trim().is_empty() {
            return Err(Error::config_field_invalid(
                "personas.default",
                "Default persona cannot be empty",
            ));
        }

        for (field, value) in [
            ("engine.split_probability", self.engine.split_probability),
            ("engine.filler_probability", self.engine.filler_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::config_field_invalid(
                    field,
                    format!("{} must be between 0 and 1 (got {})", field, value),
                ));
            }
        }

        if self.server.host.is_empty() {
            return Err(Error::config_field_invalid("server.host", "Server host cannot be empty"));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            ));
        }

        Ok(())
    }

    /// `host:port` for the HTTP adapter
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Initialize a new configuration file
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".studentvibe")
                .join("config.toml")
        });

    if config_path.exists() && !force {
        return Err(Error::config_validation(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    write_default_config(&config_path)?;
    Ok(config_path)
}

fn write_default_config(path: &Path) -> Result<()> {
    fs::write(path, DEFAULT_CONFIG).map_err(|e| Error::IoWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Default configuration content with comments
const DEFAULT_CONFIG: &str = r#"# StudentVibe Configuration

[personas]
# Persona file (JSON or TOML). Comment out to use the bundled personas.
# file = "~/.studentvibe/personas.json"

# Persona used when none is requested
default = "College"

[engine]
# Chance that a sentence of more than `long_sentence_words` words is split
split_probability = 0.3

# Chance that a sentence is prefixed with a filler phrase
filler_probability = 0.15

# Word-count threshold for splitting
long_sentence_words = 15

[server]
# Bind address and port for `studentvibe serve`
host = "127.0.0.1"
port = 8080

# Longest accepted request text in characters (0 = no limit)
max_input_chars = 60000

# Runtime worker threads (0 = auto-detect)
worker_threads = 0

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log file path (comment out to disable file logging)
# file = "~/.studentvibe/logs/studentvibe.log"

# Maximum log file size in MB before rotation
max_file_size_mb = 100

# Number of rotated log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false
"#;
