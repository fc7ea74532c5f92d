//! Error types for StudentVibe
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - User-friendly messages with suggestions
//! - Exit codes for the CLI and status codes for the HTTP adapter
//!
//! The transformation pipeline itself never fails on string input; every
//! variant here belongs to configuration loading or to one of the adapters.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for StudentVibe operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,
    IoNotFound = 203,

    // Persona errors (3xx)
    PersonaNotFound = 300,
    PersonaInvalid = 301,

    // Input errors (4xx)
    MissingInput = 400,
    InputTooLarge = 401,
    RequestMalformed = 402,

    // Internal errors (9xx)
    InternalError = 900,
}

impl ErrorCode {
    /// Get the string code (e.g., "E100")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI (maps to 1-125 range)
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10, // Config errors
            200..=299 => 20, // IO errors
            300..=399 => 30, // Persona errors
            400..=499 => 40, // Input errors
            900..=999 => 90, // Internal errors
            _ => 1,
        }
    }

    /// HTTP status code reported by the server adapter
    pub fn http_status(&self) -> u16 {
        match self {
            // Undecodable bodies count as unexpected failures
            ErrorCode::RequestMalformed => 500,
            _ => match *self as u16 {
                300..=499 => 400,
                _ => 500,
            },
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration parse error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String, field: Option<String> },

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    /// File read error
    #[error("Failed to read file: {path}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File write error
    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    // ─────────────────────────────────────────────────────────────
    // Persona Errors
    // ─────────────────────────────────────────────────────────────

    /// Requested persona is absent from the catalog
    #[error("Persona '{name}' not found")]
    PersonaNotFound { name: String },

    /// Persona definition is unusable
    #[error("Persona '{name}' is invalid: {reason}")]
    PersonaInvalid { name: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // Input Errors
    // ─────────────────────────────────────────────────────────────

    /// No input to transform (missing file, empty request body)
    #[error("{message}")]
    MissingInput { message: String },

    /// Input text exceeds the configured cap
    #[error("Input exceeds maximum limit of {limit} characters (got {actual})")]
    InputTooLarge { limit: usize, actual: usize },

    /// Request body exceeds the size the server buffers
    #[error("Request body exceeds maximum size of {limit_bytes} bytes")]
    BodyTooLarge { limit_bytes: usize },

    /// Request body could not be decoded
    #[error("Malformed request: {message}")]
    RequestMalformed { message: String },

    // ─────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    // ─────────────────────────────────────────────────────────────
    // Error Classification
    // ─────────────────────────────────────────────────────────────

    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } => ErrorCode::ConfigValidation,

            Error::IoRead { .. } => ErrorCode::IoRead,
            Error::IoWrite { .. } => ErrorCode::IoWrite,
            Error::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
                _ => ErrorCode::IoRead,
            },
            Error::Toml(_) => ErrorCode::ConfigParseError,

            Error::PersonaNotFound { .. } => ErrorCode::PersonaNotFound,
            Error::PersonaInvalid { .. } => ErrorCode::PersonaInvalid,

            Error::MissingInput { .. } => ErrorCode::MissingInput,
            Error::InputTooLarge { .. } | Error::BodyTooLarge { .. } => ErrorCode::InputTooLarge,
            Error::RequestMalformed { .. } => ErrorCode::RequestMalformed,

            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    /// Get the HTTP status for the server adapter
    pub fn http_status(&self) -> u16 {
        self.code().http_status()
    }

    // ─────────────────────────────────────────────────────────────
    // User-Friendly Messages
    // ─────────────────────────────────────────────────────────────

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => Some(
                "Run 'studentvibe config init' to create a default configuration file."
            ),
            Error::ConfigParse { .. } => Some(
                "Check your configuration file syntax. Run 'studentvibe config validate' to see details."
            ),
            Error::ConfigValidation { .. } => Some(
                "Review the configuration file and fix the invalid values."
            ),
            Error::PersonaNotFound { .. } => Some(
                "Run 'studentvibe persona list' to see the available personas."
            ),
            Error::PersonaInvalid { .. } => Some(
                "Every replacement word needs at least one alternative."
            ),
            Error::MissingInput { .. } => Some(
                "Check the input path, or pipe non-empty text to the server."
            ),
            Error::InputTooLarge { .. } | Error::BodyTooLarge { .. } => Some(
                "Split the text into smaller chunks or raise 'server.max_input_chars'."
            ),
            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let mut output = format!(
            "\x1b[1;31mError [{}]\x1b[0m: {}\n",
            self.code().as_str(),
            self
        );

        if let Some(hint) = self.suggestion() {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        format!("[{}] {}", self.code().as_str(), self)
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Error::ConfigNotFound {
            path: path.into(),
            source: None,
        }
    }

    /// Create a config parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Error::ConfigParse {
            message: message.into(),
        }
    }

    /// Create a config validation error
    pub fn config_validation(message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a config validation error with field name
    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create an unknown persona error
    pub fn persona_not_found(name: impl Into<String>) -> Self {
        Error::PersonaNotFound { name: name.into() }
    }

    /// Create an invalid persona error
    pub fn persona_invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::PersonaInvalid {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing input error
    pub fn missing_input(message: impl Into<String>) -> Self {
        Error::MissingInput {
            message: message.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
