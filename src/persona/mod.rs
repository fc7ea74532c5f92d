//! Persona system: named style profiles that drive the humanizer.
//!
//! Each persona supplies the replacement vocabulary and filler phrases the
//! engine uses. Personas come from a persona file (JSON or TOML) or from the
//! set bundled with the binary.

pub mod catalog;
pub mod types;

pub use catalog::PersonaCatalog;
pub use types::PersonaConfig;
