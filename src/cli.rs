//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for StudentVibe.

use clap::{Parser, Subcommand};

/// StudentVibe - AI text humanizer
///
/// Rewrites machine-generated text using a persona: swaps flagged
/// vocabulary, varies sentence length and adds filler phrases.
#[derive(Parser, Debug)]
#[command(name = "studentvibe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Humanize a text file
    Humanize(HumanizeArgs),

    /// Serve the humanizer over HTTP
    Serve {
        /// Path to configuration file
        #[arg(short, long, env = "STUDENTVIBE_CONFIG")]
        config: Option<String>,

        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Persona catalog inspection
    Persona {
        #[command(subcommand)]
        subcommand: PersonaSubcommand,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Display version and build information
    Version,
}

/// Arguments for `humanize`
#[derive(clap::Args, Debug, Clone)]
pub struct HumanizeArgs {
    /// Path to the raw text file to humanize
    pub input_file: String,

    /// Persona to use (default: the configured default, normally "College")
    #[arg(long, env = "STUDENTVIBE_PERSONA")]
    pub persona: Option<String>,

    /// Persona file (JSON or TOML), overrides config
    #[arg(long)]
    pub personas: Option<String>,

    /// Path to configuration file
    #[arg(short, long, env = "STUDENTVIBE_CONFIG")]
    pub config: Option<String>,

    /// Output Markdown file (default: <input>_vibe.md next to the input)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write the result to stdout instead of a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,

    /// Seed the random source for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Persona subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum PersonaSubcommand {
    /// List available personas
    List {
        /// Persona file (JSON or TOML), overrides config
        #[arg(long)]
        personas: Option<String>,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Show a persona's effective replacements and fillers
    Show {
        /// Persona name, e.g. "High School"
        name: String,

        /// Persona file (JSON or TOML), overrides config
        #[arg(long)]
        personas: Option<String>,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<String>,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the current configuration
    Show {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        config: Option<String>,
    },
}
