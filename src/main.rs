//! StudentVibe - persona-driven text humanizer
//!
//! Entry point for the `studentvibe` binary. Rewrites text through the
//! vocabulary, burstiness and filler stages, either for a file on disk
//! or over HTTP.

mod cli;
mod config;
mod engine;
mod error;
mod humanize;
mod logging;
mod persona;
mod server;
mod version;

use std::path::Path;

use clap::Parser;
use tracing::info;

use crate::cli::{Cli, Commands, ConfigSubcommand, PersonaSubcommand};
use crate::config::AppConfig;
use crate::engine::HumanizerEngine;
use crate::error::{Error, Result};
use crate::persona::PersonaCatalog;

fn main() {
    // Parse CLI arguments first (before logging, so we know verbosity)
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprint!("{}", e.format_for_terminal());
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    // Commands that don't need full logging
    match cli.command {
        Commands::Version => {
            version::print_version();
            return Ok(());
        }
        Commands::Config { ref subcommand } => {
            logging::init_simple(tracing::Level::WARN)?;
            return handle_config_command(subcommand.clone());
        }
        Commands::Persona { ref subcommand } => {
            logging::init_simple(tracing::Level::WARN)?;
            return handle_persona_command(subcommand.clone());
        }
        _ => {}
    }

    let config_path = match &cli.command {
        Commands::Humanize(args) => args.config.clone(),
        Commands::Serve { config, .. } => config.clone(),
        _ => None,
    };
    let mut config = AppConfig::load(config_path.as_deref())?;

    // The guards must be kept alive for the lifetime of the program
    let _log_guards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;

    let build = version::build_info();
    info!(
        version = %build.full_version(),
        target = %build.target,
        profile = %build.profile,
        "Starting StudentVibe"
    );

    match cli.command {
        Commands::Humanize(args) => {
            humanize::run(&config, &args, cli.quiet)?;
        }
        Commands::Serve { host, port, .. } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            run_server(config)?;
        }
        Commands::Version | Commands::Config { .. } | Commands::Persona { .. } => {
            // Already handled above
            unreachable!();
        }
    }

    Ok(())
}

/// Build the tokio runtime and serve the HTTP adapter until Ctrl+C
fn run_server(config: AppConfig) -> Result<()> {
    let worker_threads = if config.server.worker_threads > 0 {
        config.server.worker_threads
    } else {
        num_cpus::get().min(8)
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(worker_threads)
        .thread_name("studentvibe-http")
        .build()
        .map_err(|e| Error::Internal(format!("Failed to create async runtime: {}", e)))?;

    runtime.block_on(server::serve(config))
}

/// Load the catalog a persona command asks for
fn load_catalog(personas: Option<&str>, config: Option<&str>) -> Result<(AppConfig, PersonaCatalog)> {
    let cfg = AppConfig::load(config)?;
    let catalog = match personas {
        Some(file) => PersonaCatalog::load(Path::new(file))?,
        None => PersonaCatalog::from_settings(&cfg.personas)?,
    };
    Ok((cfg, catalog))
}

/// Handle persona subcommands
fn handle_persona_command(subcommand: PersonaSubcommand) -> Result<()> {
    match subcommand {
        PersonaSubcommand::List { personas, config } => {
            let (cfg, catalog) = load_catalog(personas.as_deref(), config.as_deref())?;
            println!("Personas ({}):", catalog.source());
            if catalog.is_empty() {
                println!("  (none)");
            }
            for persona in catalog.iter() {
                let marker = if persona.name == cfg.personas.default { "*" } else { " " };
                if persona.description.is_empty() {
                    println!(" {} {}", marker, persona.name);
                } else {
                    println!(" {} {:<14} {}", marker, persona.name, persona.description);
                }
            }
        }
        PersonaSubcommand::Show { name, personas, config } => {
            let (_, catalog) = load_catalog(personas.as_deref(), config.as_deref())?;
            let persona = catalog.resolve(&name)?;
            let engine = HumanizerEngine::new(persona)?;

            println!("{}", persona);
            println!();
            println!("Replacements:");
            for (word, alternatives) in engine.replacements() {
                println!("  {:<14} -> {}", word, alternatives.join(", "));
            }
            println!();
            if engine.fillers().is_empty() {
                println!("Fillers: (none)");
            } else {
                println!("Fillers:");
                for filler in engine.fillers() {
                    println!("  {}", filler);
                }
            }
        }
    }

    Ok(())
}

/// Handle configuration subcommands
fn handle_config_command(subcommand: ConfigSubcommand) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Show { config } => {
            let cfg = AppConfig::load(config.as_deref())?;
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigSubcommand::Init { path, force } => {
            let written = config::init_config(path.as_deref(), force)?;
            println!("Configuration written to: {}", written.display());
        }
        ConfigSubcommand::Validate { config } => {
            let path = config.as_deref();
            match AppConfig::load(path) {
                Ok(_) => {
                    println!("Configuration is valid.");
                }
                Err(e) => {
                    eprint!("{}", e.format_for_terminal());
                    std::process::exit(e.exit_code());
                }
            }
        }
    }

    Ok(())
}
