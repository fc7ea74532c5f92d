//! File adapter: read a text file, humanize it with one persona, write the result.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cli::HumanizeArgs;
use crate::config::AppConfig;
use crate::engine::{Chooser, HumanizerEngine, RandomChooser};
use crate::error::{Error, Result};
use crate::persona::PersonaCatalog;

const BOLD_YELLOW: &str = "\x1b[1;33m";
const BOLD_GREEN: &str = "\x1b[1;32m";
const CYAN: &str = "\x1b[36m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Progress lines for humans; silent with `--quiet` or `--stdout`.
struct Console {
    enabled: bool,
}

impl Console {
    fn line(&self, text: String) {
        if self.enabled {
            println!("{}", text);
        }
    }
}

/// Where the humanized text went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    File(PathBuf),
    Stdout,
}

/// Run the `humanize` command.
pub fn run(config: &AppConfig, args: &HumanizeArgs, quiet: bool) -> Result<Delivery> {
    let console = Console {
        enabled: !quiet && !args.stdout,
    };

    let input_path = Path::new(&args.input_file);
    if !input_path.is_file() {
        return Err(Error::missing_input(format!(
            "Input file '{}' not found.",
            args.input_file
        )));
    }

    let catalog = match args.personas.as_deref() {
        Some(file) => PersonaCatalog::load(Path::new(file))?,
        None => PersonaCatalog::from_settings(&config.personas)?,
    };

    let persona_name = args
        .persona
        .clone()
        .unwrap_or_else(|| config.personas.default.clone());
    let persona = catalog.resolve(&persona_name)?;

    console.line(format!("{}Loading StudentVibe...{}", BOLD_YELLOW, RESET));
    console.line(format!("{}Target Persona:{} {}", CYAN, RESET, persona.name));

    let raw_text = fs::read_to_string(input_path).map_err(|e| Error::IoRead {
        path: input_path.to_path_buf(),
        source: e,
    })?;

    let engine = HumanizerEngine::with_settings(persona, &config.engine)?;

    console.line(format!(
        "{}Humanizing text (applying Vocabulary Refactor & Counter-Measures)...{}",
        YELLOW, RESET
    ));

    let mut chooser: Box<dyn Chooser> = match args.seed {
        Some(seed) => {
            debug!(seed, "Using seeded random source");
            Box::new(RandomChooser::seeded(seed))
        }
        None => Box::new(RandomChooser::thread()),
    };
    let processed = engine.process_with(&raw_text, chooser.as_mut());

    info!(
        persona = %persona.name,
        input_chars = raw_text.chars().count(),
        output_chars = processed.chars().count(),
        "Text humanized"
    );

    if args.stdout {
        print!("{}", processed);
        return Ok(Delivery::Stdout);
    }

    let output_path = args
        .output
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output_path(input_path));

    fs::write(&output_path, &processed).map_err(|e| Error::IoWrite {
        path: output_path.clone(),
        source: e,
    })?;

    console.line(format!(
        "{}Success!{} File saved to: {}{}{}",
        BOLD_GREEN,
        RESET,
        CYAN,
        output_path.display(),
        RESET
    ));

    Ok(Delivery::File(output_path))
}

/// `<dir>/<stem>_vibe.md` next to the input file.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_vibe.md", stem))
}
