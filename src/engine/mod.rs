//! Text transformation pipeline.
//!
//! A [`HumanizerEngine`] is built from one persona and runs three stages in a
//! fixed order, each consuming the previous stage's output:
//!
//! 1. [`VocabularyRefactor`]: swaps flagged words for persona alternatives
//! 2. [`BurstinessAdjuster`]: splits some long compound sentences
//! 3. [`ImperfectionInjector`]: prefixes some sentences with filler phrases
//!
//! The engine is immutable once built. All randomness flows through a
//! [`Chooser`], so runs can be seeded or scripted.

pub mod burstiness;
pub mod casing;
pub mod chooser;
pub mod imperfection;
pub mod lexicon;
pub mod sentence;
pub mod vocabulary;

use tracing::debug;

use crate::config::EngineSettings;
use crate::error::{Error, Result};
use crate::persona::PersonaConfig;

pub use burstiness::BurstinessAdjuster;
pub use chooser::{Chooser, RandomChooser};
pub use imperfection::ImperfectionInjector;
pub use vocabulary::{ReplacementRule, VocabularyRefactor};

/// The three-stage humanizer for one persona.
#[derive(Debug, Clone)]
pub struct HumanizerEngine {
    vocabulary: VocabularyRefactor,
    burstiness: BurstinessAdjuster,
    imperfection: ImperfectionInjector,
}

impl HumanizerEngine {
    /// Build an engine with the default stage probabilities.
    pub fn new(persona: &PersonaConfig) -> Result<Self> {
        Self::with_settings(persona, &EngineSettings::default())
    }

    /// Build an engine, merging the footprint lexicon into the persona's
    /// replacements. Persona entries win over built-in ones.
    pub fn with_settings(persona: &PersonaConfig, settings: &EngineSettings) -> Result<Self> {
        let mut rules = Vec::with_capacity(persona.replacements.len() + lexicon::AI_FOOTPRINTS.len());

        for (word, alternatives) in persona.replacements.iter() {
            if alternatives.is_empty() {
                return Err(Error::persona_invalid(
                    &persona.name,
                    format!("replacement '{}' has no alternatives", word),
                ));
            }
            rules.push(compile_rule(&persona.name, word, alternatives.to_vec())?);
        }

        let mut inherited = 0;
        for (word, alternatives) in lexicon::AI_FOOTPRINTS {
            if persona.replacements.contains(word) {
                continue;
            }
            let alternatives = alternatives.iter().map(|s| s.to_string()).collect();
            rules.push(compile_rule(&persona.name, word, alternatives)?);
            inherited += 1;
        }

        debug!(
            persona = %persona.name,
            rules = rules.len(),
            inherited,
            fillers = persona.fillers.len(),
            "Humanizer engine built"
        );

        Ok(Self {
            vocabulary: VocabularyRefactor::new(rules),
            burstiness: BurstinessAdjuster::new(
                settings.split_probability,
                settings.long_sentence_words,
            ),
            imperfection: ImperfectionInjector::new(
                persona.fillers.clone(),
                settings.filler_probability,
            ),
        })
    }

    /// Transform `text` using the thread-local RNG.
    pub fn process(&self, text: &str) -> String {
        self.process_with(text, &mut RandomChooser::thread())
    }

    /// Transform `text` using the given source of randomness.
    pub fn process_with(&self, text: &str, chooser: &mut dyn Chooser) -> String {
        if text.is_empty() {
            return String::new();
        }

        let text = self.vocabulary.apply(text, chooser);
        let text = self.burstiness.apply(&text, chooser);
        self.imperfection.apply(&text, chooser)
    }

    /// Effective `(word, alternatives)` pairs, in the order they are applied.
    pub fn replacements(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.vocabulary
            .rules()
            .iter()
            .map(|rule| (rule.word(), rule.alternatives()))
    }

    /// Alternatives the engine will use for `word`.
    #[cfg(test)]
    pub fn alternatives_for(&self, word: &str) -> Option<&[String]> {
        let word = word.to_lowercase();
        self.replacements()
            .find(|(w, _)| *w == word)
            .map(|(_, alts)| alts)
    }

    pub fn fillers(&self) -> &[String] {
        self.imperfection.fillers()
    }
}

fn compile_rule(persona: &str, word: &str, alternatives: Vec<String>) -> Result<ReplacementRule> {
    ReplacementRule::new(word, alternatives).map_err(|e| {
        Error::persona_invalid(persona, format!("cannot match replacement '{}': {}", word, e))
    })
}
