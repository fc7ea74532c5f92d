//! Imperfection injector stage: prefixes some sentences with a filler phrase.

use tracing::trace;

use super::casing::{is_all_lower, title_case};
use super::chooser::{choose, Chooser};
use super::sentence::{join_sentences, split_sentences};

/// Stage 3 of the pipeline.
#[derive(Debug, Clone)]
pub struct ImperfectionInjector {
    fillers: Vec<String>,
    filler_probability: f64,
}

impl ImperfectionInjector {
    pub fn new(fillers: Vec<String>, filler_probability: f64) -> Self {
        Self {
            fillers,
            filler_probability,
        }
    }

    pub fn fillers(&self) -> &[String] {
        &self.fillers
    }

    pub fn apply(&self, text: &str, chooser: &mut dyn Chooser) -> String {
        let mut out = Vec::new();
        let mut injected = 0;

        for sentence in split_sentences(text) {
            if !self.fillers.is_empty() && chooser.chance(self.filler_probability) {
                let filler = choose(chooser, &self.fillers);
                out.push(prefix_with_filler(filler, sentence));
                injected += 1;
            } else {
                out.push(sentence.to_string());
            }
        }

        trace!(sentences = out.len(), injected, "Imperfection pass complete");
        join_sentences(&out)
    }
}

/// `"<Filler>, <sentence>"`, lower-casing the sentence's opening letter only
/// when the rest of the sentence is plain lower case (so acronyms survive).
fn prefix_with_filler(filler: &str, sentence: &str) -> String {
    let filler = title_case(filler);
    let mut chars = sentence.chars();

    match chars.next() {
        Some(first) if first.is_uppercase() => {
            let rest = chars.as_str();
            if rest.is_empty() || is_all_lower(rest) {
                let lowered: String = first.to_lowercase().collect();
                format!("{}, {}{}", filler, lowered, rest)
            } else {
                format!("{}, {}", filler, sentence)
            }
        }
        _ => format!("{}, {}", filler, sentence),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::chooser::FixedChooser;

    fn injector(fillers: &[&str], probability: f64) -> ImperfectionInjector {
        ImperfectionInjector::new(fillers.iter().map(|s| s.to_string()).collect(), probability)
    }

    #[test]
    fn test_every_sentence_gets_filler_when_forced() {
        let stage = injector(&["to be fair"], 1.0);
        let mut chooser = FixedChooser::always(0);

        let out = stage.apply("It rained. We stayed in!", &mut chooser);
        assert_eq!(out, "To Be Fair, it rained. To Be Fair, we stayed in!");
    }

    #[test]
    fn test_acronym_opening_is_untouched() {
        let stage = injector(&["honestly"], 1.0);
        let mut chooser = FixedChooser::always(0);

        assert_eq!(
            stage.apply("NASA launched it.", &mut chooser),
            "Honestly, NASA launched it."
        );
        assert_eq!(
            stage.apply("The EU agreed.", &mut chooser),
            "Honestly, The EU agreed."
        );
    }

    #[test]
    fn test_lowercase_or_symbol_opening() {
        let stage = injector(&["honestly"], 1.0);
        let mut chooser = FixedChooser::always(0);

        assert_eq!(stage.apply("it works.", &mut chooser), "Honestly, it works.");
        assert_eq!(stage.apply("\"Quote\" here.", &mut chooser), "Honestly, \"Quote\" here.");
    }

    #[test]
    fn test_single_letter_sentence() {
        assert_eq!(prefix_with_filler("kinda", "A"), "Kinda, a");
        // remainder without letters is not "all lower"
        assert_eq!(prefix_with_filler("kinda", "A."), "Kinda, A.");
    }

    #[test]
    fn test_filler_choice_uses_chooser() {
        let stage = injector(&["honestly", "pretty much"], 1.0);
        let mut chooser = FixedChooser::always(1);
        assert_eq!(stage.apply("Yes.", &mut chooser), "Pretty Much, yes.");
    }

    #[test]
    fn test_no_fillers_never_draws() {
        let stage = injector(&[], 1.0);
        let mut chooser = FixedChooser::always(0);

        assert_eq!(stage.apply("One.  Two.", &mut chooser), "One. Two.");
        assert_eq!(chooser.chance_calls, 0);
    }

    #[test]
    fn test_failed_chance_leaves_sentence() {
        let stage = injector(&["honestly"], 0.15);
        let mut chooser = FixedChooser::never(0);
        assert_eq!(stage.apply("Keep me.", &mut chooser), "Keep me.");
        assert_eq!(chooser.pick_calls, 0);
    }
}
