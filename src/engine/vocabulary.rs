//! Vocabulary refactor stage.
//!
//! Replaces every whole-word, case-insensitive occurrence of a flagged word
//! with one of its alternatives, mirroring the original token's casing.
//! Rules run in order and each pass sees the output of the previous one.

use regex::{Captures, Regex};
use tracing::trace;

use super::casing::match_case;
use super::chooser::{choose, Chooser};

/// One compiled `word → alternatives` rule.
#[derive(Debug, Clone)]
pub struct ReplacementRule {
    word: String,
    pattern: Regex,
    alternatives: Vec<String>,
}

impl ReplacementRule {
    /// Compile a rule. `alternatives` must not be empty.
    pub fn new(word: &str, alternatives: Vec<String>) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(word)))?;
        Ok(Self {
            word: word.to_lowercase(),
            pattern,
            alternatives,
        })
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn alternatives(&self) -> &[String] {
        &self.alternatives
    }

    /// Apply this rule, returning the rewritten text and the number of hits.
    pub fn apply(&self, text: &str, chooser: &mut dyn Chooser) -> (String, usize) {
        let mut hits = 0;
        let rewritten = self.pattern.replace_all(text, |caps: &Captures| {
            hits += 1;
            let original = &caps[0];
            let alternative = choose(chooser, &self.alternatives);
            match_case(original, alternative)
        });
        (rewritten.into_owned(), hits)
    }
}

/// Stage 1 of the pipeline.
#[derive(Debug, Clone, Default)]
pub struct VocabularyRefactor {
    rules: Vec<ReplacementRule>,
}

impl VocabularyRefactor {
    pub fn new(rules: Vec<ReplacementRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ReplacementRule] {
        &self.rules
    }

    pub fn apply(&self, text: &str, chooser: &mut dyn Chooser) -> String {
        let mut current = text.to_string();
        let mut total = 0;

        for rule in &self.rules {
            let (rewritten, hits) = rule.apply(&current, chooser);
            if hits > 0 {
                trace!(word = %rule.word, hits, "Replaced flagged word");
            }
            total += hits;
            current = rewritten;
        }

        trace!(replacements = total, "Vocabulary refactor complete");
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::chooser::{FixedChooser, RandomChooser};

    fn rule(word: &str, alts: &[&str]) -> ReplacementRule {
        ReplacementRule::new(word, alts.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_whole_word_only() {
        let stage = VocabularyRefactor::new(vec![rule("beacon", &["guide"])]);
        let mut chooser = FixedChooser::always(0);

        let out = stage.apply("A beacon, beacons and abeacon.", &mut chooser);
        assert_eq!(out, "A guide, beacons and abeacon.");
    }

    #[test]
    fn test_case_is_mirrored() {
        let stage = VocabularyRefactor::new(vec![rule("delve", &["look into"])]);
        let mut chooser = FixedChooser::always(0);

        let out = stage.apply("Delve deeper. DELVE now. we delve.", &mut chooser);
        assert_eq!(out, "Look Into deeper. LOOK INTO now. we look into.");
    }

    #[test]
    fn test_each_occurrence_chosen_independently() {
        let stage = VocabularyRefactor::new(vec![rule("moreover", &["plus", "also"])]);
        let mut chooser = FixedChooser::always(1);

        let out = stage.apply("moreover moreover", &mut chooser);
        assert_eq!(out, "also also");
        assert_eq!(chooser.pick_calls, 2);
    }

    #[test]
    fn test_later_rules_see_earlier_output() {
        // "furthermore" -> "and", then "and" -> "plus"
        let stage = VocabularyRefactor::new(vec![
            rule("furthermore", &["and"]),
            rule("and", &["plus"]),
        ]);
        let mut chooser = FixedChooser::always(0);

        assert_eq!(stage.apply("Furthermore, it works.", &mut chooser), "Plus, it works.");
    }

    #[test]
    fn test_random_choice_stays_in_alternatives() {
        let stage = VocabularyRefactor::new(vec![rule("tapestry", &["mix", "combination"])]);
        let mut chooser = RandomChooser::thread();

        for _ in 0..50 {
            let out = stage.apply("a tapestry", &mut chooser);
            assert!(out == "a mix" || out == "a combination", "unexpected: {}", out);
        }
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let stage = VocabularyRefactor::new(vec![rule("c.a.t", &["dog"])]);
        let mut chooser = FixedChooser::always(0);

        assert_eq!(stage.apply("c.a.t cxaxt", &mut chooser), "dog cxaxt");
    }

    #[test]
    fn test_no_rules_is_identity() {
        let stage = VocabularyRefactor::default();
        let mut chooser = FixedChooser::always(0);
        assert_eq!(stage.apply("Leave me alone.", &mut chooser), "Leave me alone.");
    }
}
