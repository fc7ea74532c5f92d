//! Burstiness adjuster stage.
//!
//! Occasionally breaks a long compound sentence in two at its first
//! `", and"` (or failing that `", but"`), so sentence lengths vary more.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use super::chooser::Chooser;
use super::sentence::{join_sentences, split_sentences};

static AND_JOINT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i),\s+and\s+").unwrap());
static BUT_JOINT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i),\s+but\s+").unwrap());

/// Stage 2 of the pipeline.
#[derive(Debug, Clone)]
pub struct BurstinessAdjuster {
    split_probability: f64,
    long_sentence_words: usize,
}

impl BurstinessAdjuster {
    pub fn new(split_probability: f64, long_sentence_words: usize) -> Self {
        Self {
            split_probability,
            long_sentence_words,
        }
    }

    pub fn apply(&self, text: &str, chooser: &mut dyn Chooser) -> String {
        let mut out: Vec<String> = Vec::new();
        let mut splits = 0;

        for sentence in split_sentences(text) {
            let words = sentence.split_whitespace().count();
            if words > self.long_sentence_words && chooser.chance(self.split_probability) {
                if let Some((first, second)) = split_compound(sentence) {
                    out.push(first);
                    out.push(second);
                    splits += 1;
                    continue;
                }
            }
            out.push(sentence.to_string());
        }

        trace!(sentences = out.len(), splits, "Burstiness pass complete");
        join_sentences(&out)
    }
}

/// Split at the first `, and` joint, else the first `, but` joint.
fn split_compound(sentence: &str) -> Option<(String, String)> {
    split_at_joint(sentence, &AND_JOINT, "And").or_else(|| split_at_joint(sentence, &BUT_JOINT, "But"))
}

fn split_at_joint(sentence: &str, joint: &Regex, opener: &str) -> Option<(String, String)> {
    let found = joint.find(sentence)?;
    let head = &sentence[..found.start()];
    let tail = &sentence[found.end()..];
    Some((format!("{}.", head), format!("{} {}", opener, tail)))
}
