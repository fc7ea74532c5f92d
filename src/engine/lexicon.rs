//! Built-in detection-footprint lexicon.
//!
//! Words statistically over-represented in machine-generated prose. Merged
//! into every persona's replacements; persona entries take precedence.

/// `(word, substitutes)` in merge order.
pub const AI_FOOTPRINTS: &[(&str, &[&str])] = &[
    ("delve", &["explore", "look into"]),
    ("tapestry", &["mix", "combination"]),
    ("testament", &["proof", "example"]),
    ("beacon", &["guide", "example"]),
    ("intricate", &["complex", "detailed"]),
    ("overarching", &["main", "overall"]),
    ("subsequently", &["then", "after that"]),
    ("nevertheless", &["anyway", "but still"]),
    ("furthermore", &["also", "and"]),
    ("consequently", &["so", "because of that"]),
    ("therefore", &["so", "that's why"]),
    ("moreover", &["plus", "also"]),
];
