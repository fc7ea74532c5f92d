//! Case helpers shared by the vocabulary and filler stages.

/// Re-case `replacement` so it mirrors the shape of `original`.
///
/// - `DELVE` → `LOOK INTO`
/// - `Delve` → `Look Into`
/// - anything else → lower case
pub fn match_case(original: &str, replacement: &str) -> String {
    if is_all_upper(original) {
        replacement.to_uppercase()
    } else if starts_upper(original) {
        title_case(replacement)
    } else {
        replacement.to_lowercase()
    }
}

/// Upper-case the first letter of every whitespace-separated word and
/// lower-case the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for ch in text.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            out.push(ch);
        } else if at_word_start {
            out.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }

    out
}

/// True when `text` has at least one cased letter and none of them are lower case.
pub fn is_all_upper(text: &str) -> bool {
    has_cased(text) && !text.chars().any(char::is_lowercase)
}

/// True when `text` has at least one cased letter and none of them are upper case.
pub fn is_all_lower(text: &str) -> bool {
    has_cased(text) && !text.chars().any(char::is_uppercase)
}

fn starts_upper(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_uppercase)
}

fn has_cased(text: &str) -> bool {
    text.chars().any(|c| c.is_uppercase() || c.is_lowercase())
}
