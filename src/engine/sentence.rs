//! Sentence segmentation shared by the burstiness and filler stages.

/// Split `text` into sentences.
///
/// A boundary sits immediately after `.`, `!` or `?` when it is followed by
/// whitespace. The punctuation stays with the preceding sentence and the whole
/// whitespace run is consumed. Empty pieces are dropped, so empty input yields
/// no sentences.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if ch.is_whitespace() && matches!(prev, Some('.' | '!' | '?')) {
            sentences.push(&text[start..idx]);

            let mut end = idx + ch.len_utf8();
            while let Some(&(next_idx, next)) = chars.peek() {
                if !next.is_whitespace() {
                    break;
                }
                end = next_idx + next.len_utf8();
                chars.next();
            }

            start = end;
            prev = None;
            continue;
        }
        prev = Some(ch);
    }
    sentences.push(&text[start..]);

    sentences.retain(|s| !s.is_empty());
    sentences
}

/// Rejoin sentences with a single space.
pub fn join_sentences<S: AsRef<str>>(sentences: &[S]) -> String {
    let mut out = String::new();
    for (i, sentence) in sentences.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(sentence.as_ref());
    }
    out
}
