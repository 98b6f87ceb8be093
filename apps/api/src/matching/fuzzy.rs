//! Fuzzy phrase containment, tolerant of small typos and spelling variants.
//!
//! Similarity is Damerau–Levenshtein distance normalized by the longer word,
//! computed per word over a sliding window of the text.

use strsim::damerau_levenshtein;

/// Terms up to this many characters use the stricter threshold.
pub const SHORT_TERM_MAX_CHARS: usize = 6;
pub const SHORT_TERM_THRESHOLD: f64 = 0.88;
pub const LONG_TERM_THRESHOLD: f64 = 0.82;

/// `1 − distance / max_len`, in characters, clamped to `[0, 1]`.
/// Two empty strings are identical.
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = damerau_levenshtein(a, b);
    (1.0 - distance as f64 / max_len as f64).clamp(0.0, 1.0)
}

// Short terms get the stricter bar: one typo is a larger share of their characters.
fn threshold_for(term: &str) -> f64 {
    if term.chars().count() <= SHORT_TERM_MAX_CHARS {
        SHORT_TERM_THRESHOLD
    } else {
        LONG_TERM_THRESHOLD
    }
}

fn strip_edge_punctuation(word: &str) -> &str {
    word.trim_matches(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
}

/// Whether `term` (lowercase) occurs in `text_lower`, exactly or approximately.
///
/// An exact substring short-circuits. Otherwise a window of the term's word count
/// slides over the text's words and every aligned pair must clear the threshold.
pub fn fuzzy_contains(text_lower: &str, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return false;
    }
    if text_lower.contains(term) {
        return true;
    }

    let term_words: Vec<&str> = term.split_whitespace().collect();
    let text_words: Vec<&str> = text_lower
        .split_whitespace()
        .map(strip_edge_punctuation)
        .filter(|word| !word.is_empty())
        .collect();
    if text_words.len() < term_words.len() {
        return false;
    }

    let threshold = threshold_for(term);
    text_words.windows(term_words.len()).any(|window| {
        window
            .iter()
            .zip(&term_words)
            .all(|(text_word, term_word)| normalized_similarity(text_word, term_word) >= threshold)
    })
}

/// Exact phrase test with alphanumeric boundaries on both sides, so `java`
/// does not match inside `javascript` while `node` still matches `node.js`.
pub fn contains_phrase(text_lower: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    text_lower.match_indices(phrase).any(|(start, _)| {
        let end = start + phrase.len();
        let clear_before = text_lower[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let clear_after = text_lower[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        clear_before && clear_after
    })
}
