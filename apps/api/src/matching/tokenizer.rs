//! Tokenizer: lowercase word tokens that keep tech punctuation (`node.js`, `c++`, `c#`, `ci/cd`).

use crate::matching::config::MatcherConfig;

/// Tokens shorter than this never count as keywords.
pub const MIN_KEYWORD_LEN: usize = 3;

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '/' | '#' | '-')
}

/// Splits text into lowercase tokens.
///
/// Every character outside `[a-z0-9+./#-]` acts as a separator. Trailing dots are
/// sentence punctuation and are trimmed (`aws.` → `aws`); interior dots survive.
/// Calling it again on the same input yields the same sequence.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !is_token_char(c))
        .map(|token| token.trim_end_matches('.'))
        .filter(|token| !token.is_empty())
        .map(|token| token.to_ascii_lowercase())
}

/// Drops tokens shorter than `min_len` and configured stopwords.
pub fn keywords<I>(tokens: I, min_len: usize, config: &MatcherConfig) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    tokens
        .into_iter()
        .filter(|token| token.len() >= min_len && !config.is_stopword(token))
        .collect()
}

/// Keyword tokens of `text` with the default minimum length.
pub fn keyword_tokens(text: &str, config: &MatcherConfig) -> Vec<String> {
    keywords(tokenize(text), MIN_KEYWORD_LEN, config)
}
