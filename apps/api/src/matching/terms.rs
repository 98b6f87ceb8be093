//! JD term extraction: discovers domain terms directly from the job description
//! and splits them into must-have and nice-to-have lists.
//!
//! Domain terms come from three sources, merged in this order:
//! 1. all-caps acronyms in the original-case JD (`AWS`, `SQL`, `GCP`)
//! 2. known skills from `MatcherConfig` that occur as whole phrases
//! 3. unigrams/bigrams seen at least twice, most frequent first
//!
//! Each term is then tested against the text windows that follow "must have" /
//! "required" / "minimum" and "nice to have" / "preferred" / "bonus" markers.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::matching::config::MatcherConfig;
use crate::matching::fuzzy::{contains_phrase, fuzzy_contains};
use crate::matching::tokenizer::{tokenize, MIN_KEYWORD_LEN};

pub const MAX_DOMAIN_TERMS: usize = 40;
pub const MAX_TERMS_PER_LIST: usize = 10;
pub const FALLBACK_TERMS: usize = 8;
pub const WINDOW_CHARS: usize = 240;
pub const MIN_TERM_FREQUENCY: u32 = 2;
pub const MAX_TERM_CHARS: usize = 40;

const GENERIC_WORDS: &[&str] = &[
    "skill",
    "skills",
    "years",
    "year",
    "experience",
    "role",
    "team",
    "work",
    "good",
    "strong",
    "excellent",
];
const GENERIC_PREFIXES: &[&str] = &["responsib", "require"];

static ACRONYM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z][A-Z0-9]{2,8}\b").unwrap());

static MUST_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:must[\s-]+have|required|minimum)\b").unwrap());

static NICE_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:nice[\s-]+to[\s-]+have|preferred|bonus)\b").unwrap());

/// Must-have and nice-to-have terms derived from one JD.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JdTerms {
    pub must_terms: Vec<String>,
    pub nice_terms: Vec<String>,
    /// Every candidate domain term, in extraction order (≤40).
    pub domain_terms: Vec<String>,
}

#[cfg(test)]
impl JdTerms {
    pub fn is_empty(&self) -> bool {
        self.must_terms.is_empty() && self.nice_terms.is_empty()
    }
}

/// Extracts must/nice term lists from raw JD text.
pub fn extract_terms(jd_text: &str, config: &MatcherConfig) -> JdTerms {
    let domain_terms = domain_terms(jd_text, config);
    let jd_lower = jd_text.to_lowercase();
    let windows = RequirementWindows::find(&jd_lower);

    let mut must_terms: Vec<String> = domain_terms
        .iter()
        .filter(|term| windows.must.iter().any(|w| fuzzy_contains(w, term)))
        .cloned()
        .collect();
    let mut nice_terms: Vec<String> = domain_terms
        .iter()
        .filter(|term| !must_terms.contains(term))
        .filter(|term| windows.nice.iter().any(|w| fuzzy_contains(w, term)))
        .cloned()
        .collect();

    if must_terms.is_empty() {
        must_terms = domain_terms.iter().take(FALLBACK_TERMS).cloned().collect();
        nice_terms = domain_terms
            .iter()
            .skip(FALLBACK_TERMS)
            .take(FALLBACK_TERMS)
            .cloned()
            .collect();
    }

    must_terms.truncate(MAX_TERMS_PER_LIST);
    nice_terms.truncate(MAX_TERMS_PER_LIST);

    JdTerms {
        must_terms,
        nice_terms,
        domain_terms,
    }
}

/// Deduplicated candidate terms: acronyms, then known skills, then frequent n-grams.
pub fn domain_terms(jd_text: &str, config: &MatcherConfig) -> Vec<String> {
    let jd_lower = jd_text.to_lowercase();

    let acronyms = ACRONYM_RE
        .find_iter(jd_text)
        .map(|m| m.as_str().to_lowercase());
    let skills = config
        .known_skills
        .iter()
        .filter(|skill| contains_phrase(&jd_lower, skill))
        .cloned();
    let frequent = frequent_terms(jd_text, config).into_iter().map(|(term, _)| term);

    let mut seen = HashSet::new();
    acronyms
        .chain(skills)
        .chain(frequent)
        .filter(|term| !config.is_stopword(term) && !is_generic(term))
        .filter(|term| seen.insert(term.clone()))
        .take(MAX_DOMAIN_TERMS)
        .collect()
}

/// Unigrams and bigrams with frequency ≥2, sorted by descending frequency.
/// Ties keep first-occurrence order. A bigram never repeats the same word.
pub fn frequent_terms(jd_text: &str, config: &MatcherConfig) -> Vec<(String, u32)> {
    let tokens: Vec<String> = tokenize(jd_text).collect();
    let mut order: Vec<(String, u32)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut bump = |term: String| match index.get(&term).copied() {
        Some(i) => order[i].1 += 1,
        None => {
            index.insert(term.clone(), order.len());
            order.push((term, 1));
        }
    };

    for (i, token) in tokens.iter().enumerate() {
        if is_unigram_candidate(token, config) {
            bump(token.clone());
        }
        if let Some(next) = tokens.get(i + 1) {
            if next != token
                && is_bigram_word(token, config)
                && is_bigram_word(next, config)
                && !is_numeric(next)
            {
                bump(format!("{token} {next}"));
            }
        }
    }

    let mut frequent: Vec<(String, u32)> = order
        .into_iter()
        .filter(|(term, count)| *count >= MIN_TERM_FREQUENCY && term.len() <= MAX_TERM_CHARS)
        .collect();
    frequent.sort_by(|a, b| b.1.cmp(&a.1));
    frequent
}

fn is_unigram_candidate(token: &str, config: &MatcherConfig) -> bool {
    token.len() >= MIN_KEYWORD_LEN
        && !config.is_stopword(token)
        && token.chars().any(|c| c.is_ascii_alphabetic())
}

fn is_bigram_word(token: &str, config: &MatcherConfig) -> bool {
    token.chars().any(|c| c.is_ascii_alphanumeric()) && !config.is_stopword(token)
}

fn is_numeric(token: &str) -> bool {
    token.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-'))
}

fn is_generic(term: &str) -> bool {
    term.split_whitespace().any(|word| {
        GENERIC_WORDS.contains(&word) || GENERIC_PREFIXES.iter().any(|p| word.starts_with(p))
    })
}

/// Text spans following must-have and nice-to-have markers in the lowercased JD.
#[derive(Debug, Default)]
struct RequirementWindows<'a> {
    must: Vec<&'a str>,
    nice: Vec<&'a str>,
}

impl<'a> RequirementWindows<'a> {
    fn find(jd_lower: &'a str) -> Self {
        let mut marker_starts: Vec<usize> = MUST_MARKER_RE
            .find_iter(jd_lower)
            .chain(NICE_MARKER_RE.find_iter(jd_lower))
            .map(|m| m.start())
            .collect();
        marker_starts.sort_unstable();

        let window_after = |marker_end: usize| -> &'a str {
            let char_limit = jd_lower[marker_end..]
                .char_indices()
                .nth(WINDOW_CHARS)
                .map_or(jd_lower.len(), |(offset, _)| marker_end + offset);
            // A window stops where the next marker of either kind begins.
            let next_marker = marker_starts
                .iter()
                .copied()
                .find(|&start| start >= marker_end)
                .unwrap_or(jd_lower.len());
            &jd_lower[marker_end..char_limit.min(next_marker)]
        };

        Self {
            must: MUST_MARKER_RE
                .find_iter(jd_lower)
                .map(|m| window_after(m.end()))
                .collect(),
            nice: NICE_MARKER_RE
                .find_iter(jd_lower)
                .map(|m| window_after(m.end()))
                .collect(),
        }
    }
}
