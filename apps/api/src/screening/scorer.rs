//! Fit Scoring: pluggable, trait-based scorer that measures one resume against a JD.
//!
//! Default: `KeywordFitScorer` (pure-Rust, fast, deterministic, fully testable).
//!
//! `AppState` holds an `Arc<dyn FitScorer>`, so the HTTP layer never depends on
//! a concrete backend.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::matching::config::MatcherConfig;
use crate::matching::fuzzy::{contains_phrase, fuzzy_contains};
use crate::matching::similarity::{cosine_similarity, distinct_cosine, TermBag};
use crate::matching::terms::{extract_terms, JdTerms};
use crate::matching::tokenizer::keyword_tokens;
use crate::models::screening::{ScoreBreakdown, NOT_FOUND};
use crate::screening::evidence::{collect_matches, snippet, MAX_GAPS};
use crate::signals::education::detect_education;
use crate::signals::experience::estimate_experience;
use crate::signals::title::detect_recent_title;

// ────────────────────────────────────────────────────────────────────────────
// Weights and decision thresholds
// ────────────────────────────────────────────────────────────────────────────

/// Weighted blend of the three scoring signals. Must-have coverage dominates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringWeights {
    pub must: f64,
    pub nice: f64,
    /// Applied to `max(distinct_cosine, semantic_boost)`.
    pub topical: f64,
}

pub const WEIGHTS: ScoringWeights = ScoringWeights {
    must: 0.65,
    nice: 0.20,
    topical: 0.15,
};

pub const RECOMMEND_THRESHOLD: f64 = 0.60;
/// Share of must-have terms a recommended resume has to cover.
pub const MIN_MUST_COVERAGE: f64 = 0.4;
/// Matched nice-to-have terms that saturate the nice score.
pub const NICE_SATURATION: f64 = 6.0;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The fit scorer trait. Implement this to swap backends without touching
/// the pipeline or handlers.
///
/// Carried in `AppState` as `Arc<dyn FitScorer>`.
pub trait FitScorer: Send + Sync {
    fn score(&self, jd_text: &str, resume_text: &str, semantic_boost: f64) -> ScoreBreakdown;

    /// Backend name for logs, e.g. "keyword".
    fn backend(&self) -> &'static str;
}

/// Keyword/fuzzy/cosine scorer over an injected `MatcherConfig`.
pub struct KeywordFitScorer {
    config: Arc<MatcherConfig>,
    /// Evaluation date for "present"; `None` means today (UTC).
    today: Option<NaiveDate>,
}

impl KeywordFitScorer {
    pub fn new(config: Arc<MatcherConfig>) -> Self {
        Self {
            config,
            today: None,
        }
    }

    /// Pins the evaluation date so results do not drift with the calendar.
    pub fn with_today(config: Arc<MatcherConfig>, today: NaiveDate) -> Self {
        Self {
            config,
            today: Some(today),
        }
    }
}

impl FitScorer for KeywordFitScorer {
    fn score(&self, jd_text: &str, resume_text: &str, semantic_boost: f64) -> ScoreBreakdown {
        let today = self.today.unwrap_or_else(|| Utc::now().date_naive());
        score_resume(jd_text, resume_text, semantic_boost, &self.config, today)
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Term matching
// ────────────────────────────────────────────────────────────────────────────

/// JD terms split by whether the resume covers them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermMatches {
    pub matched_must: Vec<String>,
    /// Must-have terms the resume does not cover, in JD order.
    pub gaps_must: Vec<String>,
    pub matched_nice: Vec<String>,
}

impl TermMatches {
    pub fn compute(terms: &JdTerms, resume_lower: &str, config: &MatcherConfig) -> Self {
        let (matched_must, gaps_must): (Vec<String>, Vec<String>) = terms
            .must_terms
            .iter()
            .cloned()
            .partition(|term| resume_covers(resume_lower, term, config));
        let matched_nice = terms
            .nice_terms
            .iter()
            .filter(|term| resume_covers(resume_lower, term, config))
            .cloned()
            .collect();
        Self {
            matched_must,
            gaps_must,
            matched_nice,
        }
    }

    pub fn must_fraction(&self) -> f64 {
        let total = (self.matched_must.len() + self.gaps_must.len()).max(1);
        self.matched_must.len() as f64 / total as f64
    }

    pub fn nice_score(&self) -> f64 {
        (self.matched_nice.len() as f64 / NICE_SATURATION).min(1.0)
    }

    /// Matched must-haves needed for a recommendation: `max(1, ceil(0.4·|must|))`.
    pub fn required_must_matches(&self) -> usize {
        let must_total = self.matched_must.len() + self.gaps_must.len();
        ((MIN_MUST_COVERAGE * must_total as f64).ceil() as usize).max(1)
    }
}

/// A term is covered by fuzzy containment or by any configured synonym.
pub fn resume_covers(resume_lower: &str, term: &str, config: &MatcherConfig) -> bool {
    fuzzy_contains(resume_lower, term)
        || config
            .synonyms_for(term)
            .iter()
            .any(|synonym| contains_phrase(resume_lower, synonym))
}

// ────────────────────────────────────────────────────────────────────────────
// Core scoring algorithm
// ────────────────────────────────────────────────────────────────────────────

/// Scores one resume against one JD.
///
/// Algorithm:
/// 1. cosine similarity of the keyword bags (reported) and of their distinct terms (scored)
/// 2. must/nice terms from the JD, fuzzy-matched against the lowercased resume
/// 3. score = 0.65·must_frac + 0.20·nice_score + 0.15·max(distinct_cosine, semantic_boost)
/// 4. recommend when score ≥ 0.60 and enough must-haves are covered
///
/// Repeating a word the resume already contains never lowers the score.
///
/// `notes` is left empty; the pipeline fills it with extraction notes.
pub fn score_resume(
    jd_text: &str,
    resume_text: &str,
    semantic_boost: f64,
    config: &MatcherConfig,
    today: NaiveDate,
) -> ScoreBreakdown {
    let jd_keywords = keyword_tokens(jd_text, config);
    let jd_bag = TermBag::from_tokens(jd_keywords.iter().cloned());
    let resume_bag = TermBag::from_tokens(keyword_tokens(resume_text, config));
    let cosine = cosine_similarity(&jd_bag, &resume_bag);

    let terms = extract_terms(jd_text, config);
    let resume_lower = resume_text.to_lowercase();
    let matches = TermMatches::compute(&terms, &resume_lower, config);

    let topical = distinct_cosine(&jd_bag, &resume_bag).max(sanitize_boost(semantic_boost));
    let score = (WEIGHTS.must * matches.must_fraction()
        + WEIGHTS.nice * matches.nice_score()
        + WEIGHTS.topical * topical)
        .clamp(0.0, 1.0);
    let recommend =
        score >= RECOMMEND_THRESHOLD && matches.matched_must.len() >= matches.required_must_matches();

    ScoreBreakdown {
        score,
        recommend,
        years: estimate_experience(resume_text, today),
        education: detect_education(resume_text),
        recent_title: detect_recent_title(resume_text).unwrap_or_else(|| NOT_FOUND.to_string()),
        matches: collect_matches(&matches.matched_must, &matches.matched_nice),
        gaps: matches.gaps_must.iter().take(MAX_GAPS).cloned().collect(),
        notes: String::new(),
        cosine,
        snippet: snippet(resume_text, &jd_keywords),
    }
}

/// External similarity is trusted only inside `[0, 1]`; anything else counts as absent.
fn sanitize_boost(boost: f64) -> f64 {
    if boost.is_finite() {
        boost.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
