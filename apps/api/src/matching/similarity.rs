//! Bag-of-words vectors and cosine similarity.

use std::collections::HashMap;

/// Term-frequency vector over keyword tokens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermBag {
    counts: HashMap<String, u64>,
}

impl TermBag {
    pub fn from_tokens<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut counts = HashMap::new();
        for token in tokens {
            *counts.entry(token).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn count(&self, term: &str) -> u64 {
        self.counts.get(term).copied().unwrap_or(0)
    }

    // Integer accumulation keeps the result independent of map iteration order.
    fn dot(&self, other: &TermBag) -> u64 {
        let (small, large) = if self.counts.len() <= other.counts.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .counts
            .iter()
            .map(|(term, count)| count * large.count(term))
            .sum()
    }

    /// Euclidean norm; an empty bag reports 1 so division stays defined.
    fn norm(&self) -> f64 {
        let squared: u64 = self.counts.values().map(|c| c * c).sum();
        if squared == 0 {
            1.0
        } else {
            (squared as f64).sqrt()
        }
    }
}

/// Cosine similarity in `[0, 1]`; 0 when either bag is empty.
pub fn cosine_similarity(a: &TermBag, b: &TermBag) -> f64 {
    (a.dot(b) as f64 / (a.norm() * b.norm())).clamp(0.0, 1.0)
}

/// Cosine over distinct terms (every count read as 1); 0 when either bag is empty.
/// Repeating a term already in `b` leaves the result unchanged.
pub fn distinct_cosine(a: &TermBag, b: &TermBag) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let shared = a.counts.keys().filter(|term| b.counts.contains_key(*term)).count();
    let norms = ((a.counts.len() * b.counts.len()) as f64).sqrt();
    (shared as f64 / norms).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bag(words: &[&str]) -> TermBag {
        TermBag::from_tokens(words.iter().map(|w| w.to_string()))
    }

    #[test]
    fn test_distinct_cosine_ignores_repetition() {
        let jd = bag(&["python", "kubernetes"]);
        let before = distinct_cosine(&jd, &bag(&["python", "python", "kubernetes"]));
        let after = distinct_cosine(&jd, &bag(&["python", "python", "python", "kubernetes"]));
        assert!((before - 1.0).abs() < 1e-12);
        assert_eq!(before, after);
        assert!((distinct_cosine(&jd, &bag(&["python", "go"])) - 0.5).abs() < 1e-12);
        assert_eq!(distinct_cosine(&jd, &bag(&[])), 0.0);
    }

    #[test]
    fn test_identical_bags_score_one() {
        let a = bag(&["rust", "tokio", "rust"]);
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_disjoint_bags_score_zero() {
        assert_eq!(cosine_similarity(&bag(&["rust"]), &bag(&["java"])), 0.0);
    }

    #[test]
    fn test_empty_bag_scores_zero() {
        assert_eq!(cosine_similarity(&bag(&[]), &bag(&["rust"])), 0.0);
        assert_eq!(cosine_similarity(&bag(&[]), &bag(&[])), 0.0);
    }

    #[test]
    fn test_partial_overlap_value() {
        // dot = 1, |a| = sqrt(2), |b| = 1
        let sim = cosine_similarity(&bag(&["rust", "go"]), &bag(&["rust"]));
        assert!((sim - 1.0 / 2f64.sqrt()).abs() < 1e-12, "sim was {sim}");
    }

    #[test]
    fn test_counts_accumulate() {
        let b = bag(&["aws", "aws", "gcp"]);
        assert_eq!(b.count("aws"), 2);
        assert_eq!(b.count("azure"), 0);
        assert!(!b.is_empty());
    }
}
