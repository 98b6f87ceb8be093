use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::screening::EducationLevel;

static PHD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bph\.?\s?d\b|\bdoctor of philosophy\b|\bdoctorate\b|\bd\.phil\b").unwrap()
});

static MASTERS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\bmaster(?:'|’)?s\b|\bmaster of\b|\bm\.?sc\b|\bm\.s\.|\bm\.?tech\b|\bm\.?eng\b|\bmba\b|\bm\.a\.",
    )
    .unwrap()
});

static BACHELORS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\bbachelor|\bb\.?sc\b|\bb\.?tech\b|\bb\.e\.|\bb\.s\.|\bb\.a\.|\bb\.?eng\b|\bbca\b",
    )
    .unwrap()
});

static DIPLOMA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bdiploma\b|\bassociate(?:'s)? degree\b|\bassociate of\b").unwrap()
});

/// Classifiers in priority order; the first match wins.
fn classifiers() -> [(EducationLevel, &'static Regex); 4] {
    [
        (EducationLevel::Phd, &*PHD_RE),
        (EducationLevel::Masters, &*MASTERS_RE),
        (EducationLevel::Bachelors, &*BACHELORS_RE),
        (EducationLevel::Diploma, &*DIPLOMA_RE),
    ]
}

/// Highest credential mentioned in `text`.
pub fn detect_education(text: &str) -> EducationLevel {
    classifiers()
        .into_iter()
        .find_map(|(level, pattern)| pattern.is_match(text).then_some(level))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phd() {
        assert_eq!(detect_education("PhD in Computer Science"), EducationLevel::Phd);
        assert_eq!(detect_education("Ph.D. candidate, MIT"), EducationLevel::Phd);
    }

    #[test]
    fn test_btech_is_bachelors() {
        assert_eq!(detect_education("B.Tech, IIT Delhi"), EducationLevel::Bachelors);
    }

    #[test]
    fn test_highest_credential_wins() {
        let text = "BSc Physics (2012), MSc Data Science (2014)";
        assert_eq!(detect_education(text), EducationLevel::Masters);
    }

    #[test]
    fn test_diploma() {
        assert_eq!(
            detect_education("Diploma in Mechanical Engineering"),
            EducationLevel::Diploma
        );
    }

    #[test]
    fn test_nothing_found() {
        assert_eq!(detect_education("Self-taught developer"), EducationLevel::Unknown);
        assert_eq!(detect_education("Certified Scrum Master"), EducationLevel::Unknown);
        assert_eq!(detect_education("").to_string(), "—");
    }
}
