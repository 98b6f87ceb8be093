use std::fmt;

use serde::{Serialize, Serializer};

/// Placeholder shown wherever a signal could not be determined.
pub const NOT_FOUND: &str = "—";

/// A JD or resume as plain text, alive for one scoring request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub raw_text: String,
    /// Characters after trimming surrounding whitespace.
    pub char_count: usize,
}

impl Document {
    pub fn new(raw_text: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        let char_count = raw_text.trim().chars().count();
        Self {
            raw_text,
            char_count,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.char_count == 0
    }
}

/// Highest credential detected in a resume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum EducationLevel {
    #[serde(rename = "PhD")]
    Phd,
    #[serde(rename = "Master's")]
    Masters,
    #[serde(rename = "Bachelor's")]
    Bachelors,
    #[serde(rename = "Diploma")]
    Diploma,
    #[default]
    #[serde(rename = "—")]
    Unknown,
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EducationLevel::Phd => "PhD",
            EducationLevel::Masters => "Master's",
            EducationLevel::Bachelors => "Bachelor's",
            EducationLevel::Diploma => "Diploma",
            EducationLevel::Unknown => NOT_FOUND,
        };
        f.write_str(label)
    }
}

/// Estimated total professional experience.
///
/// Serialized as its display form: `"5.0 yrs"`, `"4 mos"` or `"—"`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ExperienceEstimate {
    Years(f64),
    Months(u32),
    #[default]
    Unknown,
}

impl ExperienceEstimate {
    /// Half a year or more reads as years, anything shorter as months.
    pub fn from_months(months: u32) -> Self {
        if months == 0 {
            ExperienceEstimate::Unknown
        } else if months >= 6 {
            ExperienceEstimate::Years(f64::from(months) / 12.0)
        } else {
            ExperienceEstimate::Months(months)
        }
    }
}

impl fmt::Display for ExperienceEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperienceEstimate::Years(years) => write!(f, "{years:.1} yrs"),
            ExperienceEstimate::Months(months) => write!(f, "{months} mos"),
            ExperienceEstimate::Unknown => f.write_str(NOT_FOUND),
        }
    }
}

impl Serialize for ExperienceEstimate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Scoring result for one resume against one JD.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    /// 0.0 – 1.0
    pub score: f64,
    pub recommend: bool,
    pub years: ExperienceEstimate,
    pub education: EducationLevel,
    pub recent_title: String,
    /// Matched JD terms, must-haves first (≤6).
    pub matches: Vec<String>,
    /// Unmatched must-have terms (≤3).
    pub gaps: Vec<String>,
    pub notes: String,
    /// Keyword-bag cosine similarity, reported for transparency.
    pub cosine: f64,
    pub snippet: String,
}

impl Default for ScoreBreakdown {
    fn default() -> Self {
        Self {
            score: 0.0,
            recommend: false,
            years: ExperienceEstimate::Unknown,
            education: EducationLevel::Unknown,
            recent_title: NOT_FOUND.to_string(),
            matches: vec![],
            gaps: vec![],
            notes: String::new(),
            cosine: 0.0,
            snippet: String::new(),
        }
    }
}

/// One row of the ranked shortlist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortlistRow {
    pub filename: String,
    pub char_count: usize,
    #[serde(flatten)]
    pub breakdown: ScoreBreakdown,
}

impl ShortlistRow {
    /// Zero-score row used when a resume could not be processed at all.
    pub fn failed(filename: impl Into<String>, note: &str) -> Self {
        Self {
            filename: filename.into(),
            char_count: 0,
            breakdown: ScoreBreakdown {
                notes: note.to_string(),
                ..ScoreBreakdown::default()
            },
        }
    }
}
