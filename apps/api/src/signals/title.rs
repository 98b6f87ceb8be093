//! Most-recent job title detection.
//!
//! Resumes list the latest role first, so the first title-shaped line inside an
//! experience-looking block is taken. Falls back to the first title-shaped line
//! anywhere in the document.

use once_cell::sync::Lazy;
use regex::Regex;

const MAX_TITLE_CHARS: usize = 120;
const MAX_TITLE_WORDS: usize = 8;

static ROLE_WORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:engineer|developer|manager|lead|architect|analyst|scientist|consultant|designer|administrator|director|specialist|programmer|researcher|officer|coordinator|technician|intern|junior|senior|staff|principal|head)s?\b",
    )
    .unwrap()
});

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

static BLANK_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t\r]*\n").unwrap());

static EXPERIENCE_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bexperience\b").unwrap());

// "Title – Company", "Title | Company", "Title at Company", "Title, Company"
static TITLE_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*,\s+|\s+(?:[–—|@-]|at)\s+").unwrap());

/// Most recent title-looking line, if any.
pub fn detect_recent_title(text: &str) -> Option<String> {
    let attempts: [fn(&str) -> Option<String>; 2] = [title_in_experience_blocks, title_anywhere];
    attempts.iter().find_map(|attempt| attempt(text))
}

fn title_in_experience_blocks(text: &str) -> Option<String> {
    BLANK_LINE_RE
        .split(text)
        .filter(|block| looks_like_experience_block(block))
        .find_map(|block| block.lines().find_map(title_from_line))
}

fn title_anywhere(text: &str) -> Option<String> {
    text.lines().find_map(title_from_line)
}

fn looks_like_experience_block(block: &str) -> bool {
    YEAR_RE.is_match(block) || EXPERIENCE_WORD_RE.is_match(block)
}

/// Returns the title part of a line short enough to be a heading rather than a sentence.
fn title_from_line(line: &str) -> Option<String> {
    let line = line
        .trim()
        .trim_start_matches(['•', '*', '-', '·', '–'])
        .trim();
    if line.is_empty()
        || line.chars().count() > MAX_TITLE_CHARS
        || line.split_whitespace().count() > MAX_TITLE_WORDS
        || line.ends_with(['.', '!', '?'])
        || !ROLE_WORD_RE.is_match(line)
    {
        return None;
    }

    // Prefer the segment that carries the role word ("Acme – Senior Engineer" works too).
    let title = TITLE_SEPARATOR_RE
        .split(line)
        .find(|segment| ROLE_WORD_RE.is_match(segment))
        .unwrap_or(line)
        .trim()
        .trim_end_matches([';', ':'])
        .trim();

    (!title.is_empty()).then(|| title.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_experience_block() {
        let resume = "Jane Doe\njane@example.com\n\nEXPERIENCE\nSenior Backend Engineer – Acme Corp\nJan 2020 - Present\nBuilt billing services.";
        assert_eq!(
            detect_recent_title(resume).as_deref(),
            Some("Senior Backend Engineer")
        );
    }

    #[test]
    fn test_title_at_company() {
        let resume = "Work history 2018 - 2022\nData Analyst at Initech\nBuilt dashboards.";
        assert_eq!(detect_recent_title(resume).as_deref(), Some("Data Analyst"));
    }

    #[test]
    fn test_company_first_line_picks_role_segment() {
        let resume = "2021 - Present\nGlobex | Staff Platform Engineer";
        assert_eq!(
            detect_recent_title(resume).as_deref(),
            Some("Staff Platform Engineer")
        );
    }

    #[test]
    fn test_sentences_are_not_titles() {
        let resume = "I am a senior engineer who loves building scalable systems.";
        assert_eq!(detect_recent_title(resume), None);
    }

    #[test]
    fn test_falls_back_to_whole_document() {
        let resume = "John Smith\nFull-Stack Developer\nLondon";
        assert_eq!(
            detect_recent_title(resume).as_deref(),
            Some("Full-Stack Developer")
        );
    }

    #[test]
    fn test_experience_block_preferred_over_header() {
        let resume = "Aspiring Engineering Manager\n\nExperience\n- Junior Developer, Hooli, 2019 - 2021";
        assert_eq!(
            detect_recent_title(resume).as_deref(),
            Some("Junior Developer")
        );
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(detect_recent_title(""), None);
    }
}
