//! Experience estimate from employment date ranges, with an explicit
//! "N years of experience" phrase as fallback.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::models::screening::ExperienceEstimate;

/// Ranges at or above this many months are discarded as parse noise.
const MAX_RANGE_MONTHS: i64 = 80 * 12;
/// Below a year of dated history, an explicit phrase is more trustworthy.
const MIN_RANGE_MONTHS: u32 = 12;

const MONTH: &str = r"(jan|feb|mar|apr|may|jun|jul|aug|sept|sep|oct|nov|dec)[a-z]*\.?";
const YEAR: &str = r"((?:19|20)\d{2})";

static DATE_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:{MONTH}\s+)?{YEAR}\s*(?:-|–|—|to|until|till)\s*(?:(?:{MONTH}\s+)?{YEAR}|(present|now|current|today))\b"
    ))
    .unwrap()
});

static YEARS_PHRASE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})\s*\+?\s*(?:years?|yrs?)\b(?:\s+of)?\s+(?:experience|exp)\b").unwrap()
});

/// Estimates total experience in `text`, treating "present" as `today`.
pub fn estimate_experience(text: &str, today: NaiveDate) -> ExperienceEstimate {
    let range_months = months_from_date_ranges(text, today);
    if range_months >= MIN_RANGE_MONTHS {
        return ExperienceEstimate::from_months(range_months);
    }
    if let Some(years) = years_from_phrase(text).filter(|&years| years > 0) {
        return ExperienceEstimate::from_months(years.saturating_mul(12));
    }
    ExperienceEstimate::from_months(range_months)
}

/// Sums the month spans of every distinct date range in `text`.
/// Identical range strings count once; negative and absurd spans are skipped.
pub fn months_from_date_ranges(text: &str, today: NaiveDate) -> u32 {
    let present = month_index(today.year(), today.month());
    let mut seen = HashSet::new();
    let mut total: i64 = 0;

    for caps in DATE_RANGE_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if !seen.insert(whole.as_str().to_lowercase()) {
            continue;
        }
        let Some(start) = year_month(&caps, 1, 2) else { continue };
        let end = if caps.get(5).is_some() {
            present
        } else {
            match year_month(&caps, 3, 4) {
                Some(end) => end,
                None => continue,
            }
        };
        let delta = end - start;
        if delta > 0 && delta < MAX_RANGE_MONTHS {
            total += delta;
        }
    }

    u32::try_from(total).unwrap_or(u32::MAX)
}

/// Years stated directly, e.g. "7+ years of experience".
pub fn years_from_phrase(text: &str) -> Option<u32> {
    YEARS_PHRASE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn month_index(year: i32, month: u32) -> i64 {
    i64::from(year) * 12 + i64::from(month) - 1
}

/// A bare year reads as January of that year.
fn year_month(caps: &Captures<'_>, month_group: usize, year_group: usize) -> Option<i64> {
    let year: i32 = caps.get(year_group)?.as_str().parse().ok()?;
    let month = caps
        .get(month_group)
        .and_then(|m| month_number(m.as_str()))
        .unwrap_or(1);
    Some(month_index(year, month))
}

fn month_number(name: &str) -> Option<u32> {
    let key: String = name.chars().take(3).collect::<String>().to_ascii_lowercase();
    let month = match key.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_range_to_present() {
        let estimate = estimate_experience("Acme Corp, Jan 2019 - Present", jan_2024());
        assert_eq!(estimate.to_string(), "5.0 yrs");
    }

    #[test]
    fn test_multiple_ranges_are_summed() {
        let text = "Globex  March 2015 – June 2017\nInitech  Sept 2017 to Dec 2019";
        // 27 + 27 months
        assert_eq!(months_from_date_ranges(text, jan_2024()), 54);
        assert_eq!(estimate_experience(text, jan_2024()).to_string(), "4.5 yrs");
    }

    #[test]
    fn test_bare_years_read_as_january() {
        assert_eq!(months_from_date_ranges("2016 - 2020", jan_2024()), 48);
        assert_eq!(months_from_date_ranges("2021 to current", jan_2024()), 36);
    }

    #[test]
    fn test_duplicate_range_text_counts_once() {
        let text = "Jan 2020 - Jan 2022 (contract)\nJan 2020 - Jan 2022 (full time)";
        assert_eq!(months_from_date_ranges(text, jan_2024()), 24);
    }

    #[test]
    fn test_negative_ranges_are_ignored() {
        assert_eq!(months_from_date_ranges("Dec 2022 - Jan 2020", jan_2024()), 0);
    }

    #[test]
    fn test_phrase_fallback_when_ranges_are_short() {
        let text = "7+ years of experience in payments. Contract: Mar 2023 - May 2023";
        assert_eq!(estimate_experience(text, jan_2024()).to_string(), "7.0 yrs");
    }

    #[test]
    fn test_zero_years_phrase_is_not_experience() {
        assert_eq!(
            estimate_experience("0 years of experience, eager to learn", jan_2024()).to_string(),
            "—"
        );
        let text = "0 years of experience. Intern, Mar 2023 - May 2023";
        assert_eq!(estimate_experience(text, jan_2024()).to_string(), "2 mos");
    }

    #[test]
    fn test_short_range_without_phrase_reports_months() {
        let text = "Intern, Mar 2023 - May 2023";
        assert_eq!(estimate_experience(text, jan_2024()).to_string(), "2 mos");
    }

    #[test]
    fn test_nothing_found() {
        assert_eq!(
            estimate_experience("Enthusiastic learner", jan_2024()),
            ExperienceEstimate::Unknown
        );
        assert_eq!(estimate_experience("", jan_2024()).to_string(), "—");
    }

    #[test]
    fn test_month_table_accepts_sept_and_full_names() {
        assert_eq!(month_number("Sept"), Some(9));
        assert_eq!(month_number("september"), Some(9));
        assert_eq!(month_number("xyz"), None);
    }
}
