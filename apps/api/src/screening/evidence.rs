//! Evidence shown next to a score: matched terms and a short excerpt.

pub const MAX_MATCHES: usize = 6;
pub const MAX_GAPS: usize = 3;

const SNIPPET_BEFORE: usize = 80;
const SNIPPET_AFTER: usize = 120;
const SNIPPET_FALLBACK: usize = 200;
const ELLIPSIS: &str = "...";

/// Must-have matches first, then nice-to-have, deduplicated and capped.
pub fn collect_matches(must: &[String], nice: &[String]) -> Vec<String> {
    let mut matches: Vec<String> = Vec::with_capacity(MAX_MATCHES);
    for term in must.iter().chain(nice) {
        if matches.len() == MAX_MATCHES {
            break;
        }
        if !matches.contains(term) {
            matches.push(term.clone());
        }
    }
    matches
}

/// Excerpt around the first JD keyword found in `text`, or the opening of
/// `text` when none occurs. Offsets are in bytes, snapped to char boundaries.
pub fn snippet(text: &str, jd_keywords: &[String]) -> String {
    let lower = text.to_ascii_lowercase();
    let hit = jd_keywords
        .iter()
        .filter(|k| !k.is_empty())
        .find_map(|k| lower.find(k.as_str()));

    let (start, end) = match hit {
        Some(pos) => (
            floor_char_boundary(text, pos.saturating_sub(SNIPPET_BEFORE)),
            ceil_char_boundary(text, pos + SNIPPET_AFTER),
        ),
        None => (0, ceil_char_boundary(text, SNIPPET_FALLBACK)),
    };

    let mut excerpt = text[start..end].to_string();
    if end < text.len() {
        excerpt.push_str(ELLIPSIS);
    }
    excerpt
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_matches_are_capped_and_deduplicated() {
        let must = strings(&["rust", "tokio", "axum", "serde"]);
        let nice = strings(&["rust", "grpc", "kafka", "redis"]);
        assert_eq!(
            collect_matches(&must, &nice),
            strings(&["rust", "tokio", "axum", "serde", "grpc", "kafka"])
        );
    }

    #[test]
    fn test_snippet_around_first_keyword() {
        let text = format!("{}Kubernetes operator work{}", "x".repeat(100), "y".repeat(200));
        let excerpt = snippet(&text, &strings(&["missing", "kubernetes"]));
        assert!(excerpt.starts_with("xxxxxxxxxxxxxxxxxxxx"));
        assert!(excerpt.contains("Kubernetes operator"));
        assert!(excerpt.ends_with("..."));
        assert_eq!(excerpt.len(), 200 + ELLIPSIS.len());
    }

    #[test]
    fn test_snippet_falls_back_to_opening() {
        assert_eq!(snippet("Short resume", &strings(&["golang"])), "Short resume");
        let long = "a".repeat(300);
        assert_eq!(snippet(&long, &[]), format!("{}...", "a".repeat(200)));
    }

    #[test]
    fn test_snippet_respects_char_boundaries() {
        let text = format!("{}python", "é".repeat(60));
        let excerpt = snippet(&text, &strings(&["python"]));
        assert!(excerpt.ends_with("python"));
        assert!(!excerpt.ends_with("..."));
    }

    #[test]
    fn test_snippet_of_empty_text() {
        assert_eq!(snippet("", &strings(&["rust"])), "");
    }
}
