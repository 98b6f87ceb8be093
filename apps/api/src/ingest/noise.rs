//! Cheap heuristics for text that is not worth scoring.

use once_cell::sync::Lazy;
use regex::Regex;

/// Prefix inspected when sniffing raw uploads.
pub const SNIFF_BYTES: usize = 2048;

const MIN_NON_WHITESPACE: usize = 40;
const MIN_LETTER_RATIO: f64 = 0.35;

// PDF object syntax. `stream`/`endobj` only count on their own line so that
// prose like "data streaming" is not flagged.
static PDF_OBJECT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)%PDF-|/Type\s*/XObject|/Subtype\s*/(?:Image|Form)|/CCITTFaxDecode|\b\d+\s+\d+\s+obj\b|^\s*(?:endobj|endstream|stream)\s*$",
    )
    .unwrap()
});

/// True when `text` looks like undecoded PDF internals (typically a scanned document).
pub fn looks_like_binary_artifact(text: &str) -> bool {
    PDF_OBJECT_RE.is_match(text)
}

/// True when `text` is too short, or too symbol-heavy, to be a real resume.
pub fn is_mostly_noise(text: &str) -> bool {
    let (visible, letters) = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .fold((0usize, 0usize), |(visible, letters), c| {
            (visible + 1, letters + usize::from(c.is_alphabetic()))
        });

    visible < MIN_NON_WHITESPACE || (letters as f64 / visible as f64) < MIN_LETTER_RATIO
}
