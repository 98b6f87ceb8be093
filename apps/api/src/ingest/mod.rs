//! Ingest: collaborators that turn uploaded bytes into text.
//!
//! Every collaborator sits behind a trait so the pipeline never depends on a
//! concrete extractor, OCR engine, or embedding service. The defaults below
//! are pure Rust and need no external service.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

use crate::config::Config;

pub mod noise;

use noise::{looks_like_binary_artifact, SNIFF_BYTES};

// ────────────────────────────────────────────────────────────────────────────
// Collaborator traits
// ────────────────────────────────────────────────────────────────────────────

/// Output of a text extractor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedText {
    /// Text fit for scoring. Empty when the upload looked like binary data.
    pub text: String,
    /// Everything the extractor decoded, before any filtering.
    pub raw: String,
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, bytes: &[u8], filename: &str) -> Result<ExtractedText>;
}

#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognized text, or an empty string when nothing was found.
    async fn recognize(&self, bytes: &[u8]) -> Result<String>;
}

/// Similarity between two texts in `[0, 1]`.
#[async_trait]
pub trait SemanticSimilarity: Send + Sync {
    async fn similarity(&self, a: &str, b: &str) -> Result<f64>;
}

// ────────────────────────────────────────────────────────────────────────────
// Defaults
// ────────────────────────────────────────────────────────────────────────────

/// Decodes uploads as UTF-8 (lossy). Rejects PDF object data sniffed from the
/// first `SNIFF_BYTES`.
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, bytes: &[u8], filename: &str) -> Result<ExtractedText> {
        let head = String::from_utf8_lossy(&bytes[..bytes.len().min(SNIFF_BYTES)]);
        let raw = String::from_utf8_lossy(bytes).into_owned();
        if looks_like_binary_artifact(&head) {
            tracing::debug!("{filename}: binary upload, no text layer");
            return Ok(ExtractedText {
                text: String::new(),
                raw,
            });
        }
        Ok(ExtractedText {
            text: raw.clone(),
            raw,
        })
    }
}

pub struct DisabledOcr;

#[async_trait]
impl OcrEngine for DisabledOcr {
    async fn recognize(&self, _bytes: &[u8]) -> Result<String> {
        Ok(String::new())
    }
}

pub struct NoSemanticSimilarity;

#[async_trait]
impl SemanticSimilarity for NoSemanticSimilarity {
    async fn similarity(&self, _a: &str, _b: &str) -> Result<f64> {
        Ok(0.0)
    }
}

/// The collaborator set handed to the screening pipeline.
#[derive(Clone)]
pub struct Collaborators {
    pub extractor: Arc<dyn TextExtractor>,
    pub ocr: Arc<dyn OcrEngine>,
    pub semantic: Arc<dyn SemanticSimilarity>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            extractor: Arc::new(PlainTextExtractor),
            ocr: Arc::new(DisabledOcr),
            semantic: Arc::new(NoSemanticSimilarity),
        }
    }
}

impl Collaborators {
    pub fn from_config(config: &Config) -> Self {
        if config.ocr_enabled {
            warn!("OCR_ENABLED is set but no OCR backend is built in; OCR stays disabled");
        }
        Self::default()
    }
}
