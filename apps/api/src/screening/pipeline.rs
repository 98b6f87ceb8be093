//! Screening pipeline: turns one JD and a batch of uploads into a ranked shortlist.
//!
//! Each resume is an independent task: extract → OCR when short → noise checks
//! → semantic similarity → score. Collaborator failures and timeouts degrade
//! the row (empty text, zero similarity, a note) and never fail the batch.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::AppError;
use crate::ingest::noise::{is_mostly_noise, looks_like_binary_artifact};
use crate::ingest::Collaborators;
use crate::models::screening::{Document, ShortlistRow};
use crate::screening::scorer::FitScorer;

pub const MISSING_INPUT: &str = "Missing job description (text or file) or resumes.";

pub const NOTE_SCAN: &str = "No/low extractable text (scan?)";
pub const NOTE_OCR: &str = "OCR used";
pub const NOTE_CLIENT_OCR: &str = "Client OCR used";
pub const NOTE_LITTLE_TEXT: &str = "Very little text extracted.";
pub const NOTE_NO_SEMANTIC: &str = "Semantic similarity unavailable";
pub const NOTE_FAILED: &str = "Scoring failed";

/// One uploaded resume.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub filename: String,
    pub bytes: Bytes,
    /// The client already ran OCR and uploaded the recognized text.
    pub client_ocr: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub collaborator_timeout: Duration,
    pub max_concurrency: usize,
    /// Trimmed character count below which OCR is attempted.
    pub ocr_min_chars: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            collaborator_timeout: Duration::from_millis(5000),
            max_concurrency: 4,
            ocr_min_chars: 120,
        }
    }
}

impl PipelineOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            collaborator_timeout: Duration::from_millis(config.collaborator_timeout_ms),
            max_concurrency: config.max_concurrency.max(1),
            ..Self::default()
        }
    }
}

/// Scores every upload against `jd_text` and returns rows sorted by score
/// (descending, ties by filename).
pub async fn screen_resumes(
    jd_text: &str,
    uploads: Vec<ResumeUpload>,
    scorer: Arc<dyn FitScorer>,
    collaborators: &Collaborators,
    options: PipelineOptions,
) -> Result<Vec<ShortlistRow>, AppError> {
    if jd_text.trim().is_empty() || uploads.is_empty() {
        return Err(AppError::Validation(MISSING_INPUT.to_string()));
    }

    info!(
        resumes = uploads.len(),
        backend = scorer.backend(),
        "Screening batch"
    );

    let jd: Arc<str> = Arc::from(jd_text);
    let permits = Arc::new(Semaphore::new(options.max_concurrency.max(1)));

    let handles: Vec<(String, JoinHandle<ShortlistRow>)> = uploads
        .into_iter()
        .map(|upload| {
            let filename = upload.filename.clone();
            let jd = Arc::clone(&jd);
            let scorer = Arc::clone(&scorer);
            let collaborators = collaborators.clone();
            let permits = Arc::clone(&permits);
            let handle = tokio::spawn(async move {
                // The semaphore is never closed.
                let _permit = permits.acquire_owned().await.ok();
                screen_one(jd, upload, scorer, &collaborators, options).await
            });
            (filename, handle)
        })
        .collect();

    let mut rows = Vec::with_capacity(handles.len());
    for (filename, handle) in handles {
        match handle.await {
            Ok(row) => rows.push(row),
            Err(e) => {
                warn!("{filename}: scoring task failed: {e}");
                rows.push(ShortlistRow::failed(filename, NOTE_FAILED));
            }
        }
    }

    rank(&mut rows);
    Ok(rows)
}

/// Highest score first; equal scores keep a stable, name-based order.
pub fn rank(rows: &mut [ShortlistRow]) {
    rows.sort_by(|a, b| {
        b.breakdown
            .score
            .total_cmp(&a.breakdown.score)
            .then_with(|| a.filename.cmp(&b.filename))
    });
}

async fn screen_one(
    jd: Arc<str>,
    upload: ResumeUpload,
    scorer: Arc<dyn FitScorer>,
    collaborators: &Collaborators,
    options: PipelineOptions,
) -> ShortlistRow {
    let ResumeUpload {
        filename,
        bytes,
        client_ocr,
    } = upload;
    let limit = options.collaborator_timeout;
    let mut notes: Vec<&str> = Vec::new();
    if client_ocr {
        notes.push(NOTE_CLIENT_OCR);
    }

    let extracted = call_collaborator(
        limit,
        "extract",
        &filename,
        collaborators.extractor.extract(&bytes, &filename),
    )
    .await
    .unwrap_or_default();
    let mut document = Document::new(extracted.text);

    let mut ocr_used = false;
    if document.char_count < options.ocr_min_chars {
        let recognized = call_collaborator(
            limit,
            "ocr",
            &filename,
            collaborators.ocr.recognize(&bytes),
        )
        .await
        .unwrap_or_default();
        let candidate = Document::new(recognized);
        if candidate.char_count > document.char_count {
            document = candidate;
            ocr_used = true;
            notes.push(NOTE_OCR);
        }
    }

    let scanned = is_mostly_noise(&document.raw_text)
        || (!ocr_used && looks_like_binary_artifact(&extracted.raw));
    if scanned {
        notes.push(NOTE_SCAN);
    } else if document.char_count < options.ocr_min_chars && !ocr_used {
        notes.push(NOTE_LITTLE_TEXT);
    }

    let semantic_boost = if document.is_blank() {
        0.0
    } else {
        match call_collaborator(
            limit,
            "semantic",
            &filename,
            collaborators.semantic.similarity(&jd, &document.raw_text),
        )
        .await
        {
            Some(similarity) => similarity,
            None => {
                notes.push(NOTE_NO_SEMANTIC);
                0.0
            }
        }
    };

    // Scoring is CPU-bound; keep it off the async workers.
    let resume_text = document.raw_text.clone();
    let scored =
        tokio::task::spawn_blocking(move || scorer.score(&jd, &resume_text, semantic_boost)).await;
    let mut breakdown = match scored {
        Ok(breakdown) => breakdown,
        Err(e) => {
            warn!("{filename}: scoring failed: {e}");
            return ShortlistRow::failed(filename, NOTE_FAILED);
        }
    };
    breakdown.notes = notes.join("; ");
    debug!(
        "{filename}: {} chars, score {:.3}",
        document.char_count, breakdown.score
    );

    ShortlistRow {
        filename,
        char_count: document.char_count,
        breakdown,
    }
}

/// Awaits `call` within `limit`. Errors and timeouts are logged and read as `None`.
pub(crate) async fn call_collaborator<T>(
    limit: Duration,
    what: &str,
    filename: &str,
    call: impl Future<Output = anyhow::Result<T>>,
) -> Option<T> {
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            warn!("{filename}: {what} failed: {e:#}");
            None
        }
        Err(_) => {
            warn!("{filename}: {what} timed out after {}ms", limit.as_millis());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{OcrEngine, SemanticSimilarity, TextExtractor};
    use crate::matching::config::MatcherConfig;
    use crate::models::screening::ScoreBreakdown;
    use crate::screening::scorer::KeywordFitScorer;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    const JD: &str = "Required: React, Node.js, AWS. 5+ years experience.";
    const STRONG: &str = "Senior Software Engineer, 6 years building React and Node.js apps on AWS. \
        Led a team of five and owned the payments platform end to end, from design to on-call.";
    const WEAK: &str = "Barista and shift supervisor. Managed inventory, trained new staff, \
        opened the store on weekends and handled customer complaints with patience.";

    fn scorer() -> Arc<dyn FitScorer> {
        Arc::new(KeywordFitScorer::with_today(
            Arc::new(MatcherConfig::default()),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        ))
    }

    fn upload(filename: &str, text: &str) -> ResumeUpload {
        ResumeUpload {
            filename: filename.to_string(),
            bytes: Bytes::from(text.to_string()),
            client_ocr: false,
        }
    }

    async fn screen(uploads: Vec<ResumeUpload>, collaborators: &Collaborators) -> Vec<ShortlistRow> {
        screen_resumes(JD, uploads, scorer(), collaborators, PipelineOptions::default())
            .await
            .unwrap()
    }

    struct FailingSemantic;

    #[async_trait]
    impl SemanticSimilarity for FailingSemantic {
        async fn similarity(&self, _a: &str, _b: &str) -> anyhow::Result<f64> {
            anyhow::bail!("embedding service down")
        }
    }

    struct SlowExtractor;

    #[async_trait]
    impl TextExtractor for SlowExtractor {
        async fn extract(&self, _bytes: &[u8], _filename: &str) -> anyhow::Result<crate::ingest::ExtractedText> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Default::default())
        }
    }

    struct FixedOcr(&'static str);

    #[async_trait]
    impl OcrEngine for FixedOcr {
        async fn recognize(&self, _bytes: &[u8]) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct PanickingScorer;

    impl FitScorer for PanickingScorer {
        fn score(&self, _jd: &str, resume: &str, _boost: f64) -> ScoreBreakdown {
            if resume.contains("boom") {
                panic!("scorer bug");
            }
            ScoreBreakdown::default()
        }

        fn backend(&self) -> &'static str {
            "panicking"
        }
    }

    #[tokio::test]
    async fn test_missing_inputs_are_rejected() {
        let collaborators = Collaborators::default();
        let err = screen_resumes("  ", vec![upload("a.txt", STRONG)], scorer(), &collaborators, PipelineOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == MISSING_INPUT));

        let err = screen_resumes(JD, vec![], scorer(), &collaborators, PipelineOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_rows_are_ranked_by_score() {
        let rows = screen(
            vec![upload("weak.txt", WEAK), upload("strong.txt", STRONG)],
            &Collaborators::default(),
        )
        .await;
        assert_eq!(rows[0].filename, "strong.txt");
        assert!(rows[0].breakdown.recommend);
        assert_eq!(rows[1].filename, "weak.txt");
        assert!(rows[0].breakdown.score >= rows[1].breakdown.score);
        assert_eq!(rows[0].char_count, STRONG.chars().count());
        assert!(rows[0].breakdown.notes.is_empty());
    }

    #[tokio::test]
    async fn test_ties_are_ordered_by_filename() {
        let rows = screen(
            vec![upload("b.txt", WEAK), upload("a.txt", WEAK)],
            &Collaborators::default(),
        )
        .await;
        let names: Vec<_> = rows.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[tokio::test]
    async fn test_scanned_pdf_gets_zero_row_with_note() {
        let scan = ResumeUpload {
            filename: "scan.pdf".to_string(),
            bytes: Bytes::from_static(b"%PDF-1.4\n1 0 obj\n<< /Subtype /Image >>\nstream\n"),
            client_ocr: false,
        };
        let rows = screen(vec![scan], &Collaborators::default()).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].breakdown.score, 0.0);
        assert_eq!(rows[0].char_count, 0);
        assert_eq!(rows[0].breakdown.notes, NOTE_SCAN);
    }

    #[tokio::test]
    async fn test_short_text_is_flagged() {
        let short = "Rust developer. Built CLI tools and web services for clients in Berlin.";
        let rows = screen(vec![upload("short.txt", short)], &Collaborators::default()).await;
        assert_eq!(rows[0].breakdown.notes, NOTE_LITTLE_TEXT);
    }

    #[tokio::test]
    async fn test_ocr_replaces_empty_extraction() {
        let collaborators = Collaborators {
            ocr: Arc::new(FixedOcr(STRONG)),
            ..Collaborators::default()
        };
        let scan = ResumeUpload {
            filename: "scan.pdf".to_string(),
            bytes: Bytes::from_static(b"%PDF-1.4\n"),
            client_ocr: false,
        };
        let rows = screen(vec![scan], &collaborators).await;
        assert_eq!(rows[0].breakdown.notes, NOTE_OCR);
        assert!(rows[0].breakdown.recommend);
    }

    #[tokio::test]
    async fn test_client_ocr_and_semantic_failure_are_noted() {
        let collaborators = Collaborators {
            semantic: Arc::new(FailingSemantic),
            ..Collaborators::default()
        };
        let mut resume = upload("ocr.txt", STRONG);
        resume.client_ocr = true;
        let rows = screen(vec![resume], &collaborators).await;
        assert_eq!(
            rows[0].breakdown.notes,
            "Client OCR used; Semantic similarity unavailable"
        );
        assert!(rows[0].breakdown.score > 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_extractor_timeout_degrades_row() {
        let collaborators = Collaborators {
            extractor: Arc::new(SlowExtractor),
            ..Collaborators::default()
        };
        let rows = screen(vec![upload("slow.txt", STRONG)], &collaborators).await;
        assert_eq!(rows[0].breakdown.score, 0.0);
        assert_eq!(rows[0].breakdown.notes, NOTE_SCAN);
    }

    #[tokio::test]
    async fn test_scoring_panic_is_contained_to_its_row() {
        let upload = upload("bad.txt", "boom");
        let row = screen_one(
            Arc::from(JD),
            upload,
            Arc::new(PanickingScorer),
            &Collaborators::default(),
            PipelineOptions::default(),
        )
        .await;
        assert_eq!(row.filename, "bad.txt");
        assert_eq!(row.breakdown.score, 0.0);
        assert_eq!(row.breakdown.notes, NOTE_FAILED);
    }

    #[tokio::test]
    async fn test_panicking_task_becomes_failed_row() {
        let rows = screen_resumes(
            JD,
            vec![upload("ok.txt", STRONG), upload("bad.txt", "boom")],
            Arc::new(PanickingScorer),
            &Collaborators::default(),
            PipelineOptions::default(),
        )
        .await
        .unwrap();
        assert_eq!(rows.len(), 2);
        let bad = rows.iter().find(|r| r.filename == "bad.txt").unwrap();
        assert_eq!(bad.breakdown.notes, NOTE_FAILED);
        assert_eq!(bad.breakdown.recent_title, "—");
    }
}
