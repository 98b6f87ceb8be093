use std::sync::Arc;

use crate::ingest::Collaborators;
use crate::screening::pipeline::PipelineOptions;
use crate::screening::scorer::FitScorer;
use crate::uploads::UploadStorage;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable fit scorer. Default: KeywordFitScorer over the loaded MatcherConfig.
    pub fit_scorer: Arc<dyn FitScorer>,
    /// Text extraction, OCR and semantic similarity backends.
    pub collaborators: Collaborators,
    pub pipeline: PipelineOptions,
    /// `None` when no S3 bucket is configured; presign requests are then rejected.
    pub uploads: Option<UploadStorage>,
}
