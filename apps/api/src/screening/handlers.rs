use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::screening::ShortlistRow;
use crate::screening::export::to_csv;
use crate::screening::pipeline::{call_collaborator, screen_resumes, ResumeUpload};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ScoreQuery {
    /// `csv` switches the response to a CSV attachment.
    pub format: Option<String>,
}

#[derive(Serialize)]
pub struct ScoreResponse {
    pub results: Vec<ShortlistRow>,
}

/// Parsed multipart body of a scoring request.
#[derive(Debug, Default)]
struct ScoreForm {
    jd: String,
    jd_file: Option<(String, Bytes)>,
    resumes: Vec<(String, Bytes)>,
    /// Filenames the client already OCR'd.
    client_ocr: HashSet<String>,
}

impl ScoreForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = ScoreForm::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "jd" => form.jd = field.text().await?,
                "jdFile" => {
                    let filename = field.file_name().unwrap_or("jd").to_string();
                    let bytes = field.bytes().await?;
                    if !bytes.is_empty() {
                        form.jd_file = Some((filename, bytes));
                    }
                }
                "resumes" => {
                    let filename = field
                        .file_name()
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("resume-{}", form.resumes.len() + 1));
                    let bytes = field.bytes().await?;
                    // Browsers send an empty part when no file was picked.
                    if !bytes.is_empty() || !filename.is_empty() {
                        form.resumes.push((filename, bytes));
                    }
                }
                "client_ocr" => {
                    let value = field.text().await?;
                    form.client_ocr.extend(
                        value
                            .split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(str::to_string),
                    );
                }
                other => debug!("Ignoring multipart field '{other}'"),
            }
        }
        Ok(form)
    }
}

/// GET /api/v1/score
pub async fn handle_score_probe() -> &'static str {
    "score API OK"
}

/// POST /api/v1/score
pub async fn handle_score(
    State(state): State<AppState>,
    Query(query): Query<ScoreQuery>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = ScoreForm::read(multipart).await?;

    let mut jd_text = form.jd;
    if jd_text.trim().is_empty() {
        if let Some((filename, bytes)) = &form.jd_file {
            jd_text = call_collaborator(
                state.pipeline.collaborator_timeout,
                "extract",
                filename,
                state.collaborators.extractor.extract(bytes, filename),
            )
            .await
            .map(|extracted| extracted.text)
            .unwrap_or_default();
        }
    }

    let uploads: Vec<ResumeUpload> = form
        .resumes
        .into_iter()
        .map(|(filename, bytes)| ResumeUpload {
            client_ocr: form.client_ocr.contains(&filename),
            filename,
            bytes,
        })
        .collect();

    let rows = screen_resumes(
        &jd_text,
        uploads,
        Arc::clone(&state.fit_scorer),
        &state.collaborators,
        state.pipeline,
    )
    .await?;
    info!("Scored {} resumes", rows.len());

    if query.format.as_deref() == Some("csv") {
        return Ok((
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"shortlist.csv\"",
                ),
            ],
            to_csv(&rows),
        )
            .into_response());
    }

    Ok(Json(ScoreResponse { results: rows }).into_response())
}
