pub mod health;

use axum::{extract::DefaultBodyLimit, routing::get, Router};

use crate::screening::handlers as screening;
use crate::state::AppState;
use crate::uploads::handlers as uploads;

/// Resume batches are uploaded in one multipart body.
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Screening API
        .route(
            "/api/v1/score",
            get(screening::handle_score_probe).post(screening::handle_score),
        )
        // Direct-to-S3 uploads
        .route("/api/v1/uploads/presign", get(uploads::handle_presign))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
