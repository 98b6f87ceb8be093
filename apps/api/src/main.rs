mod config;
mod errors;
mod ingest;
mod matching;
mod models;
mod routes;
mod screening;
mod signals;
mod state;
mod uploads;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::ingest::Collaborators;
use crate::matching::config::MatcherConfig;
use crate::routes::build_router;
use crate::screening::pipeline::PipelineOptions;
use crate::screening::scorer::KeywordFitScorer;
use crate::state::AppState;
use crate::uploads::build_upload_storage;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Shortlist API v{}", env!("CARGO_PKG_VERSION"));

    // Matcher vocabulary: built-in defaults unless a JSON override is configured
    let matcher = match &config.matcher_config_path {
        Some(path) => MatcherConfig::from_json_file(path)
            .with_context(|| format!("loading matcher config from {}", path.display()))?,
        None => MatcherConfig::default(),
    };
    info!(
        "Matcher config: {} stopwords, {} skills, {} synonym groups",
        matcher.stopwords.len(),
        matcher.known_skills.len(),
        matcher.synonyms.len()
    );
    let fit_scorer = Arc::new(KeywordFitScorer::new(Arc::new(matcher)));

    let collaborators = Collaborators::from_config(&config);
    let pipeline = PipelineOptions::from_config(&config);
    info!(
        "Pipeline: {} concurrent resumes, {}ms collaborator timeout",
        pipeline.max_concurrency, config.collaborator_timeout_ms
    );

    // S3 presigned uploads are optional
    let uploads = match &config.s3 {
        Some(settings) => Some(build_upload_storage(settings).await),
        None => {
            info!("S3_BUCKET not set; presigned uploads disabled");
            None
        }
    };

    let state = AppState {
        fit_scorer,
        collaborators,
        pipeline,
        uploads,
    };

    let app = build_router(state)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict allowed origins once the UI host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
