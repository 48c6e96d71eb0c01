//! Web UI: upload images, see the result table, download the spreadsheet.
//!
//! ## Routes
//!
//! | Method | Path       | Purpose |
//! |--------|------------|---------|
//! | GET    | `/`        | upload form (API key + image files) |
//! | POST   | `/process` | run the batch, render the table with an embedded download link |
//! | POST   | `/export`  | run the batch, answer with the `.xlsx` attachment |
//! | GET    | `/health`  | liveness probe |
//!
//! The server keeps no session store. Each POST carries the API key and the
//! images, builds its own [`crate::extract::Extractor`], and forgets both once
//! the response is written.

mod handlers;
mod render;
mod shutdown;

pub use handlers::UploadForm;
pub use shutdown::shutdown_signal;

use crate::config::{ExtractionConfig, LanguagePair, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use crate::error::Img2XlsxError;
use crate::pipeline::llm::VisionBackend;
use crate::progress::TracingProgressCallback;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

const MB: usize = 1024 * 1024;

/// Server-wide defaults applied to every session.
#[derive(Clone)]
pub struct ServerSettings {
    pub model: String,
    pub max_tokens: usize,
    pub languages: LanguagePair,
    /// Per-file upload cap in megabytes.
    pub max_file_mb: usize,
    /// Whole-request cap in megabytes.
    pub max_request_mb: usize,
    /// Backend used instead of OpenAI for every session. The API key is
    /// still required from the user.
    pub backend: Option<Arc<dyn VisionBackend>>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            languages: LanguagePair::default(),
            max_file_mb: 20,
            max_request_mb: 100,
            backend: None,
        }
    }
}

impl std::fmt::Debug for ServerSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerSettings")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("languages", &self.languages)
            .field("max_file_mb", &self.max_file_mb)
            .field("max_request_mb", &self.max_request_mb)
            .field("backend", &self.backend.as_ref().map(|_| "<dyn VisionBackend>"))
            .finish()
    }
}

impl ServerSettings {
    /// Session configuration for one request.
    ///
    /// A blank or absent key is refused here, before any upload is decoded,
    /// even when a backend is injected.
    pub fn session_config(&self, api_key: Option<&str>) -> Result<ExtractionConfig, Img2XlsxError> {
        let key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(Img2XlsxError::MissingCredential)?;

        let mut builder = ExtractionConfig::builder()
            .api_key(key)
            .model(self.model.clone())
            .max_tokens(self.max_tokens)
            .languages(self.languages.clone())
            .progress_callback(Arc::new(TracingProgressCallback));
        if let Some(ref backend) = self.backend {
            builder = builder.backend(Arc::clone(backend));
        }
        builder.build()
    }
}

/// Shared handler state.
#[derive(Clone, Debug)]
pub struct AppState {
    settings: Arc<ServerSettings>,
}

impl AppState {
    pub fn new(settings: ServerSettings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &ServerSettings {
        &self.settings
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let body_limit = state.settings.max_request_mb.saturating_mul(MB);
    Router::new()
        .route("/", get(handlers::index))
        .route("/process", post(handlers::process))
        .route("/export", post(handlers::export))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl+C / SIGTERM.
pub async fn serve(addr: SocketAddr, settings: ServerSettings) -> Result<(), Img2XlsxError> {
    info!(
        "Server settings: model={}, max_tokens={}, {} → {}",
        settings.model, settings.max_tokens, settings.languages.source, settings.languages.target
    );

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Img2XlsxError::Internal(format!("Failed to bind {}: {}", addr, e)))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, router(AppState::new(settings)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Img2XlsxError::Internal(format!("Server error: {}", e)))
}
