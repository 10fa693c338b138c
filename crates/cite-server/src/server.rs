//! HTTP server setup and routing

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::adapter::FormatSys;
use crate::context::{ServiceConfig, ServiceContext, SharedContext};
use crate::engine::{CitationEngine, QuartoEngine};
use crate::error::{Error, Result};
use crate::service::{FormatRequest, FormatResponse, render};

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
}

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    kind: &'static str,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::BadInput(_) => StatusCode::BAD_REQUEST,
            Error::UnsupportedLocale { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(error = %self, "Error in /format handler");
        } else {
            warn!(error = %self, "Rejected /format request");
        }

        let body = ErrorResponse {
            error: self.to_string(),
            kind: self.kind(),
        };
        (status, Json(body)).into_response()
    }
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    debug!("Health check requested");
    Json(HealthResponse { ok: true })
}

/// Render a bibliography.
///
/// The engine work is CPU-bound, so it runs on the blocking pool.
async fn format<E>(
    State(ctx): State<SharedContext>,
    payload: std::result::Result<Json<FormatRequest>, JsonRejection>,
) -> Response
where
    E: CitationEngine<FormatSys> + 'static,
{
    info!("Received POST /format");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            warn!("Request body exceeds limit");
            return rejection.into_response();
        }
        Err(rejection) => return Error::BadInput(rejection.body_text()).into_response(),
    };

    let result = match request.validate() {
        Ok(valid) => tokio::task::spawn_blocking(move || render::<E>(valid, &ctx))
            .await
            .unwrap_or_else(|e| Err(Error::Server(format!("Render task failed: {e}")))),
        Err(e) => Err(e),
    };

    match result {
        Ok(html) => Json(FormatResponse { html }).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 404 handler
async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Build the axum router for engine `E`.
pub fn build_router<E>(ctx: SharedContext) -> Router
where
    E: CitationEngine<FormatSys> + 'static,
{
    let body_limit = ctx.config().body_limit;

    Router::new()
        .route("/health", get(health))
        .route("/format", post(format::<E>))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Run the service with the quarto-citeproc engine.
///
/// This function blocks until the server is shut down.
pub async fn run_server(config: ServiceConfig) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);

    let ctx = Arc::new(ServiceContext::new(config)?);
    let router = build_router::<QuartoEngine<FormatSys>>(ctx);

    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "Citeproc service listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Server(e.to_string()))?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
