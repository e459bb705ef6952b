//! Axum framework integration.
//!
//! A ready-made [`Router`] plus [`IntoResponse`] impls for render results.
//!
//! # Setup
//!
//! ```toml
//! [dependencies]
//! wkhtmltopdf-view = { version = "0.1", features = ["axum-integration"] }
//! axum = "0.8"
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use wkhtmltopdf_view::init_pdf_view;
//! use wkhtmltopdf_view::integrations::axum::router;
//!
//! #[tokio::main]
//! async fn main() {
//!     let view = init_pdf_view().expect("wkhtmltopdf not usable");
//!     let app = router(view);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::time::Duration;

use crate::response::{CONTENT_TYPE_PDF, PdfResponse};
use crate::service::{
    self, DEFAULT_TIMEOUT_SECS, ErrorResponse, HealthResponse, PdfRenderRequest,
    PdfServiceError, RenderSummary,
};
use crate::view::{RenderedPdf, SharedPdfView};

/// State extractor for the shared view.
///
/// ```rust,ignore
/// async fn handler(view: PdfViewState) -> impl IntoResponse {
///     // ...
/// }
/// ```
pub type PdfViewState = State<SharedPdfView>;

// ============================================================================
// Pre-built Handlers
// ============================================================================

/// Render the posted [`PdfRenderRequest`].
pub async fn pdf_from_html(
    State(view): PdfViewState,
    Json(request): Json<PdfRenderRequest>,
) -> Response {
    log::debug!("PDF from HTML request: {} bytes", request.html.len());

    let result = tokio::time::timeout(
        Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        tokio::task::spawn_blocking(move || service::render_html(&view, &request)),
    )
    .await;

    match result {
        Ok(Ok(Ok(rendered))) => rendered.into_response(),
        Ok(Ok(Err(e))) => e.into_response(),
        Ok(Err(join_err)) => {
            log::error!("Blocking task error: {}", join_err);
            PdfServiceError::Internal(join_err.to_string()).into_response()
        }
        Err(_timeout) => {
            log::error!("PDF render timed out after {} seconds", DEFAULT_TIMEOUT_SECS);
            PdfServiceError::Timeout(format!(
                "Operation timed out after {} seconds",
                DEFAULT_TIMEOUT_SECS
            ))
            .into_response()
        }
    }
}

/// Liveness probe.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Readiness probe: 503 when wkhtmltopdf cannot run.
pub async fn readiness_check(State(view): PdfViewState) -> Response {
    if service::is_view_ready(&view) {
        Json(serde_json::json!({ "status": "ready" })).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "status": "not_ready",
                "reason": "wkhtmltopdf_unavailable"
            })),
        )
            .into_response()
    }
}

// ============================================================================
// Router
// ============================================================================

/// Router with `/pdf/html`, `/health` and `/ready`, state already applied.
pub fn router(view: SharedPdfView) -> Router {
    routes().with_state(view)
}

/// The routes without state, for merging into a larger router.
pub fn routes() -> Router<SharedPdfView> {
    Router::new()
        .route("/pdf/html", post(pdf_from_html))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
}

// ============================================================================
// Responses
// ============================================================================

impl IntoResponse for PdfResponse {
    fn into_response(self) -> Response {
        log::info!(
            "Sending PDF: {} bytes, filename={}",
            self.content_length(),
            self.filename()
        );

        let mut builder = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, CONTENT_TYPE_PDF)
            .header(header::CONTENT_LENGTH, self.content_length());
        for (name, value) in self.headers() {
            match HeaderValue::from_str(value) {
                Ok(value) => builder = builder.header(*name, value),
                Err(e) => log::warn!("Skipping invalid {} header: {}", name, e),
            }
        }

        builder
            .body(Body::from(self.into_body()))
            .unwrap_or_else(|e| {
                log::error!("❌ Failed to build PDF response: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            })
    }
}

impl IntoResponse for RenderedPdf {
    fn into_response(self) -> Response {
        let summary = RenderSummary::from(&self);
        match self.into_pdf_response() {
            Some(response) => IntoResponse::into_response(response),
            None => Json(summary).into_response(),
        }
    }
}

impl IntoResponse for PdfServiceError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        log::warn!("PDF render error: {} (HTTP {})", self, status.as_u16());
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
