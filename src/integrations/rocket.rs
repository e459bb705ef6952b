//! Rocket framework integration.
//!
//! Pre-built routes serving a [`SharedPdfView`] from Rocket's managed state.
//!
//! # Setup
//!
//! ```toml
//! [dependencies]
//! wkhtmltopdf-view = { version = "0.1", features = ["rocket-integration"] }
//! rocket = { version = "0.5", features = ["json"] }
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use rocket::launch;
//! use wkhtmltopdf_view::init_pdf_view;
//! use wkhtmltopdf_view::integrations::rocket::configure_routes;
//!
//! #[launch]
//! fn rocket() -> _ {
//!     let view = init_pdf_view().expect("wkhtmltopdf not usable");
//!     configure_routes(rocket::build().manage(view))
//! }
//! ```
//!
//! # Routes
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `POST` | `/pdf/html` | [`pdf_from_html`] |
//! | `GET` | `/health` | [`health_check`] |
//! | `GET` | `/ready` | [`readiness_check`] |
//!
//! [`RenderedPdf`] and [`PdfResponse`] implement [`Responder`], so custom
//! routes can return them directly.

use rocket::{
    Build, Request, Rocket, State, get,
    http::{ContentType, Header, Status},
    post,
    response::{self, Responder},
    routes,
    serde::json::Json,
};
use std::sync::Arc;
use std::time::Duration;

use crate::response::PdfResponse;
use crate::service::{
    self, DEFAULT_TIMEOUT_SECS, ErrorResponse, HealthResponse, PdfRenderRequest,
    PdfServiceError, RenderSummary,
};
use crate::view::{RenderedPdf, SharedPdfView};

// ============================================================================
// Type Aliases
// ============================================================================

/// Managed-state guard for the shared view.
pub type PdfViewState<'r> = &'r State<SharedPdfView>;

// ============================================================================
// Responders
// ============================================================================

impl<'r> Responder<'r, 'static> for PdfResponse {
    fn respond_to(self, _request: &'r Request<'_>) -> response::Result<'static> {
        log::info!(
            "Sending PDF: {} bytes, filename={}",
            self.content_length(),
            self.filename()
        );

        let mut builder = response::Response::build();
        builder.header(ContentType::PDF);
        for (name, value) in self.headers() {
            builder.header(Header::new(*name, value.clone()));
        }

        let data = self.into_body();
        builder
            .sized_body(data.len(), std::io::Cursor::new(data))
            .ok()
    }
}

impl<'r> Responder<'r, 'static> for RenderedPdf {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let summary = RenderSummary::from(&self);
        match self.into_pdf_response() {
            Some(response) => response.respond_to(request),
            None => Json(summary).respond_to(request),
        }
    }
}

/// JSON error with an explicit status.
pub struct ErrorResponder {
    /// HTTP status.
    pub status: Status,
    /// JSON body.
    pub body: ErrorResponse,
}

impl<'r> Responder<'r, 'static> for ErrorResponder {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        response::Response::build_from(Json(self.body).respond_to(request)?)
            .status(self.status)
            .ok()
    }
}

/// Handler result type.
pub type HandlerResult<T> = Result<T, ErrorResponder>;

// ============================================================================
// Pre-built Handlers
// ============================================================================

/// Render the posted [`PdfRenderRequest`].
#[post("/pdf/html", data = "<body>")]
pub async fn pdf_from_html(
    view: &State<SharedPdfView>,
    body: Json<PdfRenderRequest>,
) -> HandlerResult<RenderedPdf> {
    let request = body.into_inner();
    let view = Arc::clone(view.inner());

    log::debug!("PDF from HTML request: {} bytes", request.html.len());

    let result = tokio::time::timeout(
        Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        tokio::task::spawn_blocking(move || service::render_html(&view, &request)),
    )
    .await;

    match result {
        Ok(Ok(Ok(rendered))) => Ok(rendered),
        Ok(Ok(Err(e))) => Err(build_error_response(e)),
        Ok(Err(join_err)) => {
            log::error!("Blocking task error: {}", join_err);
            Err(build_error_response(PdfServiceError::Internal(
                join_err.to_string(),
            )))
        }
        Err(_timeout) => {
            log::error!("PDF render timed out after {} seconds", DEFAULT_TIMEOUT_SECS);
            Err(build_error_response(PdfServiceError::Timeout(format!(
                "Operation timed out after {} seconds",
                DEFAULT_TIMEOUT_SECS
            ))))
        }
    }
}

/// Liveness probe.
#[get("/health")]
pub fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Readiness probe: 503 when wkhtmltopdf cannot run.
#[get("/ready")]
pub fn readiness_check(
    view: &State<SharedPdfView>,
) -> Result<Json<serde_json::Value>, ErrorResponder> {
    if service::is_view_ready(view.inner()) {
        Ok(Json(serde_json::json!({ "status": "ready" })))
    } else {
        Err(ErrorResponder {
            status: Status::ServiceUnavailable,
            body: ErrorResponse {
                error: "wkhtmltopdf is not available".to_string(),
                code: "NOT_READY".to_string(),
            },
        })
    }
}

// ============================================================================
// Route Configuration
// ============================================================================

/// Mount all routes at `/`.
///
/// The view must already be managed: `rocket::build().manage(view)`.
pub fn configure_routes(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket.mount("/", routes())
}

/// All routes, for mounting under a custom base.
pub fn routes() -> Vec<rocket::Route> {
    routes![pdf_from_html, health_check, readiness_check]
}

// ============================================================================
// Response Builders (Internal)
// ============================================================================

fn build_error_response(error: PdfServiceError) -> ErrorResponder {
    let status = match error.status_code() {
        400 => Status::BadRequest,
        502 => Status::BadGateway,
        503 => Status::ServiceUnavailable,
        504 => Status::GatewayTimeout,
        _ => Status::InternalServerError,
    };

    log::warn!("PDF render error: {} (HTTP {})", error, status.code);

    ErrorResponder {
        status,
        body: ErrorResponse::from(error),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
