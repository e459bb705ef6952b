//! Actix-web framework integration.
//!
//! Pre-built handlers serving a [`SharedPdfView`] over HTTP.
//!
//! # Setup
//!
//! ```toml
//! [dependencies]
//! wkhtmltopdf-view = { version = "0.1", features = ["actix-integration"] }
//! actix-web = "4"
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use actix_web::{App, HttpServer, web};
//! use wkhtmltopdf_view::integrations::actix::configure_routes;
//! use wkhtmltopdf_view::init_pdf_view;
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let view = init_pdf_view().expect("wkhtmltopdf not usable");
//!
//!     HttpServer::new(move || {
//!         App::new()
//!             .app_data(web::Data::new(view.clone()))
//!             .configure(configure_routes)
//!     })
//!     .bind("127.0.0.1:8080")?
//!     .run()
//!     .await
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
//! # Custom Handlers
//!
//! Views rendered by your own handlers can be returned directly:
//! [`RenderedPdf`] implements [`Responder`].
//!
//! ```rust,ignore
//! async fn invoice(view: PdfViewData, id: web::Path<u32>) -> actix_web::Result<RenderedPdf> {
//!     let html = render_invoice_template(id.into_inner());
//!     let view = view.into_inner();
//!     let pdf = web::block(move || view.render(html))
//!         .await?
//!         .map_err(actix_web::error::ErrorInternalServerError)?;
//!     Ok(pdf)
//! }
//! ```

use actix_web::body::BoxBody;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use std::time::Duration;

use crate::response::{CONTENT_TYPE_PDF, PdfResponse};
use crate::service::{
    self, DEFAULT_TIMEOUT_SECS, ErrorResponse, HealthResponse, PdfRenderRequest,
    PdfServiceError, RenderSummary,
};
use crate::view::{PdfView, RenderedPdf, SharedPdfView};

// ============================================================================
// Type Aliases
// ============================================================================

/// Actix-web `Data` wrapper for the shared view.
///
/// ```rust,ignore
/// async fn handler(view: PdfViewData) -> impl Responder {
///     let ready = view.ping().is_ok();
///     // ...
/// }
/// ```
pub type PdfViewData = web::Data<SharedPdfView>;

// ============================================================================
// Pre-built Handlers
// ============================================================================

/// Render the posted HTML.
///
/// Body: [`PdfRenderRequest`] JSON. Responds with the PDF for
/// `download`/`embedded` and a [`RenderSummary`] for `string`.
pub async fn pdf_from_html(
    view: PdfViewData,
    body: web::Json<PdfRenderRequest>,
) -> HttpResponse {
    let request = body.into_inner();
    let view = view.into_inner();

    log::debug!("PDF from HTML request: {} bytes", request.html.len());

    let result = tokio::time::timeout(
        Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        web::block(move || service::render_html(&view, &request)),
    )
    .await;

    match result {
        Ok(Ok(Ok(rendered))) => build_render_response(rendered),
        Ok(Ok(Err(e))) => build_error_response(e),
        Ok(Err(blocking_err)) => {
            log::error!("Blocking task error: {}", blocking_err);
            build_error_response(PdfServiceError::Internal(blocking_err.to_string()))
        }
        Err(_timeout) => {
            log::error!("PDF render timed out after {} seconds", DEFAULT_TIMEOUT_SECS);
            build_error_response(PdfServiceError::Timeout(format!(
                "Operation timed out after {} seconds",
                DEFAULT_TIMEOUT_SECS
            )))
        }
    }
}

/// Liveness probe. Always 200.
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::default())
}

/// Readiness probe: 200 when the view can render, 503 otherwise.
pub async fn readiness_check(view: PdfViewData) -> HttpResponse {
    if service::is_view_ready(&view) {
        HttpResponse::Ok().json(serde_json::json!({ "status": "ready" }))
    } else {
        HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "not_ready",
            "reason": "wkhtmltopdf_unavailable"
        }))
    }
}

// ============================================================================
// Route Configuration
// ============================================================================

/// Register all routes.
///
/// The app must provide a [`PdfViewData`] via `app_data`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/pdf/html", web::post().to(pdf_from_html))
        .route("/health", web::get().to(health_check))
        .route("/ready", web::get().to(readiness_check));
}

/// Wrap a view for `App::app_data`.
pub fn create_view_data(view: PdfView) -> PdfViewData {
    web::Data::new(view.into_shared())
}

// ============================================================================
// Responders
// ============================================================================

impl Responder for PdfResponse {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        build_pdf_response(self)
    }
}

impl Responder for RenderedPdf {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        build_render_response(self)
    }
}

// ============================================================================
// Response Builders (Internal)
// ============================================================================

fn build_render_response(rendered: RenderedPdf) -> HttpResponse {
    let summary = RenderSummary::from(&rendered);
    match rendered.into_pdf_response() {
        Some(response) => build_pdf_response(response),
        None => HttpResponse::Ok().json(summary),
    }
}

fn build_pdf_response(response: PdfResponse) -> HttpResponse {
    log::info!(
        "Sending PDF: {} bytes, filename={}",
        response.content_length(),
        response.filename()
    );

    let mut builder = HttpResponse::Ok();
    builder.content_type(CONTENT_TYPE_PDF);
    for (name, value) in response.headers() {
        builder.insert_header((*name, value.clone()));
    }
    builder.body(response.into_body())
}

fn build_error_response(error: PdfServiceError) -> HttpResponse {
    let status_code = error.status_code();
    let body = ErrorResponse::from(&error);

    log::warn!("PDF render error: {} (HTTP {})", error, status_code);

    match status_code {
        400 => HttpResponse::BadRequest().json(body),
        502 => HttpResponse::BadGateway().json(body),
        503 => HttpResponse::ServiceUnavailable().json(body),
        504 => HttpResponse::GatewayTimeout().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
