//! Core render functions shared by the framework integrations.
//!
//! Everything here is **blocking**: wkhtmltopdf runs on the calling
//! thread. Handlers call these through `web::block` or
//! `tokio::task::spawn_blocking`, wrapped in
//! `tokio::time::timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS), ..)`.

use crate::options::{RenderMode, keys};
use crate::service::types::{PdfRenderRequest, PdfServiceError};
use crate::traits::Healthcheck;
use crate::view::{PdfView, RenderedPdf};

/// Overall deadline for one HTTP render, in seconds.
///
/// Longer than the default subprocess timeout so a killed wkhtmltopdf run
/// surfaces as `RENDER_TIMEOUT` rather than a bare handler timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 90;

/// Options clients may never set through a request.
pub const RESTRICTED_OPTIONS: [&str; 1] = [keys::BINARY];

/// Render a request with `view`'s configuration and options as defaults.
///
/// The shared view is not modified; request options apply to a copy.
///
/// # Errors
///
/// - [`PdfServiceError::EmptyHtml`] if `html` is blank
/// - [`PdfServiceError::RestrictedOption`] if the request sets `binary`
///   or asks for `save` mode
/// - [`PdfServiceError::View`] for any render failure
///
/// # Example
///
/// ```rust,ignore
/// use wkhtmltopdf_view::service::{render_html, PdfRenderRequest};
///
/// let request = PdfRenderRequest {
///     html: "<h1>Hello</h1>".to_string(),
///     title: Some("Greeting".to_string()),
///     ..Default::default()
/// };
///
/// let rendered = render_html(&view, &request)?;
/// std::fs::write("hello.pdf", rendered.data())?;
/// ```
pub fn render_html(
    view: &PdfView,
    request: &PdfRenderRequest,
) -> Result<RenderedPdf, PdfServiceError> {
    if request.html.trim().is_empty() {
        log::warn!("Empty HTML content provided");
        return Err(PdfServiceError::EmptyHtml);
    }

    for key in RESTRICTED_OPTIONS {
        if request.options.get(key).is_some() {
            log::warn!("Rejected request setting restricted option: {}", key);
            return Err(PdfServiceError::RestrictedOption(key.to_string()));
        }
    }
    if matches!(request.options.mode(), Ok(RenderMode::Save)) {
        log::warn!("Rejected request asking for save mode");
        return Err(PdfServiceError::RestrictedOption(format!(
            "{}=save",
            keys::MODE
        )));
    }

    let mut view = view.clone();
    view.set_options(
        request
            .options
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone())),
    );
    if let Some(title) = &request.title {
        view.set_option(keys::TITLE, title.as_str());
    }

    log::debug!(
        "Rendering request ({} bytes HTML, {} option overrides)",
        request.html.len(),
        request.options.len()
    );

    Ok(view.render(request.html.as_str())?)
}

/// Whether `view` can render right now.
pub fn is_view_ready(view: &PdfView) -> bool {
    match view.ping() {
        Ok(()) => true,
        Err(e) => {
            log::warn!("PDF view not ready: {}", e);
            false
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
