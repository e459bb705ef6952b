//! Request, response and error types for the PDF service.
//!
//! These types are serialized as JSON by every framework integration, so
//! the HTTP contract is identical whichever framework serves it.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::PdfViewError;
use crate::options::{PdfOptions, RenderMode};
use crate::view::RenderedPdf;

// ============================================================================
// Request Types
// ============================================================================

/// Request to render an HTML document.
///
/// # HTTP API Usage
///
/// ```text
/// POST /pdf/html
/// Content-Type: application/json
///
/// {
///     "html": "<!DOCTYPE html><html>...</html>",
///     "title": "Invoice 42",
///     "options": {
///         "mode": "embedded",
///         "filename": "invoice-42.pdf",
///         "orientation": "Landscape",
///         "footer": { "center": "[page] / [topage]" }
///     }
/// }
/// ```
///
/// `options` uses the same keys as [`PdfView::set_option`](crate::PdfView::set_option)
/// and is applied over the server's defaults.
///
/// # Examples
///
/// ```rust
/// use wkhtmltopdf_view::service::PdfRenderRequest;
///
/// let request: PdfRenderRequest = serde_json::from_str(
///     r#"{"html": "<p>hi</p>", "options": {"pageSize": "Letter", "copies": 2}}"#,
/// ).unwrap();
///
/// assert_eq!(request.options.page_size(), "Letter");
/// assert_eq!(request.options.copies(), 2);
/// assert!(request.title.is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PdfRenderRequest {
    /// HTML content to convert.
    pub html: String,

    /// Document title. Overrides any `title` entry in `options`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Option overrides for this request only.
    #[serde(default, skip_serializing_if = "PdfOptions::is_empty")]
    pub options: PdfOptions,
}

// ============================================================================
// Response Types
// ============================================================================

/// JSON body returned for `string` and `save` renders.
///
/// ```json
/// { "mode": "save", "size": 48213, "saved_to": "/srv/pdf/invoice-42.pdf" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSummary {
    /// Mode that was dispatched.
    pub mode: RenderMode,

    /// PDF size in bytes.
    pub size: usize,

    /// File written in `save` mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<PathBuf>,
}

impl From<&RenderedPdf> for RenderSummary {
    fn from(rendered: &RenderedPdf) -> Self {
        Self {
            mode: rendered.mode(),
            size: rendered.size(),
            saved_to: rendered.saved_to().map(|p| p.to_path_buf()),
        }
    }
}

/// Health check response.
///
/// # Examples
///
/// ```rust
/// use wkhtmltopdf_view::service::HealthResponse;
///
/// let response = HealthResponse::default();
/// assert_eq!(response.status, "healthy");
/// assert_eq!(response.service, "wkhtmltopdf-view");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"healthy"` when the endpoint responds.
    pub status: String,

    /// Service name.
    pub service: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
            service: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors returned by the service layer.
///
/// | Variant | HTTP | Code |
/// |---------|------|------|
/// | `EmptyHtml` | 400 | `EMPTY_HTML` |
/// | `RestrictedOption` | 400 | `RESTRICTED_OPTION` |
/// | `View(Configuration)` | 500 | `CONFIGURATION_ERROR` |
/// | `View(Render)` | 502 | `RENDER_ERROR` |
/// | `View(Timeout)` | 504 | `RENDER_TIMEOUT` |
/// | `Timeout` | 504 | `TIMEOUT` |
/// | `Internal` | 500 | `INTERNAL_ERROR` |
#[derive(Debug, thiserror::Error)]
pub enum PdfServiceError {
    /// The request carried no HTML.
    #[error("HTML content is required")]
    EmptyHtml,

    /// The request tried to set an option clients may not control.
    #[error("Option not allowed in requests: {0}")]
    RestrictedOption(String),

    /// The view failed to render.
    #[error(transparent)]
    View(#[from] PdfViewError),

    /// The handler's overall deadline passed.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Blocking task failure or similar.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PdfServiceError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::EmptyHtml | Self::RestrictedOption(_) => 400,
            Self::View(e) => e.status_code(),
            Self::Timeout(_) => 504,
            Self::Internal(_) => 500,
        }
    }

    /// Machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyHtml => "EMPTY_HTML",
            Self::RestrictedOption(_) => "RESTRICTED_OPTION",
            Self::View(e) => e.error_code(),
            Self::Timeout(_) => "TIMEOUT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// JSON error body.
///
/// ```json
/// { "error": "Render failed: Shell error, return code: 2", "code": "RENDER_ERROR" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,

    /// Stable uppercase error code.
    pub code: String,
}

impl From<&PdfServiceError> for ErrorResponse {
    fn from(err: &PdfServiceError) -> Self {
        Self {
            error: err.to_string(),
            code: err.error_code().to_string(),
        }
    }
}

impl From<PdfServiceError> for ErrorResponse {
    fn from(err: PdfServiceError) -> Self {
        Self::from(&err)
    }
}

impl From<&PdfViewError> for ErrorResponse {
    fn from(err: &PdfViewError) -> Self {
        Self {
            error: err.to_string(),
            code: err.error_code().to_string(),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
