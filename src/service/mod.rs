//! Framework-agnostic PDF service.
//!
//! Holds the request/response types and the render function that every
//! web framework integration shares. Handlers stay thin: they deserialize
//! a [`PdfRenderRequest`], call [`render_html`] off the async runtime and
//! turn the outcome into a response.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       service (this module)                  │
//! │   types.rs                         pdf.rs                    │
//! │   ┌────────────────────┐           ┌──────────────────────┐  │
//! │   │ PdfRenderRequest   │           │ render_html()        │  │
//! │   │ RenderSummary      │           │ is_view_ready()      │  │
//! │   │ HealthResponse     │           └──────────────────────┘  │
//! │   │ ErrorResponse      │                                     │
//! │   │ PdfServiceError    │                                     │
//! │   └────────────────────┘                                     │
//! └───────────────────────────────┬──────────────────────────────┘
//!                                 │ used by
//!                                 ▼
//!            integrations::{actix, rocket, axum}
//! ```
//!
//! # Endpoints
//!
//! | Method | Path | Success | Body |
//! |--------|------|---------|------|
//! | `POST` | `/pdf/html` | 200 | PDF (`download`/`embedded`) or [`RenderSummary`] JSON (`string`) |
//! | `GET` | `/health` | 200 | [`HealthResponse`] |
//! | `GET` | `/ready` | 200 / 503 | readiness JSON |
//!
//! Errors are returned as [`ErrorResponse`] JSON with the status from
//! [`PdfServiceError::status_code`].
//!
//! # Blocking Behavior
//!
//! [`render_html`] blocks until wkhtmltopdf exits. Never call it directly
//! from an async handler:
//!
//! ```rust,ignore
//! // ✅ Actix-web
//! let result = web::block(move || render_html(&view, &request)).await;
//!
//! // ✅ Tokio
//! let result = tokio::task::spawn_blocking(move || render_html(&view, &request)).await;
//! ```

mod pdf;
mod types;

// ============================================================================
// Re-exports: Types
// ============================================================================

pub use types::ErrorResponse;
pub use types::HealthResponse;
pub use types::PdfRenderRequest;
pub use types::PdfServiceError;
pub use types::RenderSummary;

// ============================================================================
// Re-exports: Functions
// ============================================================================

pub use pdf::is_view_ready;
pub use pdf::render_html;

// ============================================================================
// Re-exports: Constants
// ============================================================================

pub use pdf::DEFAULT_TIMEOUT_SECS;
pub use pdf::RESTRICTED_OPTIONS;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_timeout_exceeds_render_timeout() {
        assert!(DEFAULT_TIMEOUT_SECS > crate::config::DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_binary_is_restricted() {
        assert!(RESTRICTED_OPTIONS.contains(&"binary"));
    }
}
