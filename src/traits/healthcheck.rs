//! Readiness check for renderers.
//!
//! [`PdfView`](crate::PdfView) implements [`Healthcheck`] by confirming
//! that the configured wkhtmltopdf binary is an executable file and that
//! its runner can spawn processes. Nothing is rendered.

use crate::error::Result;

/// Something that can report whether it is able to do its job.
///
/// # Example
///
/// ```rust,ignore
/// use wkhtmltopdf_view::{Healthcheck, PdfView};
///
/// let view = PdfView::builder().build()?;
/// if let Err(e) = view.ping() {
///     log::warn!("PDF rendering unavailable: {}", e);
/// }
/// ```
pub trait Healthcheck: Send + Sync {
    /// Cheap readiness check.
    ///
    /// # Errors
    ///
    /// [`PdfViewError::Configuration`](crate::PdfViewError::Configuration)
    /// when rendering cannot succeed with the current setup.
    fn ping(&self) -> Result<()>;
}
