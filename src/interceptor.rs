//! Switch a request over to PDF rendering based on its extension.
//!
//! Runs before the view is rendered. When the request's extension is
//! `pdf`, the render target's view class and layout are swapped for the
//! PDF ones; any other extension (or none) leaves the target untouched.
//!
//! # Example
//!
//! ```rust
//! use wkhtmltopdf_view::interceptor::{PdfExtensionInterceptor, RenderTarget, extension_from_path};
//!
//! let mut target = RenderTarget::default();
//! PdfExtensionInterceptor::startup(extension_from_path("/invoices/view/3.pdf"), &mut target);
//!
//! assert!(target.is_pdf());
//! assert_eq!(target.layout, "pdf/default");
//! ```

use std::path::Path;

/// Extension that selects PDF rendering.
pub const PDF_EXTENSION: &str = "pdf";

/// View class rendering through wkhtmltopdf.
pub const PDF_VIEW_CLASS: &str = "WkHtmlToPdf";

/// Layout used for PDF output.
pub const PDF_LAYOUT: &str = "pdf/default";

/// Default HTML view class.
pub const DEFAULT_VIEW_CLASS: &str = "View";

/// Default HTML layout.
pub const DEFAULT_LAYOUT: &str = "default";

/// The view class and layout a request will be rendered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTarget {
    /// View class identifier.
    pub view_class: String,
    /// Layout template identifier.
    pub layout: String,
}

impl RenderTarget {
    /// Target with explicit view class and layout.
    pub fn new(view_class: impl Into<String>, layout: impl Into<String>) -> Self {
        Self {
            view_class: view_class.into(),
            layout: layout.into(),
        }
    }

    /// Whether this target renders through wkhtmltopdf.
    pub fn is_pdf(&self) -> bool {
        self.view_class == PDF_VIEW_CLASS
    }
}

impl Default for RenderTarget {
    fn default() -> Self {
        Self::new(DEFAULT_VIEW_CLASS, DEFAULT_LAYOUT)
    }
}

/// Selects the PDF view for requests with a `.pdf` extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtensionInterceptor;

impl PdfExtensionInterceptor {
    /// Switch `target` to the PDF view if `extension` is exactly `pdf`.
    ///
    /// The comparison is case-sensitive; `PDF` is left alone.
    pub fn startup(extension: Option<&str>, target: &mut RenderTarget) {
        if extension == Some(PDF_EXTENSION) {
            log::debug!(
                "Switching view {} ({}) to {} ({})",
                target.view_class,
                target.layout,
                PDF_VIEW_CLASS,
                PDF_LAYOUT
            );
            target.view_class = PDF_VIEW_CLASS.to_string();
            target.layout = PDF_LAYOUT.to_string();
        }
    }
}

/// Extension of the last path segment, without the dot.
///
/// Query strings and fragments are ignored. Returns `None` for paths
/// whose last segment has no extension.
pub fn extension_from_path(path: &str) -> Option<&str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    Path::new(path).extension().and_then(|ext| ext.to_str())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_extension_switches_target() {
        let mut target = RenderTarget::default();
        PdfExtensionInterceptor::startup(Some("pdf"), &mut target);

        assert_eq!(target.view_class, "WkHtmlToPdf");
        assert_eq!(target.layout, "pdf/default");
        assert!(target.is_pdf());
    }

    #[test]
    fn test_other_extensions_are_noop() {
        for ext in [None, Some("html"), Some("json"), Some("PDF"), Some("")] {
            let mut target = RenderTarget::new("AppView", "admin");
            PdfExtensionInterceptor::startup(ext, &mut target);

            assert_eq!(target, RenderTarget::new("AppView", "admin"), "ext {:?}", ext);
            assert!(!target.is_pdf());
        }
    }

    #[test]
    fn test_extension_from_path() {
        assert_eq!(extension_from_path("/invoices/view/3.pdf"), Some("pdf"));
        assert_eq!(extension_from_path("/invoices/view/3.pdf?download=1"), Some("pdf"));
        assert_eq!(extension_from_path("/report.json#top"), Some("json"));
        assert_eq!(extension_from_path("/invoices/view/3"), None);
        assert_eq!(extension_from_path("/v1.2/invoices"), None);
        assert_eq!(extension_from_path(""), None);
    }
}
