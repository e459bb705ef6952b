//! HTTP response description for `download` and `embedded` renders.
//!
//! [`PdfResponse`] is framework-agnostic: it holds the PDF body and the
//! headers to send with it. The feature-gated integrations turn it into an
//! Actix-web, Rocket or Axum response.
//!
//! # Headers
//!
//! | Header | `download` | `embedded` |
//! |--------|------------|------------|
//! | `Content-Type` | `application/pdf` | `application/pdf` |
//! | `Content-Description` | `File Transfer` | - |
//! | `Cache-Control` | `public; must-revalidate, max-age=0` | same |
//! | `Pragma` | `public` | `public` |
//! | `Content-Transfer-Encoding` | `binary` | - |
//! | `Content-Disposition` | `attachment; filename="<name>"` | `inline; filename="<name>";` |
//! | `Content-Length` | body length | body length |
//!
//! `<name>` is the base name of the `filename` option with double quotes,
//! backslashes and control characters removed.

use std::path::Path;

/// PDF MIME type.
pub const CONTENT_TYPE_PDF: &str = "application/pdf";

const CACHE_CONTROL: &str = "public; must-revalidate, max-age=0";

/// How the browser should treat the PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Save as a file.
    Attachment,
    /// Display in the browser.
    Inline,
}

/// A PDF ready to be sent as an HTTP response.
///
/// # Example
///
/// ```rust
/// use wkhtmltopdf_view::PdfResponse;
///
/// let response = PdfResponse::download(b"%PDF".to_vec(), "/var/reports/q3.pdf");
///
/// assert_eq!(response.filename(), "q3.pdf");
/// assert_eq!(response.content_length(), 4);
/// assert_eq!(
///     response.header("Content-Disposition"),
///     Some("attachment; filename=\"q3.pdf\"")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfResponse {
    data: Vec<u8>,
    filename: String,
    disposition: Disposition,
    headers: Vec<(&'static str, String)>,
}

impl PdfResponse {
    /// Response forcing a download named after the base name of `filename`.
    pub fn download(data: Vec<u8>, filename: &str) -> Self {
        let filename = base_name(filename);
        let headers = vec![
            ("Content-Description", "File Transfer".to_string()),
            ("Cache-Control", CACHE_CONTROL.to_string()),
            ("Pragma", "public".to_string()),
            ("Content-Transfer-Encoding", "binary".to_string()),
            (
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", filename),
            ),
        ];

        Self {
            data,
            filename,
            disposition: Disposition::Attachment,
            headers,
        }
    }

    /// Response displayed inline, named after the base name of `filename`.
    pub fn embedded(data: Vec<u8>, filename: &str) -> Self {
        let filename = base_name(filename);
        let headers = vec![
            ("Cache-Control", CACHE_CONTROL.to_string()),
            ("Pragma", "public".to_string()),
            (
                "Content-Disposition",
                format!("inline; filename=\"{}\";", filename),
            ),
        ];

        Self {
            data,
            filename,
            disposition: Disposition::Inline,
            headers,
        }
    }

    /// Always `application/pdf`.
    pub fn content_type(&self) -> &'static str {
        CONTENT_TYPE_PDF
    }

    /// Body length in bytes.
    pub fn content_length(&self) -> usize {
        self.data.len()
    }

    /// Headers other than `Content-Type` and `Content-Length`, in send order.
    pub fn headers(&self) -> &[(&'static str, String)] {
        &self.headers
    }

    /// Value of one header (case-insensitive), including `Content-Type` and
    /// `Content-Length`.
    pub fn header(&self, name: &str) -> Option<&str> {
        if name.eq_ignore_ascii_case("Content-Type") {
            return Some(CONTENT_TYPE_PDF);
        }
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Attachment or inline.
    pub fn disposition(&self) -> Disposition {
        self.disposition
    }

    /// File name sent to the client.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The PDF bytes.
    pub fn body(&self) -> &[u8] {
        &self.data
    }

    /// Take the PDF bytes.
    pub fn into_body(self) -> Vec<u8> {
        self.data
    }
}

/// Base name of `filename`, safe to place inside a quoted header parameter.
fn base_name(filename: &str) -> String {
    let name = Path::new(filename)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());

    name.chars()
        .filter(|c| *c != '"' && *c != '\\' && !c.is_control())
        .collect()
}

// ============================================================================
// Unit Tests
// ============================================================================
