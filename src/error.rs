//! Error types for PDF view rendering.
//!
//! This module provides [`PdfViewError`], the error type for every fallible
//! operation in the crate, and a convenient [`Result`] type alias.
//!
//! Two kinds of failure exist:
//!
//! - [`PdfViewError::Configuration`]: the environment or configuration is
//!   unusable (binary not executable, process spawning unavailable,
//!   unsupported render mode, temp directory not writable).
//! - [`PdfViewError::Render`]: the wkhtmltopdf run itself failed (error text
//!   on stderr, empty output, fatal exit code, timeout, save failure).
//!
//! Neither kind is retried. A failed render never returns partial output.
//!
//! # Example
//!
//! ```rust
//! use wkhtmltopdf_view::{PdfViewError, Result};
//!
//! fn render() -> Result<Vec<u8>> {
//!     Err(PdfViewError::Render("wkhtmltopdf didn't return any data".to_string()))
//! }
//!
//! match render() {
//!     Ok(pdf) => println!("Generated {} bytes", pdf.len()),
//!     Err(PdfViewError::Configuration(msg)) => eprintln!("Misconfigured: {}", msg),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::time::Duration;

/// Errors that can occur while rendering a view to PDF.
///
/// # Example
///
/// ```rust
/// use wkhtmltopdf_view::PdfViewError;
///
/// fn handle_error(error: PdfViewError) {
///     match error {
///         PdfViewError::Configuration(msg) => {
///             eprintln!("Configuration error: {}", msg);
///         }
///         PdfViewError::Render(msg) => {
///             eprintln!("Render failed: {}", msg);
///         }
///         PdfViewError::Timeout(after) => {
///             eprintln!("wkhtmltopdf killed after {:?}", after);
///         }
///     }
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum PdfViewError {
    /// The environment or configuration prevents rendering.
    ///
    /// Detected before the subprocess runs, or while dispatching its output.
    ///
    /// # Common Causes
    ///
    /// - The configured binary path does not exist or is not executable
    /// - The runtime cannot spawn child processes
    /// - The `mode` option names an unsupported render mode
    /// - The temporary source directory cannot be created or written
    ///
    /// # Example
    ///
    /// ```rust
    /// use wkhtmltopdf_view::PdfViewError;
    ///
    /// let error = PdfViewError::Configuration("Mode: email is not supported".to_string());
    /// println!("{}", error); // "Configuration error: Mode: email is not supported"
    /// ```
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The wkhtmltopdf run failed or produced unusable output.
    ///
    /// The message carries the diagnostic text: raw stderr contents, the
    /// exit code, or the I/O failure that stopped the run.
    ///
    /// # Example
    ///
    /// ```rust
    /// use wkhtmltopdf_view::PdfViewError;
    ///
    /// let error = PdfViewError::Render("Shell error, return code: 2".to_string());
    /// println!("{}", error); // "Render failed: Shell error, return code: 2"
    /// ```
    #[error("Render failed: {0}")]
    Render(String),

    /// The wkhtmltopdf run exceeded the configured timeout and was killed.
    ///
    /// This is a render failure; it is kept as its own variant so callers
    /// can map it to a gateway-timeout response.
    #[error("Render failed: wkhtmltopdf did not finish within {0:?}")]
    Timeout(Duration),
}

impl PdfViewError {
    /// Returns `true` for configuration problems.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns `true` for failures of the wkhtmltopdf run, including timeouts.
    pub fn is_render(&self) -> bool {
        matches!(self, Self::Render(_) | Self::Timeout(_))
    }

    /// Returns `true` if the run was killed after the timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// HTTP status code suitable for reporting this error.
    ///
    /// | Variant | Status |
    /// |---------|--------|
    /// | `Configuration` | 500 |
    /// | `Render` | 502 |
    /// | `Timeout` | 504 |
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Configuration(_) => 500,
            Self::Render(_) => 502,
            Self::Timeout(_) => 504,
        }
    }

    /// Machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Render(_) => "RENDER_ERROR",
            Self::Timeout(_) => "RENDER_TIMEOUT",
        }
    }
}

/// Convenience conversion from [`String`] to [`PdfViewError::Configuration`].
///
/// Lets builder validation messages flow through `?`.
///
/// ```rust
/// use wkhtmltopdf_view::PdfViewError;
///
/// let error: PdfViewError = "copies must be at least 1".to_string().into();
/// assert!(error.is_configuration());
/// ```
impl From<String> for PdfViewError {
    fn from(msg: String) -> Self {
        PdfViewError::Configuration(msg)
    }
}

/// Convenience conversion from `&str` to [`PdfViewError::Configuration`].
impl From<&str> for PdfViewError {
    fn from(msg: &str) -> Self {
        PdfViewError::Configuration(msg.to_string())
    }
}

/// Result type alias using [`PdfViewError`].
pub type Result<T> = std::result::Result<T, PdfViewError>;

// ============================================================================
// Unit Tests
// ============================================================================
