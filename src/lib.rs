//! # wkhtmltopdf-view
//!
//! Render HTML views to PDF with the `wkhtmltopdf` command-line tool, and
//! deliver the result as an HTTP download, an inline document, raw bytes or
//! a file on disk.
//!
//! ## Features
//!
//! - **Option set**: the wkhtmltopdf option vocabulary (page size,
//!   orientation, copies, table of contents, header/footer text, ...) with
//!   immutable defaults from [`PdfViewConfig`]
//! - **No shell**: commands are argument lists handed straight to the OS
//! - **Bounded runs**: wkhtmltopdf is killed once the configured timeout passes
//! - **Scoped temp files**: the HTML source file is removed on every path
//! - **Request interceptor**: switch `.pdf` requests to the PDF view
//! - **Web Framework Integration**: Optional support for Actix-web, Rocket, and Axum
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │          Your Web Application                │
//! │  PdfExtensionInterceptor → template → HTML   │
//! └──────────────────────┬───────────────────────┘
//!                        │ ViewContent
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │                  PdfView                     │
//! │  PdfOptions ──▶ WkCommand ──▶ CommandRunner  │
//! │                                  │           │
//! │        validate_output ◀─────────┘           │
//! │               │                              │
//! │               ▼                              │
//! │  download │ embedded │ string │ save         │
//! └──────────────────────┬───────────────────────┘
//!                        ▼
//!           RenderedPdf / PdfResponse
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wkhtmltopdf_view::prelude::*;
//!
//! fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let config = PdfViewConfigBuilder::new()
//!         .binary("/usr/local/bin/wkhtmltopdf")
//!         .mode(RenderMode::Save)
//!         .filename("/tmp/report.pdf")
//!         .build()?;
//!
//!     let mut view = PdfView::builder().config(config).build()?;
//!     view.set_option("footer", OptionValue::map([("center", "[page] / [topage]")]));
//!
//!     let pdf = view.render(ViewContent::new("<h1>Report</h1>").with_block("title", "Report"))?;
//!     println!("wrote {} bytes to {:?}", pdf.size(), pdf.saved_to());
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Configuration
//!
//! With the `env-config` feature (default), [`init_pdf_view`] reads
//! `WKHTMLTOPDF_*` variables from the environment and an optional `app.env`
//! file:
//!
//! ```text
//! WKHTMLTOPDF_BINARY=/usr/local/bin/wkhtmltopdf
//! WKHTMLTOPDF_PAGE_SIZE=Letter
//! WKHTMLTOPDF_ORIENTATION=Landscape
//! WKHTMLTOPDF_MODE=embedded
//! WKHTMLTOPDF_TIMEOUT_SECONDS=30
//! WKHTMLTOPDF_TEMP_DIR=/var/tmp/wk_html_to_pdf
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `env-config` | Enable environment-based configuration |
//! | `actix-integration` | Actix-web framework integration |
//! | `rocket-integration` | Rocket framework integration |
//! | `axum-integration` | Axum framework integration |
//! | `test-utils` | Enable [`MockRunner`](runner::mock::MockRunner) for testing |
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, PdfViewError>`](Result):
//!
//! ```rust,ignore
//! use wkhtmltopdf_view::PdfViewError;
//!
//! match view.render(html) {
//!     Ok(pdf) => { /* ... */ }
//!     Err(PdfViewError::Configuration(msg)) => eprintln!("misconfigured: {}", msg),
//!     Err(PdfViewError::Render(msg)) => eprintln!("wkhtmltopdf failed: {}", msg),
//!     Err(PdfViewError::Timeout(after)) => eprintln!("killed after {:?}", after),
//! }
//! ```
//!
//! ## Testing
//!
//! Enable `test-utils` and inject a [`MockRunner`](runner::mock::MockRunner)
//! to render without wkhtmltopdf installed:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wkhtmltopdf_view::runner::mock::MockRunner;
//!
//! let runner = Arc::new(MockRunner::returning(b"%PDF-1.4".to_vec()));
//! let view = PdfView::builder().runner(runner.clone()).build()?;
//! ```

#![doc(html_root_url = "https://docs.rs/wkhtmltopdf-view/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// Modules
// ============================================================================

pub mod command;
pub mod config;
pub mod error;
pub mod interceptor;
pub mod options;
pub mod prelude;
pub mod response;
pub mod runner;
pub mod service;
pub mod traits;
pub mod view;

// Internal modules (not publicly exposed)
pub(crate) mod source;

// ============================================================================
// Feature-gated modules
// ============================================================================

/// Web framework integrations.
///
/// Enable the corresponding feature flag to use them:
///
/// - `actix-integration` for Actix-web
/// - `rocket-integration` for Rocket
/// - `axum-integration` for Axum
#[cfg(any(
    feature = "actix-integration",
    feature = "rocket-integration",
    feature = "axum-integration"
))]
pub mod integrations;

// ============================================================================
// Re-exports (Public API)
// ============================================================================

pub use command::WkCommand;
pub use config::{PdfViewConfig, PdfViewConfigBuilder};
pub use error::{PdfViewError, Result};
pub use interceptor::{PdfExtensionInterceptor, RenderTarget};
pub use options::{OptionValue, Orientation, PdfOptions, RenderMode};
pub use response::{Disposition, PdfResponse};
pub use runner::{CommandRunner, ProcessOutput, SystemRunner};
pub use traits::Healthcheck;
pub use view::{PdfView, PdfViewBuilder, RenderedPdf, SharedPdfView, ViewContent};

// Feature-gated re-exports
#[cfg(feature = "env-config")]
pub use config::env::from_env;

#[cfg(feature = "env-config")]
pub use view::init_pdf_view;
