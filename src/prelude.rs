//! Convenient imports for common usage patterns.
//!
//! ```rust
//! use wkhtmltopdf_view::prelude::*;
//! ```
//!
//! This imports:
//!
//! - [`PdfView`], [`PdfViewBuilder`], [`SharedPdfView`] - the renderer
//! - [`PdfViewConfig`], [`PdfViewConfigBuilder`] - configuration
//! - [`PdfOptions`], [`OptionValue`], [`Orientation`], [`RenderMode`] - options
//! - [`ViewContent`], [`RenderedPdf`], [`PdfResponse`] - input and output
//! - [`PdfViewError`], [`Result`] - errors
//! - [`CommandRunner`], [`SystemRunner`] - process execution
//! - [`PdfExtensionInterceptor`], [`RenderTarget`] - request interception
//! - [`Healthcheck`] - readiness trait
//!
//! # Example
//!
//! ```rust,no_run
//! use wkhtmltopdf_view::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = PdfViewConfigBuilder::new().mode(RenderMode::String).build()?;
//!     let view = PdfView::builder().config(config).build()?;
//!
//!     let pdf = view.render("<h1>Hello</h1>")?.into_bytes();
//!     std::fs::write("hello.pdf", pdf).map_err(|e| PdfViewError::Render(e.to_string()))?;
//!     Ok(())
//! }
//! ```

// Core types
pub use crate::config::{PdfViewConfig, PdfViewConfigBuilder};
pub use crate::error::{PdfViewError, Result};
pub use crate::interceptor::{PdfExtensionInterceptor, RenderTarget};
pub use crate::options::{OptionValue, Orientation, PdfOptions, RenderMode};
pub use crate::response::PdfResponse;
pub use crate::runner::{CommandRunner, SystemRunner};
pub use crate::traits::Healthcheck;
pub use crate::view::{PdfView, PdfViewBuilder, RenderedPdf, SharedPdfView, ViewContent};

// Feature-gated exports
#[cfg(feature = "env-config")]
pub use crate::init_pdf_view;

#[cfg(feature = "env-config")]
pub use crate::config::env::from_env;
