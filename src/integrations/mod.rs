//! Web framework integrations.
//!
//! Each integration serves a [`SharedPdfView`](crate::SharedPdfView) with the
//! same routes and JSON contract (see [`service`](crate::service)), and lets
//! custom handlers return [`RenderedPdf`](crate::RenderedPdf) or
//! [`PdfResponse`](crate::PdfResponse) directly.
//!
//! # Available Integrations
//!
//! | Framework | Feature Flag | Module |
//! |-----------|--------------|--------|
//! | Actix-web | `actix-integration` | `actix` |
//! | Rocket | `rocket-integration` | `rocket` |
//! | Axum | `axum-integration` | `axum` |
//!
//! # Enabling Integrations
//!
//! ```toml
//! [dependencies]
//! wkhtmltopdf-view = { version = "0.1", features = ["actix-integration"] }
//! ```
//!
//! # Common Pattern
//!
//! 1. Build the view at startup with [`init_pdf_view`](crate::init_pdf_view)
//!    or [`PdfView::builder`](crate::PdfView::builder)
//! 2. Register the shared view with the framework's state management
//! 3. Mount the pre-built routes, or write handlers that clone the view,
//!    set per-request options and render off the async runtime

#[cfg(feature = "actix-integration")]
pub mod actix;

#[cfg(feature = "rocket-integration")]
pub mod rocket;

#[cfg(feature = "axum-integration")]
pub mod axum;
