//! Axum integration example.
//!
//! Run with:
//! ```bash
//! cargo run --example axum_example --features axum-integration
//! ```
//!
//! Then visit: http://localhost:3000/report.pdf

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use wkhtmltopdf_view::integrations::axum::routes;
use wkhtmltopdf_view::prelude::*;

/// Renders a fixed report, landscape with a page footer.
async fn report(State(view): State<SharedPdfView>) -> Response {
    let mut view = PdfView::clone(&view);
    view.set_options([
        ("orientation", OptionValue::from("Landscape")),
        ("mode", OptionValue::from("download")),
        ("filename", OptionValue::from("report.pdf")),
        ("footer", OptionValue::map([("center", "[page] / [topage]")])),
    ]);

    let content = ViewContent::new("<h1>Quarterly report</h1><p>All figures in EUR.</p>")
        .with_block("title", "Quarterly report");

    match view.render_async(content).await {
        Ok(pdf) => pdf.into_response(),
        Err(e) => {
            log::error!("Failed to render report: {}", e);
            (StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR), e.to_string())
                .into_response()
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Axum example...");

    let view = match init_pdf_view() {
        Ok(view) => view,
        Err(e) => {
            log::error!("wkhtmltopdf is not usable: {}", e);
            std::process::exit(1);
        }
    };

    let app: Router = routes()
        .route("/report.pdf", get(report))
        .with_state(view);

    log::info!("Starting server on http://localhost:3000");

    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("Failed to bind: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        log::error!("Server error: {}", e);
    }
}
