//! Actix-web integration example.
//!
//! Run with:
//! ```bash
//! cargo run --example actix_web_example --features actix-integration
//! ```
//!
//! Then visit:
//! - http://localhost:8080/invoices/42       (HTML)
//! - http://localhost:8080/invoices/42.pdf   (same view as a PDF)
//!
//! Or post HTML directly:
//! ```bash
//! curl -X POST localhost:8080/pdf/html -H 'content-type: application/json' \
//!      -d '{"html": "<h1>Hello</h1>", "options": {"mode": "embedded"}}' -o hello.pdf
//! ```

use actix_web::{HttpRequest, HttpResponse, HttpServer, Responder, App, web};
use wkhtmltopdf_view::integrations::actix::{PdfViewData, configure_routes};
use wkhtmltopdf_view::interceptor::extension_from_path;
use wkhtmltopdf_view::prelude::*;

/// Minimal stand-in for a template engine.
fn render_invoice(id: &str, target: &RenderTarget) -> ViewContent {
    let html = format!(
        "<html><body data-layout=\"{}\"><h1>Invoice {}</h1><p>Total: 42.00</p></body></html>",
        target.layout, id
    );
    ViewContent::new(html).with_block("title", format!("Invoice {}", id))
}

/// Serves the invoice as HTML, or as a PDF when the path ends in `.pdf`.
async fn invoice(req: HttpRequest, view: PdfViewData, id: web::Path<String>) -> HttpResponse {
    let id = id.into_inner();
    let id = id.trim_end_matches(".pdf").to_string();

    let mut target = RenderTarget::default();
    PdfExtensionInterceptor::startup(extension_from_path(req.path()), &mut target);

    let content = render_invoice(&id, &target);
    if !target.is_pdf() {
        return HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(content.html().to_string());
    }

    let mut view = PdfView::clone(&view);
    view.set_option("mode", "embedded");
    view.set_option("filename", format!("invoice-{}.pdf", id));

    match web::block(move || view.render(content)).await {
        Ok(Ok(pdf)) => pdf.respond_to(&req),
        Ok(Err(e)) => {
            log::error!("Failed to render invoice {}: {}", id, e);
            HttpResponse::InternalServerError().body(e.to_string())
        }
        Err(e) => {
            log::error!("Blocking task failed: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Actix-web example...");

    let view = init_pdf_view().map_err(|e| std::io::Error::other(e.to_string()))?;

    log::info!("Starting server on http://localhost:8080");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(view.clone()))
            .configure(configure_routes)
            .route("/invoices/{id}", web::get().to(invoice))
    })
    .bind("127.0.0.1:8080")?
    .run()
    .await
}
