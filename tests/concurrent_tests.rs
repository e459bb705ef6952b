//! Concurrent rendering through one shared view.

#![cfg(unix)]

use std::collections::HashSet;
use std::sync::Arc;

use tokio::task::JoinSet;
use wkhtmltopdf_view::prelude::*;
use wkhtmltopdf_view::runner::mock::MockRunner;
use wkhtmltopdf_view::service::{PdfRenderRequest, render_html};

fn shared_view(runner: Arc<MockRunner>, temp_dir: &std::path::Path) -> SharedPdfView {
    // MockRunner never executes the binary; it only has to be executable.
    let config = PdfViewConfigBuilder::new()
        .binary("/bin/sh")
        .mode(RenderMode::String)
        .temp_dir(temp_dir)
        .build()
        .unwrap();

    PdfView::builder()
        .config(config)
        .runner(runner)
        .build()
        .unwrap()
        .into_shared()
}

/// Many renders at once each get their own source file, and all are cleaned up.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_renders_share_one_view() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(MockRunner::returning(b"%PDF-1.4 shared".to_vec()));
    let view = shared_view(Arc::clone(&runner), dir.path());

    let mut tasks = JoinSet::new();
    for i in 0..20 {
        let view = Arc::clone(&view);
        tasks.spawn(async move { view.render_async(format!("<p>{}</p>", i)).await });
    }

    while let Some(result) = tasks.join_next().await {
        let rendered = result.expect("Task should complete without panic").unwrap();
        assert_eq!(rendered.data(), b"%PDF-1.4 shared");
    }

    assert_eq!(runner.run_count(), 20);

    let inputs: HashSet<_> = runner
        .commands()
        .iter()
        .map(|c| c.args()[c.args().len() - 2].clone())
        .collect();
    assert_eq!(inputs.len(), 20, "Every render needs its own source file");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

/// Per-request options never leak between requests or into the shared view.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_keep_their_own_options() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(MockRunner::default());
    let view = shared_view(Arc::clone(&runner), dir.path());

    let mut tasks = JoinSet::new();
    for i in 0..10 {
        let view = Arc::clone(&view);
        tasks.spawn_blocking(move || {
            let request = PdfRenderRequest {
                html: "<p>x</p>".to_string(),
                title: Some(format!("Document {}", i)),
                options: [("copies", OptionValue::from(i + 2))].into_iter().collect(),
            };
            render_html(&view, &request)
        });
    }

    while let Some(result) = tasks.join_next().await {
        assert!(result.unwrap().is_ok());
    }

    for command in runner.commands() {
        let title = command.flag_value("--title").unwrap();
        let index: i64 = title.trim_start_matches("Document ").parse().unwrap();
        assert_eq!(command.flag_value("--copies"), Some((index + 2).to_string()));
    }

    assert!(!view.options().has_title());
    assert_eq!(view.options().copies(), 1);
}
