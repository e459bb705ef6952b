//! End-to-end tests running a fake `wkhtmltopdf` shell script.
//!
//! Every test writes its own script and holds `SPAWN_LOCK` while it does so
//! and while the script runs. A script written while another thread forks
//! can otherwise fail to execute with `ETXTBSY`.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tempfile::TempDir;
use wkhtmltopdf_view::prelude::*;

static SPAWN_LOCK: Mutex<()> = Mutex::new(());

fn spawn_lock() -> MutexGuard<'static, ()> {
    let _ = env_logger::builder().is_test(true).try_init();
    SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Prints a PDF header followed by the contents of the input file, which is
/// the second to last argument.
const ECHO_INPUT: &str = r#"for arg; do prev2=$prev; prev=$arg; done
printf '%%PDF-1.4\n'
cat "$prev2""#;

struct Fixture {
    dir: TempDir,
    binary: PathBuf,
}

impl Fixture {
    fn new(script: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join("wkhtmltopdf");
        fs::write(&binary, format!("#!/bin/sh\n{}\n", script)).unwrap();
        fs::set_permissions(&binary, fs::Permissions::from_mode(0o755)).unwrap();
        Self { dir, binary }
    }

    fn temp_dir(&self) -> PathBuf {
        self.dir.path().join("tmp")
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn view(&self, mode: RenderMode) -> PdfView {
        self.view_with_timeout(mode, Some(Duration::from_secs(10)))
    }

    fn view_with_timeout(&self, mode: RenderMode, timeout: Option<Duration>) -> PdfView {
        let config = PdfViewConfigBuilder::new()
            .binary(&self.binary)
            .mode(mode)
            .temp_dir(self.temp_dir())
            .timeout(timeout)
            .build()
            .unwrap();
        PdfView::builder().config(config).build().unwrap()
    }
}

fn is_empty_dir(dir: &Path) -> bool {
    fs::read_dir(dir).map(|mut d| d.next().is_none()).unwrap_or(true)
}

#[test]
fn test_string_mode_returns_binary_stdout() {
    let _lock = spawn_lock();
    let fixture = Fixture::new(ECHO_INPUT);
    let mut view = fixture.view(RenderMode::String);
    view.set_options([("pageSize", "A4"), ("orientation", "Portrait")]);

    let rendered = view.render("<html><body>hi</body></html>").unwrap();

    assert_eq!(rendered.mode(), RenderMode::String);
    assert_eq!(
        rendered.into_bytes(),
        b"%PDF-1.4\n<html><body>hi</body></html>".to_vec()
    );
}

#[test]
fn test_save_mode_file_matches_return_value() {
    let _lock = spawn_lock();
    let fixture = Fixture::new(ECHO_INPUT);
    let out = fixture.path("out.pdf");
    let mut view = fixture.view(RenderMode::Save);
    view.set_option("filename", out.clone());

    let rendered = view.render("<p>saved</p>").unwrap();

    assert_eq!(rendered.saved_to(), Some(out.as_path()));
    assert_eq!(fs::read(&out).unwrap(), rendered.into_bytes());
}

#[test]
fn test_download_mode_response() {
    let _lock = spawn_lock();
    let fixture = Fixture::new(ECHO_INPUT);
    let mut view = fixture.view(RenderMode::Download);
    view.set_option("filename", "reports/q3.pdf");

    let response = view.render("<p>q3</p>").unwrap().into_pdf_response().unwrap();

    assert_eq!(response.content_type(), "application/pdf");
    assert_eq!(
        response.header("Content-Disposition"),
        Some("attachment; filename=\"q3.pdf\"")
    );
    assert_eq!(response.body(), b"%PDF-1.4\n<p>q3</p>");
}

#[test]
fn test_unsupported_mode_fails_after_running_binary() {
    let _lock = spawn_lock();
    let fixture = Fixture::new(&format!(
        "touch \"$(dirname \"$0\")/ran\"\n{}",
        ECHO_INPUT
    ));
    let mut view = fixture.view(RenderMode::String);
    view.set_option("mode", "email");

    let err = view.render("<p>x</p>").unwrap_err();

    assert!(err.is_configuration(), "got {:?}", err);
    assert!(err.to_string().contains("Mode: email is not supported"));
    assert!(fixture.path("ran").exists(), "wkhtmltopdf should have run");
}

#[test]
fn test_exit_code_two_is_render_error() {
    let _lock = spawn_lock();
    let fixture = Fixture::new("printf '%%PDF'\nexit 2");
    let view = fixture.view(RenderMode::String);

    match view.render("<p>x</p>") {
        Err(PdfViewError::Render(msg)) => assert!(msg.contains("2"), "msg: {}", msg),
        other => panic!("Expected Render error, got {:?}", other),
    }
}

#[test]
fn test_exit_code_one_with_warning_is_accepted() {
    let _lock = spawn_lock();
    let fixture = Fixture::new("echo 'Warning: Slow script' >&2\nprintf '%%PDF'\nexit 1");
    let view = fixture.view(RenderMode::String);

    assert_eq!(view.render("<p>x</p>").unwrap().into_bytes(), b"%PDF".to_vec());
}

#[test]
fn test_stderr_error_is_render_error() {
    let _lock = spawn_lock();
    let fixture = Fixture::new("echo 'Error: Failed loading page' >&2\nprintf '%%PDF'");
    let view = fixture.view(RenderMode::String);

    let err = view.render("<p>x</p>").unwrap_err();
    assert!(err.is_render());
    assert!(err.to_string().contains("Failed loading page"));
}

#[test]
fn test_empty_output_is_render_error() {
    let _lock = spawn_lock();
    let fixture = Fixture::new("exit 0");
    let view = fixture.view(RenderMode::String);

    let err = view.render("<p>x</p>").unwrap_err();
    assert!(err.to_string().contains("didn't return any data"));
}

#[test]
fn test_source_file_removed_after_success_and_failure() {
    let _lock = spawn_lock();

    let fixture = Fixture::new(ECHO_INPUT);
    fixture.view(RenderMode::String).render("<p>ok</p>").unwrap();
    assert!(is_empty_dir(&fixture.temp_dir()));

    let fixture = Fixture::new("exit 3");
    assert!(fixture.view(RenderMode::String).render("<p>bad</p>").is_err());
    assert!(is_empty_dir(&fixture.temp_dir()));
}

#[test]
fn test_arguments_reach_binary_unmodified() {
    let _lock = spawn_lock();
    let fixture = Fixture::new(r#"for arg; do printf '%s\n' "$arg"; done"#);
    let mut view = fixture.view(RenderMode::String);
    view.set_options([
        ("title", OptionValue::from("Q3 \"final\"; echo pwned")),
        ("copies", OptionValue::from(2)),
        ("header", OptionValue::map([("left", "$(id)"), ("bogus", "dropped")])),
    ]);

    let output = String::from_utf8(view.render("<p>x</p>").unwrap().into_bytes()).unwrap();
    let args: Vec<&str> = output.lines().collect();

    assert_eq!(&args[..2], &["--copies", "2"]);
    assert!(args.windows(2).any(|w| w == ["--header-left", "$(id)"]));
    assert!(args.windows(2).any(|w| w == ["--title", "Q3 \"final\"; echo pwned"]));
    assert!(!args.contains(&"dropped"));
    assert!(args[args.len() - 2].ends_with(".html"));
    assert_eq!(args[args.len() - 1], "-");
}

#[test]
fn test_title_taken_from_view_block() {
    let _lock = spawn_lock();
    let fixture = Fixture::new(r#"for arg; do printf '%s\n' "$arg"; done"#);
    let view = fixture.view(RenderMode::String);

    let content = ViewContent::new("<p>x</p>").with_block("title", "Annual Report");
    let output = String::from_utf8(view.render(content).unwrap().into_bytes()).unwrap();

    assert!(output.contains("--title\nAnnual Report\n"));
}

#[test]
fn test_hung_binary_is_killed() {
    let _lock = spawn_lock();
    let fixture = Fixture::new("exec sleep 30");
    let view = fixture.view_with_timeout(RenderMode::String, Some(Duration::from_millis(500)));

    let start = Instant::now();
    let err = view.render("<p>x</p>").unwrap_err();

    assert!(err.is_timeout(), "got {:?}", err);
    assert!(start.elapsed() < Duration::from_secs(10));
    assert!(is_empty_dir(&fixture.temp_dir()));
}

#[test]
fn test_non_executable_binary_is_configuration_error() {
    let _lock = spawn_lock();
    let fixture = Fixture::new(ECHO_INPUT);
    fs::set_permissions(&fixture.binary, fs::Permissions::from_mode(0o644)).unwrap();

    let err = fixture.view(RenderMode::String).render("<p>x</p>").unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("is not executable"));
    assert!(view_ping_fails(&fixture));
}

fn view_ping_fails(fixture: &Fixture) -> bool {
    fixture.view(RenderMode::String).ping().is_err()
}

#[test]
fn test_render_async_on_blocking_pool() {
    let _lock = spawn_lock();
    let fixture = Fixture::new(ECHO_INPUT);
    let view = fixture.view(RenderMode::String);

    let rendered = tokio_test::block_on(view.render_async("<p>async</p>")).unwrap();
    assert_eq!(rendered.into_bytes(), b"%PDF-1.4\n<p>async</p>".to_vec());
}

#[test]
fn test_interceptor_selects_pdf_view() {
    use wkhtmltopdf_view::interceptor::extension_from_path;

    let mut target = RenderTarget::default();
    PdfExtensionInterceptor::startup(extension_from_path("/invoices/view/7.pdf"), &mut target);
    assert!(target.is_pdf());

    let mut target = RenderTarget::default();
    PdfExtensionInterceptor::startup(extension_from_path("/invoices/view/7"), &mut target);
    assert!(!target.is_pdf());
}

#[test]
fn test_config_validation() {
    assert!(PdfViewConfigBuilder::new().copies(0).build().is_err());
    assert!(PdfViewConfigBuilder::new().binary("").build().is_err());
    assert!(
        PdfViewConfigBuilder::new()
            .timeout(Some(Duration::ZERO))
            .build()
            .is_err()
    );
    assert!(
        PdfViewConfigBuilder::new()
            .copies(3)
            .page_size("Letter")
            .timeout(None)
            .build()
            .is_ok()
    );
}
