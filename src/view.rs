//! The PDF view: render HTML through wkhtmltopdf and deliver the result.
//!
//! [`PdfView`] owns an immutable [`PdfViewConfig`], a mutable option set and
//! a [`CommandRunner`]. Each call to [`PdfView::render`] goes through:
//!
//! ```text
//! ┌──────────────┐  title, binary check,  ┌──────────┐  build command, run,  ┌──────────┐  mode   ┌────────────┐
//! │ NotRendered  │ ─ runner check, write ─▶│ Prepared │ ─── validate ───────▶│ Executed │ ──────▶ │ Dispatched │
//! └──────────────┘    source file          └──────────┘                      └──────────┘         └────────────┘
//! ```
//!
//! Any failure ends the render; the temporary source file is removed on
//! every path. The mode is checked only after wkhtmltopdf has run, so an
//! unsupported mode still costs one subprocess.
//!
//! # Example
//!
//! ```rust,no_run
//! use wkhtmltopdf_view::{PdfView, PdfViewConfigBuilder, RenderMode, ViewContent};
//!
//! # fn main() -> wkhtmltopdf_view::Result<()> {
//! let config = PdfViewConfigBuilder::new()
//!     .mode(RenderMode::String)
//!     .build()?;
//!
//! let mut view = PdfView::builder().config(config).build()?;
//! view.set_option("pageSize", "Letter");
//!
//! let content = ViewContent::new("<html><body>hi</body></html>").with_block("title", "Greeting");
//! let pdf = view.render(content)?.into_bytes();
//! println!("{} bytes", pdf.len());
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::command::WkCommand;
use crate::config::PdfViewConfig;
use crate::error::{PdfViewError, Result};
use crate::options::{OptionValue, PdfOptions, RenderMode, keys};
use crate::response::PdfResponse;
use crate::runner::{CommandRunner, SystemRunner, validate_output};
use crate::source::SourceFile;
use crate::traits::Healthcheck;

/// View block consulted when no `title` option is set.
pub const TITLE_BLOCK: &str = "title";

// ============================================================================
// ViewContent
// ============================================================================

/// Rendered HTML plus the named view blocks produced alongside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewContent {
    html: String,
    blocks: HashMap<String, String>,
}

impl ViewContent {
    /// Content with no blocks.
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            blocks: HashMap::new(),
        }
    }

    /// Add or replace a named block.
    pub fn with_block(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.blocks.insert(name.into(), content.into());
        self
    }

    /// The HTML body.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Content of a named block.
    pub fn block(&self, name: &str) -> Option<&str> {
        self.blocks.get(name).map(String::as_str)
    }
}

impl From<&str> for ViewContent {
    fn from(html: &str) -> Self {
        Self::new(html)
    }
}

impl From<String> for ViewContent {
    fn from(html: String) -> Self {
        Self::new(html)
    }
}

// ============================================================================
// RenderedPdf
// ============================================================================

/// Result of a successful render.
///
/// Always carries the PDF bytes, whatever the mode. For `download` and
/// `embedded`, [`into_pdf_response`](Self::into_pdf_response) yields the HTTP
/// response to send; for `save`, [`saved_to`](Self::saved_to) is the file
/// written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPdf {
    data: Vec<u8>,
    mode: RenderMode,
    filename: String,
    saved_to: Option<PathBuf>,
}

impl RenderedPdf {
    /// The PDF bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Size of the PDF in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// The mode that was dispatched.
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// The `filename` option in effect.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Path written in `save` mode.
    pub fn saved_to(&self) -> Option<&Path> {
        self.saved_to.as_deref()
    }

    /// HTTP response for `download`/`embedded`; `None` for other modes.
    pub fn into_pdf_response(self) -> Option<PdfResponse> {
        match self.mode {
            RenderMode::Download => Some(PdfResponse::download(self.data, &self.filename)),
            RenderMode::Embedded => Some(PdfResponse::embedded(self.data, &self.filename)),
            RenderMode::String | RenderMode::Save => None,
        }
    }

    /// Take the PDF bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

// ============================================================================
// PdfView
// ============================================================================

/// Renders HTML views to PDF through wkhtmltopdf.
///
/// Cheap to clone: the config and runner are shared, the option set is
/// copied. Clone a shared view to apply per-request options.
#[derive(Clone)]
pub struct PdfView {
    config: Arc<PdfViewConfig>,
    options: PdfOptions,
    runner: Arc<dyn CommandRunner>,
}

/// Shared view type for web frameworks.
pub type SharedPdfView = Arc<PdfView>;

impl PdfView {
    /// View with `config` and a [`SystemRunner`] using its timeout.
    pub fn new(config: PdfViewConfig) -> Self {
        let runner = Arc::new(SystemRunner::from_config(&config));
        Self {
            options: PdfOptions::from_config(&config),
            config: Arc::new(config),
            runner,
        }
    }

    /// Create a builder.
    pub fn builder() -> PdfViewBuilder {
        PdfViewBuilder::new()
    }

    /// Wrap in an [`Arc`] for sharing across handlers.
    pub fn into_shared(self) -> SharedPdfView {
        Arc::new(self)
    }

    /// The configuration this view was built with.
    pub fn config(&self) -> &PdfViewConfig {
        &self.config
    }

    /// Current option set.
    pub fn options(&self) -> &PdfOptions {
        &self.options
    }

    /// Set one option. See [`PdfOptions::set_option`].
    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.options.set_option(key, value);
    }

    /// Set several options. See [`PdfOptions::set_options`].
    pub fn set_options<K, V, I>(&mut self, entries: I)
    where
        K: Into<String>,
        V: Into<OptionValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.options.set_options(entries);
    }

    /// The command the current options produce, input not yet substituted.
    pub fn command(&self) -> WkCommand {
        WkCommand::build(&self.options)
    }

    /// Render `content` to PDF and dispatch it according to the `mode` option.
    ///
    /// # Errors
    ///
    /// - [`PdfViewError::Configuration`]: binary not executable, runner
    ///   unavailable, temp file not writable, or unsupported mode (the last
    ///   one after wkhtmltopdf has already run)
    /// - [`PdfViewError::Render`] / [`PdfViewError::Timeout`]: the run
    ///   failed validation, could not be read, timed out, or the `save`
    ///   target could not be written
    pub fn render(&self, content: impl Into<ViewContent>) -> Result<RenderedPdf> {
        let start = Instant::now();
        let content = content.into();

        // Prepared
        let options = self.effective_options(&content);
        let binary = options.binary();
        check_executable(&binary)?;
        self.runner.check_available()?;
        let source = SourceFile::create(&self.config.temp_dir, content.html())?;

        // Executed
        let command = WkCommand::build(&options).with_input(source.path());
        log::debug!(
            "Rendering {} bytes of HTML with {}",
            content.html().len(),
            binary.display()
        );
        let output = self.runner.run(&command, &[])?;
        drop(source);
        let data = validate_output(output)?;

        // Dispatched
        let rendered = dispatch(&options, data)?;

        log::info!(
            "✅ PDF rendered ({} bytes, mode={}) in {:?}",
            rendered.size(),
            rendered.mode(),
            start.elapsed()
        );

        Ok(rendered)
    }

    /// [`render`](Self::render) on tokio's blocking thread pool.
    ///
    /// # Errors
    ///
    /// Same as [`render`](Self::render); a panicked blocking task becomes a
    /// [`PdfViewError::Render`].
    pub async fn render_async(&self, content: impl Into<ViewContent>) -> Result<RenderedPdf> {
        let view = self.clone();
        let content = content.into();

        tokio::task::spawn_blocking(move || view.render(content))
            .await
            .map_err(|e| {
                log::error!("❌ Render task failed: {}", e);
                PdfViewError::Render(format!("render task failed: {}", e))
            })?
    }

    fn effective_options(&self, content: &ViewContent) -> PdfOptions {
        let mut options = self.options.clone();
        if !options.has_title() {
            let title = content.block(TITLE_BLOCK).unwrap_or_default();
            log::trace!("Using title block: {:?}", title);
            options.set_option(keys::TITLE, title);
        }
        options
    }
}

impl std::fmt::Debug for PdfView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfView")
            .field("config", &self.config)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Healthcheck for PdfView {
    fn ping(&self) -> Result<()> {
        check_executable(&self.options.binary())?;
        self.runner.check_available()
    }
}

fn dispatch(options: &PdfOptions, data: Vec<u8>) -> Result<RenderedPdf> {
    let mode = options.mode().inspect_err(|e| {
        log::error!("❌ {}", e);
    })?;
    let filename = options.filename();

    let saved_to = if mode == RenderMode::Save {
        let path = PathBuf::from(&filename);
        fs::write(&path, &data).map_err(|e| {
            log::error!("❌ Failed to save PDF to {}: {}", path.display(), e);
            PdfViewError::Render(format!("cannot save PDF to {}: {}", path.display(), e))
        })?;
        log::debug!("Saved PDF to {}", path.display());
        Some(path)
    } else {
        None
    };

    Ok(RenderedPdf {
        data,
        mode,
        filename,
        saved_to,
    })
}

/// Fail with a configuration error unless `path` is an executable file.
pub(crate) fn check_executable(path: &Path) -> Result<()> {
    let not_executable = || {
        log::error!("❌ {} is not executable", path.display());
        PdfViewError::Configuration(format!("{} is not executable.", path.display()))
    };

    let metadata = fs::metadata(path).map_err(|_| not_executable())?;
    if !metadata.is_file() {
        return Err(not_executable());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(not_executable());
        }
    }

    Ok(())
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`PdfView`].
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use wkhtmltopdf_view::runner::SystemRunner;
/// use wkhtmltopdf_view::{PdfView, PdfViewConfig};
///
/// let view = PdfView::builder()
///     .config(PdfViewConfig::default())
///     .runner(Arc::new(SystemRunner::new(None)))
///     .build()
///     .unwrap();
/// ```
#[derive(Default)]
pub struct PdfViewBuilder {
    config: Option<PdfViewConfig>,
    runner: Option<Arc<dyn CommandRunner>>,
}

impl PdfViewBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration (default: [`PdfViewConfig::default`]).
    pub fn config(mut self, config: PdfViewConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the runner (default: [`SystemRunner`] with the config's timeout).
    pub fn runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    /// Build the view.
    ///
    /// # Errors
    ///
    /// [`PdfViewError::Configuration`] if the config has an empty binary
    /// path or temp directory.
    pub fn build(self) -> Result<PdfView> {
        let config = self.config.unwrap_or_default();

        if config.binary.as_os_str().is_empty() {
            return Err("binary path must not be empty".into());
        }
        if config.temp_dir.as_os_str().is_empty() {
            return Err("temp_dir must not be empty".into());
        }

        let runner = self
            .runner
            .unwrap_or_else(|| Arc::new(SystemRunner::from_config(&config)));

        log::debug!(
            "Building PdfView (binary={}, temp_dir={}, timeout={:?})",
            config.binary.display(),
            config.temp_dir.display(),
            config.timeout
        );

        Ok(PdfView {
            options: PdfOptions::from_config(&config),
            config: Arc::new(config),
            runner,
        })
    }
}

/// Build a shared view from environment configuration.
///
/// Loads `app.env` if present, reads the `WKHTMLTOPDF_*` variables (see
/// [`config::env`](crate::config::env)) and checks the binary.
///
/// # Errors
///
/// [`PdfViewError::Configuration`] if the configuration is invalid or the
/// binary is not executable.
#[cfg(feature = "env-config")]
pub fn init_pdf_view() -> Result<SharedPdfView> {
    log::info!("🚀 Initializing PDF view...");

    let config = crate::config::env::from_env()?;
    let view = PdfView::builder().config(config).build()?;
    view.ping()?;

    log::info!("✅ PDF view ready ({})", view.config().binary.display());
    Ok(view.into_shared())
}

// ============================================================================
// Unit Tests
// ============================================================================
