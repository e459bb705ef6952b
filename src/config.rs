//! Configuration for PDF view rendering.
//!
//! This module provides [`PdfViewConfig`] and [`PdfViewConfigBuilder`]. The
//! config is immutable once built and supplies the default option set of
//! every [`PdfView`](crate::PdfView) constructed from it, plus the settings
//! that are not render options (temp directory, subprocess timeout).
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use wkhtmltopdf_view::{Orientation, PdfViewConfigBuilder};
//!
//! let config = PdfViewConfigBuilder::new()
//!     .binary("/usr/local/bin/wkhtmltopdf")
//!     .orientation(Orientation::Landscape)
//!     .page_size("Letter")
//!     .timeout(Some(Duration::from_secs(30)))
//!     .build()
//!     .expect("Invalid configuration");
//!
//! assert_eq!(config.page_size, "Letter");
//! ```
//!
//! # Environment Configuration
//!
//! When the `env-config` feature is enabled, configuration can be loaded
//! from environment variables and an optional `app.env` file:
//!
//! ```rust,ignore
//! use wkhtmltopdf_view::config::env::from_env;
//!
//! let config = from_env()?;
//! ```
//!
//! See [`mod@env`] module for available environment variables.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::command::REDACTED;
use crate::options::{Orientation, RenderMode};

/// Default location of the wkhtmltopdf executable.
pub const DEFAULT_BINARY: &str = "/usr/bin/wkhtmltopdf";

/// Name of the subdirectory of the system temp dir holding source files.
pub const TEMP_SUBDIR: &str = "wk_html_to_pdf";

/// Default bound on one wkhtmltopdf run.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for PDF view rendering.
///
/// # Fields Overview
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `binary` | `/usr/bin/wkhtmltopdf` | Executable to run |
/// | `orientation` | `Portrait` | `--orientation` |
/// | `page_size` | `A4` | `--page-size` |
/// | `mode` | `download` | Output dispatch mode |
/// | `filename` | `output.pdf` | Download name or save path |
/// | `copies` | 1 | `--copies` when > 1 |
/// | `toc` | false | `--toc` |
/// | `grayscale` | false | `--grayscale` |
/// | `username` / `password` | none | HTTP auth for linked resources |
/// | `temp_dir` | `<tmp>/wk_html_to_pdf` | Where source HTML is written |
/// | `timeout` | 60s | Kill wkhtmltopdf after this long |
///
/// # Example
///
/// ```rust
/// use wkhtmltopdf_view::PdfViewConfig;
///
/// let config = PdfViewConfig::default();
/// assert_eq!(config.filename, "output.pdf");
/// ```
#[derive(Clone)]
pub struct PdfViewConfig {
    /// Path to the wkhtmltopdf executable.
    ///
    /// Checked for executability at the start of every render.
    pub binary: PathBuf,

    /// Default page orientation.
    pub orientation: Orientation,

    /// Default page size name (`A4`, `Letter`, ...).
    pub page_size: String,

    /// Default render mode.
    pub mode: RenderMode,

    /// Default filename. In `download`/`embedded` mode only its base name is
    /// sent; in `save` mode it is the full output path.
    pub filename: String,

    /// Default number of copies.
    pub copies: u32,

    /// Generate a table of contents.
    pub toc: bool,

    /// Render in grayscale.
    pub grayscale: bool,

    /// HTTP authentication username passed to wkhtmltopdf.
    pub username: Option<String>,

    /// HTTP authentication password passed to wkhtmltopdf.
    pub password: Option<String>,

    /// Directory for temporary source HTML files.
    ///
    /// Created on demand. Files in it are removed when the render that
    /// created them finishes.
    pub temp_dir: PathBuf,

    /// Maximum time one wkhtmltopdf run may take before it is killed.
    ///
    /// `None` waits indefinitely.
    ///
    /// # Default
    ///
    /// 60 seconds
    pub timeout: Option<Duration>,
}

impl fmt::Debug for PdfViewConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfViewConfig")
            .field("binary", &self.binary)
            .field("orientation", &self.orientation)
            .field("page_size", &self.page_size)
            .field("mode", &self.mode)
            .field("filename", &self.filename)
            .field("copies", &self.copies)
            .field("toc", &self.toc)
            .field("grayscale", &self.grayscale)
            .field("username", &self.username.as_ref().map(|_| REDACTED))
            .field("password", &self.password.as_ref().map(|_| REDACTED))
            .field("temp_dir", &self.temp_dir)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for PdfViewConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_BINARY),
            orientation: Orientation::Portrait,
            page_size: "A4".to_string(),
            mode: RenderMode::Download,
            filename: "output.pdf".to_string(),
            copies: 1,
            toc: false,
            grayscale: false,
            username: None,
            password: None,
            temp_dir: std::env::temp_dir().join(TEMP_SUBDIR),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

/// Builder for [`PdfViewConfig`] with validation.
///
/// # Validation
///
/// The [`build()`](Self::build) method checks:
/// - `binary` is not empty
/// - `copies` is at least 1
/// - `page_size` is not empty
/// - `timeout`, when set, is not zero
pub struct PdfViewConfigBuilder {
    config: PdfViewConfig,
}

impl PdfViewConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            config: PdfViewConfig::default(),
        }
    }

    /// Set the wkhtmltopdf executable path.
    pub fn binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.binary = path.into();
        self
    }

    /// Set the default orientation.
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.config.orientation = orientation;
        self
    }

    /// Set the default page size.
    pub fn page_size(mut self, page_size: impl Into<String>) -> Self {
        self.config.page_size = page_size.into();
        self
    }

    /// Set the default render mode.
    pub fn mode(mut self, mode: RenderMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Set the default filename.
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.config.filename = filename.into();
        self
    }

    /// Set the default copy count (must be >= 1).
    pub fn copies(mut self, copies: u32) -> Self {
        self.config.copies = copies;
        self
    }

    /// Enable or disable the table of contents.
    pub fn toc(mut self, toc: bool) -> Self {
        self.config.toc = toc;
        self
    }

    /// Enable or disable grayscale output.
    pub fn grayscale(mut self, grayscale: bool) -> Self {
        self.config.grayscale = grayscale;
        self
    }

    /// Set HTTP authentication credentials.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.username = Some(username.into());
        self.config.password = Some(password.into());
        self
    }

    /// Set the temporary source directory.
    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.temp_dir = dir.into();
        self
    }

    /// Set the subprocess timeout (`None` disables it).
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use wkhtmltopdf_view::PdfViewConfigBuilder;
    ///
    /// let config = PdfViewConfigBuilder::new()
    ///     .timeout(Some(Duration::from_secs(120)))
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(config.timeout, Some(Duration::from_secs(120)));
    /// ```
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use wkhtmltopdf_view::PdfViewConfigBuilder;
    ///
    /// assert!(PdfViewConfigBuilder::new().copies(2).build().is_ok());
    /// assert!(PdfViewConfigBuilder::new().copies(0).build().is_err());
    /// assert!(PdfViewConfigBuilder::new().binary("").build().is_err());
    /// ```
    pub fn build(self) -> std::result::Result<PdfViewConfig, String> {
        if self.config.binary.as_os_str().is_empty() {
            return Err("binary path must not be empty".to_string());
        }

        if self.config.copies == 0 {
            return Err("copies must be at least 1".to_string());
        }

        if self.config.page_size.trim().is_empty() {
            return Err("page_size must not be empty".to_string());
        }

        if self.config.timeout == Some(Duration::ZERO) {
            return Err("timeout must be greater than 0 (use None to disable)".to_string());
        }

        Ok(self.config)
    }
}

impl Default for PdfViewConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Environment Configuration (feature-gated)
// ============================================================================

/// Environment-based configuration loading.
///
/// This module is only available when the `env-config` feature is enabled.
/// It uses `dotenvy` to load an optional `app.env` file from the current
/// directory before reading the variables below.
///
/// # Environment Variables
///
/// | Variable | Type | Default | Description |
/// |----------|------|---------|-------------|
/// | `WKHTMLTOPDF_BINARY` | path | `/usr/bin/wkhtmltopdf` | Executable |
/// | `WKHTMLTOPDF_PAGE_SIZE` | String | `A4` | Default page size |
/// | `WKHTMLTOPDF_ORIENTATION` | String | `Portrait` | Default orientation |
/// | `WKHTMLTOPDF_MODE` | String | `download` | Default render mode |
/// | `WKHTMLTOPDF_TIMEOUT_SECONDS` | u64 | 60 | Run timeout, 0 disables |
/// | `WKHTMLTOPDF_TEMP_DIR` | path | `<tmp>/wk_html_to_pdf` | Source file directory |
///
/// # Example `app.env` File
///
/// ```text
/// WKHTMLTOPDF_BINARY=/usr/local/bin/wkhtmltopdf
/// WKHTMLTOPDF_PAGE_SIZE=Letter
/// WKHTMLTOPDF_TIMEOUT_SECONDS=30
/// ```
#[cfg(feature = "env-config")]
pub mod env {
    use super::*;
    use crate::error::PdfViewError;

    /// Default environment file name.
    pub const ENV_FILE_NAME: &str = "app.env";

    /// Load environment variables from `app.env`.
    pub fn load_env_file() -> Result<PathBuf, dotenvy::Error> {
        dotenvy::from_filename(ENV_FILE_NAME)
    }

    fn parsed<T, F>(var: &F, name: &str) -> Option<T>
    where
        T: std::str::FromStr,
        F: Fn(&str) -> Option<String>,
    {
        let raw = var(name)?;
        match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("⚠️ Ignoring unparseable {}={:?}, using default", name, raw);
                None
            }
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`PdfViewError::Configuration`] if the resulting values fail
    /// builder validation.
    pub fn from_env() -> Result<PdfViewConfig, PdfViewError> {
        match load_env_file() {
            Ok(path) => {
                log::info!("📁 Loaded configuration from: {:?}", path);
            }
            Err(e) => {
                log::debug!(
                    "📁 No {} file found or failed to load: {} (using environment variables and defaults)",
                    ENV_FILE_NAME,
                    e
                );
            }
        }

        from_vars(|name| std::env::var(name).ok())
    }

    /// Build a configuration from `WKHTMLTOPDF_*` values looked up through `var`.
    pub(crate) fn from_vars(
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<PdfViewConfig, PdfViewError> {
        let defaults = PdfViewConfig::default();

        let binary = var("WKHTMLTOPDF_BINARY")
            .map(PathBuf::from)
            .unwrap_or(defaults.binary);
        let page_size = var("WKHTMLTOPDF_PAGE_SIZE").unwrap_or(defaults.page_size);
        let orientation = parsed(&var, "WKHTMLTOPDF_ORIENTATION").unwrap_or(defaults.orientation);
        let mode = parsed(&var, "WKHTMLTOPDF_MODE").unwrap_or(defaults.mode);
        let timeout = match parsed(&var, "WKHTMLTOPDF_TIMEOUT_SECONDS") {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.timeout,
        };
        let temp_dir = var("WKHTMLTOPDF_TEMP_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.temp_dir);

        log::info!("🔧 Loading wkhtmltopdf configuration from environment:");
        log::info!("   - Binary: {}", binary.display());
        log::info!("   - Page size: {}", page_size);
        log::info!("   - Orientation: {}", orientation);
        log::info!("   - Mode: {}", mode);
        log::info!("   - Timeout: {:?}", timeout);
        log::info!("   - Temp dir: {}", temp_dir.display());

        PdfViewConfigBuilder::new()
            .binary(binary)
            .page_size(page_size)
            .orientation(orientation)
            .mode(mode)
            .timeout(timeout)
            .temp_dir(temp_dir)
            .build()
            .map_err(PdfViewError::Configuration)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PdfViewConfig::default();

        assert_eq!(config.binary, PathBuf::from("/usr/bin/wkhtmltopdf"));
        assert_eq!(config.orientation, Orientation::Portrait);
        assert_eq!(config.page_size, "A4");
        assert_eq!(config.mode, RenderMode::Download);
        assert_eq!(config.filename, "output.pdf");
        assert_eq!(config.copies, 1);
        assert!(!config.toc);
        assert!(!config.grayscale);
        assert!(config.username.is_none());
        assert!(config.password.is_none());
        assert!(config.temp_dir.ends_with(TEMP_SUBDIR));
        assert_eq!(config.timeout, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_config_builder_chaining() {
        let config = PdfViewConfigBuilder::new()
            .binary("/opt/wk/bin/wkhtmltopdf")
            .orientation(Orientation::Landscape)
            .page_size("Letter")
            .mode(RenderMode::Embedded)
            .filename("report.pdf")
            .copies(2)
            .toc(true)
            .grayscale(true)
            .credentials("alice", "s3cret")
            .temp_dir("/var/tmp/pdf")
            .timeout(None)
            .build()
            .unwrap();

        assert_eq!(config.binary, PathBuf::from("/opt/wk/bin/wkhtmltopdf"));
        assert_eq!(config.orientation, Orientation::Landscape);
        assert_eq!(config.page_size, "Letter");
        assert_eq!(config.mode, RenderMode::Embedded);
        assert_eq!(config.filename, "report.pdf");
        assert_eq!(config.copies, 2);
        assert!(config.toc);
        assert!(config.grayscale);
        assert_eq!(config.username.as_deref(), Some("alice"));
        assert_eq!(config.password.as_deref(), Some("s3cret"));
        assert_eq!(config.temp_dir, PathBuf::from("/var/tmp/pdf"));
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let config = PdfViewConfigBuilder::new()
            .credentials("alice", "s3cret")
            .build()
            .unwrap();

        let debug = format!("{:?}", config);
        assert!(!debug.contains("s3cret"), "password leaked: {}", debug);
        assert!(!debug.contains("alice"), "username leaked: {}", debug);
        assert!(debug.contains("[REDACTED]"));
        assert!(format!("{:?}", PdfViewConfig::default()).contains("password: None"));
    }

    #[test]
    fn test_config_validation() {
        let err = PdfViewConfigBuilder::new().copies(0).build().unwrap_err();
        assert!(err.contains("copies must be at least 1"), "got: {}", err);

        let err = PdfViewConfigBuilder::new().binary("").build().unwrap_err();
        assert!(err.contains("binary path"), "got: {}", err);

        let err = PdfViewConfigBuilder::new().page_size("  ").build().unwrap_err();
        assert!(err.contains("page_size"), "got: {}", err);

        let err = PdfViewConfigBuilder::new()
            .timeout(Some(Duration::ZERO))
            .build()
            .unwrap_err();
        assert!(err.contains("timeout"), "got: {}", err);
    }

    #[cfg(feature = "env-config")]
    fn env_config(vars: &[(&str, &str)]) -> Result<PdfViewConfig, crate::PdfViewError> {
        let vars: std::collections::HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        env::from_vars(|name| vars.get(name).cloned())
    }

    #[cfg(feature = "env-config")]
    #[test]
    fn test_env_values_override_defaults() {
        let config = env_config(&[
            ("WKHTMLTOPDF_BINARY", "/usr/local/bin/wkhtmltopdf"),
            ("WKHTMLTOPDF_PAGE_SIZE", "Letter"),
            ("WKHTMLTOPDF_ORIENTATION", "landscape"),
            ("WKHTMLTOPDF_MODE", "embedded"),
            ("WKHTMLTOPDF_TIMEOUT_SECONDS", "30"),
            ("WKHTMLTOPDF_TEMP_DIR", "/var/tmp/pdf"),
        ])
        .unwrap();

        assert_eq!(config.binary, PathBuf::from("/usr/local/bin/wkhtmltopdf"));
        assert_eq!(config.page_size, "Letter");
        assert_eq!(config.orientation, Orientation::Landscape);
        assert_eq!(config.mode, RenderMode::Embedded);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.temp_dir, PathBuf::from("/var/tmp/pdf"));
    }

    #[cfg(feature = "env-config")]
    #[test]
    fn test_env_zero_timeout_disables_bound() {
        let config = env_config(&[("WKHTMLTOPDF_TIMEOUT_SECONDS", "0")]).unwrap();
        assert_eq!(config.timeout, None);
    }

    #[cfg(feature = "env-config")]
    #[test]
    fn test_env_unparseable_values_fall_back_to_defaults() {
        let config = env_config(&[
            ("WKHTMLTOPDF_TIMEOUT_SECONDS", "soon"),
            ("WKHTMLTOPDF_ORIENTATION", "sideways"),
            ("WKHTMLTOPDF_MODE", "email"),
        ])
        .unwrap();

        let defaults = PdfViewConfig::default();
        assert_eq!(config.timeout, defaults.timeout);
        assert_eq!(config.orientation, defaults.orientation);
        assert_eq!(config.mode, defaults.mode);
    }

    #[cfg(feature = "env-config")]
    #[test]
    fn test_env_empty_binary_is_configuration_error() {
        let err = env_config(&[("WKHTMLTOPDF_BINARY", "")]).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_builder_default() {
        let builder: PdfViewConfigBuilder = Default::default();
        let config = builder.build().unwrap();
        assert_eq!(config.page_size, "A4");
    }
}
