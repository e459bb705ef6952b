//! Running wkhtmltopdf and checking what it produced.
//!
//! This module provides the [`CommandRunner`] trait, its process-spawning
//! implementation [`SystemRunner`], the [`ProcessOutput`] record of one run,
//! and [`validate_output`], which decides whether a run succeeded.
//!
//! # Custom Runners
//!
//! Implement [`CommandRunner`] to run wkhtmltopdf somewhere else (a
//! container, a remote worker) or to fake it in tests:
//!
//! ```rust
//! use wkhtmltopdf_view::runner::{CommandRunner, ProcessOutput};
//! use wkhtmltopdf_view::{Result, WkCommand};
//!
//! struct CannedRunner;
//!
//! impl CommandRunner for CannedRunner {
//!     fn run(&self, _command: &WkCommand, _input: &[u8]) -> Result<ProcessOutput> {
//!         Ok(ProcessOutput::new(b"%PDF-1.4".to_vec(), String::new(), 0))
//!     }
//! }
//! ```

mod system;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use system::SystemRunner;

use crate::command::WkCommand;
use crate::error::{PdfViewError, Result};

/// Executes wkhtmltopdf commands.
///
/// Implementations must be thread-safe (`Send + Sync`) so one runner can be
/// shared by every render of a web application.
pub trait CommandRunner: Send + Sync {
    /// Check that this runner can start processes at all.
    ///
    /// Called before the source file is written.
    ///
    /// # Errors
    ///
    /// [`PdfViewError::Configuration`] if processes cannot be spawned.
    fn check_available(&self) -> Result<()> {
        Ok(())
    }

    /// Run `command`, writing `input` to its stdin, and collect its output.
    ///
    /// A non-zero exit code is not an error here; see [`validate_output`].
    ///
    /// # Errors
    ///
    /// - [`PdfViewError::Configuration`] if the process cannot be started
    /// - [`PdfViewError::Render`] if its streams cannot be read
    /// - [`PdfViewError::Timeout`] if it had to be killed
    fn run(&self, command: &WkCommand, input: &[u8]) -> Result<ProcessOutput>;
}

/// Everything one wkhtmltopdf run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Raw stdout, the PDF on success.
    pub stdout: Vec<u8>,
    /// stderr decoded lossily as UTF-8.
    pub stderr: String,
    /// Exit code; `128 + signal` when killed by a signal on Unix.
    pub exit_code: i32,
}

impl ProcessOutput {
    /// Create a new output record.
    pub fn new(stdout: Vec<u8>, stderr: String, exit_code: i32) -> Self {
        Self {
            stdout,
            stderr,
            exit_code,
        }
    }
}

/// Decide whether a run succeeded and return its PDF bytes.
///
/// Checks, in order:
///
/// 1. stderr contains `error` in any letter case → [`PdfViewError::Render`]
///    carrying the raw stderr. This is a plain substring test, so a harmless
///    warning mentioning e.g. "errorPageURL" also fails the render.
/// 2. stdout is empty → [`PdfViewError::Render`].
/// 3. exit code greater than 1 → [`PdfViewError::Render`]. Exit code 1 is
///    wkhtmltopdf's "finished with warnings" and is accepted.
///
/// # Example
///
/// ```rust
/// use wkhtmltopdf_view::runner::{ProcessOutput, validate_output};
///
/// let ok = ProcessOutput::new(b"%PDF".to_vec(), "Warning: slow".to_string(), 1);
/// assert_eq!(validate_output(ok).unwrap(), b"%PDF".to_vec());
///
/// let failed = ProcessOutput::new(b"%PDF".to_vec(), String::new(), 2);
/// assert!(validate_output(failed).is_err());
/// ```
pub fn validate_output(output: ProcessOutput) -> Result<Vec<u8>> {
    if output.stderr.to_lowercase().contains("error") {
        log::warn!("wkhtmltopdf reported an error: {}", output.stderr.trim());
        return Err(PdfViewError::Render(format!(
            "System error: {}",
            output.stderr
        )));
    }

    if output.stdout.is_empty() {
        log::warn!("wkhtmltopdf produced no output (exit code {})", output.exit_code);
        return Err(PdfViewError::Render(
            "wkhtmltopdf didn't return any data".to_string(),
        ));
    }

    if output.exit_code > 1 {
        log::warn!("wkhtmltopdf exited with code {}", output.exit_code);
        return Err(PdfViewError::Render(format!(
            "Shell error, return code: {}",
            output.exit_code
        )));
    }

    if output.exit_code == 1 {
        log::debug!("wkhtmltopdf finished with warnings: {}", output.stderr.trim());
    }

    Ok(output.stdout)
}

// ============================================================================
// Unit Tests
// ============================================================================
