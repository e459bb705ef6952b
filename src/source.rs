//! Temporary HTML source files.
//!
//! wkhtmltopdf reads the page to convert from a file path. Each render
//! writes its HTML into a fresh `<uuid>.html` file under the configured temp
//! directory. The file is removed when the [`SourceFile`] is dropped, on
//! success and on every error path.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::{Builder, NamedTempFile};
use uuid::Uuid;

use crate::error::{PdfViewError, Result};

/// A temporary `.html` file holding one render's source.
#[derive(Debug)]
pub struct SourceFile {
    file: NamedTempFile,
}

impl SourceFile {
    /// Create `dir` if needed and write `html` into a new uniquely named file.
    ///
    /// # Errors
    ///
    /// [`PdfViewError::Configuration`] if the directory or file cannot be
    /// created or written.
    pub fn create(dir: &Path, html: &str) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|e| {
            log::error!("❌ Cannot create temp directory {}: {}", dir.display(), e);
            PdfViewError::Configuration(format!(
                "cannot create temp directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        let name = Uuid::new_v4().to_string();
        let mut file = Builder::new()
            .prefix(&name)
            .suffix(".html")
            .rand_bytes(0)
            .tempfile_in(dir)
            .map_err(|e| {
                PdfViewError::Configuration(format!(
                    "cannot create source file in {}: {}",
                    dir.display(),
                    e
                ))
            })?;

        file.write_all(html.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| {
                PdfViewError::Configuration(format!(
                    "cannot write source file {}: {}",
                    file.path().display(),
                    e
                ))
            })?;

        log::debug!(
            "Wrote {} bytes of HTML to {}",
            html.len(),
            file.path().display()
        );

        Ok(Self { file })
    }

    /// Path of the file on disk.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
