//! Mock runner for testing.
//!
//! This module provides [`MockRunner`], a [`CommandRunner`] that never
//! spawns a process. It returns a configured [`ProcessOutput`] (or error)
//! and records every command it was asked to run.
//!
//! # Availability
//!
//! Only available when:
//! - Running tests (`#[cfg(test)]`)
//! - The `test-utils` feature is enabled
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wkhtmltopdf_view::runner::mock::MockRunner;
//! use wkhtmltopdf_view::PdfView;
//!
//! let runner = Arc::new(MockRunner::returning(b"%PDF-1.4".to_vec()));
//! let view = PdfView::builder().runner(runner.clone()).build()?;
//!
//! // ... render ...
//! assert_eq!(runner.run_count(), 1);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{CommandRunner, ProcessOutput};
use crate::command::WkCommand;
use crate::error::{PdfViewError, Result};

/// Runner returning canned results.
pub struct MockRunner {
    /// Output returned by every successful run.
    output: ProcessOutput,

    /// If set, every run fails with a render error carrying this message.
    failure: Option<String>,

    /// Whether [`check_available`](CommandRunner::check_available) fails.
    unavailable: bool,

    /// Number of runs attempted.
    run_count: Arc<AtomicUsize>,

    /// Commands received, input placeholder already substituted.
    commands: Mutex<Vec<WkCommand>>,

    /// Input bytes received by the last run.
    last_input: Mutex<Vec<u8>>,
}

impl MockRunner {
    /// Runner returning `stdout` with empty stderr and exit code 0.
    pub fn returning(stdout: Vec<u8>) -> Self {
        Self::with_output(ProcessOutput::new(stdout, String::new(), 0))
    }

    /// Runner returning `output` verbatim.
    pub fn with_output(output: ProcessOutput) -> Self {
        Self {
            output,
            failure: None,
            unavailable: false,
            run_count: Arc::new(AtomicUsize::new(0)),
            commands: Mutex::new(Vec::new()),
            last_input: Mutex::new(Vec::new()),
        }
    }

    /// Runner whose every run fails with `message`.
    pub fn always_fails<S: Into<String>>(message: S) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::returning(Vec::new())
        }
    }

    /// Runner reporting that processes cannot be spawned.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::returning(Vec::new())
        }
    }

    /// Number of runs attempted so far.
    pub fn run_count(&self) -> usize {
        self.run_count.load(Ordering::SeqCst)
    }

    /// Shared handle to the run counter.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.run_count)
    }

    /// Commands received so far.
    pub fn commands(&self) -> Vec<WkCommand> {
        self.commands
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    /// The most recent command, if any.
    pub fn last_command(&self) -> Option<WkCommand> {
        self.commands().pop()
    }

    /// stdin bytes of the most recent run.
    pub fn last_input(&self) -> Vec<u8> {
        self.last_input
            .lock()
            .map(|i| i.clone())
            .unwrap_or_default()
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::returning(b"%PDF-1.4 mock".to_vec())
    }
}

impl CommandRunner for MockRunner {
    fn check_available(&self) -> Result<()> {
        if self.unavailable {
            log::debug!("MockRunner: reporting process spawning unavailable");
            return Err(PdfViewError::Configuration(
                "Settings on the server prevent shell commands from being executed.".to_string(),
            ));
        }
        Ok(())
    }

    fn run(&self, command: &WkCommand, input: &[u8]) -> Result<ProcessOutput> {
        let count = self.run_count.fetch_add(1, Ordering::SeqCst);
        log::debug!("MockRunner: run #{}: {}", count + 1, command);

        if let Ok(mut commands) = self.commands.lock() {
            commands.push(command.clone());
        }
        if let Ok(mut last) = self.last_input.lock() {
            *last = input.to_vec();
        }

        if let Some(message) = &self.failure {
            return Err(PdfViewError::Render(message.clone()));
        }

        Ok(self.output.clone())
    }
}

impl std::fmt::Debug for MockRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockRunner")
            .field("output_len", &self.output.stdout.len())
            .field("exit_code", &self.output.exit_code)
            .field("failure", &self.failure)
            .field("unavailable", &self.unavailable)
            .field("run_count", &self.run_count.load(Ordering::SeqCst))
            .finish()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
