//! Process-spawning runner.

use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use super::{CommandRunner, ProcessOutput};
use crate::command::WkCommand;
use crate::config::PdfViewConfig;
use crate::error::{PdfViewError, Result};

/// How often a running child is polled for exit.
const EXIT_POLL_INTERVAL_MS: u64 = 50;

/// Runs wkhtmltopdf as a child process.
///
/// stdin, stdout and stderr are all piped. Input is written and stdin closed
/// on a helper thread while stdout and stderr are drained on two more, so a
/// child filling one pipe never blocks on the other.
///
/// The timeout covers the whole run: waiting for the child to exit and
/// draining its pipes. On Unix the child leads its own process group, and
/// the whole group is killed on timeout, so wrapper scripts (an `xvfb-run`
/// shim, say) cannot leave the real binary or a background helper behind
/// holding the pipes open.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use wkhtmltopdf_view::runner::SystemRunner;
///
/// let runner = SystemRunner::new(Some(Duration::from_secs(30)));
/// assert_eq!(runner.timeout(), Some(Duration::from_secs(30)));
/// ```
#[derive(Debug, Clone)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    /// Create a runner killing children after `timeout` (`None` waits forever).
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Create a runner using the timeout of `config`.
    pub fn from_config(config: &PdfViewConfig) -> Self {
        Self::new(config.timeout)
    }

    /// The configured timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::from_config(&PdfViewConfig::default())
    }
}

impl CommandRunner for SystemRunner {
    fn check_available(&self) -> Result<()> {
        if cfg!(any(unix, windows)) {
            Ok(())
        } else {
            Err(PdfViewError::Configuration(
                "Settings on the server prevent shell commands from being executed.".to_string(),
            ))
        }
    }

    fn run(&self, command: &WkCommand, input: &[u8]) -> Result<ProcessOutput> {
        let start = Instant::now();
        let deadline = self.timeout.map(|timeout| start + timeout);
        log::trace!("Spawning: {}", command);

        let mut child = spawn(command).map_err(|e| {
            log::error!("❌ Failed to start {}: {}", command.program().display(), e);
            PdfViewError::Configuration(format!(
                "failed to execute {}: {}",
                command.program().display(),
                e
            ))
        })?;

        log::debug!("Started wkhtmltopdf (pid {})", child.id());

        // Detached: a process that never reads stdin must not hold up the run.
        spawn_stdin_writer(&mut child, input.to_vec());
        let stdout_rx = spawn_reader(child.stdout.take());
        let stderr_rx = spawn_reader(child.stderr.take());

        let collected = collect(&mut child, &stdout_rx, &stderr_rx, deadline);

        let (status, stdout, stderr) = match collected {
            Ok(Some(collected)) => collected,
            Ok(None) => {
                kill_process_group(&mut child);
                let timeout = self.timeout.unwrap_or_default();
                log::error!(
                    "❌ wkhtmltopdf (pid {}) killed after {:?}",
                    child.id(),
                    timeout
                );
                return Err(PdfViewError::Timeout(timeout));
            }
            Err(e) => {
                kill_process_group(&mut child);
                return Err(e);
            }
        };

        let output = ProcessOutput::new(
            stdout,
            String::from_utf8_lossy(&stderr).into_owned(),
            exit_code(status),
        );

        log::debug!(
            "wkhtmltopdf exited with code {} in {:?} ({} bytes stdout, {} bytes stderr)",
            output.exit_code,
            start.elapsed(),
            output.stdout.len(),
            output.stderr.len()
        );

        Ok(output)
    }
}

fn spawn(command: &WkCommand) -> std::io::Result<Child> {
    let mut process = Command::new(command.program());
    process
        .args(command.args())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        process.process_group(0);
    }

    process.spawn()
}

fn spawn_stdin_writer(child: &mut Child, input: Vec<u8>) {
    let stdin = child.stdin.take();
    thread::spawn(move || {
        if let Some(mut stdin) = stdin {
            // A child that never reads stdin closes it early; that is not an error.
            if let Err(e) = stdin.write_all(&input) {
                log::trace!("stdin write ended early: {}", e);
            }
        }
    });
}

/// Drain `pipe` on its own thread; the result arrives once every holder of
/// the pipe has closed it.
fn spawn_reader<R>(pipe: Option<R>) -> Receiver<std::io::Result<Vec<u8>>>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let result = match pipe {
            Some(mut pipe) => pipe.read_to_end(&mut buf).map(|_| buf),
            None => Ok(buf),
        };
        // The receiver is gone when the run already timed out.
        let _ = tx.send(result);
    });
    rx
}

/// Receive one stream; `Ok(None)` means `deadline` passed first.
fn recv_stream(
    rx: &Receiver<std::io::Result<Vec<u8>>>,
    deadline: Option<Instant>,
    stream: &str,
) -> Result<Option<Vec<u8>>> {
    let received = match deadline {
        Some(deadline) => {
            match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                Ok(result) => result,
                Err(RecvTimeoutError::Timeout) => {
                    log::warn!("{} still open at the deadline", stream);
                    return Ok(None);
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(reader_panicked(stream));
                }
            }
        }
        None => rx.recv().map_err(|_| reader_panicked(stream))?,
    };

    received
        .map(Some)
        .map_err(|e| PdfViewError::Render(format!("failed to read {}: {}", stream, e)))
}

fn reader_panicked(stream: &str) -> PdfViewError {
    PdfViewError::Render(format!("{} reader thread panicked", stream))
}

type Collected = (ExitStatus, Vec<u8>, Vec<u8>);

/// Wait for the exit status and both streams; `Ok(None)` means `deadline`
/// passed before all three arrived.
fn collect(
    child: &mut Child,
    stdout_rx: &Receiver<std::io::Result<Vec<u8>>>,
    stderr_rx: &Receiver<std::io::Result<Vec<u8>>>,
    deadline: Option<Instant>,
) -> Result<Option<Collected>> {
    let Some(status) = wait_for_exit(child, deadline)? else {
        return Ok(None);
    };
    let Some(stdout) = recv_stream(stdout_rx, deadline, "stdout")? else {
        return Ok(None);
    };
    let Some(stderr) = recv_stream(stderr_rx, deadline, "stderr")? else {
        return Ok(None);
    };
    Ok(Some((status, stdout, stderr)))
}

/// Wait for `child` to exit; `Ok(None)` means `deadline` passed first.
fn wait_for_exit(child: &mut Child, deadline: Option<Instant>) -> Result<Option<ExitStatus>> {
    let Some(deadline) = deadline else {
        return child
            .wait()
            .map(Some)
            .map_err(|e| PdfViewError::Render(format!("failed to wait for wkhtmltopdf: {}", e)));
    };

    let poll_interval = Duration::from_millis(EXIT_POLL_INTERVAL_MS);

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(Some(status)),
            Ok(None) if Instant::now() >= deadline => return Ok(None),
            Ok(None) => thread::sleep(poll_interval),
            Err(e) => {
                return Err(PdfViewError::Render(format!(
                    "failed to wait for wkhtmltopdf: {}",
                    e
                )));
            }
        }
    }
}

/// Kill the child and everything it started, then reap the child.
#[cfg(unix)]
fn kill_process_group(child: &mut Child) {
    // The child was spawned with `process_group(0)`, so its pid is the group id.
    let pgid = child.id() as libc::pid_t;
    // SAFETY: kill(2) takes no pointers; a negative pid addresses the group.
    let result = unsafe { libc::kill(-pgid, libc::SIGKILL) };
    if result != 0 {
        log::warn!(
            "Failed to kill process group {}: {}",
            pgid,
            std::io::Error::last_os_error()
        );
        if let Err(e) = child.kill() {
            log::warn!("Failed to kill wkhtmltopdf: {}", e);
        }
    }
    // Reap the zombie
    let _ = child.wait();
}

#[cfg(not(unix))]
fn kill_process_group(child: &mut Child) {
    if let Err(e) = child.kill() {
        log::warn!("Failed to kill wkhtmltopdf: {}", e);
    }
    let _ = child.wait();
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::Path;

    fn sh(script: &str) -> WkCommand {
        WkCommand::from_parts(Path::new("/bin/sh"), ["-c", script])
    }

    #[test]
    fn test_captures_stdout_stderr_and_code() {
        let runner = SystemRunner::new(Some(Duration::from_secs(10)));
        let output = runner
            .run(&sh("printf '%%PDF-1.4'; printf 'Warning: x' >&2; exit 1"), b"")
            .unwrap();

        assert_eq!(output.stdout, b"%PDF-1.4".to_vec());
        assert_eq!(output.stderr, "Warning: x");
        assert_eq!(output.exit_code, 1);
    }

    #[test]
    fn test_input_is_written_to_stdin() {
        let runner = SystemRunner::new(None);
        let output = runner.run(&sh("cat"), b"<html>hi</html>").unwrap();

        assert_eq!(output.stdout, b"<html>hi</html>".to_vec());
        assert_eq!(output.exit_code, 0);
    }

    #[test]
    fn test_large_output_does_not_deadlock() {
        let runner = SystemRunner::new(Some(Duration::from_secs(20)));
        let output = runner
            .run(
                &sh("head -c 1048576 /dev/zero; head -c 262144 /dev/zero >&2"),
                b"",
            )
            .unwrap();

        assert_eq!(output.stdout.len(), 1_048_576);
        assert_eq!(output.stderr.len(), 262_144);
    }

    #[test]
    fn test_timeout_kills_child() {
        let runner = SystemRunner::new(Some(Duration::from_millis(200)));
        let start = Instant::now();
        let err = runner.run(&sh("exec sleep 10"), b"").unwrap_err();

        assert!(err.is_timeout(), "Expected timeout, got {:?}", err);
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_timeout_covers_pipes_held_by_background_process() {
        let runner = SystemRunner::new(Some(Duration::from_millis(300)));
        let start = Instant::now();
        let err = runner
            .run(&sh("sleep 4 & printf '%%PDF'; exit 0"), b"")
            .unwrap_err();

        assert!(err.is_timeout(), "Expected timeout, got {:?}", err);
        assert!(
            start.elapsed() < Duration::from_secs(2),
            "run blocked {:?} past a 300ms timeout",
            start.elapsed()
        );
    }

    #[test]
    fn test_timeout_kills_whole_process_group() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("pid");
        let script = format!("sleep 30 & echo $! > '{}'; wait", pid_file.display());

        let runner = SystemRunner::new(Some(Duration::from_millis(300)));
        let err = runner.run(&sh(&script), b"").unwrap_err();
        assert!(err.is_timeout(), "Expected timeout, got {:?}", err);

        let pid = std::fs::read_to_string(&pid_file).unwrap();
        let pid: libc::pid_t = pid.trim().parse().unwrap();

        let gone = (0..40).any(|_| {
            let alive = is_running(pid);
            if alive {
                thread::sleep(Duration::from_millis(50));
            }
            !alive
        });
        assert!(gone, "background process {} survived the timeout", pid);
    }

    /// A killed but unreaped process (zombie) counts as gone.
    fn is_running(pid: libc::pid_t) -> bool {
        // SAFETY: signal 0 only checks that the process exists.
        if unsafe { libc::kill(pid, 0) } != 0 {
            return false;
        }
        match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
            Ok(stat) => stat
                .rsplit(')')
                .next()
                .is_some_and(|rest| !rest.trim_start().starts_with('Z')),
            Err(_) => true,
        }
    }

    #[test]
    fn test_signal_exit_code() {
        let runner = SystemRunner::new(Some(Duration::from_secs(10)));
        let output = runner.run(&sh("kill -9 $$"), b"").unwrap();
        assert_eq!(output.exit_code, 128 + 9);
    }

    #[test]
    fn test_missing_binary_is_configuration_error() {
        let runner = SystemRunner::default();
        let command = WkCommand::from_parts(
            Path::new("/nonexistent/wkhtmltopdf"),
            ["--version"],
        );

        let err = runner.run(&command, b"").unwrap_err();
        assert!(err.is_configuration(), "Expected Configuration, got {:?}", err);
    }

    #[test]
    fn test_default_uses_config_timeout() {
        assert_eq!(
            SystemRunner::default().timeout(),
            Some(Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS))
        );
    }
}
