//! Shared subprocess execution.
//!
//! Provides [`run_command`]: spawn a prepared [`tokio::process::Command`],
//! capture stdout/stderr, and enforce a timeout.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::manim::RenderError;

/// Maximum stdout or stderr size captured per stream (10 MiB).
const MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

/// Captured result of a finished process.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` if the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub duration_ms: u64,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Spawn `cmd`, capture its output streams, and wait up to `timeout`.
///
/// Spawn failures surface as [`RenderError::Io`]. On timeout the child is
/// killed (via `kill_on_drop`) and [`RenderError::Timeout`] is returned.
/// A non-zero exit is NOT an error here; callers inspect `exit_code`.
pub async fn run_command(cmd: &mut Command, timeout: Duration) -> Result<CommandOutput, RenderError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let start = Instant::now();
    let mut child = cmd.spawn()?;

    // Read in separate tasks so `child.wait()` can borrow `child` mutably.
    let stdout_handle = child.stdout.take();
    let stderr_handle = child.stderr.take();
    let stdout_task = tokio::spawn(async move { read_stream(stdout_handle).await });
    let stderr_task = tokio::spawn(async move { read_stream(stderr_handle).await });

    match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) => {
            let stdout_bytes = stdout_task.await.unwrap_or_default();
            let stderr_bytes = stderr_task.await.unwrap_or_default();
            Ok(CommandOutput {
                stdout: String::from_utf8_lossy(&stdout_bytes).into_owned(),
                stderr: String::from_utf8_lossy(&stderr_bytes).into_owned(),
                exit_code: status.code(),
                duration_ms: start.elapsed().as_millis() as u64,
            })
        }
        Ok(Err(e)) => Err(RenderError::Io(e)),
        Err(_elapsed) => {
            // `child` drops here and is killed.
            Err(RenderError::Timeout {
                elapsed_ms: start.elapsed().as_millis() as u64,
            })
        }
    }
}

/// Read an entire output stream, keeping at most [`MAX_OUTPUT_BYTES`].
///
/// Output past the cap is drained and discarded so the child never sees a
/// closed pipe.
async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = (&mut h)
            .take(MAX_OUTPUT_BYTES as u64)
            .read_to_end(&mut buf)
            .await;
        let _ = tokio::io::copy(&mut h, &mut tokio::io::sink()).await;
    }
    buf
}

#[cfg(all(test, unix))]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test]
    async fn captures_streams_and_exit_code() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo out; echo err >&2; exit 3"]);
        let output = run_command(&mut cmd, Duration::from_secs(10)).await.unwrap();
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
        assert_eq!(output.exit_code, Some(3));
        assert!(!output.success());
    }

    #[tokio::test]
    async fn oversized_output_is_truncated_not_fatal() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "head -c 12582912 /dev/zero || exit 3; echo done >&2"]);
        let output = run_command(&mut cmd, Duration::from_secs(30)).await.unwrap();
        assert_eq!(output.exit_code, Some(0));
        assert_eq!(output.stdout.len(), MAX_OUTPUT_BYTES);
        assert_eq!(output.stderr.trim(), "done");
    }

    #[tokio::test]
    async fn missing_program_is_io_error() {
        let mut cmd = Command::new("/definitely/not/a/real/program");
        assert_matches!(
            run_command(&mut cmd, Duration::from_secs(1)).await,
            Err(RenderError::Io(_))
        );
    }

    #[tokio::test]
    async fn slow_process_times_out() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "sleep 5"]);
        assert_matches!(
            run_command(&mut cmd, Duration::from_millis(100)).await,
            Err(RenderError::Timeout { .. })
        );
    }
}
