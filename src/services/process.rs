//! Process execution service for git, build and linter invocations.
//!
//! Every child gets piped output, a hard timeout and is killed when the
//! future driving it is dropped.

use crate::error::{ProcessError, ProcessResult};
use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Output of a successful invocation
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    /// stdout followed by stderr
    pub combined: String,
    pub duration: Duration,
}

/// Run `program args...` to completion and capture its combined output.
///
/// A non-zero exit becomes [`ProcessError::Failed`] carrying the combined
/// output; exceeding `timeout` kills the child and returns
/// [`ProcessError::TimedOut`].
pub async fn run_captured<I, S>(
    program: impl AsRef<OsStr>,
    args: I,
    cwd: Option<&Path>,
    timeout: Duration,
) -> ProcessResult<CapturedOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let program = program.as_ref();
    let label = program.to_string_lossy().into_owned();

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    tracing::debug!(program = %label, cwd = ?cwd, "spawning");
    let start = Instant::now();

    let child = command.spawn().map_err(|source| ProcessError::Spawn {
        program: label.clone(),
        source,
    })?;

    // Dropping the wait future on timeout drops the child, which kills it
    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(|source| ProcessError::Wait {
            program: label.clone(),
            source,
        })?,
        Err(_) => {
            return Err(ProcessError::TimedOut {
                program: label,
                timeout,
            })
        }
    };

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    if !output.status.success() {
        return Err(ProcessError::Failed {
            program: label,
            code: output.status.code(),
            output: combined,
        });
    }

    Ok(CapturedOutput {
        combined,
        duration: start.elapsed(),
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TIMEOUT: Duration = Duration::from_secs(30);

    #[tokio::test]
    async fn test_combined_output() {
        let out = run_captured("sh", ["-c", "echo out; echo err >&2"], None, TIMEOUT)
            .await
            .unwrap();
        assert_eq!(out.combined, "out\nerr\n");
    }

    #[tokio::test]
    async fn test_runs_in_working_directory() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("marker"), "x").unwrap();

        let out = run_captured("ls", Vec::<&str>::new(), Some(temp.path()), TIMEOUT)
            .await
            .unwrap();
        assert!(out.combined.contains("marker"));
    }

    #[tokio::test]
    async fn test_non_zero_exit_carries_output() {
        let err = run_captured("sh", ["-c", "echo broken >&2; exit 3"], None, TIMEOUT)
            .await
            .unwrap_err();
        match err {
            ProcessError::Failed { code, output, .. } => {
                assert_eq!(code, Some(3));
                assert!(output.contains("broken"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_kills_child() {
        let start = Instant::now();
        let err = run_captured("sleep", ["30"], None, Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessError::TimedOut { .. }));
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let err = run_captured(
            "/nonexistent/lint-sweep-binary",
            Vec::<&str>::new(),
            None,
            TIMEOUT,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ProcessError::Spawn { .. }));
    }
}
