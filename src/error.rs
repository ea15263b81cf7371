//! Unified error types for lint-sweep.
//!
//! Fatal errors abort the run through [`AppError`]. Per-repository
//! subprocess failures are [`ProcessError`]s and end up as outcomes in the
//! report instead.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Top-level fatal error
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Linter build error: {0}")]
    Build(#[from] BuildError),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Search request failures
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("search request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("token contains characters not allowed in an HTTP header")]
    InvalidToken,

    #[error("search returned non-200 status {status}")]
    Status { status: u16 },
}

/// Malformed search response
#[derive(Debug, Error)]
#[error("malformed search response: {0}")]
pub struct ParseError(#[from] pub serde_json::Error);

/// Linter provisioning failures
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{0}")]
    Process(#[from] ProcessError),

    #[error("failed to prepare build directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single subprocess invocation that did not succeed
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} timed out after {}s", timeout.as_secs())]
    TimedOut { program: String, timeout: Duration },

    #[error("{program} exited with {}: {output}", exit_label(*code))]
    Failed {
        program: String,
        code: Option<i32>,
        output: String,
    },

    #[error("failed waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

fn exit_label(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "signal".to_string(),
    }
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for subprocess invocations
pub type ProcessResult<T> = std::result::Result<T, ProcessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_process_message_carries_output() {
        let err = ProcessError::Failed {
            program: "git".to_string(),
            code: Some(128),
            output: "fatal: repository not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "git exited with status 128: fatal: repository not found"
        );
    }

    #[test]
    fn test_killed_process_message() {
        let err = ProcessError::Failed {
            program: "linter".to_string(),
            code: None,
            output: String::new(),
        };
        assert!(err.to_string().contains("exited with signal"));
    }

    #[test]
    fn test_status_error_converts_to_app_error() {
        let err: AppError = FetchError::Status { status: 403 }.into();
        assert!(matches!(err, AppError::Fetch(FetchError::Status { status: 403 })));
        assert_eq!(
            err.to_string(),
            "Fetch error: search returned non-200 status 403"
        );
    }
}
