//! Per-repository results produced by the clone and lint phases.

use serde::Serialize;

/// Result of processing one repository in a phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Fresh clone or in-place update succeeded
    Cloned,
    /// Clone or fetch failed; carries the subprocess output
    CloneFailed(String),
    /// Linter exited successfully
    Linted,
    /// Linter failed; carries the subprocess output
    LintFailed(String),
    /// Never touched
    Skipped(SkipReason),
}

impl RunOutcome {
    /// Check if the outcome records a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::CloneFailed(_) | Self::LintFailed(_))
    }

    /// Failure reason, if any
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::CloneFailed(reason) | Self::LintFailed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Short label for text output
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cloned => "cloned",
            Self::CloneFailed(_) => "clone failed",
            Self::Linted => "linted",
            Self::LintFailed(_) => "lint failed",
            Self::Skipped(_) => "skipped",
        }
    }
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skipped(reason) => write!(f, "{} ({})", self.label(), reason),
            _ => write!(f, "{}", self.label()),
        }
    }
}

/// Why a repository was skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Name matched an entry of the exclusion list
    Excluded { pattern: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excluded { pattern } => write!(f, "excluded by '{}'", pattern),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_reason() {
        let outcome = RunOutcome::LintFailed("exit 1".to_string());
        assert!(outcome.is_failure());
        assert_eq!(outcome.reason(), Some("exit 1"));
        assert!(!RunOutcome::Linted.is_failure());
        assert_eq!(RunOutcome::Cloned.reason(), None);
    }

    #[test]
    fn test_skipped_display() {
        let outcome = RunOutcome::Skipped(SkipReason::Excluded {
            pattern: "moby".to_string(),
        });
        assert_eq!(outcome.to_string(), "skipped (excluded by 'moby')");
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(RunOutcome::CloneFailed("boom".to_string())).unwrap();
        assert_eq!(json["status"], "clone_failed");
        assert_eq!(json["detail"], "boom");

        let json = serde_json::to_value(RunOutcome::Linted).unwrap();
        assert_eq!(json["status"], "linted");
    }
}
