//! Aggregated result of a pipeline run.

use super::RunOutcome;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Counts of recorded outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub cloned: usize,
    pub clone_failed: usize,
    pub linted: usize,
    pub lint_failed: usize,
    pub skipped: usize,
}

impl Tally {
    fn count(&mut self, outcome: &RunOutcome) {
        match outcome {
            RunOutcome::Cloned => self.cloned += 1,
            RunOutcome::CloneFailed(_) => self.clone_failed += 1,
            RunOutcome::Linted => self.linted += 1,
            RunOutcome::LintFailed(_) => self.lint_failed += 1,
            RunOutcome::Skipped(_) => self.skipped += 1,
        }
    }
}

/// Final report: latest outcome per repository, tally and elapsed time
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Latest outcome per repository, ordered by name
    pub outcomes: BTreeMap<String, RunOutcome>,
    pub tally: Tally,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a phase outcome; it replaces the repository's previous one
    pub fn record(&mut self, name: impl Into<String>, outcome: RunOutcome) {
        self.tally.count(&outcome);
        self.outcomes.insert(name.into(), outcome);
    }

    pub fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }

    pub fn outcome(&self, name: &str) -> Option<&RunOutcome> {
        self.outcomes.get(name)
    }

    /// Repositories whose latest outcome is a failure, with the reason
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes
            .iter()
            .filter_map(|(name, outcome)| outcome.reason().map(|r| (name.as_str(), r)))
    }

    /// Number of repositories that appear in the report
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn serialize_millis<S>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(elapsed.as_millis() as u64)
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (name, outcome) in &self.outcomes {
            writeln!(f, "{}: {}", name, outcome)?;
        }

        let failures: Vec<_> = self.failures().collect();
        if !failures.is_empty() {
            writeln!(f)?;
            writeln!(f, "failures:")?;
            for (name, reason) in failures {
                writeln!(f, "  {}: {}", name, reason.trim_end())?;
            }
        }

        writeln!(f)?;
        write!(
            f,
            "cloned: {}, clone failed: {}, linted: {}, lint failed: {}, skipped: {}",
            self.tally.cloned,
            self.tally.clone_failed,
            self.tally.linted,
            self.tally.lint_failed,
            self.tally.skipped
        )?;
        writeln!(f)?;
        write!(f, "finished in {:.2?}", self.elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SkipReason;

    fn sample_report() -> RunReport {
        let mut report = RunReport::new();
        report.record(
            "moby",
            RunOutcome::Skipped(SkipReason::Excluded {
                pattern: "moby".to_string(),
            }),
        );
        report.record("alpha", RunOutcome::Cloned);
        report.record("beta", RunOutcome::CloneFailed("repository not found".to_string()));
        report.record("gamma", RunOutcome::Cloned);
        report.record("alpha", RunOutcome::Linted);
        report.record("gamma", RunOutcome::LintFailed("3 issues\n".to_string()));
        report.set_elapsed(Duration::from_millis(1500));
        report
    }

    #[test]
    fn test_latest_outcome_wins_and_tally_counts_all() {
        let report = sample_report();
        assert_eq!(report.len(), 4);
        assert_eq!(report.outcome("alpha"), Some(&RunOutcome::Linted));
        assert_eq!(
            report.tally,
            Tally {
                cloned: 2,
                clone_failed: 1,
                linted: 1,
                lint_failed: 1,
                skipped: 1,
            }
        );
    }

    #[test]
    fn test_failures() {
        let report = sample_report();
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(
            failures,
            vec![("beta", "repository not found"), ("gamma", "3 issues\n")]
        );
    }

    #[test]
    fn test_text_report() {
        insta::assert_snapshot!(sample_report().to_string(), @r###"
        alpha: linted
        beta: clone failed
        gamma: lint failed
        moby: skipped (excluded by 'moby')

        failures:
          beta: repository not found
          gamma: 3 issues

        cloned: 2, clone failed: 1, linted: 1, lint failed: 1, skipped: 1
        finished in 1.50s
        "###);
    }

    #[test]
    fn test_json_report() {
        let json: serde_json::Value =
            serde_json::from_str(&sample_report().to_json().unwrap()).unwrap();
        assert_eq!(json["elapsed_ms"], 1500);
        assert_eq!(json["tally"]["linted"], 1);
        assert_eq!(json["outcomes"]["beta"]["status"], "clone_failed");
        assert_eq!(json["outcomes"]["moby"]["detail"]["excluded"]["pattern"], "moby");
    }

    #[test]
    fn test_empty_report() {
        let report = RunReport::new();
        assert!(report.is_empty());
        assert_eq!(report.failures().count(), 0);
    }
}
