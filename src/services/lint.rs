//! Lint phase: run the linter inside every successfully cloned repository.

use super::pool::WorkerPool;
use super::process::run_captured;
use crate::domain::{Catalog, RepositoryDescriptor, RunOutcome};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Names of the directories directly under `projects_dir`
pub async fn list_project_dirs(projects_dir: &Path) -> std::io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(projects_dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Repositories to lint: present on disk ∩ catalog ∩ successfully cloned.
///
/// Directories without a matching descriptor are ignored, as are
/// repositories whose clone or update failed.
pub fn select_targets(
    present_dirs: &[String],
    catalog: &Catalog,
    cloned: &HashSet<String>,
) -> Vec<RepositoryDescriptor> {
    present_dirs
        .iter()
        .filter(|name| cloned.contains(name.as_str()))
        .filter_map(|name| catalog.get(name))
        .cloned()
        .collect()
}

struct LintJob {
    binary: PathBuf,
    args: Arc<Vec<String>>,
    timeout: Duration,
}

/// Runs the linter binary in each target's directory through the pool
pub struct LintExecutor {
    job: Arc<LintJob>,
    pool: WorkerPool,
}

impl LintExecutor {
    /// `args` are passed verbatim; the repository is selected by working
    /// directory, never by argument
    pub fn new(binary: PathBuf, args: Vec<String>, timeout: Duration, pool: WorkerPool) -> Self {
        Self {
            job: Arc::new(LintJob {
                binary,
                args: Arc::new(args),
                timeout,
            }),
            pool,
        }
    }

    /// Lint every target and wait for all of them
    pub async fn run(&self, targets: Vec<RepositoryDescriptor>) -> Vec<(String, RunOutcome)> {
        tracing::info!(
            repositories = targets.len(),
            linter = %self.job.binary.display(),
            "lint phase started"
        );

        let units = targets
            .into_iter()
            .map(|repo| (repo.name.clone(), repo))
            .collect();

        let job = Arc::clone(&self.job);
        let results = self
            .pool
            .run(units, move |repo| {
                let job = Arc::clone(&job);
                async move {
                    let result = run_captured(
                        &job.binary,
                        job.args.iter(),
                        Some(&repo.local_dir),
                        job.timeout,
                    )
                    .await;
                    match result {
                        Ok(output) => {
                            tracing::debug!(repo = %repo.name, duration = ?output.duration, "linted");
                            RunOutcome::Linted
                        }
                        Err(e) => {
                            tracing::warn!(repo = %repo.name, error = %e, "lint failed");
                            RunOutcome::LintFailed(e.to_string())
                        }
                    }
                }
            })
            .await;

        results
            .into_iter()
            .map(|(name, joined)| {
                let outcome = joined.unwrap_or_else(|e| {
                    tracing::error!(repo = %name, error = %e, "lint task aborted");
                    RunOutcome::LintFailed(format!("lint task aborted: {}", e))
                });
                (name, outcome)
            })
            .collect()
    }
}
