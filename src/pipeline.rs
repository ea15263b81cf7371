//! Pipeline coordinator.
//!
//! Runs the phases strictly in order, each one finishing before the next
//! starts:
//!
//! 1. Fetch the catalog from the search endpoint (fatal on failure)
//! 2. Drop excluded repositories
//! 3. Provision the linter (fatal on failure)
//! 4. Clone or update every remaining repository, then join
//! 5. Re-read the projects directory
//! 6. Lint every repository that is on disk and cloned successfully, then join
//!
//! Clone and lint failures are recorded in the report and never abort the
//! run.

use crate::config::PipelineConfig;
use crate::domain::{Catalog, RunOutcome, RunReport};
use crate::error::Result;
use crate::services::{
    apply_exclusions, list_project_dirs, select_targets, CatalogFetcher, CloneExecutor,
    GitService, LintExecutor, LinterProvisioner, WorkerPool,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

/// One configured run of the batch pipeline
pub struct Pipeline {
    config: Arc<PipelineConfig>,
}

impl Pipeline {
    pub fn new(config: Arc<PipelineConfig>) -> Self {
        Self { config }
    }

    /// Execute all phases and return the aggregated report
    pub async fn run(&self) -> Result<RunReport> {
        let start = Instant::now();
        let config = &self.config;
        let mut report = RunReport::new();

        let catalog = self.fetch().await?;

        let (catalog, skipped) = apply_exclusions(catalog, &config.excluded_names);
        for (descriptor, reason) in skipped {
            tracing::info!(repo = %descriptor.name, %reason, "skipping");
            report.record(descriptor.name, RunOutcome::Skipped(reason));
        }

        let git = GitService::new(
            config.execution.vcs_binary.clone(),
            config.execution.clone_timeout(),
        );
        let linter = LinterProvisioner::new(
            config.linter.clone(),
            git.clone(),
            config.execution.lint_timeout(),
        )
        .provision()
        .await?;

        let pool = WorkerPool::new(config.execution.max_concurrency);

        let cloned = self.clone_all(&catalog, git, pool.clone(), &mut report).await;

        let present = match list_project_dirs(&config.projects_dir).await {
            Ok(dirs) => dirs,
            Err(e) => {
                tracing::warn!(
                    dir = %config.projects_dir.display(),
                    error = %e,
                    "cannot read projects directory, nothing to lint"
                );
                Vec::new()
            }
        };
        let targets = select_targets(&present, &catalog, &cloned);

        let lint = LintExecutor::new(
            linter.binary_path,
            config.linter.args.clone(),
            config.execution.lint_timeout(),
            pool,
        );
        for (name, outcome) in lint.run(targets).await {
            report.record(name, outcome);
        }

        report.set_elapsed(start.elapsed());
        tracing::info!(
            cloned = report.tally.cloned,
            clone_failed = report.tally.clone_failed,
            linted = report.tally.linted,
            lint_failed = report.tally.lint_failed,
            skipped = report.tally.skipped,
            elapsed = ?report.elapsed,
            "pipeline finished"
        );
        Ok(report)
    }

    async fn fetch(&self) -> Result<Catalog> {
        let fetcher = CatalogFetcher::new(&self.config.search, &self.config.token)?;
        fetcher.fetch(&self.config.projects_dir).await
    }

    /// Returns the names that were cloned or updated successfully
    async fn clone_all(
        &self,
        catalog: &Catalog,
        git: GitService,
        pool: WorkerPool,
        report: &mut RunReport,
    ) -> HashSet<String> {
        let mut cloned = HashSet::new();
        for (name, outcome) in CloneExecutor::new(git, pool).run(catalog).await {
            if outcome == RunOutcome::Cloned {
                cloned.insert(name.clone());
            }
            report.record(name, outcome);
        }
        cloned
    }
}
