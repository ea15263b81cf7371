//! Clone phase: acquire or refresh every catalog entry on disk.

use super::git::{GitService, SyncAction};
use super::pool::WorkerPool;
use crate::domain::{Catalog, RunOutcome};
use std::sync::Arc;

/// Runs `git clone` / `git fetch` for each repository through the pool
pub struct CloneExecutor {
    git: Arc<GitService>,
    pool: WorkerPool,
}

impl CloneExecutor {
    pub fn new(git: GitService, pool: WorkerPool) -> Self {
        Self {
            git: Arc::new(git),
            pool,
        }
    }

    /// Sync every repository and wait for all of them.
    ///
    /// Each repository ends up either `Cloned` or `CloneFailed`; one
    /// failure never cancels the others.
    pub async fn run(&self, catalog: &Catalog) -> Vec<(String, RunOutcome)> {
        if let Err(e) = tokio::fs::create_dir_all(catalog.projects_dir()).await {
            tracing::warn!(
                dir = %catalog.projects_dir().display(),
                error = %e,
                "failed to create projects directory"
            );
        }

        tracing::info!(
            repositories = catalog.len(),
            concurrency = self.pool.limit(),
            "clone phase started"
        );

        let units = catalog
            .iter()
            .map(|repo| (repo.name.clone(), repo.clone()))
            .collect();

        let git = Arc::clone(&self.git);
        let results = self
            .pool
            .run(units, move |repo| {
                let git = Arc::clone(&git);
                async move {
                    match git.sync(&repo).await {
                        Ok(action) => {
                            match action {
                                SyncAction::Cloned => tracing::debug!(repo = %repo.name, "cloned"),
                                SyncAction::Updated => tracing::debug!(repo = %repo.name, "fetched"),
                            }
                            RunOutcome::Cloned
                        }
                        Err(e) => {
                            tracing::warn!(repo = %repo.name, url = %repo.clone_url, error = %e, "clone failed");
                            RunOutcome::CloneFailed(e.to_string())
                        }
                    }
                }
            })
            .await;

        results
            .into_iter()
            .map(|(name, joined)| {
                let outcome = joined.unwrap_or_else(|e| {
                    tracing::error!(repo = %name, error = %e, "clone task aborted");
                    RunOutcome::CloneFailed(format!("clone task aborted: {}", e))
                });
                (name, outcome)
            })
            .collect()
    }
}
