//! Git service for acquiring and refreshing repositories.
//!
//! Shells out to the configured VCS binary so that SSH keys, credential
//! helpers and any settings in `~/.gitconfig` apply unchanged.

use super::process::run_captured;
use crate::domain::RepositoryDescriptor;
use crate::error::ProcessResult;
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;

/// What a sync did to the local copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// The directory did not exist and was cloned
    Cloned,
    /// The directory existed and new refs were fetched
    Updated,
}

/// Git CLI wrapper
#[derive(Debug, Clone)]
pub struct GitService {
    program: String,
    timeout: Duration,
}

impl GitService {
    /// Create a service invoking `program` with a per-command timeout
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// `git clone <url> <target_dir>`
    pub async fn clone_repo(&self, url: &str, target_dir: &Path) -> ProcessResult<()> {
        let args = [OsStr::new("clone"), OsStr::new(url), target_dir.as_os_str()];
        run_captured(&self.program, args, None, self.timeout).await?;
        Ok(())
    }

    /// `git fetch` inside `repo_dir`
    pub async fn fetch(&self, repo_dir: &Path) -> ProcessResult<()> {
        run_captured(&self.program, ["fetch"], Some(repo_dir), self.timeout).await?;
        Ok(())
    }

    /// Clone the repository, or fetch if its directory already exists
    pub async fn sync(&self, repo: &RepositoryDescriptor) -> ProcessResult<SyncAction> {
        if is_existing_dir(&repo.local_dir).await {
            self.fetch(&repo.local_dir).await?;
            Ok(SyncAction::Updated)
        } else {
            self.clone_repo(&repo.clone_url, &repo.local_dir).await?;
            Ok(SyncAction::Cloned)
        }
    }
}

async fn is_existing_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
}
