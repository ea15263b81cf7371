//! Linter provisioning.
//!
//! Either trusts a configured binary path as-is, or clones the linter
//! sources and compiles them into a fixed location under the build
//! directory. Build failures are fatal; a bad pass-through path only shows
//! up later as per-repository lint failures.

use super::git::GitService;
use super::process::run_captured;
use crate::config::{LinterConfig, LinterSource};
use crate::domain::derive_name;
use crate::error::BuildError;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A linter ready to be invoked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedLinter {
    pub binary_path: PathBuf,
}

/// Makes the linter binary available before the lint phase
pub struct LinterProvisioner {
    config: LinterConfig,
    git: GitService,
    timeout: Duration,
}

impl LinterProvisioner {
    /// `git` is used to fetch the sources for the build strategy
    pub fn new(config: LinterConfig, git: GitService, timeout: Duration) -> Self {
        Self {
            config,
            git,
            timeout,
        }
    }

    pub async fn provision(&self) -> Result<ProvisionedLinter, BuildError> {
        match &self.config.source {
            LinterSource::Binary { path } => {
                tracing::info!(binary = %path.display(), "using prebuilt linter");
                Ok(ProvisionedLinter {
                    binary_path: path.clone(),
                })
            }
            LinterSource::Build {
                clone_url,
                main_path,
                toolchain,
            } => self.build(clone_url, main_path, toolchain).await,
        }
    }

    async fn build(
        &self,
        clone_url: &str,
        main_path: &str,
        toolchain: &str,
    ) -> Result<ProvisionedLinter, BuildError> {
        let build_dir = absolute(self.config.build_dir())?;
        let source_name = derive_name(clone_url).unwrap_or_else(|| "linter".to_string());
        let source_dir = build_dir.join("src").join(source_name);
        let bin_dir = build_dir.join("bin");
        let binary_path = bin_dir.join(&self.config.binary_name);

        remove_dir_if_present(&source_dir).await?;
        create_dir(&bin_dir).await?;
        if let Some(parent) = source_dir.parent() {
            create_dir(parent).await?;
        }

        tracing::info!(url = %clone_url, dir = %source_dir.display(), "cloning linter sources");
        self.git.clone_repo(clone_url, &source_dir).await?;

        tracing::info!(toolchain = %toolchain, output = %binary_path.display(), "building linter");
        let build = run_captured(
            toolchain,
            [
                OsStr::new("build"),
                OsStr::new("-o"),
                binary_path.as_os_str(),
                OsStr::new(main_path),
            ],
            Some(&source_dir),
            self.timeout,
        )
        .await;

        // The sources are only needed for the build
        if let Err(e) = tokio::fs::remove_dir_all(&source_dir).await {
            tracing::warn!(dir = %source_dir.display(), error = %e, "failed to remove linter sources");
        }

        let output = build?;
        tracing::debug!(duration = ?output.duration, "linter built");

        Ok(ProvisionedLinter { binary_path })
    }
}

/// The toolchain runs inside the source checkout, so `-o` must not be relative
fn absolute(path: PathBuf) -> Result<PathBuf, BuildError> {
    if path.is_absolute() {
        return Ok(path);
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&path))
        .map_err(|source| BuildError::Io { path, source })
}

async fn create_dir(path: &Path) -> Result<(), BuildError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| BuildError::Io {
            path: path.to_path_buf(),
            source,
        })
}

async fn remove_dir_if_present(path: &Path) -> Result<(), BuildError> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(BuildError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
