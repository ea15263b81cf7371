//! Infrastructure services for lint-sweep.
//!
//! This module contains:
//! - CatalogFetcher: repository search client
//! - exclusion filtering of the catalog
//! - LinterProvisioner: prebuilt or built-from-source linter
//! - GitService: clone and fetch through the git CLI
//! - CloneExecutor / LintExecutor: per-repository phases on a WorkerPool
//! - process: subprocess execution with timeouts

pub mod catalog;
pub mod clone;
pub mod filter;
pub mod git;
pub mod lint;
pub mod linter;
pub mod pool;
pub mod process;

pub use catalog::{parse_catalog, CatalogFetcher};
pub use clone::CloneExecutor;
pub use filter::{apply_exclusions, matching_exclusion};
pub use git::{GitService, SyncAction};
pub use lint::{list_project_dirs, select_targets, LintExecutor};
pub use linter::{LinterProvisioner, ProvisionedLinter};
pub use pool::WorkerPool;
pub use process::{run_captured, CapturedOutput};
