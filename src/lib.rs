//! lint-sweep: run a linter across every repository a code search returns
//!
//! The crate discovers repositories through a search API, clones or
//! updates them under a projects directory, provisions a linter binary and
//! runs it inside each checkout, collecting a per-repository report.

pub mod config;
pub mod domain;
pub mod error;
pub mod pipeline;
pub mod services;

pub use config::PipelineConfig;
pub use domain::{RunOutcome, RunReport};
pub use error::{AppError, Result};
pub use pipeline::Pipeline;
