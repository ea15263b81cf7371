//! Domain entities for lint-sweep.
//!
//! This module contains the core entities:
//! - RepositoryDescriptor / Catalog: discovered repositories keyed by name
//! - RunOutcome: what happened to one repository in a phase
//! - RunReport: the aggregated result of a run

mod outcome;
mod report;
mod repository;

pub use outcome::{RunOutcome, SkipReason};
pub use report::{RunReport, Tally};
pub use repository::{derive_name, derive_owner, Catalog, Insertion, RepositoryDescriptor};
