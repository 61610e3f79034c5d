//! unmerged-cleaner: list and delete old, unprotected entries from a site's unmerged area.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use app::api::{
    ExecutionReport, RunMode, RunOptions, RunResult, ScanOutcome, run, run_with_context,
};
pub use domain::{AppError, CleanerConfig, SuspiciousConditions};
