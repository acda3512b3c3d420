//! scc-checker - shared class cache checker
//!
//! Enumerates the shared class caches a test run's JVM workloads created,
//! checks them against what the run declared, and destroys the ones the
//! run owns.

pub mod checker;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod reaper;
pub mod registry;
pub mod report;
pub mod store;
pub mod ui;
pub mod verifier;
pub mod workload;

pub use error::{CheckerError, CheckerResult};
