//! Names of the caches owned by this test run
//!
//! Only caches in this set are ever checked or destroyed. Anything else in
//! the location may belong to an unrelated suite sharing the directory.

use crate::error::{CheckerError, CheckerResult};
use std::collections::BTreeSet;

/// Environment variable holding the `--`-delimited workload cache list
pub const WORKLOAD_LIST_ENV: &str = "SCC_WL_CACHE_LIST";

/// Delimiter between names in the workload list
pub const DELIMITER: &str = "--";

/// Set of cache names this run may touch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkloadCacheSet {
    names: BTreeSet<String>,
}

impl WorkloadCacheSet {
    /// Parse a `--`-delimited list. Empty segments are dropped.
    pub fn parse(list: &str) -> Self {
        Self::from_names(list.split(DELIMITER))
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|n| n.as_ref().trim().to_string())
                .filter(|n| !n.is_empty())
                .collect(),
        }
    }

    /// Resolve the list from an explicit value, falling back to the environment
    pub fn resolve(explicit: Option<&str>) -> CheckerResult<Self> {
        let raw = match explicit {
            Some(list) => list.to_string(),
            None => std::env::var(WORKLOAD_LIST_ENV).map_err(|_| CheckerError::WorkloadListMissing)?,
        };
        Ok(Self::parse(&raw))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Whether a possibly-unnamed cache belongs to this run
    pub fn owns(&self, name: Option<&str>) -> bool {
        name.is_some_and(|n| self.contains(n))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
