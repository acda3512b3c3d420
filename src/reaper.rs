//! Destruction of the caches owned by this run
//!
//! A name is attempted at most once per run: it goes into the ledger before
//! the outcome is known, so a failed destroy is never retried against a
//! cache that may be half gone.

use crate::store::{with_deadline, CacheDescriptor, CacheStore, DestroyOutcome, DestroyRequest};
use crate::workload::WorkloadCacheSet;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// How many eligible caches one reap pass destroys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReapMode {
    /// Stop after the first eligible cache
    #[default]
    Single,
    /// Destroy every eligible cache
    All,
}

impl FromStr for ReapMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" | "one" => Ok(Self::Single),
            "all" => Ok(Self::All),
            other => Err(format!("unknown reap mode '{}'", other)),
        }
    }
}

impl fmt::Display for ReapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::All => write!(f, "all"),
        }
    }
}

/// Names already attempted in this run
#[derive(Debug, Clone, Default)]
pub struct DeletionLedger {
    attempted: HashSet<String>,
}

impl DeletionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attempted.contains(name)
    }

    /// Record an attempt. Returns false if the name was already there.
    pub fn record(&mut self, name: &str) -> bool {
        self.attempted.insert(name.to_string())
    }

    pub fn len(&self) -> usize {
        self.attempted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempted.is_empty()
    }
}

/// One destroy attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestroyAttempt {
    pub cache: String,
    pub outcome: DestroyOutcome,
}

/// Result of one reap pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReapSummary {
    pub attempts: Vec<DestroyAttempt>,
    /// Eligible caches left for a later pass (single mode)
    pub deferred: usize,
}

impl ReapSummary {
    /// True when every attempted destroy succeeded
    pub fn is_success(&self) -> bool {
        self.attempts.iter().all(|a| a.outcome.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &DestroyAttempt> {
        self.attempts.iter().filter(|a| !a.outcome.is_success())
    }
}

/// Destroys workload caches through a store
pub struct Reaper<'a> {
    store: &'a dyn CacheStore,
    location: Option<String>,
    mode: ReapMode,
    timeout: Duration,
}

impl<'a> Reaper<'a> {
    pub fn new(store: &'a dyn CacheStore, location: Option<String>, timeout: Duration) -> Self {
        Self {
            store,
            location,
            mode: ReapMode::default(),
            timeout,
        }
    }

    pub fn with_mode(mut self, mode: ReapMode) -> Self {
        self.mode = mode;
        self
    }

    /// Destroy eligible caches from a snapshot.
    ///
    /// Eligible means named, in the workload set and not yet in the ledger.
    pub async fn destroy_workload_caches(
        &self,
        live: &[CacheDescriptor],
        workload: &WorkloadCacheSet,
        ledger: &mut DeletionLedger,
    ) -> ReapSummary {
        let mut summary = ReapSummary::default();

        for cache in live {
            let Some(name) = cache.usable_name() else {
                continue;
            };
            if !workload.contains(name) || ledger.contains(name) {
                continue;
            }
            if self.mode == ReapMode::Single && !summary.attempts.is_empty() {
                summary.deferred += 1;
                continue;
            }

            ledger.record(name);
            let outcome = self.destroy_one(name, cache).await;
            if outcome.is_success() {
                info!("Destroyed cache {}", name);
            } else {
                warn!("Could not destroy cache {}: {}", name, outcome);
            }
            summary.attempts.push(DestroyAttempt {
                cache: name.to_string(),
                outcome,
            });
        }

        if summary.deferred > 0 {
            info!(
                "{} eligible cache(s) left for a later pass (reap mode {})",
                summary.deferred, self.mode
            );
        }
        summary
    }

    async fn destroy_one(&self, name: &str, cache: &CacheDescriptor) -> DestroyOutcome {
        let request = DestroyRequest {
            location: self.location.clone(),
            persistence: cache.persistence,
            name: name.to_string(),
            reset: false,
        };
        match with_deadline("destroy", self.timeout, self.store.destroy(&request)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Destroy of {} failed: {}", name, e);
                DestroyOutcome::Unknown
            }
        }
    }
}
