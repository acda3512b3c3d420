//! Cache store abstraction
//!
//! The store owns cache state and exposes two primitives: enumerate the
//! caches visible at a location, and destroy one cache by name. Both block
//! on external state (files, OS IPC objects) shared with other processes,
//! so callers bound every call with a timeout.

pub mod descriptor;
mod java_cli;
pub mod listing;

#[cfg(test)]
pub(crate) mod fake;

pub use descriptor::{AddressMode, CacheDescriptor, Persistence};
pub use java_cli::JavaCliStore;

use crate::config::StoreConfig;
use crate::error::{CheckerError, CheckerResult};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Query flags accepted by the store. Only `NO_FLAGS` is defined.
pub const NO_FLAGS: u32 = 0;

/// Parameters of one enumeration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumerateQuery {
    /// Directory to search; `None` means the runtime default
    pub location: Option<String>,
    pub flags: u32,
    /// Use the location from the store's own launch options instead of `location`
    pub use_command_line: bool,
}

/// Parameters of one destroy call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestroyRequest {
    pub location: Option<String>,
    pub persistence: Persistence,
    pub name: String,
    /// Reset (destroy and recreate on next start) instead of destroy
    pub reset: bool,
}

/// Classified result of a destroy call. Only `DestroyedAll` is success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DestroyOutcome {
    DestroyedAll,
    DestroyedNone,
    DestroyFailedCurrentGeneration,
    DestroyFailedOlderGeneration,
    Unknown,
}

impl DestroyOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::DestroyedAll)
    }

    /// Human-readable meaning, used in logs
    pub fn describe(&self) -> &'static str {
        match self {
            Self::DestroyedAll => "destroyed all caches",
            Self::DestroyedNone => "no caches destroyed",
            Self::DestroyFailedCurrentGeneration => "failed to destroy the current generation cache",
            Self::DestroyFailedOlderGeneration => "failed to destroy an older generation cache",
            Self::Unknown => "unknown result",
        }
    }
}

impl fmt::Display for DestroyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Capability interface over the external cache store
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Snapshot of the caches visible for the query
    async fn enumerate(&self, query: &EnumerateQuery) -> CheckerResult<Vec<CacheDescriptor>>;

    /// Destroy one cache. Failures are classified, not raised.
    async fn destroy(&self, request: &DestroyRequest) -> DestroyOutcome;

    /// Human-readable store name for display
    fn store_name(&self) -> &'static str;
}

/// Create the production cache store
pub fn create_store(config: &StoreConfig) -> Box<dyn CacheStore> {
    Box::new(JavaCliStore::new(config))
}

/// Run a store call under a deadline
pub async fn with_deadline<T, F>(operation: &str, limit: Duration, call: F) -> CheckerResult<T>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| CheckerError::StoreTimeout {
            operation: operation.to_string(),
            secs: limit.as_secs(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_destroyed_all_is_success() {
        assert!(DestroyOutcome::DestroyedAll.is_success());
        assert!(!DestroyOutcome::DestroyedNone.is_success());
        assert!(!DestroyOutcome::Unknown.is_success());
    }

    #[tokio::test]
    async fn deadline_expires() {
        let err = with_deadline("enumerate", Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
        })
        .await
        .unwrap_err();
        assert!(matches!(err, CheckerError::StoreTimeout { .. }));
    }

    #[tokio::test]
    async fn deadline_passes_value_through() {
        let value = with_deadline("enumerate", Duration::from_secs(1), async { 7 })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }
}
