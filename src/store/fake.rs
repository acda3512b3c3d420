//! In-memory cache store for tests

use crate::error::CheckerResult;
use crate::store::{CacheDescriptor, CacheStore, DestroyOutcome, DestroyRequest, EnumerateQuery};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub(crate) struct FakeStore {
    caches: Vec<CacheDescriptor>,
    outcomes: HashMap<String, DestroyOutcome>,
    destroyed: Mutex<Vec<DestroyRequest>>,
    enumerations: AtomicUsize,
    delay: Option<Duration>,
}

impl FakeStore {
    pub(crate) fn new(caches: Vec<CacheDescriptor>) -> Self {
        Self {
            caches,
            outcomes: HashMap::new(),
            destroyed: Mutex::new(Vec::new()),
            enumerations: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// Make `destroy` of one name report this outcome instead of `DestroyedAll`
    pub(crate) fn with_outcome(mut self, name: &str, outcome: DestroyOutcome) -> Self {
        self.outcomes.insert(name.to_string(), outcome);
        self
    }

    /// Make every call sleep first
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Names passed to `destroy`, in call order
    pub(crate) fn destroyed_names(&self) -> Vec<String> {
        self.destroyed
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.name.clone())
            .collect()
    }

    pub(crate) fn destroy_requests(&self) -> Vec<DestroyRequest> {
        self.destroyed.lock().unwrap().clone()
    }

    pub(crate) fn enumerate_calls(&self) -> usize {
        self.enumerations.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl CacheStore for FakeStore {
    async fn enumerate(&self, _query: &EnumerateQuery) -> CheckerResult<Vec<CacheDescriptor>> {
        self.enumerations.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        Ok(self.caches.clone())
    }

    async fn destroy(&self, request: &DestroyRequest) -> DestroyOutcome {
        self.pause().await;
        self.destroyed.lock().unwrap().push(request.clone());
        self.outcomes
            .get(&request.name)
            .copied()
            .unwrap_or(DestroyOutcome::DestroyedAll)
    }

    fn store_name(&self) -> &'static str {
        "fake"
    }
}
