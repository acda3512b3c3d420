//! The cache checker: snapshot, load expectations, verify, reap
//!
//! The store is enumerated exactly once, when the checker is created.
//! Every later step works on that snapshot.

use crate::config::CheckerConfig;
use crate::error::CheckerResult;
use crate::reaper::{DeletionLedger, ReapSummary, Reaper};
use crate::registry::ExpectedRegistry;
use crate::report::{events, RecordSink};
use crate::store::{with_deadline, CacheDescriptor, CacheStore, EnumerateQuery, NO_FLAGS};
use crate::verifier::{verify, VerificationReport, VerifyOptions};
use crate::workload::WorkloadCacheSet;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Everything a full run produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub verification: VerificationReport,
    /// `None` when deletion was off or skipped
    pub reap: Option<ReapSummary>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.verification.is_pass() && self.reap.as_ref().is_none_or(ReapSummary::is_success)
    }
}

pub struct Checker<'a> {
    store: &'a dyn CacheStore,
    config: CheckerConfig,
    workload: WorkloadCacheSet,
    caches: Vec<CacheDescriptor>,
    registry: ExpectedRegistry,
    ledger: DeletionLedger,
    records: RecordSink,
}

impl<'a> Checker<'a> {
    /// Create a checker and take the cache snapshot
    pub async fn new(
        store: &'a dyn CacheStore,
        config: CheckerConfig,
        workload: WorkloadCacheSet,
        records: RecordSink,
    ) -> CheckerResult<Self> {
        let query = EnumerateQuery {
            location: config.cache_dir.clone(),
            flags: NO_FLAGS,
            use_command_line: config.command_line_values,
        };
        let timeout = Duration::from_secs(config.store.timeout_secs);
        let caches = with_deadline("enumerate", timeout, store.enumerate(&query)).await??;
        info!(
            "{} reported {} cache(s); {} workload cache name(s) supplied",
            store.store_name(),
            caches.len(),
            workload.len()
        );

        for cache in &caches {
            records.emit(events::CACHE_FOUND, cache).await;
        }

        Ok(Self {
            store,
            config,
            workload,
            caches,
            registry: ExpectedRegistry::default(),
            ledger: DeletionLedger::new(),
            records,
        })
    }

    /// The snapshot taken at construction
    pub fn caches(&self) -> &[CacheDescriptor] {
        &self.caches
    }

    pub fn ledger(&self) -> &DeletionLedger {
        &self.ledger
    }

    pub fn run_id(&self) -> uuid::Uuid {
        self.records.run_id()
    }

    /// Load the declared caches named in the config
    pub async fn load_expected(&mut self) -> CheckerResult<()> {
        self.registry = ExpectedRegistry::load(&self.config.cache_files).await?;
        Ok(())
    }

    /// Verify the snapshot
    pub async fn verify(&self) -> VerificationReport {
        let report = verify(
            &self.caches,
            &self.registry,
            &self.workload,
            VerifyOptions {
                expected_count: self.config.expected_cache_count,
                strict_count_check: self.config.strict_count_check,
            },
        );

        if let Some(ref count) = report.count {
            self.records.emit(events::VERIFY_COUNT, count).await;
        }
        for finding in &report.findings {
            warn!(cache = finding.cache_name(), "{}", finding);
            self.records.emit(events::VERIFY_FINDING, finding).await;
        }
        debug!(
            "Verified {} workload cache(s), ignored {} foreign and {} unnamed",
            report.checked, report.foreign, report.unnamed
        );
        report
    }

    /// Destroy workload caches when deletion is on. `None` means it is off.
    pub async fn delete(&mut self) -> Option<ReapSummary> {
        if !self.config.delete {
            debug!("Deletion is off");
            return None;
        }

        let reaper = Reaper::new(
            self.store,
            self.config.effective_location(),
            Duration::from_secs(self.config.store.timeout_secs),
        )
        .with_mode(self.config.reap_mode);
        let summary = reaper
            .destroy_workload_caches(&self.caches, &self.workload, &mut self.ledger)
            .await;

        for attempt in &summary.attempts {
            self.records.emit(events::REAP_DESTROY, attempt).await;
        }
        Some(summary)
    }

    /// Full pass: load, verify, then delete if verification passed
    pub async fn run(&mut self) -> CheckerResult<RunReport> {
        self.load_expected().await?;

        let verification = self.verify().await;
        let reap = if verification.is_pass() {
            self.delete().await
        } else {
            info!("Skipping deletion because verification failed");
            None
        };

        let report = RunReport { verification, reap };
        self.records
            .emit(
                events::RUN_RESULT,
                &serde_json::json!({
                    "success": report.is_success(),
                    "findings": report.verification.findings.len(),
                    "destroyed": report.reap.as_ref().map(|r| r.attempts.len()),
                }),
            )
            .await;
        Ok(report)
    }
}
