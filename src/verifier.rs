//! Cross-check of live caches against what the run expects
//!
//! Only caches named in the workload set are examined. Every examined cache
//! is checked before the report is built; one bad cache never hides another.

use crate::registry::ExpectedRegistry;
use crate::store::{CacheDescriptor, Persistence};
use crate::workload::WorkloadCacheSet;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// One verification failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    PersistenceMismatch {
        cache: String,
        expected: Persistence,
        actual: Persistence,
        declared_in: PathBuf,
    },
    UnknownAddressMode {
        cache: String,
        reported: String,
    },
    /// Only raised when the count check is enforced
    CountMismatch {
        expected: u32,
        found: usize,
    },
}

impl Finding {
    /// Cache the finding is about, if it is about a single cache
    pub fn cache_name(&self) -> Option<&str> {
        match self {
            Self::PersistenceMismatch { cache, .. } | Self::UnknownAddressMode { cache, .. } => {
                Some(cache)
            }
            Self::CountMismatch { .. } => None,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PersistenceMismatch {
                cache,
                expected,
                actual,
                declared_in,
            } => write!(
                f,
                "Cache {} is {} but {} declares it {}",
                cache,
                actual,
                declared_in.display(),
                expected
            ),
            Self::UnknownAddressMode { cache, reported } => {
                write!(f, "Cache {} has unknown address mode '{}'", cache, reported)
            }
            Self::CountMismatch { expected, found } => write!(
                f,
                "Expected {} workload cache(s) but found {}",
                expected, found
            ),
        }
    }
}

/// Outcome of the cache count comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountCheck {
    pub expected: u32,
    pub found: usize,
    /// Whether a mismatch fails the run
    pub enforced: bool,
}

impl CountCheck {
    pub fn matches(&self) -> bool {
        usize::try_from(self.expected).is_ok_and(|expected| expected == self.found)
    }
}

/// Result of one verification pass. No findings means pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    pub findings: Vec<Finding>,
    pub count: Option<CountCheck>,
    /// Workload caches examined
    pub checked: usize,
    /// Listed caches without a usable name
    pub unnamed: usize,
    /// Listed caches that belong to someone else
    pub foreign: usize,
}

impl VerificationReport {
    pub fn is_pass(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Verifier settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerifyOptions {
    pub expected_count: Option<u32>,
    /// Turn a count mismatch into a finding
    pub strict_count_check: bool,
}

/// Verify a snapshot of live caches
pub fn verify(
    live: &[CacheDescriptor],
    registry: &ExpectedRegistry,
    workload: &WorkloadCacheSet,
    options: VerifyOptions,
) -> VerificationReport {
    let mut report = VerificationReport::default();

    let mut owned = Vec::new();
    for cache in live {
        match cache.usable_name() {
            None => report.unnamed += 1,
            Some(name) if workload.contains(name) => owned.push((name, cache)),
            Some(name) => {
                debug!("Ignoring cache {} that is not part of this workload", name);
                report.foreign += 1;
            }
        }
    }
    report.checked = owned.len();

    if let Some(expected) = options.expected_count {
        let check = CountCheck {
            expected,
            found: owned.len(),
            enforced: options.strict_count_check,
        };
        if check.matches() {
            info!("Found the expected {} workload cache(s)", expected);
        } else if check.enforced {
            report.findings.push(Finding::CountMismatch {
                expected,
                found: check.found,
            });
        } else {
            warn!(
                "Expected {} workload cache(s) but found {}; count check is not enforced",
                expected, check.found
            );
        }
        report.count = Some(check);
    }

    for (name, cache) in owned {
        describe(name, cache);

        if let Some(entry) = registry.get(name) {
            let expected = entry.persistence();
            if expected != cache.persistence {
                report.findings.push(Finding::PersistenceMismatch {
                    cache: name.to_string(),
                    expected,
                    actual: cache.persistence,
                    declared_in: entry.source.clone(),
                });
            }
        } else {
            debug!("No declaration for cache {}", name);
        }

        if !cache.address_mode.is_known() {
            report.findings.push(Finding::UnknownAddressMode {
                cache: name.to_string(),
                reported: cache.address_mode.to_string(),
            });
        }
    }

    report
}

fn describe(name: &str, cache: &CacheDescriptor) {
    info!(
        "Cache {}: {} {} {} compatible={} corrupt={}",
        name, cache.jvm_level, cache.address_mode, cache.persistence, cache.compatible, cache.corrupt
    );
    if let (Some(size), Some(free)) = (cache.size_bytes, cache.free_bytes) {
        debug!("Cache {} size {} bytes, {} free", name, size, free);
        if free > size {
            warn!(
                "Cache {} reports {} free bytes, more than its size of {}",
                name, free, size
            );
        }
    }
    match cache.last_detach_time {
        Some(time) => debug!("Cache {} last detached {}", name, time),
        None => debug!("Cache {} has no last detach time", name),
    }
    if let (Some(shmid), Some(semid)) = (cache.os_shmid, cache.os_semid) {
        debug!("Cache {} OS shmid {} semid {}", name, shmid, semid);
    }
}
