//! Parser for the runtime's `listAllCaches` output
//!
//! ```text
//! Listing all caches in cacheDir /tmp/javasharedresources/
//!
//! Cache name      level         cache-type      feature  layer  OS shmid  OS semid  last detach time
//!
//! Compatible shared caches
//! T1              Java17 64-bit persistent      cr       0                          Mon Jan 25 10:25:00 2021
//! T3              Java17 64-bit non-persistent  cr       0      32789     12        In use
//!
//! Incompatible shared caches
//! old             Java8  64-bit persistent      cr       0                          Thu Dec 3 09:01:02 2020
//! ```
//!
//! Rows before the first section header are ignored. Size and free space are
//! not part of the listing. Snapshot rows share their cache's name and are
//! left out, so a destroy request never names a snapshot.

use crate::store::descriptor::{AddressMode, CacheDescriptor, Persistence};
use chrono::NaiveDateTime;
use tracing::debug;

/// Format of the last detach column
const DETACH_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

/// Marker printed when the location holds no caches
pub const NO_CACHES_MESSAGE: &str = "No shared class caches available";

/// Parse listing text into descriptors
pub fn parse_listing(text: &str) -> Vec<CacheDescriptor> {
    let mut caches = Vec::new();
    let mut compatible: Option<bool> = None;
    let mut has_layer_column = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("JVMSHRC") {
            continue;
        }
        if trimmed.starts_with("Cache name") {
            has_layer_column = trimmed.contains("layer");
            continue;
        }
        if trimmed.starts_with("Incompatible shared caches") {
            compatible = Some(false);
            continue;
        }
        if trimmed.starts_with("Compatible shared caches") {
            compatible = Some(true);
            continue;
        }

        let Some(compatible) = compatible else {
            continue;
        };
        if is_snapshot_row(trimmed) {
            debug!("Skipping snapshot row: {}", trimmed);
            continue;
        }

        match parse_row(trimmed, compatible, has_layer_column) {
            Some(cache) => caches.push(cache),
            None => debug!("Skipping unrecognized listing row: {}", trimmed),
        }
    }

    caches
}

fn is_snapshot_row(row: &str) -> bool {
    row.split_whitespace().nth(3) == Some("snapshot")
}

fn parse_row(row: &str, compatible: bool, has_layer_column: bool) -> Option<CacheDescriptor> {
    let tokens: Vec<&str> = row.split_whitespace().collect();
    if tokens.len() < 4 || !tokens[1].starts_with("Java") {
        return None;
    }

    let persistence = match tokens[3] {
        "persistent" => Persistence::Persistent,
        "non-persistent" => Persistence::NonPersistent,
        _ => return None,
    };

    let address_mode = match tokens[2].parse::<AddressMode>() {
        Ok(mode) => mode,
        Err(never) => match never {},
    };
    let mut cache = CacheDescriptor::new(tokens[0], persistence, address_mode);
    cache.jvm_level = tokens[1].to_string();
    cache.compatible = compatible;
    cache.corrupt = tokens.iter().any(|t| t.to_ascii_lowercase().contains("corrupt"));

    let mut rest = &tokens[4..];
    if rest.ends_with(&["In", "use"]) {
        rest = &rest[..rest.len() - 2];
    } else if rest.len() >= 5 {
        let tail = rest[rest.len() - 5..].join(" ");
        if let Ok(detached) = NaiveDateTime::parse_from_str(&tail, DETACH_FORMAT) {
            cache.last_detach_time = Some(detached);
            rest = &rest[..rest.len() - 5];
        }
    }

    let mut numbers: Vec<i64> = rest.iter().filter_map(|t| t.parse().ok()).collect();
    if has_layer_column && !numbers.is_empty() {
        numbers.remove(0);
    }
    if let [shmid, semid] = numbers[..] {
        cache.os_shmid = Some(shmid);
        cache.os_semid = Some(semid);
    }

    Some(cache)
}
