//! Expected caches, loaded from per-cache declaration files
//!
//! Each declaration is a small property file:
//!
//! ```text
//! name=T1
//! persistence=true
//! ```
//!
//! Content problems are defaulted and logged. Only a file that cannot be
//! read at all fails the load.

use crate::config::lenient::parse_bool;
use crate::config::Properties;
use crate::error::{CheckerError, CheckerResult};
use crate::store::Persistence;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

const NAME_KEY: &str = "name";
const PERSISTENCE_KEY: &str = "persistence";

/// One declared cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpectedCacheEntry {
    pub name: String,
    pub persistent: bool,
    /// `persistent` came from the default, not from the file
    pub persistence_defaulted: bool,
    /// Declaration file the entry was read from
    pub source: PathBuf,
}

impl ExpectedCacheEntry {
    pub fn persistence(&self) -> Persistence {
        Persistence::from_flag(self.persistent)
    }

    /// Build an entry from parsed declaration content.
    ///
    /// Returns `None` when the declaration has no usable name.
    pub fn from_properties(props: &Properties, source: &Path) -> Option<Self> {
        let name = props.get(NAME_KEY).map(str::trim).filter(|n| !n.is_empty())?;

        let (persistent, persistence_defaulted) = match props.get(PERSISTENCE_KEY) {
            None => {
                warn!(
                    "{} has no {}, assuming non-persistent",
                    source.display(),
                    PERSISTENCE_KEY
                );
                (false, true)
            }
            Some(raw) => match parse_bool(raw) {
                Ok(value) => (value, false),
                Err(defaulted) => {
                    warn!(
                        "{} in {} has {}, assuming non-persistent",
                        PERSISTENCE_KEY,
                        source.display(),
                        defaulted
                    );
                    (false, true)
                }
            },
        };

        Some(Self {
            name: name.to_string(),
            persistent,
            persistence_defaulted,
            source: source.to_path_buf(),
        })
    }
}

/// Expected caches keyed by name
#[derive(Debug, Clone, Default)]
pub struct ExpectedRegistry {
    entries: HashMap<String, ExpectedCacheEntry>,
}

impl ExpectedRegistry {
    /// Load every declaration file. Later declarations of a name replace earlier ones.
    pub async fn load(sources: &[PathBuf]) -> CheckerResult<Self> {
        let mut registry = Self::default();

        for source in sources {
            let content = fs::read_to_string(source)
                .await
                .map_err(|e| CheckerError::DeclarationRead {
                    path: source.clone(),
                    source: e,
                })?;

            let props = Properties::parse(&content);
            match ExpectedCacheEntry::from_properties(&props, source) {
                Some(entry) => {
                    debug!(
                        "Expecting cache {} ({}) from {}",
                        entry.name,
                        entry.persistence(),
                        source.display()
                    );
                    registry.insert(entry);
                }
                None => warn!("{} declares no cache name, skipping it", source.display()),
            }
        }

        info!("Loaded {} expected cache(s)", registry.len());
        Ok(registry)
    }

    pub fn insert(&mut self, entry: ExpectedCacheEntry) {
        if let Some(previous) = self.entries.insert(entry.name.clone(), entry) {
            debug!(
                "Declaration of {} in {} was replaced",
                previous.name,
                previous.source.display()
            );
        }
    }

    pub fn get(&self, name: &str) -> Option<&ExpectedCacheEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ExpectedCacheEntry> for ExpectedRegistry {
    fn from_iter<I: IntoIterator<Item = ExpectedCacheEntry>>(iter: I) -> Self {
        let mut registry = Self::default();
        for entry in iter {
            registry.insert(entry);
        }
        registry
    }
}
