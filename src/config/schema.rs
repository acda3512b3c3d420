//! Configuration schema for the checker
//!
//! One config file per test run. Keys keep the camelCase spelling the
//! harness writes (`cacheDir`, `expectedCacheCount`, ...).

use crate::command::options::cache_dir_from_option;
use crate::config::lenient::{lenient_bool, parse_count};
use crate::config::properties::Properties;
use crate::reaper::ReapMode;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// Recognized keys
pub mod keys {
    pub const CACHE_DIR: &str = "cacheDir";
    pub const COMMAND_LINE_VALUES: &str = "commandLineValues";
    pub const DELETE: &str = "delete";
    pub const EXPECTED_CACHE_COUNT: &str = "expectedCacheCount";
    pub const CACHE_FILES: &str = "cacheFiles";
    pub const STRICT_COUNT_CHECK: &str = "strictCountCheck";
    pub const REAP_MODE: &str = "reapMode";
    pub const JAVA: &str = "java";
    pub const SHARED_CLASSES_OPTION: &str = "sharedClassesOption";
    pub const STORE_TIMEOUT_SECS: &str = "storeTimeoutSecs";
    pub const RECORDS_FILE: &str = "recordsFile";
}

/// Location value meaning "let the runtime pick its default directory"
pub const DEFAULT_LOCATION: &str = "default";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckerConfig {
    /// Directory to search for caches; `None` means the runtime default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<String>,

    /// Take the cache location from the launch options instead of `cache_dir`
    pub command_line_values: bool,

    /// Destroy workload caches after verification
    pub delete: bool,

    /// Number of workload caches that should be found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_cache_count: Option<u32>,

    /// Per-cache declaration files
    pub cache_files: Vec<PathBuf>,

    /// Fail the run on a cache count mismatch
    pub strict_count_check: bool,

    /// How many eligible caches one reap pass destroys
    pub reap_mode: ReapMode,

    /// JSON-lines record output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records_file: Option<PathBuf>,

    /// Store adapter settings
    pub store: StoreConfig,
}

/// Settings for the runtime launcher used as the cache store
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Launcher binary
    pub java: PathBuf,

    /// The `-Xshareclasses` option workloads were started with
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_classes_option: Option<String>,

    /// Upper bound for a single store call
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let java = std::env::var_os("JAVA_HOME")
            .map(|home| PathBuf::from(home).join("bin").join("java"))
            .unwrap_or_else(|| PathBuf::from("java"));

        Self {
            java,
            shared_classes_option: None,
            timeout_secs: 300,
        }
    }
}

impl CheckerConfig {
    /// Cache directory store calls should use.
    ///
    /// With `commandLineValues` the directory comes from the launch option.
    pub fn effective_location(&self) -> Option<String> {
        if self.command_line_values {
            self.store
                .shared_classes_option
                .as_deref()
                .and_then(cache_dir_from_option)
        } else {
            self.cache_dir.clone()
        }
    }

    /// Build from a parsed property set. Unreadable values are logged and defaulted.
    pub fn from_properties(props: &Properties) -> Self {
        let cache_dir = match props.get(keys::CACHE_DIR).map(str::trim) {
            None | Some("") | Some(DEFAULT_LOCATION) => {
                info!("Using default cache directory");
                None
            }
            Some(dir) => {
                info!("Using cache directory '{}'", dir);
                Some(dir.to_string())
            }
        };

        let delete = lenient_bool(keys::DELETE, props.get(keys::DELETE));
        if delete {
            info!("Will attempt to delete caches after verification");
        } else {
            info!("Caches will not be deleted after verification");
        }

        let command_line_values =
            lenient_bool(keys::COMMAND_LINE_VALUES, props.get(keys::COMMAND_LINE_VALUES));
        if command_line_values {
            info!("Will use command line values to search for caches");
        }

        let expected_cache_count = match props.get(keys::EXPECTED_CACHE_COUNT) {
            None => None,
            Some(raw) => match parse_count(raw) {
                Ok(count) => Some(count),
                Err(defaulted) => {
                    warn!(
                        "Can't check number of caches as {} is not numeric: {}",
                        keys::EXPECTED_CACHE_COUNT,
                        defaulted
                    );
                    None
                }
            },
        };

        let cache_files = props
            .get(keys::CACHE_FILES)
            .map(|list| list.split_whitespace().map(PathBuf::from).collect())
            .unwrap_or_default();

        let reap_mode = match props.get(keys::REAP_MODE) {
            None => ReapMode::default(),
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("Unknown {} '{}', using single", keys::REAP_MODE, raw);
                ReapMode::Single
            }),
        };

        let mut store = StoreConfig::default();
        if let Some(java) = props.get(keys::JAVA).filter(|v| !v.is_empty()) {
            store.java = PathBuf::from(java);
        }
        store.shared_classes_option = props
            .get(keys::SHARED_CLASSES_OPTION)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        if let Some(raw) = props.get(keys::STORE_TIMEOUT_SECS) {
            match parse_count(raw) {
                Ok(secs) if secs > 0 => store.timeout_secs = u64::from(secs),
                _ => warn!(
                    "Ignoring {} '{}', keeping {}s",
                    keys::STORE_TIMEOUT_SECS,
                    raw,
                    store.timeout_secs
                ),
            }
        }

        Self {
            cache_dir,
            command_line_values,
            delete,
            expected_cache_count,
            cache_files,
            strict_count_check: lenient_bool(
                keys::STRICT_COUNT_CHECK,
                props.get(keys::STRICT_COUNT_CHECK),
            ),
            reap_mode,
            store,
            records_file: props
                .get(keys::RECORDS_FILE)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_empty() {
        let config = CheckerConfig::from_properties(&Properties::default());
        assert_eq!(config.cache_dir, None);
        assert!(!config.delete);
        assert!(!config.command_line_values);
        assert!(!config.strict_count_check);
        assert_eq!(config.expected_cache_count, None);
        assert_eq!(config.reap_mode, ReapMode::Single);
        assert_eq!(config.store.timeout_secs, 300);
    }

    #[test]
    fn default_location_keyword() {
        let props = Properties::parse("cacheDir=default\n");
        assert_eq!(CheckerConfig::from_properties(&props).cache_dir, None);

        let props = Properties::parse("cacheDir=/tmp/caches\n");
        assert_eq!(
            CheckerConfig::from_properties(&props).cache_dir.as_deref(),
            Some("/tmp/caches")
        );
    }

    #[test]
    fn full_config() {
        let props = Properties::parse(
            "expectedCacheCount=4\n\
             cacheFiles=/c/T1.props /c/T2.props\n\
             delete=true\n\
             commandLineValues=true\n\
             reapMode=all\n\
             storeTimeoutSecs=30\n\
             sharedClassesOption=-Xshareclasses:cacheDir=/x,name=it\n",
        );
        let config = CheckerConfig::from_properties(&props);
        assert_eq!(config.expected_cache_count, Some(4));
        assert_eq!(config.cache_files.len(), 2);
        assert!(config.delete);
        assert!(config.command_line_values);
        assert_eq!(config.reap_mode, ReapMode::All);
        assert_eq!(config.store.timeout_secs, 30);
        assert!(config.store.shared_classes_option.is_some());
        assert_eq!(config.effective_location().as_deref(), Some("/x"));
    }

    #[test]
    fn bad_values_default() {
        let props = Properties::parse(
            "expectedCacheCount=lots\ndelete=yes\nreapMode=some\nstoreTimeoutSecs=0\n",
        );
        let config = CheckerConfig::from_properties(&props);
        assert_eq!(config.expected_cache_count, None);
        assert!(!config.delete);
        assert_eq!(config.reap_mode, ReapMode::Single);
        assert_eq!(config.store.timeout_secs, 300);
    }
}
