//! Configuration management for scc-checker

pub mod lenient;
pub mod properties;
pub mod schema;

pub use properties::Properties;
pub use schema::{CheckerConfig, StoreConfig};

use crate::error::{CheckerError, CheckerResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Environment variable naming the main config file
pub const CONFIG_FILE_ENV: &str = "SCC_CONFIG_FILE";

/// Configuration manager
pub struct ConfigManager {
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create a config manager without a file (defaults only)
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: Some(path),
        }
    }

    /// Load the configuration, or defaults when no file was given
    pub async fn load(&self) -> CheckerResult<CheckerConfig> {
        match self.config_path {
            Some(ref path) => {
                let props = load_properties(path).await?;
                debug!("Loaded {} setting(s) from {}", props.len(), path.display());
                Ok(CheckerConfig::from_properties(&props))
            }
            None => {
                debug!("No config file given, using defaults");
                Ok(CheckerConfig::from_properties(&Properties::default()))
            }
        }
    }

    /// Load the configuration, failing when no file was given
    pub async fn load_required(&self) -> CheckerResult<CheckerConfig> {
        if self.config_path.is_none() {
            return Err(CheckerError::ConfigMissing);
        }
        self.load().await
    }

    /// Get the config file path
    pub fn path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a key/value file. `.toml` files are flattened into the same key space.
pub async fn load_properties(path: &Path) -> CheckerResult<Properties> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(CheckerError::ConfigNotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(CheckerError::io(
                format!("reading config from {}", path.display()),
                e,
            ))
        }
    };

    if path.extension().is_some_and(|ext| ext == "toml") {
        let table: toml::Table =
            toml::from_str(&content).map_err(|e| CheckerError::ConfigInvalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        let mut pairs = Vec::new();
        flatten_toml(&table, &mut pairs);
        Ok(Properties::from_pairs(pairs))
    } else {
        Ok(Properties::parse(&content))
    }
}

fn flatten_toml(table: &toml::Table, out: &mut Vec<(String, String)>) {
    for (key, value) in table {
        match value {
            toml::Value::Table(nested) => flatten_toml(nested, out),
            other => out.push((key.clone(), toml_scalar(other))),
        }
    }
}

fn toml_scalar(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Array(items) => items
            .iter()
            .map(toml_scalar)
            .collect::<Vec<_>>()
            .join(" "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn defaults_without_file() {
        let config = ConfigManager::new().load().await.unwrap();
        assert!(!config.delete);
    }

    #[tokio::test]
    async fn required_without_file_fails() {
        let err = ConfigManager::new().load_required().await.unwrap_err();
        assert!(matches!(err, CheckerError::ConfigMissing));
    }

    #[tokio::test]
    async fn missing_file_is_config_error() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp.path().join("nope.props"));
        let err = manager.load().await.unwrap_err();
        assert!(matches!(err, CheckerError::ConfigNotFound(_)));
    }

    #[tokio::test]
    async fn loads_properties_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("run.props");
        std::fs::write(&path, "delete=true\nexpectedCacheCount=5\n").unwrap();

        let config = ConfigManager::with_path(path).load().await.unwrap();
        assert!(config.delete);
        assert_eq!(config.expected_cache_count, Some(5));
    }

    #[tokio::test]
    async fn loads_toml_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("run.toml");
        std::fs::write(
            &path,
            "delete = true\nexpectedCacheCount = 2\ncacheFiles = [\"/a.props\", \"/b.props\"]\n\n[store]\nstoreTimeoutSecs = 12\n",
        )
        .unwrap();

        let config = ConfigManager::with_path(path).load().await.unwrap();
        assert!(config.delete);
        assert_eq!(config.expected_cache_count, Some(2));
        assert_eq!(config.cache_files.len(), 2);
        assert_eq!(config.store.timeout_secs, 12);
    }

    #[tokio::test]
    async fn invalid_toml_is_reported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.toml");
        std::fs::write(&path, "delete = = true").unwrap();

        let err = ConfigManager::with_path(path).load().await.unwrap_err();
        assert!(matches!(err, CheckerError::ConfigInvalid { .. }));
    }
}
