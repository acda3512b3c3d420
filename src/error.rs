//! Error types for scc-checker
//!
//! All modules use `CheckerResult<T>` as their return type. Data problems
//! (a malformed declaration file, a non-numeric count) are not errors: they
//! are logged and defaulted where they are read.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for checker operations
pub type CheckerResult<T> = Result<T, CheckerError>;

/// All errors that can occur in scc-checker
#[derive(Error, Debug)]
pub enum CheckerError {
    // Configuration errors
    #[error("No config file supplied. Pass --config or set SCC_CONFIG_FILE")]
    ConfigMissing,

    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("No workload cache list supplied. Pass --workload-caches or set SCC_WL_CACHE_LIST")]
    WorkloadListMissing,

    #[error("Couldn't load expected cache data from {path}: {source}")]
    DeclarationRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Store errors
    #[error("Cache store did not answer {operation} within {secs}s")]
    StoreTimeout { operation: String, secs: u64 },

    #[error("Cache store query failed: {0}")]
    StoreQuery(String),

    #[error("Unsupported cache query flags: {0:#x}")]
    InvalidQueryFlags(u32),

    // Command errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid message pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // Outcome errors
    #[error("Verification failed with {0} finding(s)")]
    VerificationFailed(usize),

    #[error("Deletion of workload caches failed")]
    DeletionFailed,

    #[error("Cache command '{operation}' did not produce the expected outcome")]
    CacheCommandFailed { operation: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("{0}")]
    User(String),
}

impl CheckerError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Whether this error is a test-setup defect rather than a finding
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigMissing
                | Self::ConfigNotFound(_)
                | Self::ConfigInvalid { .. }
                | Self::WorkloadListMissing
                | Self::DeclarationRead { .. }
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ConfigMissing => Some("Example: scc-checker --config run.props check"),
            Self::WorkloadListMissing => {
                Some("Cache names are joined with '--', e.g. WL1--WL2--WL3")
            }
            Self::StoreTimeout { .. } => Some("Raise storeTimeoutSecs in the config file"),
            Self::CommandFailed { .. } => Some("Check the 'java' setting or JAVA_HOME"),
            _ => None,
        }
    }
}
