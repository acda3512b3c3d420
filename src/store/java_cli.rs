//! Cache store backed by the runtime launcher
//!
//! Enumerates with `-Xshareclasses:listAllCaches` and destroys with
//! `-Xshareclasses:name=<n>,destroy`, judging each destroy by the messages
//! the runtime prints rather than by its exit code.

use crate::command::interpreter::{interpret, CommandVerdict, Stream};
use crate::command::options::{cache_dir_from_option, CacheOperation};
use crate::command::runner::{CommandOutput, ForegroundCommand};
use crate::config::StoreConfig;
use crate::error::{CheckerError, CheckerResult};
use crate::store::listing::{parse_listing, NO_CACHES_MESSAGE};
use crate::store::{CacheDescriptor, CacheStore, DestroyOutcome, DestroyRequest, EnumerateQuery, NO_FLAGS};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Cache store that shells out to `java`
pub struct JavaCliStore {
    java: PathBuf,
    /// `-Xshareclasses` option the workloads were launched with
    launch_option: Option<String>,
}

impl JavaCliStore {
    /// Create a store from config
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            java: config.java.clone(),
            launch_option: config.shared_classes_option.clone(),
        }
    }

    /// The directory a query resolves to
    fn resolve_location(&self, query: &EnumerateQuery) -> Option<String> {
        if query.use_command_line {
            if let Some(ref hint) = query.location {
                info!("cacheDir '{}' is ignored, using the launch options instead", hint);
            }
            self.launch_option
                .as_deref()
                .and_then(cache_dir_from_option)
        } else {
            query.location.clone()
        }
    }

    fn list_command(&self, location: Option<&str>) -> ForegroundCommand {
        CacheOperation::ListAll {
            expected_name: None,
        }
        .command(&self.java, location, None)
    }
}

/// Classify a destroy that did not print a success message
fn classify_failure(output: &CommandOutput) -> DestroyOutcome {
    let text = output.combined().to_ascii_lowercase();
    if text.contains("does not exist") || text.contains(&NO_CACHES_MESSAGE.to_ascii_lowercase()) {
        DestroyOutcome::DestroyedNone
    } else if text.contains("older generation") {
        DestroyOutcome::DestroyFailedOlderGeneration
    } else if text.contains("in use") {
        DestroyOutcome::DestroyFailedCurrentGeneration
    } else {
        DestroyOutcome::Unknown
    }
}

#[async_trait]
impl CacheStore for JavaCliStore {
    async fn enumerate(&self, query: &EnumerateQuery) -> CheckerResult<Vec<CacheDescriptor>> {
        if query.flags != NO_FLAGS {
            return Err(CheckerError::InvalidQueryFlags(query.flags));
        }

        let location = self.resolve_location(query);
        match location {
            Some(ref dir) => info!("Querying all caches in directory {}", dir),
            None => info!("Querying all caches in the default directory"),
        }

        let command = self.list_command(location.as_deref());
        let output = command.run().await?;
        if !matches!(output.exit_code, Some(0) | Some(1)) {
            return Err(CheckerError::StoreQuery(format!(
                "'{}' exited with {:?}",
                command.display(),
                output.exit_code
            )));
        }

        let caches = parse_listing(&output.combined());
        debug!("Listing returned {} cache(s)", caches.len());
        Ok(caches)
    }

    async fn destroy(&self, request: &DestroyRequest) -> DestroyOutcome {
        let operation = if request.reset {
            CacheOperation::Reset {
                name: request.name.clone(),
            }
        } else {
            CacheOperation::Destroy {
                name: request.name.clone(),
                persistence: request.persistence,
            }
        };

        let patterns = match operation.expected_messages() {
            Ok(patterns) => patterns,
            Err(e) => {
                warn!("Cannot build destroy messages for {}: {}", request.name, e);
                return DestroyOutcome::Unknown;
            }
        };

        let command = operation.command(&self.java, request.location.as_deref(), None);
        let output = match command.run().await {
            Ok(output) => output,
            Err(e) => {
                warn!("Destroy of {} could not run: {}", request.name, e);
                return DestroyOutcome::Unknown;
            }
        };

        let verdict = interpret(&output, &operation.expected_outcome(), &patterns, Stream::Both);
        debug!("Destroy verdict for {}: {}", request.name, verdict);
        match verdict {
            CommandVerdict::Success { .. } => DestroyOutcome::DestroyedAll,
            CommandVerdict::Failure(_) => classify_failure(&output),
        }
    }

    fn store_name(&self) -> &'static str {
        "java -Xshareclasses"
    }
}
