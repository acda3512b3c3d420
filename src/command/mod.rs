//! Foreground cache utility commands and how their results are judged

pub mod interpreter;
pub mod options;
pub mod runner;

pub use interpreter::{interpret, CommandVerdict, ExpectedOutcome, MessagePattern, Stream};
pub use options::CacheOperation;
pub use runner::{CommandOutput, ForegroundCommand};

use crate::error::CheckerResult;
use crate::store::with_deadline;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Captured output and verdict of one cache utility run
#[derive(Debug, Clone)]
pub struct OperationResult {
    pub output: CommandOutput,
    pub verdict: CommandVerdict,
}

/// Run a cache operation under a deadline and judge it by its messages
pub async fn run_operation(
    java: &Path,
    cache_dir: Option<&str>,
    template: Option<&str>,
    operation: &CacheOperation,
    limit: Duration,
) -> CheckerResult<OperationResult> {
    let patterns = operation.expected_messages()?;
    let command = operation.command(java, cache_dir, template);
    let output = with_deadline(operation.label(), limit, command.run()).await??;

    let verdict = interpret(&output, &operation.expected_outcome(), &patterns, Stream::Both);
    debug!("{} finished: {}", operation.label(), verdict);
    Ok(OperationResult { output, verdict })
}
