//! Cache utility commands - stats, verify-listed, reset

use crate::cli::args::{ResetArgs, StatsArgs, VerifyListedArgs};
use crate::command::interpreter::count_matches;
use crate::command::options::LISTED_CACHE_PATTERN;
use crate::command::{run_operation, CacheOperation, MessagePattern, OperationResult};
use crate::config::CheckerConfig;
use crate::error::{CheckerError, CheckerResult};
use crate::ui::{self, TaskSpinner, UiContext};
use std::time::Duration;
use tracing::debug;

async fn run_with_spinner(
    ctx: &UiContext,
    config: &CheckerConfig,
    template: Option<&str>,
    operation: &CacheOperation,
) -> CheckerResult<OperationResult> {
    let mut spinner = TaskSpinner::new(ctx);
    spinner.start(&format!("Running {}...", operation.label()));
    let result = run_operation(
        &config.store.java,
        config.effective_location().as_deref(),
        template,
        operation,
        Duration::from_secs(config.store.timeout_secs),
    )
    .await;

    match result {
        Ok(result) if result.verdict.is_success() => {
            spinner.stop(&format!("{}: {}", operation.label(), result.verdict));
            Ok(result)
        }
        Ok(result) => {
            spinner.stop_error(&format!("{}: {}", operation.label(), result.verdict));
            debug!("Captured output:\n{}", result.output.combined());
            Err(CheckerError::CacheCommandFailed {
                operation: operation.label().to_string(),
            })
        }
        Err(e) => {
            spinner.stop_error(&format!("{} did not finish", operation.label()));
            Err(e)
        }
    }
}

/// Execute the stats command
pub async fn stats(args: StatsArgs, config: &CheckerConfig) -> CheckerResult<()> {
    let ctx = UiContext::detect();
    let operation = CacheOperation::PrintStats {
        name: args.name,
        expected: args.expect,
    };
    let result = run_with_spinner(&ctx, config, args.options.as_deref(), &operation).await?;
    print!("{}", result.output.combined());
    Ok(())
}

/// Execute the verify-listed command
pub async fn verify_listed(args: VerifyListedArgs, config: &CheckerConfig) -> CheckerResult<()> {
    let ctx = UiContext::detect();
    let operation = CacheOperation::ListAll {
        expected_name: args.name.clone(),
    };
    let result = run_with_spinner(&ctx, config, None, &operation).await?;

    if let Some(ref name) = args.name {
        ui::step_ok(&ctx, &format!("{} is listed", name));
    }

    let listed = count_matches(
        &result.output.combined(),
        &[MessagePattern::parse(LISTED_CACHE_PATTERN)?],
    );
    match args.expected_count.or(config.expected_cache_count) {
        None => ui::step_info(&ctx, &format!("{} cache(s) listed", listed)),
        Some(expected) if usize::try_from(expected).is_ok_and(|e| e == listed) => {
            ui::step_ok(&ctx, &format!("{} cache(s) listed as expected", listed));
        }
        Some(expected) if config.strict_count_check => {
            ui::step_error(
                &ctx,
                &format!("Expected {} cache(s) but {} are listed", expected, listed),
            );
            return Err(CheckerError::CacheCommandFailed {
                operation: operation.label().to_string(),
            });
        }
        Some(expected) => ui::step_warn(
            &ctx,
            &format!(
                "Expected {} cache(s) but {} are listed (not enforced)",
                expected, listed
            ),
        ),
    }
    Ok(())
}

/// Execute the reset command
pub async fn reset(args: ResetArgs, config: &CheckerConfig) -> CheckerResult<()> {
    let ctx = UiContext::detect();
    let operation = CacheOperation::Reset { name: args.name };
    run_with_spinner(&ctx, config, args.options.as_deref(), &operation).await?;
    Ok(())
}
