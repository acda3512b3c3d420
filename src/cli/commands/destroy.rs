//! Destroy commands - named caches, or everything in a location

use crate::cli::args::{DestroyAllArgs, DestroyArgs};
use crate::command::{run_operation, CacheOperation};
use crate::config::CheckerConfig;
use crate::error::{CheckerError, CheckerResult};
use crate::store::{create_store, with_deadline, DestroyOutcome, DestroyRequest, Persistence};
use crate::ui::{self, DestroyProgress, TaskSpinner, UiContext};
use std::time::Duration;
use tracing::warn;

/// Execute the destroy command
pub async fn execute(args: DestroyArgs, config: &CheckerConfig) -> CheckerResult<()> {
    let ctx = UiContext::detect();
    let store = create_store(&config.store);
    let limit = Duration::from_secs(config.store.timeout_secs);
    let persistence = Persistence::from_flag(!args.nonpersistent);
    let location = config.effective_location();

    let progress = DestroyProgress::new(&ctx, args.names.len());
    let mut results = Vec::with_capacity(args.names.len());
    for name in &args.names {
        progress.begin(name);
        let request = DestroyRequest {
            location: location.clone(),
            persistence,
            name: name.clone(),
            reset: false,
        };
        let outcome = match with_deadline("destroy", limit, store.destroy(&request)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("{}", e);
                DestroyOutcome::Unknown
            }
        };
        results.push((name, outcome));
        progress.advance();
    }
    progress.finish();

    let mut failed = 0;
    for (name, outcome) in results {
        if outcome.is_success() {
            ui::step_ok(&ctx, &format!("Destroyed {}", name));
        } else {
            ui::step_error(&ctx, &format!("{}: {}", name, outcome));
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(CheckerError::DeletionFailed);
    }
    Ok(())
}

/// Execute the destroy-all command
pub async fn execute_all(args: DestroyAllArgs, config: &CheckerConfig) -> CheckerResult<()> {
    let ctx = UiContext::detect().with_auto_yes(args.yes);
    let persistence = Persistence::from_flag(!args.nonpersistent);
    let location = config.effective_location();
    let target = location.as_deref().unwrap_or("the default directory");

    let question = format!("Destroy all {} caches in {}?", persistence, target);
    if !ui::confirm(&ctx, &question, false).await? {
        ui::step_info(&ctx, "Aborted, pass --yes to skip the prompt");
        return Ok(());
    }

    let operation = CacheOperation::DestroyAll { persistence };
    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&format!("Destroying {} caches...", persistence));
    let result = run_operation(
        &config.store.java,
        location.as_deref(),
        None,
        &operation,
        Duration::from_secs(config.store.timeout_secs),
    )
    .await;

    match result {
        Ok(result) if result.verdict.is_success() => {
            spinner.stop(&format!("{} caches destroyed in {}", persistence, target));
            Ok(())
        }
        Ok(result) => {
            spinner.stop_error(&format!("destroyAll: {}", result.verdict));
            Err(CheckerError::CacheCommandFailed {
                operation: operation.label().to_string(),
            })
        }
        Err(e) => {
            spinner.stop_error("destroyAll did not finish");
            Err(e)
        }
    }
}
