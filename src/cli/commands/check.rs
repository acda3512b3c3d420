//! Check command - verify workload caches, then destroy them

use crate::checker::{Checker, RunReport};
use crate::cli::args::CheckArgs;
use crate::config::CheckerConfig;
use crate::error::{CheckerError, CheckerResult};
use crate::report::RecordSink;
use crate::store::create_store;
use crate::ui::{self, TaskSpinner, UiContext};
use crate::workload::WorkloadCacheSet;
use tracing::debug;

/// Execute the check command
pub async fn execute(args: CheckArgs, config: CheckerConfig) -> CheckerResult<()> {
    let ctx = UiContext::detect();
    let workload = WorkloadCacheSet::resolve(args.workload_caches.as_deref())?;

    let mut config = config;
    if let Some(mode) = args.reap_mode {
        config.reap_mode = mode;
    }
    let records = RecordSink::new(args.records.or_else(|| config.records_file.clone()));

    ui::intro(&ctx, "Shared class cache check");
    ui::key_value(
        &ctx,
        "location",
        config.effective_location().as_deref().unwrap_or("default"),
    );
    ui::key_value(&ctx, "workload caches", &workload.iter().collect::<Vec<_>>().join(", "));
    if let Some(path) = records.path() {
        ui::key_value(&ctx, "records", &path.display().to_string());
    }

    let store = create_store(&config.store);
    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start("Listing caches...");
    let mut checker = match Checker::new(&*store, config, workload, records).await {
        Ok(checker) => {
            spinner.stop(&format!("{} cache(s) listed", checker.caches().len()));
            checker
        }
        Err(e) => {
            spinner.stop_error("Could not list caches");
            return Err(e);
        }
    };
    debug!("Run id {}", checker.run_id());

    let report = checker.run().await?;
    show(&ctx, &report)
}

/// Print the outcome and turn it into the command result
fn show(ctx: &UiContext, report: &RunReport) -> CheckerResult<()> {
    let verification = &report.verification;
    if let Some(count) = verification.count {
        if !count.matches() && !count.enforced {
            ui::step_warn(
                ctx,
                &format!(
                    "Expected {} workload cache(s), found {} (not enforced)",
                    count.expected, count.found
                ),
            );
        }
    }

    if !verification.is_pass() {
        let details: Vec<String> = verification.findings.iter().map(|f| f.to_string()).collect();
        ui::banner_failure(ctx, ui::VERIFICATION_FAILED, &details);
        return Err(CheckerError::VerificationFailed(details.len()));
    }
    ui::step_ok(
        ctx,
        &format!("{} workload cache(s) verified", verification.checked),
    );

    if let Some(ref reap) = report.reap {
        for attempt in &reap.attempts {
            if attempt.outcome.is_success() {
                ui::step_ok(ctx, &format!("Destroyed {}", attempt.cache));
            }
        }
        if reap.deferred > 0 {
            ui::step_info(
                ctx,
                &format!("{} cache(s) left for the next pass", reap.deferred),
            );
        }
        if !reap.is_success() {
            let details: Vec<String> = reap
                .failures()
                .map(|a| format!("{}: {}", a.cache, a.outcome))
                .collect();
            ui::banner_failure(ctx, ui::DELETION_FAILED, &details);
            return Err(CheckerError::DeletionFailed);
        }
    }

    ui::banner_success(ctx, ui::CHECK_PASSED);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reaper::{DestroyAttempt, ReapSummary};
    use crate::store::{DestroyOutcome, Persistence};
    use crate::verifier::{Finding, VerificationReport};
    use std::path::PathBuf;

    #[test]
    fn failed_verification_is_an_error() {
        let report = RunReport {
            verification: VerificationReport {
                findings: vec![Finding::PersistenceMismatch {
                    cache: "T3".to_string(),
                    expected: Persistence::NonPersistent,
                    actual: Persistence::Persistent,
                    declared_in: PathBuf::from("T3.props"),
                }],
                ..VerificationReport::default()
            },
            reap: None,
        };
        let err = show(&UiContext::non_interactive(), &report).unwrap_err();
        assert!(matches!(err, CheckerError::VerificationFailed(1)));
    }

    #[test]
    fn failed_destroy_is_an_error() {
        let report = RunReport {
            verification: VerificationReport::default(),
            reap: Some(ReapSummary {
                attempts: vec![DestroyAttempt {
                    cache: "T1".to_string(),
                    outcome: DestroyOutcome::Unknown,
                }],
                deferred: 0,
            }),
        };
        let err = show(&UiContext::non_interactive(), &report).unwrap_err();
        assert!(matches!(err, CheckerError::DeletionFailed));
    }

    #[test]
    fn clean_run_is_ok() {
        let report = RunReport {
            verification: VerificationReport::default(),
            reap: None,
        };
        assert!(show(&UiContext::non_interactive(), &report).is_ok());
    }
}
