//! Human-readable output: step lines and the final pass/fail banner

use super::context::UiContext;
use console::style;

/// Banner printed when verification finds problems
pub const VERIFICATION_FAILED: &str = "VERIFICATION FAILED";
/// Banner printed when a workload cache could not be destroyed
pub const DELETION_FAILED: &str = "DELETION FAILED";
/// Banner printed when the whole check passed
pub const CHECK_PASSED: &str = "CacheAPIChecker COMPLETED SUCCESSFULLY";

/// Title line at the start of a command
pub fn intro(ctx: &UiContext, title: &str) {
    if ctx.use_fancy_output() {
        cliclack::intro(style(title).cyan().bold()).ok();
    } else {
        println!("{}", style(title).cyan().bold());
    }
}

/// Pass banner
pub fn banner_success(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::outro(style(message).green().bold()).ok();
    } else {
        println!();
        println!("{} {}", style("[OK]").green(), message);
    }
}

/// Fail banner followed by one detail line per problem
pub fn banner_failure(ctx: &UiContext, title: &str, details: &[String]) {
    if ctx.use_fancy_output() {
        for detail in details {
            cliclack::log::error(detail).ok();
        }
        cliclack::outro(style(title).red().bold()).ok();
    } else {
        println!();
        println!("{} {}", style("[FAIL]").red(), style(title).red().bold());
        for detail in details {
            println!("    {}", detail);
        }
    }
}

pub fn step_ok(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::success(message).ok();
    } else {
        println!("  {} {}", style("[OK]").green(), message);
    }
}

pub fn step_warn(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::warning(message).ok();
    } else {
        println!("  {} {}", style("[WARN]").yellow(), message);
    }
}

pub fn step_error(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::error(message).ok();
    } else {
        println!("  {} {}", style("[FAIL]").red(), message);
    }
}

pub fn step_info(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::info(message).ok();
    } else {
        println!("  {} {}", style("[INFO]").cyan(), message);
    }
}

/// Dimmed `key: value` line
pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    if ctx.use_fancy_output() {
        println!("  {}: {}", style(key).dim(), value);
    } else {
        println!("  {}: {}", key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_output_does_not_panic() {
        let ctx = UiContext::non_interactive();
        intro(&ctx, "scc-checker");
        step_ok(&ctx, "T1 destroyed");
        step_warn(&ctx, "count differs");
        step_error(&ctx, "T3 persistence");
        step_info(&ctx, "4 caches");
        key_value(&ctx, "cacheDir", "default");
        banner_failure(&ctx, VERIFICATION_FAILED, &["T3 mismatch".to_string()]);
        banner_success(&ctx, CHECK_PASSED);
    }
}
