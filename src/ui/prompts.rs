//! Confirmation prompt for destructive commands

use super::context::UiContext;
use crate::error::{CheckerError, CheckerResult};

/// Ask before destroying. Without a terminal the answer is `default`.
pub async fn confirm(ctx: &UiContext, message: &str, default: bool) -> CheckerResult<bool> {
    if ctx.auto_yes() {
        return Ok(true);
    }
    if !ctx.is_interactive() {
        return Ok(default);
    }

    let message = message.to_string();
    tokio::task::spawn_blocking(move || {
        cliclack::confirm(&message)
            .initial_value(default)
            .interact()
    })
    .await
    .map_err(|e| CheckerError::User(format!("Prompt task failed: {}", e)))?
    .map_err(|e| CheckerError::User(format!("Prompt failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn auto_yes_confirms() {
        let ctx = UiContext::non_interactive().with_auto_yes(true);
        assert!(confirm(&ctx, "Destroy all caches?", false).await.unwrap());
    }

    #[tokio::test]
    async fn non_interactive_uses_default() {
        let ctx = UiContext::non_interactive();
        assert!(!confirm(&ctx, "Destroy all caches?", false).await.unwrap());
    }
}
