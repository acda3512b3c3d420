//! Config command - show the effective configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{CheckerConfig, ConfigManager};
use crate::error::CheckerResult;

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    manager: &ConfigManager,
    config: &CheckerConfig,
) -> CheckerResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => println!("{}", toml::to_string_pretty(config)?),
        Some(ConfigAction::Path) => match manager.path() {
            Some(path) => println!("{}", path.display()),
            None => println!("(none, using defaults)"),
        },
    }
    Ok(())
}
