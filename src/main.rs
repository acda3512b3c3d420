//! scc-checker entry point
//!
//! Exit code 0 when everything passed, 1 for any failure.

use clap::Parser;
use console::style;
use scc_checker::cli::{commands, Cli, Commands, LogFormat};
use scc_checker::config::ConfigManager;
use scc_checker::error::CheckerResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8, format: LogFormat) {
    // 0 = warn, 1 = info, 2+ = debug
    let filter = match verbose {
        0 => EnvFilter::new("scc_checker=warn"),
        1 => EnvFilter::new("scc_checker=info"),
        _ => EnvFilter::new("scc_checker=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.without_time().init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run(cli: Cli) -> CheckerResult<()> {
    init_logging(cli.verbose, cli.log_format);
    scc_checker::ui::init_theme();

    let manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };

    // Check needs a real run configuration, the other commands fall back to defaults
    let config = match cli.command {
        Commands::Check(_) => manager.load_required().await?,
        _ => manager.load().await?,
    };

    match cli.command {
        Commands::Check(args) => commands::check(args, config).await,
        Commands::List(args) => commands::list(args, &config).await,
        Commands::Destroy(args) => commands::destroy(args, &config).await,
        Commands::DestroyAll(args) => commands::destroy_all(args, &config).await,
        Commands::Stats(args) => commands::stats(args, &config).await,
        Commands::VerifyListed(args) => commands::verify_listed(args, &config).await,
        Commands::Reset(args) => commands::reset(args, &config).await,
        Commands::Config(args) => commands::config(args, &manager, &config).await,
    }
}
