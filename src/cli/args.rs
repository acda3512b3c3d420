//! CLI argument definitions using clap derive

use crate::config::CONFIG_FILE_ENV;
use crate::reaper::ReapMode;
use crate::workload::WORKLOAD_LIST_ENV;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// scc-checker - shared class cache checker
///
/// Verifies the shared class caches a test run's JVM workloads created,
/// then destroys the ones the run owns.
#[derive(Parser, Debug)]
#[command(name = "scc-checker")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Run configuration file (properties or .toml)
    #[arg(short, long, global = true, env = CONFIG_FILE_ENV)]
    pub config: Option<PathBuf>,

    /// Log line format
    #[arg(long, global = true, default_value = "text")]
    pub log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify workload caches and delete them when configured to
    Check(CheckArgs),

    /// List caches in the configured location
    List(ListArgs),

    /// Destroy named caches
    Destroy(DestroyArgs),

    /// Destroy every cache of one kind in the configured location
    DestroyAll(DestroyAllArgs),

    /// Print cache statistics and look for expected messages
    Stats(StatsArgs),

    /// Check that a cache is listed and count the listed caches
    VerifyListed(VerifyListedArgs),

    /// Reset a cache
    Reset(ResetArgs),

    /// Show configuration
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Workload cache names joined with "--"
    #[arg(short, long, env = WORKLOAD_LIST_ENV)]
    pub workload_caches: Option<String>,

    /// Override the reapMode setting (single or all)
    #[arg(long)]
    pub reap_mode: Option<ReapMode>,

    /// Write JSON-lines records here (overrides recordsFile)
    #[arg(long)]
    pub records: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only show caches in this "--"-joined list
    #[arg(short, long)]
    pub workload_caches: Option<String>,

    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct DestroyArgs {
    /// Cache names
    #[arg(required = true)]
    pub names: Vec<String>,

    /// The caches are non-persistent
    #[arg(long)]
    pub nonpersistent: bool,
}

#[derive(Parser, Debug)]
pub struct DestroyAllArgs {
    /// Destroy non-persistent caches instead of persistent ones
    #[arg(long)]
    pub nonpersistent: bool,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Cache name
    pub name: String,

    /// Message that must appear in the statistics (repeatable)
    #[arg(short, long = "expect")]
    pub expect: Vec<String>,

    /// Option template using ${cacheName}, ${cacheDir} and ${cacheOperation}
    #[arg(long)]
    pub options: Option<String>,
}

#[derive(Parser, Debug)]
pub struct VerifyListedArgs {
    /// Cache name that must be listed
    #[arg(short, long)]
    pub name: Option<String>,

    /// Number of listed caches expected (defaults to expectedCacheCount)
    #[arg(long)]
    pub expected_count: Option<u32>,
}

#[derive(Parser, Debug)]
pub struct ResetArgs {
    /// Cache name
    pub name: String,

    /// Option template using ${cacheName}, ${cacheDir} and ${cacheOperation}
    #[arg(long)]
    pub options: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Show the configuration file path
    Path,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Cache names only, one per line
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}
