//! List command - show caches in the configured location

use crate::cli::args::{ListArgs, OutputFormat};
use crate::config::CheckerConfig;
use crate::error::CheckerResult;
use crate::store::{create_store, with_deadline, CacheDescriptor, EnumerateQuery, NO_FLAGS};
use crate::ui::{self, UiContext};
use crate::workload::WorkloadCacheSet;
use console::style;
use std::time::Duration;

/// Execute the list command
pub async fn execute(args: ListArgs, config: &CheckerConfig) -> CheckerResult<()> {
    let store = create_store(&config.store);
    let query = EnumerateQuery {
        location: config.cache_dir.clone(),
        flags: NO_FLAGS,
        use_command_line: config.command_line_values,
    };
    let limit = Duration::from_secs(config.store.timeout_secs);
    let caches = with_deadline("enumerate", limit, store.enumerate(&query)).await??;

    let caches: Vec<CacheDescriptor> = match args.workload_caches {
        Some(ref list) => {
            let workload = WorkloadCacheSet::parse(list);
            caches
                .into_iter()
                .filter(|c| workload.owns(c.usable_name()))
                .collect()
        }
        None => caches,
    };

    if caches.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => ui::step_info(&UiContext::detect(), "No shared class caches"),
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&caches),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&caches)?),
        OutputFormat::Plain => {
            for name in caches.iter().filter_map(CacheDescriptor::usable_name) {
                println!("{}", name);
            }
        }
    }
    Ok(())
}

fn print_table(caches: &[CacheDescriptor]) {
    println!(
        "{:<24} {:<8} {:<8} {:<15} {:<12} {:<24}",
        style("NAME").bold(),
        style("LEVEL").bold(),
        style("MODE").bold(),
        style("TYPE").bold(),
        style("STATE").bold(),
        style("LAST DETACH").bold()
    );
    println!("{}", "-".repeat(94));

    for cache in caches {
        let state = if cache.corrupt {
            style("corrupt").red()
        } else if cache.compatible {
            style("compatible").green()
        } else {
            style("incompatible").yellow()
        };
        let detached = cache
            .last_detach_time
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "in use".to_string());

        println!(
            "{:<24} {:<8} {:<8} {:<15} {:<12} {:<24}",
            cache.usable_name().unwrap_or("<unnamed>"),
            cache.jvm_level,
            cache.address_mode.to_string(),
            cache.persistence.to_string(),
            state,
            detached
        );
    }

    println!();
    println!("Total: {} cache(s)", caches.len());
}
