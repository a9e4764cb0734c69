//! Standalone benchmark runner that prints the formatted report.
//!
//! Usage:
//!   cargo run --release
//!   cargo run --release -- --sizes 1000,10000,20000 --format markdown
//!   ORDERJOIN_STRATEGIES=nested_scan,manual_dict cargo run --release

use clap::Parser;
use orderjoin_bench::alloc::{self, TrackingAllocator};
use orderjoin_bench::config::Cli;
use orderjoin_bench::report::{build_rows, write_report};
use orderjoin_bench::runner::{run_search_suite, run_sweep};
use orderjoin_bench::strategy::StrategyRegistry;
use std::io::{self, Write};
use std::process;

#[global_allocator]
static ALLOCATOR: TrackingAllocator = TrackingAllocator;

fn list_strategies(registry: &StrategyRegistry) {
    println!("  {:20} {:8} Description", "Strategy", "Default");
    println!("  {}", "-".repeat(72));
    for entry in registry.all() {
        println!(
            "  {:20} {:8} {}",
            entry.name,
            if entry.enabled { "yes" } else { "no" },
            entry.description
        );
    }
}

fn run(cli: &Cli) -> anyhow::Result<bool> {
    let registry = StrategyRegistry::with_defaults();
    if cli.list {
        list_strategies(&registry);
        return Ok(true);
    }

    let cfg = cli.run_config()?;
    let selection = cli.select(&registry)?;

    log::info!("Running order join benchmark...");
    log::info!("  Sizes:       {:?}", cli.sizes);
    log::info!(
        "  Strategies:  {}",
        selection.iter().map(|e| e.name).collect::<Vec<_>>().join(", ")
    );
    log::info!("  Warmup:      {}", cfg.warmup);
    log::info!("  Samples:     {}", cfg.samples);

    let outcome = run_sweep(&registry, &selection, &cli.sizes, &cfg)?;
    let mut results = outcome.results;
    if cli.search {
        results.extend(run_search_suite(&cfg)?);
    }

    if !alloc::is_tracking() {
        log::warn!("Allocation tracking is not active; memory columns will read zero");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &build_rows(&results), cli.format)?;
    out.flush()?;

    for (size, err) in &outcome.failures {
        log::error!("Size {size} failed: {err:#}");
    }
    Ok(outcome.failures.is_empty())
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    oj_core::initialize_logger(cli.log_level, cli.log_file.as_deref()).unwrap_or_else(|e| {
        eprintln!("Failed to initialize logger: {e}. Exiting.");
        process::exit(1);
    });

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            log::error!("{e:#}");
            process::exit(1);
        }
    }
}
