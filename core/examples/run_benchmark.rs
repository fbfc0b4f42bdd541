//! Runs the store/file benchmark and prints per-phase timings.
//!
//! Run with: `cargo run -q --release --example run_benchmark -p elembench_core [config.toml]`
//!
//! Without a config path the reference layers and budgets are used.
//! Log verbosity follows `RUST_LOG` (default `info`).

use elembench_core::Harness;
use elembench_core::types::BenchConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            println!("Using config: {}", path.display());
            BenchConfig::load(&path).expect("Failed to load config")
        }
        None => BenchConfig::default(),
    };

    println!("Test folder: {}", config.test_folder().display());

    let harness = Harness::new(config).expect("Invalid benchmark config");
    let report = match harness.run() {
        Ok(report) => report,
        Err(err) => {
            eprintln!("Benchmark failed: {err}");
            std::process::exit(1);
        }
    };

    println!("\n{} nodes", report.node_count);
    for phase in &report.phases {
        println!(
            "  {:<10} {:>6} ms (budget {} ms){}",
            phase.phase.to_string(),
            phase.elapsed.as_millis(),
            phase.budget.as_millis(),
            if phase.within_budget() { "" } else { "  OVER" }
        );
    }
}
