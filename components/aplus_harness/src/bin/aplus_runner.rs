//! Promises/A+ conformance runner
//!
//! Runs the built-in scenarios against the async runtime and prints a
//! summary (or the JSON report). Exits non-zero when anything failed.

use aplus_harness::{all_scenarios, AplusHarness, Cli};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut harness = AplusHarness::new(cli.event_loop_config());
    if let Some(filter) = &cli.filter {
        harness = harness.with_filter(filter.as_str());
    }

    let scenarios = all_scenarios();
    info!(scenarios = scenarios.len(), "running conformance scenarios");
    let report = harness.run_all(&scenarios);

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.detailed_summary());
    }

    if !report.is_success() {
        std::process::exit(1);
    }

    Ok(())
}
