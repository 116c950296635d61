//! Command line options for `aplus-runner`.

use async_runtime::EventLoopConfig;
use clap::Parser;

/// Runs the built-in Promises/A+ scenarios.
#[derive(Debug, Parser)]
#[command(name = "aplus-runner", version)]
pub struct Cli {
    /// Only run scenarios whose name contains this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Microtasks one drain may run before the scenario counts as timed out
    #[arg(long, default_value_t = 10_000)]
    pub microtask_limit: usize,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Event loop settings for every scenario.
    pub fn event_loop_config(&self) -> EventLoopConfig {
        EventLoopConfig {
            microtask_limit: Some(self.microtask_limit),
        }
    }

    /// Default log directive when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}
