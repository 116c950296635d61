//! Promises/A+ Conformance Harness
//!
//! This crate runs a built-in table of Promises/A+ and combinator scenarios
//! against the Corten async runtime and reports the results.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapter;
pub mod cli;
pub mod harness;
pub mod report;
pub mod scenarios;

pub use adapter::Adapter;
pub use cli::Cli;
pub use harness::{AplusHarness, TestResult};
pub use report::{Outcome, TestReport};
pub use scenarios::{all_scenarios, CheckError, CheckResult, Scenario, ScenarioContext};
