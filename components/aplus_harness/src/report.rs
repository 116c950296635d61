use crate::harness::TestResult;
use serde::{Deserialize, Serialize};

/// A scenario that did not pass, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Scenario name
    pub name: String,
    /// Why it failed or was skipped
    pub reason: String,
}

/// Run report with statistics and failure details
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestReport {
    /// Total number of scenarios
    pub total: usize,
    /// Number that passed
    pub passed: usize,
    /// Number that failed
    pub failed: usize,
    /// Number skipped by the filter
    pub skipped: usize,
    /// Number that hit the microtask limit
    pub timeout: usize,
    /// Failed scenarios
    pub failures: Vec<Outcome>,
    /// Skipped scenarios
    pub skips: Vec<Outcome>,
    /// Scenarios that hit the microtask limit
    pub timeouts: Vec<String>,
}

impl TestReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scenario result to the report
    pub fn add_result(&mut self, name: &str, result: TestResult) {
        self.total += 1;
        match result {
            TestResult::Pass => self.passed += 1,
            TestResult::Fail(reason) => {
                self.failed += 1;
                self.failures.push(Outcome {
                    name: name.to_string(),
                    reason,
                });
            }
            TestResult::Skip(reason) => {
                self.skipped += 1;
                self.skips.push(Outcome {
                    name: name.to_string(),
                    reason,
                });
            }
            TestResult::Timeout => {
                self.timeout += 1;
                self.timeouts.push(name.to_string());
            }
        }
    }

    /// Pass rate over the scenarios that ran, as a percentage
    pub fn pass_rate(&self) -> f64 {
        let executed = self.total - self.skipped;
        if executed == 0 {
            0.0
        } else {
            (self.passed as f64 / executed as f64) * 100.0
        }
    }

    /// Generate a human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Promises/A+ Results:\n\
             Total: {}\n\
             Passed: {}\n\
             Failed: {}\n\
             Skipped: {}\n\
             Timeout: {}\n\
             Pass Rate: {:.1}%",
            self.total,
            self.passed,
            self.failed,
            self.skipped,
            self.timeout,
            self.pass_rate()
        )
    }

    /// Summary followed by every failure and timeout
    pub fn detailed_summary(&self) -> String {
        let mut output = self.summary();

        if !self.failures.is_empty() {
            output.push_str("\n\nFailures:\n");
            for failure in &self.failures {
                output.push_str(&format!("  - {}\n    Reason: {}\n", failure.name, failure.reason));
            }
        }
        if !self.timeouts.is_empty() {
            output.push_str("\n\nTimeouts:\n");
            for name in &self.timeouts {
                output.push_str(&format!("  - {}\n", name));
            }
        }

        output
    }

    /// Check if every scenario that ran passed
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.timeout == 0
    }

    /// Export report as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Import report from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
