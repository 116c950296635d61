use crate::report::TestReport;
use crate::scenarios::{CheckError, Scenario, ScenarioContext};
use async_runtime::{EventLoopConfig, RuntimeError};
use tracing::debug;

/// Result of running a single scenario
#[derive(Debug, Clone, PartialEq)]
pub enum TestResult {
    /// Scenario passed
    Pass,
    /// Scenario failed with reason
    Fail(String),
    /// Scenario was skipped with reason
    Skip(String),
    /// Scenario ran past the microtask limit
    Timeout,
}

impl TestResult {
    /// Check if the result is a pass
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass)
    }

    /// Check if the result is a failure
    pub fn is_fail(&self) -> bool {
        matches!(self, TestResult::Fail(_))
    }

    /// Check if the result is a skip
    pub fn is_skip(&self) -> bool {
        matches!(self, TestResult::Skip(_))
    }

    /// Check if the result is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, TestResult::Timeout)
    }
}

impl From<Result<(), CheckError>> for TestResult {
    fn from(result: Result<(), CheckError>) -> Self {
        match result {
            Ok(()) => TestResult::Pass,
            Err(CheckError::Runtime(RuntimeError::MicrotaskLimitExceeded { .. })) => {
                TestResult::Timeout
            }
            Err(error) => TestResult::Fail(error.to_string()),
        }
    }
}

/// Promises/A+ conformance harness
///
/// Every scenario gets its own event loop built from `config`.
#[derive(Debug, Clone, Default)]
pub struct AplusHarness {
    config: EventLoopConfig,
    filter: Option<String>,
}

impl AplusHarness {
    /// Create a harness running scenarios with `config`
    pub fn new(config: EventLoopConfig) -> Self {
        Self {
            config,
            filter: None,
        }
    }

    /// Only run scenarios whose name contains `filter`; skip the rest
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Event loop settings used for each scenario
    pub fn config(&self) -> &EventLoopConfig {
        &self.config
    }

    /// Check whether a scenario passes the name filter
    pub fn selects(&self, scenario: &Scenario) -> bool {
        self.filter
            .as_deref()
            .map_or(true, |filter| scenario.name.contains(filter))
    }

    /// Run a single scenario
    pub fn run_scenario(&self, scenario: &Scenario) -> TestResult {
        if !self.selects(scenario) {
            return TestResult::Skip("does not match filter".to_string());
        }

        let mut context = ScenarioContext::new(self.config.clone());
        let result = TestResult::from((scenario.check)(&mut context));
        debug!(scenario = scenario.name, ?result, "scenario finished");
        result
    }

    /// Run every scenario and collect a report
    pub fn run_all(&self, scenarios: &[Scenario]) -> TestReport {
        let mut report = TestReport::new();
        for scenario in scenarios {
            report.add_result(scenario.name, self.run_scenario(scenario));
        }
        report
    }
}
