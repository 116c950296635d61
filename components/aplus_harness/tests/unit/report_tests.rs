//! Unit tests for report generation

use aplus_harness::{Outcome, TestReport, TestResult};

#[test]
fn test_new_report() {
    let report = TestReport::new();
    assert_eq!(report.total, 0);
    assert!(report.failures.is_empty());
    assert!(report.is_success());
    assert_eq!(report.pass_rate(), 0.0);
}

#[test]
fn test_add_results() {
    let mut report = TestReport::new();
    report.add_result("a", TestResult::Pass);
    report.add_result("b", TestResult::Fail("wrong value".to_string()));
    report.add_result("c", TestResult::Skip("does not match filter".to_string()));
    report.add_result("d", TestResult::Timeout);

    assert_eq!(report.total, 4);
    assert_eq!(report.passed, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.timeout, 1);
    assert_eq!(
        report.failures,
        vec![Outcome {
            name: "b".to_string(),
            reason: "wrong value".to_string()
        }]
    );
    assert_eq!(report.timeouts, vec!["d".to_string()]);
    assert!(!report.is_success());
}

#[test]
fn test_pass_rate_excludes_skips() {
    let mut report = TestReport::new();
    report.add_result("a", TestResult::Pass);
    report.add_result("b", TestResult::Skip("filtered".to_string()));
    assert_eq!(report.pass_rate(), 100.0);
}

#[test]
fn test_detailed_summary_lists_failures() {
    let mut report = TestReport::new();
    report.add_result("2.3.1 self", TestResult::Fail("expected TypeError".to_string()));
    let text = report.detailed_summary();
    assert!(text.starts_with("Promises/A+ Results:"));
    assert!(text.contains("  - 2.3.1 self\n    Reason: expected TypeError"));
}

#[test]
fn test_json_round_trip() {
    let mut report = TestReport::new();
    report.add_result("a", TestResult::Pass);
    report.add_result("b", TestResult::Fail("x".to_string()));

    let json = report.to_json().unwrap();
    let parsed = TestReport::from_json(&json).unwrap();
    assert_eq!(parsed.total, 2);
    assert_eq!(parsed.failures, report.failures);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["failures"][0]["name"], "b");
}
