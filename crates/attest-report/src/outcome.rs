//! Mapping from raw runner outcomes to the display labels used in the
//! results table.

use serde::{Deserialize, Serialize};

use crate::event::TestReport;

/// Phase of a test the runner is reporting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Setup,
    Call,
    Teardown,
}

impl Phase {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::Call => "call",
            Phase::Teardown => "teardown",
        }
    }
}

/// Raw outcome as delivered by the host runner.
///
/// Outcomes outside the known set pass through and are displayed capitalized,
/// so runner plugins that invent outcomes still render something sensible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawOutcome {
    Passed,
    Failed,
    Skipped,
    Rerun,
    Other(String),
}

impl RawOutcome {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            RawOutcome::Passed => "passed",
            RawOutcome::Failed => "failed",
            RawOutcome::Skipped => "skipped",
            RawOutcome::Rerun => "rerun",
            RawOutcome::Other(s) => s,
        }
    }
}

/// A setup or teardown failure is an error in the fixture machinery, not a
/// test failure.
pub(crate) fn is_error(report: &TestReport) -> bool {
    matches!(report.when, Phase::Setup | Phase::Teardown) && report.outcome == RawOutcome::Failed
}

/// Classify a raw result into its display label.
#[must_use]
pub fn classify(report: &TestReport) -> String {
    if is_error(report) {
        return "Error".to_string();
    }
    if report.wasxfail.is_some() {
        if matches!(report.outcome, RawOutcome::Passed | RawOutcome::Failed) {
            return "XPassed".to_string();
        }
        if report.outcome == RawOutcome::Skipped {
            return "XFailed".to_string();
        }
    }

    capitalize(report.outcome.as_str())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::TestReport;

    fn report(when: Phase, outcome: RawOutcome) -> TestReport {
        TestReport::new("tests/test_a.py::test_one", when, outcome, 0.1)
    }

    #[test]
    fn setup_and_teardown_failures_are_errors() {
        assert_eq!(classify(&report(Phase::Setup, RawOutcome::Failed)), "Error");
        assert_eq!(
            classify(&report(Phase::Teardown, RawOutcome::Failed)),
            "Error"
        );
        assert_eq!(classify(&report(Phase::Call, RawOutcome::Failed)), "Failed");
    }

    #[test]
    fn xfail_marker_wins_over_plain_outcome() {
        let passed = report(Phase::Call, RawOutcome::Passed).with_wasxfail("expected to fail");
        assert_eq!(classify(&passed), "XPassed");

        let failed = report(Phase::Call, RawOutcome::Failed).with_wasxfail("expected to fail");
        assert_eq!(classify(&failed), "XPassed");

        let skipped = report(Phase::Call, RawOutcome::Skipped).with_wasxfail("expected to fail");
        assert_eq!(classify(&skipped), "XFailed");
    }

    #[test]
    fn unknown_outcomes_pass_through_capitalized() {
        assert_eq!(classify(&report(Phase::Call, RawOutcome::Rerun)), "Rerun");
        assert_eq!(
            classify(&report(Phase::Call, RawOutcome::Other("flaky".into()))),
            "Flaky"
        );
    }
}
