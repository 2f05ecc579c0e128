//! The per-test record delivered by the host runner.
//!
//! One [`TestReport`] arrives per phase (setup/call/teardown) of every test,
//! plus one more per rerun attempt when a rerun plugin is active. The report
//! pipeline never talks to the runner directly; the host adapts its own
//! result type into this struct and feeds it to
//! [`HtmlReport::add_test_report`](crate::HtmlReport::add_test_report).

use crate::extras::Extra;
use crate::outcome::{Phase, RawOutcome};

/// A single phase result for one test, as observed by the host runner.
#[derive(Debug, Clone)]
pub struct TestReport {
    /// The runner's node identifier, e.g. `tests/test_x.py::test_y`.
    pub nodeid: String,
    /// Which phase this record covers.
    pub when: Phase,
    /// Raw outcome of the phase.
    pub outcome: RawOutcome,
    /// Elapsed wall-clock seconds for the phase.
    pub duration: f64,
    /// Reason string when the test carried an expected-failure marker.
    pub wasxfail: Option<String>,
    /// Rerun attempt counter set by rerun plugins (0 = first rerun).
    pub rerun: Option<u32>,
    /// Failure representation text; empty when the phase succeeded.
    pub longreprtext: String,
    /// Captured `(header, content)` output sections, in capture order.
    pub sections: Vec<(String, String)>,
    /// Artifacts attached by test code during execution.
    pub extras: Vec<Extra>,
    /// Legacy per-report duration formatter. Removed; its presence only
    /// triggers a deprecation warning.
    pub duration_formatter: Option<String>,
}

impl TestReport {
    pub fn new(
        nodeid: impl Into<String>,
        when: Phase,
        outcome: RawOutcome,
        duration: f64,
    ) -> Self {
        Self {
            nodeid: nodeid.into(),
            when,
            outcome,
            duration,
            wasxfail: None,
            rerun: None,
            longreprtext: String::new(),
            sections: Vec::new(),
            extras: Vec::new(),
            duration_formatter: None,
        }
    }

    #[must_use]
    pub fn with_wasxfail(mut self, reason: impl Into<String>) -> Self {
        self.wasxfail = Some(reason.into());
        self
    }

    #[must_use]
    pub fn with_rerun(mut self, attempt: u32) -> Self {
        self.rerun = Some(attempt);
        self
    }

    #[must_use]
    pub fn with_longreprtext(mut self, text: impl Into<String>) -> Self {
        self.longreprtext = text.into();
        self
    }

    #[must_use]
    pub fn with_section(mut self, header: impl Into<String>, content: impl Into<String>) -> Self {
        self.sections.push((header.into(), content.into()));
        self
    }

    #[must_use]
    pub fn with_extra(mut self, extra: Extra) -> Self {
        self.extras.push(extra);
        self
    }

    /// The test identifier shown in the report: the node id, suffixed with
    /// the phase name for anything other than the call phase.
    #[must_use]
    pub fn display_test_id(&self) -> String {
        if self.when == Phase::Call {
            self.nodeid.clone()
        } else {
            format!("{}::{}", self.nodeid, self.when.as_str())
        }
    }

    /// Rerun-aware index used in asset filenames: 0 for a plain run,
    /// `attempt + 1` once a rerun plugin has kicked in.
    #[must_use]
    pub fn test_index(&self) -> u32 {
        self.rerun.map(|attempt| attempt + 1).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_phase_keeps_bare_nodeid() {
        let report = TestReport::new("a.py::t", Phase::Call, RawOutcome::Passed, 0.0);
        assert_eq!(report.display_test_id(), "a.py::t");
    }

    #[test]
    fn other_phases_get_suffix() {
        let report = TestReport::new("a.py::t", Phase::Setup, RawOutcome::Failed, 0.0);
        assert_eq!(report.display_test_id(), "a.py::t::setup");
    }

    #[test]
    fn test_index_is_rerun_aware() {
        let plain = TestReport::new("a.py::t", Phase::Call, RawOutcome::Passed, 0.0);
        assert_eq!(plain.test_index(), 0);
        assert_eq!(plain.with_rerun(0).test_index(), 1);
    }
}
