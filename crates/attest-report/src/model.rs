//! The mutable report aggregate that lifecycle events build up and the
//! renderer consumes.
//!
//! Field names serialize in the camelCase document schema that report
//! consumers (and the embedded JSON payload) expect.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::duration::format_duration;
use crate::event::TestReport;
use crate::extras::Extra;
use crate::logs::{section_banner, strip_ansi};
use crate::outcome::{Phase, RawOutcome};

/// Lifecycle state of the run, forward-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunningState {
    NotStarted,
    Started,
    Finished,
}

/// Markup fragments surrounding the summary block, owned by summary hooks.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdditionalSummary {
    pub prefix: Vec<String>,
    pub summary: Vec<String>,
    pub postfix: Vec<String>,
}

/// Accumulated wall-clock time across all reported phases.
#[derive(Debug, Clone, Serialize)]
pub struct TotalDuration {
    pub total: f64,
    pub formatted: String,
}

impl Default for TotalDuration {
    fn default() -> Self {
        Self {
            total: 0.0,
            formatted: format_duration(0.0),
        }
    }
}

/// One rendered row of the results table. Immutable after insertion, except
/// that a later teardown event may append to `log`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRow {
    pub test_id: String,
    pub result: String,
    pub duration: String,
    pub extras: Vec<Extra>,
    pub results_table_row: Vec<String>,
    pub log: Vec<String>,
}

/// The whole report document model.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub title: String,
    pub environment: BTreeMap<String, Value>,
    pub collected_items: usize,
    pub running_state: RunningState,
    pub results_table_header: Vec<String>,
    pub additional_summary: AdditionalSummary,
    pub total_duration: TotalDuration,
    pub tests: Vec<TestRow>,
}

impl Default for ReportData {
    fn default() -> Self {
        Self {
            title: String::new(),
            environment: BTreeMap::new(),
            collected_items: 0,
            running_state: RunningState::NotStarted,
            results_table_header: default_table_header(),
            additional_summary: AdditionalSummary::default(),
            total_duration: TotalDuration::default(),
            tests: Vec::new(),
        }
    }
}

fn default_table_header() -> Vec<String> {
    vec![
        r#"<th class="sortable result initial-sort" data-column-type="result">Result</th>"#.into(),
        r#"<th class="sortable" data-column-type="testId">Test</th>"#.into(),
        r#"<th class="sortable" data-column-type="duration">Duration</th>"#.into(),
        r#"<th class="sortable links" data-column-type="links">Links</th>"#.into(),
    ]
}

impl ReportData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the run started. Transitions are monotonic; a second call is a
    /// no-op.
    pub fn start(&mut self) {
        if self.running_state == RunningState::NotStarted {
            self.running_state = RunningState::Started;
        }
    }

    /// Mark the run finished. Only reachable from `Started`.
    pub fn finish(&mut self) {
        if self.running_state == RunningState::Started {
            self.running_state = RunningState::Finished;
        }
    }

    /// Fold one phase duration into the running total. The total never
    /// decreases.
    pub fn accumulate_duration(&mut self, seconds: f64) {
        self.total_duration.total += seconds;
        self.total_duration.formatted = format_duration(self.total_duration.total);
    }

    /// Insert a row built from `report`, applying the dedup/merge policy:
    ///
    /// * teardown events first merge their teardown-captured sections into
    ///   the existing call row's log for the same node id;
    /// * call rows are always reportable; setup/teardown rows only when the
    ///   phase did not pass.
    ///
    /// Returns whether the addition was reportable, i.e. whether the caller
    /// should re-render the document.
    pub fn add_test(&mut self, row: TestRow, report: &TestReport) -> bool {
        if report.when == Phase::Teardown {
            self.merge_teardown_log(report);
        }

        let reportable = report.when == Phase::Call || report.outcome != RawOutcome::Passed;
        if reportable {
            self.tests.push(row);
        }
        reportable
    }

    /// Teardown logging belongs with the call row the reader will actually
    /// look at.
    fn merge_teardown_log(&mut self, report: &TestReport) {
        let mut merged = String::new();
        for (header, content) in &report.sections {
            if header.contains("teardown") {
                if !merged.is_empty() {
                    merged.push('\n');
                }
                merged.push_str(&section_banner(header, content));
            }
        }
        if merged.is_empty() {
            return;
        }
        let merged = strip_ansi(&merged);

        for row in self
            .tests
            .iter_mut()
            .filter(|row| row.test_id == report.nodeid)
        {
            row.log.push(merged.clone());
        }
    }
}
