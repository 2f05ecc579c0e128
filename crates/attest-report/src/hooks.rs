//! Collaborator hook points.
//!
//! Each hook is an explicit subscriber list invoked synchronously in
//! registration order, mirroring the customization surface the host runner's
//! plugins expect: report title, results-table header, per-row cells, per-row
//! extra detail, and the final summary block. Row hooks may mutate or clear
//! the cell list; clearing it drops the row silently.

use crate::event::TestReport;
use crate::model::AdditionalSummary;

type TitleHook = Box<dyn FnMut(&mut String)>;
type HeaderHook = Box<dyn FnMut(&mut Vec<String>)>;
type RowHook = Box<dyn FnMut(&TestReport, &mut Vec<String>)>;
type RowDetailHook = Box<dyn FnMut(&TestReport, &mut Vec<String>)>;
type SummaryHook = Box<dyn FnMut(&mut AdditionalSummary)>;

#[derive(Default)]
pub struct ReportHooks {
    title: Vec<TitleHook>,
    table_header: Vec<HeaderHook>,
    table_row: Vec<RowHook>,
    row_detail: Vec<RowDetailHook>,
    summary: Vec<SummaryHook>,
}

impl ReportHooks {
    /// Customize the report title.
    pub fn on_report_title(&mut self, hook: impl FnMut(&mut String) + 'static) {
        self.title.push(Box::new(hook));
    }

    /// Customize the results-table header cells.
    pub fn on_results_table_header(&mut self, hook: impl FnMut(&mut Vec<String>) + 'static) {
        self.table_header.push(Box::new(hook));
    }

    /// Customize one row's cells. Clearing the list suppresses the row.
    pub fn on_results_table_row(
        &mut self,
        hook: impl FnMut(&TestReport, &mut Vec<String>) + 'static,
    ) {
        self.table_row.push(Box::new(hook));
    }

    /// Inject arbitrary extra detail lines into a row's log block.
    pub fn on_results_table_html(
        &mut self,
        hook: impl FnMut(&TestReport, &mut Vec<String>) + 'static,
    ) {
        self.row_detail.push(Box::new(hook));
    }

    /// Finalize the summary prefix/summary/postfix fragments.
    pub fn on_results_summary(&mut self, hook: impl FnMut(&mut AdditionalSummary) + 'static) {
        self.summary.push(Box::new(hook));
    }

    pub(crate) fn run_title(&mut self, title: &mut String) {
        for hook in &mut self.title {
            hook(title);
        }
    }

    pub(crate) fn run_table_header(&mut self, cells: &mut Vec<String>) {
        for hook in &mut self.table_header {
            hook(cells);
        }
    }

    pub(crate) fn run_table_row(&mut self, report: &TestReport, cells: &mut Vec<String>) {
        for hook in &mut self.table_row {
            hook(report, cells);
        }
    }

    pub(crate) fn run_row_detail(&mut self, report: &TestReport, log: &mut Vec<String>) {
        for hook in &mut self.row_detail {
            hook(report, log);
        }
    }

    pub(crate) fn run_summary(&mut self, summary: &mut AdditionalSummary) {
        for hook in &mut self.summary {
            hook(summary);
        }
    }
}

impl std::fmt::Debug for ReportHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportHooks")
            .field("title", &self.title.len())
            .field("table_header", &self.table_header.len())
            .field("table_row", &self.table_row.len())
            .field("row_detail", &self.row_detail.len())
            .field("summary", &self.summary.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::{Phase, RawOutcome};

    #[test]
    fn hooks_run_in_registration_order() {
        let mut hooks = ReportHooks::default();
        hooks.on_report_title(|t| t.push_str("-first"));
        hooks.on_report_title(|t| t.push_str("-second"));

        let mut title = String::from("report");
        hooks.run_title(&mut title);
        assert_eq!(title, "report-first-second");
    }

    #[test]
    fn row_hooks_can_clear_cells() {
        let mut hooks = ReportHooks::default();
        hooks.on_results_table_row(|_, cells| cells.clear());

        let report = TestReport::new("a.py::t", Phase::Call, RawOutcome::Passed, 0.0);
        let mut cells = vec!["<td>Passed</td>".to_string()];
        hooks.run_table_row(&report, &mut cells);
        assert!(cells.is_empty());
    }

    #[test]
    fn summary_hooks_see_all_three_fragments() {
        let mut hooks = ReportHooks::default();
        hooks.on_results_summary(|summary| {
            summary.prefix.push("<p>before</p>".into());
            summary.postfix.push("<p>after</p>".into());
        });

        let mut summary = AdditionalSummary::default();
        hooks.run_summary(&mut summary);
        assert_eq!(summary.prefix, vec!["<p>before</p>"]);
        assert_eq!(summary.postfix, vec!["<p>after</p>"]);
    }
}
