//! Captured-output processing: turns a result record's traceback and capture
//! sections into the ordered log lines stored on a row.

use lazy_static::lazy_static;
use regex::Regex;

use crate::event::TestReport;
use crate::outcome::RawOutcome;

lazy_static! {
    // CSI and related escape sequences as emitted by terminal colorizers.
    static ref ANSI_ESCAPE: Regex = Regex::new(r"\x1B\[[0-?]*[ -/]*[@-~]").expect("static regex");
}

/// Render one capture section as a centered 80-column banner plus content.
pub(crate) fn section_banner(header: &str, content: &str) -> String {
    format!("{:-^80}\n{}", format!(" {} ", header), content)
}

/// Build the display log for a result record.
///
/// The failure representation (angle brackets escaped) comes first, followed
/// by each capture section. Captured output from reruns is deliberately
/// suppressed. An empty log gets a single placeholder entry.
#[must_use]
pub fn process_logs(report: &TestReport) -> Vec<String> {
    let mut log = Vec::new();
    if !report.longreprtext.is_empty() {
        let escaped = report.longreprtext.replace('<', "&lt;").replace('>', "&gt;");
        log.push(format!("{}\n", escaped));
    }
    if report.outcome != RawOutcome::Rerun {
        for (header, content) in &report.sections {
            log.push(section_banner(header, content));

            // Longstanding spacing quirk around log-capture sections,
            // preserved for output parity.
            if header.contains("log") {
                log.push(String::new());
                if header.contains("call") {
                    log.push(String::new());
                }
            }
        }
    }
    if log.is_empty() {
        log.push("No log output captured.".to_string());
    }
    log
}

/// Strip ANSI escape sequences from captured text before display.
#[must_use]
pub fn strip_ansi(text: &str) -> String {
    ANSI_ESCAPE.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Phase;

    #[test]
    fn longrepr_is_escaped_and_first() {
        let report = TestReport::new("a.py::t", Phase::Call, RawOutcome::Failed, 0.1)
            .with_longreprtext("assert <x> == <y>")
            .with_section("Captured stdout call", "hello");
        let log = process_logs(&report);
        assert_eq!(log[0], "assert &lt;x&gt; == &lt;y&gt;\n");
        assert!(log[1].starts_with('-'));
        assert!(log[1].ends_with("hello"));
    }

    #[test]
    fn section_header_is_centered_to_80_columns() {
        let report = TestReport::new("a.py::t", Phase::Call, RawOutcome::Passed, 0.1)
            .with_section("Captured stdout call", "out");
        let log = process_logs(&report);
        let banner_line = log[0].lines().next().unwrap();
        assert_eq!(banner_line.len(), 80);
        assert!(banner_line.contains(" Captured stdout call "));
    }

    #[test]
    fn log_sections_get_extra_blank_entries() {
        let report = TestReport::new("a.py::t", Phase::Call, RawOutcome::Passed, 0.1)
            .with_section("Captured log call", "line");
        let log = process_logs(&report);
        // banner+content, then two blanks: one for "log", one more for "call"
        assert_eq!(log.len(), 3);
        assert_eq!(log[1], "");
        assert_eq!(log[2], "");

        let setup = TestReport::new("a.py::t", Phase::Setup, RawOutcome::Passed, 0.1)
            .with_section("Captured log setup", "line");
        assert_eq!(process_logs(&setup).len(), 2);
    }

    #[test]
    fn rerun_output_is_suppressed() {
        let report = TestReport::new("a.py::t", Phase::Call, RawOutcome::Rerun, 0.1)
            .with_section("Captured stdout call", "noisy");
        let log = process_logs(&report);
        assert_eq!(log, vec!["No log output captured.".to_string()]);
    }

    #[test]
    fn empty_log_gets_placeholder() {
        let report = TestReport::new("a.py::t", Phase::Call, RawOutcome::Passed, 0.1);
        assert_eq!(
            process_logs(&report),
            vec!["No log output captured.".to_string()]
        );
    }

    #[test]
    fn ansi_sequences_are_stripped() {
        assert_eq!(strip_ansi("\x1b[31mred\x1b[0m plain"), "red plain");
        assert_eq!(strip_ansi("no escapes"), "no escapes");
    }
}
