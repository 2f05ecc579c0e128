//! Self-contained HTML reporting for test-suite runs.
//!
//! This crate observes a host test runner's lifecycle events and aggregates
//! them into a single renderable HTML document: per-test outcomes, durations,
//! captured logs and arbitrary attached artifacts (text, JSON, images,
//! video). The host drives the pipeline in its own execution order:
//!
//! ```no_run
//! use std::collections::BTreeMap;
//! use attest_report::{Extra, HtmlReport, Phase, RawOutcome, ReportConfig, TestReport};
//!
//! # fn main() -> Result<(), attest_report::ReportError> {
//! let config = ReportConfig::new("target/report.html")
//!     .with_redact_patterns(["SECRET.*"])?
//!     .with_self_contained(true);
//! let mut report = HtmlReport::new(config)?;
//!
//! report.session_start(BTreeMap::new())?;
//! report.collection_finish(1);
//! report.add_test_report(
//!     TestReport::new("tests/test_x.py::test_y", Phase::Call, RawOutcome::Passed, 0.5)
//!         .with_extra(Extra::text("captured output")),
//! )?;
//! report.session_finish()?;
//! report.terminal_summary();
//! # Ok(())
//! # }
//! ```
//!
//! Everything is single-threaded and synchronous; the report file is fully
//! rewritten on each qualifying event and the last write wins.

pub mod config;
pub mod duration;
pub mod error;
pub mod event;
pub mod extras;
pub mod hooks;
pub mod logs;
pub mod model;
pub mod outcome;
pub mod redact;
pub mod render;
pub mod report;
pub mod sink;

pub use config::ReportConfig;
pub use error::{ReportError, Result};
pub use event::TestReport;
pub use extras::{Extra, ExtraContent, ExtraFormat};
pub use hooks::ReportHooks;
pub use model::{AdditionalSummary, ReportData, RunningState, TestRow, TotalDuration};
pub use outcome::{Phase, RawOutcome};
pub use render::{HtmlRenderer, RenderContext, Renderer};
pub use report::HtmlReport;
pub use sink::{AssetSink, FileSink, SelfContainedSink};
