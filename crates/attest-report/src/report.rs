//! The report lifecycle: one [`HtmlReport`] per run, fed by the host runner's
//! lifecycle events in execution order.
//!
//! Session start populates the environment and renders a first (empty)
//! document; every reportable per-test event re-renders and rewrites the
//! whole file; session finish renders the final state. Last write wins:
//! there is no locking and no partial-write protection, so an externally
//! terminated run leaves the last successfully written report on disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ReportConfig;
use crate::duration::format_duration;
use crate::error::{ReportError, Result};
use crate::event::TestReport;
use crate::extras::{asset_filename, process_links, ExtraContent, ExtraFormat};
use crate::hooks::ReportHooks;
use crate::logs::{process_logs, strip_ansi};
use crate::model::{ReportData, TestRow};
use crate::outcome::classify;
use crate::redact::redact_environment;
use crate::render::{HtmlRenderer, RenderContext, Renderer, STYLE_CSS};
use crate::sink::{AssetSink, FileSink, SelfContainedSink};

/// Aggregates a run into a single HTML document.
pub struct HtmlReport {
    config: ReportConfig,
    report_path: PathBuf,
    data: ReportData,
    hooks: ReportHooks,
    renderer: Box<dyn Renderer>,
    sink: Box<dyn AssetSink>,
}

impl HtmlReport {
    /// Prepare the report destination. Creates parent directories (and, for
    /// file-backed reports, the stylesheet asset) immediately so filesystem
    /// problems surface at startup rather than mid-run.
    pub fn new(config: ReportConfig) -> Result<Self> {
        let report_path = config.report_path().to_path_buf();
        if let Some(parent) = report_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e))?;
            }
        }

        let sink: Box<dyn AssetSink> = if config.self_contained() {
            Box::new(SelfContainedSink)
        } else {
            let assets_dir = report_path
                .parent()
                .map(|p| p.join("assets"))
                .unwrap_or_else(|| PathBuf::from("assets"));
            std::fs::create_dir_all(&assets_dir).map_err(|e| ReportError::io(&assets_dir, e))?;
            let css_path = assets_dir.join("style.css");
            std::fs::write(&css_path, STYLE_CSS).map_err(|e| ReportError::io(&css_path, e))?;
            Box::new(FileSink::new(assets_dir))
        };

        let mut data = ReportData::new();
        data.title = report_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            config,
            report_path,
            data,
            hooks: ReportHooks::default(),
            renderer: Box::new(HtmlRenderer),
            sink,
        })
    }

    /// Swap in a custom document renderer.
    #[must_use]
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Swap in a custom asset sink (replacing the one implied by the
    /// self-contained toggle).
    #[must_use]
    pub fn with_sink(mut self, sink: impl AssetSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Registration point for collaborator hooks.
    pub fn hooks_mut(&mut self) -> &mut ReportHooks {
        &mut self.hooks
    }

    /// Read-only view of the aggregate, mainly for assertions in host code.
    #[must_use]
    pub fn data(&self) -> &ReportData {
        &self.data
    }

    #[must_use]
    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    /// Session start: store the (redacted) environment, let hooks customize
    /// title and table header, and write the initial document.
    pub fn session_start(&mut self, mut metadata: BTreeMap<String, Value>) -> Result<()> {
        redact_environment(&mut metadata, self.config.redact_patterns());
        self.data.environment = metadata;

        let mut title = std::mem::take(&mut self.data.title);
        self.hooks.run_title(&mut title);
        self.data.title = title;

        let mut header = std::mem::take(&mut self.data.results_table_header);
        self.hooks.run_table_header(&mut header);
        self.data.results_table_header = normalize_cells(header);

        self.data.start();
        info!(path = %self.report_path.display(), "report session started");
        self.generate_report()
    }

    /// Collection finish: record how many items the runner collected.
    pub fn collection_finish(&mut self, collected: usize) {
        debug!(collected, "collection finished");
        self.data.collected_items = collected;
    }

    /// Per-test-report event; fires once per phase and once more per rerun
    /// attempt. Re-renders the document only for reportable additions.
    pub fn add_test_report(&mut self, mut event: TestReport) -> Result<()> {
        if event.duration_formatter.is_some() {
            warn!("'duration_formatter' has been removed and no longer has any effect");
        }

        let result = classify(&event);
        let duration = format_duration(event.duration);
        self.data.accumulate_duration(event.duration);

        let test_id = event.display_test_id();
        self.process_extras(&mut event, &test_id)?;

        let mut cells = vec![
            format!("<td class=\"col-result\">{}</td>", result),
            format!("<td class=\"col-name\">{}</td>", test_id),
            format!("<td class=\"col-duration\">{}</td>", duration),
            format!("<td class=\"col-links\">{}</td>", process_links(&event.extras)),
        ];
        self.hooks.run_table_row(&event, &mut cells);
        if cells.is_empty() {
            // A hook cleared the row; drop it without touching the document.
            debug!(test_id = %test_id, "row suppressed by hook");
            return Ok(());
        }
        let cells = normalize_cells(cells);

        let mut log = process_logs(&event);
        self.hooks.run_row_detail(&event, &mut log);
        let log = log.iter().map(|entry| strip_ansi(entry)).collect();

        let row = TestRow {
            test_id,
            result,
            duration,
            extras: event.extras.clone(),
            results_table_row: cells,
            log,
        };

        if self.data.add_test(row, &event) {
            self.generate_report()?;
        }
        Ok(())
    }

    /// Session finish: finalize summary fragments and write the final
    /// document.
    pub fn session_finish(&mut self) -> Result<()> {
        let mut summary = std::mem::take(&mut self.data.additional_summary);
        self.hooks.run_summary(&mut summary);
        self.data.additional_summary = summary;

        self.data.finish();
        info!(path = %self.report_path.display(), "report session finished");
        self.generate_report()
    }

    /// Terminal-summary side channel: announce where the report landed.
    /// Returns the line so hosts with their own terminal writer can reuse it.
    pub fn terminal_summary(&self) -> String {
        let absolute = std::fs::canonicalize(&self.report_path)
            .unwrap_or_else(|_| self.report_path.clone());
        let line = format!("Generated html report: file://{}", absolute.display());
        println!("{}", line);
        line
    }

    /// Transform every attached extra into its renderable form, in attachment
    /// order. Mutates contents in place.
    fn process_extras(&mut self, event: &mut TestReport, test_id: &str) -> Result<()> {
        let test_index = event.test_index();
        let max_len = self.config.max_asset_filename_length();

        for (extra_index, extra) in event.extras.iter_mut().enumerate() {
            let asset_name =
                asset_filename(test_id, extra_index, test_index, &extra.extension, max_len);

            match extra.format {
                ExtraFormat::Json => {
                    let content = match &extra.content {
                        ExtraContent::Json(v) => serde_json::to_string(v)?,
                        ExtraContent::Text(s) => serde_json::to_string(s)?,
                        ExtraContent::Bytes(b) => {
                            serde_json::to_string(&decode_utf8(b, &asset_name)?)?
                        }
                    };
                    let stored =
                        self.sink
                            .data_content(&content, &asset_name, &extra.mime_type)?;
                    extra.content = ExtraContent::Text(stored);
                }
                ExtraFormat::Text => {
                    let content = match &extra.content {
                        ExtraContent::Text(s) => s.clone(),
                        ExtraContent::Bytes(b) => decode_utf8(b, &asset_name)?,
                        ExtraContent::Json(v) => v.to_string(),
                    };
                    let stored =
                        self.sink
                            .data_content(&content, &asset_name, &extra.mime_type)?;
                    extra.content = ExtraContent::Text(stored);
                }
                ExtraFormat::Image | ExtraFormat::Video => {
                    let stored =
                        self.sink
                            .media_content(&extra.content, &asset_name, &extra.mime_type)?;
                    extra.content = ExtraContent::Text(stored);
                }
                // URLs and raw HTML pass through unmodified.
                ExtraFormat::Url | ExtraFormat::Html => {}
            }
        }
        Ok(())
    }

    /// Render the current aggregate and rewrite the output file. The
    /// generation date/time is captured once here and passed down, keeping
    /// the renderer itself deterministic.
    fn generate_report(&mut self) -> Result<()> {
        let generated = Local::now();
        let date = generated.format("%d-%b-%Y").to_string();
        let time = generated.format("%H:%M:%S").to_string();
        let test_data = serde_json::to_string(&self.data)?;

        let ctx = RenderContext {
            date: &date,
            time: &time,
            version: env!("CARGO_PKG_VERSION"),
            styles: STYLE_CSS,
            self_contained: self.config.self_contained(),
            test_data: &test_data,
            table_head: &self.data.results_table_header,
            prefix: &self.data.additional_summary.prefix,
            summary: &self.data.additional_summary.summary,
            postfix: &self.data.additional_summary.postfix,
            data: &self.data,
        };
        let rendered = self.renderer.render(&ctx);
        self.write_report(&rendered)
    }

    fn write_report(&self, rendered: &str) -> Result<()> {
        std::fs::write(&self.report_path, rendered)
            .map_err(|e| ReportError::io(&self.report_path, e))
    }
}

impl std::fmt::Debug for HtmlReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlReport")
            .field("report_path", &self.report_path)
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

/// Decode raw extra bytes as UTF-8. Undecodable content is fatal for the
/// event, surfaced with the asset name it was destined for.
fn decode_utf8(bytes: &[u8], asset_name: &str) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|source| ReportError::Encoding {
        asset_name: asset_name.to_string(),
        source,
    })
}

/// Rewrite the one known legacy attribute convention (`col=` →
/// `data-column-type=`) in header or row cells. All cells are markup strings
/// by contract; this keeps documents written against the old attribute name
/// rendering correctly while warning about the migration.
fn normalize_cells(cells: Vec<String>) -> Vec<String> {
    cells
        .into_iter()
        .map(|cell| {
            if cell.contains("col=") {
                warn!("legacy 'col=' attribute in table cell; use 'data-column-type=' instead");
                cell.replace("col=", "data-column-type=")
            } else {
                cell
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_cell_attribute_is_rewritten() {
        let cells = vec![r#"<th col="time">Time</th>"#.to_string()];
        let fixed = normalize_cells(cells);
        assert_eq!(fixed, vec![r#"<th data-column-type="time">Time</th>"#]);
    }

    #[test]
    fn modern_cells_pass_through() {
        let cells = vec![r#"<th data-column-type="time">Time</th>"#.to_string()];
        assert_eq!(normalize_cells(cells.clone()), cells);
    }

    #[test]
    fn byte_content_decodes_or_fails_with_asset_context() {
        assert_eq!(decode_utf8(b"hello", "t_0_0.txt").unwrap(), "hello");

        let err = decode_utf8(&[0xff, 0xfe], "t_0_0.txt").unwrap_err();
        assert!(matches!(
            err,
            ReportError::Encoding { asset_name, .. } if asset_name == "t_0_0.txt"
        ));
    }
}
