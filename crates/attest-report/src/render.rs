//! Default HTML rendering.
//!
//! The renderer is a seam: it receives everything it needs (generation
//! date/time, tool version, stylesheet content, the data model both as a
//! struct and as JSON text, header and summary markup) and returns the final
//! document text. Rendering the same context twice yields byte-identical
//! output; nothing here reads the clock or the filesystem.

use crate::model::ReportData;
use serde_json::Value;

/// Everything the renderer may consume. Built once per render by the report
/// writer; the generation date/time is captured there, not here.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub date: &'a str,
    pub time: &'a str,
    pub version: &'a str,
    pub styles: &'a str,
    pub self_contained: bool,
    /// The full data model, serialized as JSON text.
    pub test_data: &'a str,
    pub table_head: &'a [String],
    pub prefix: &'a [String],
    pub summary: &'a [String],
    pub postfix: &'a [String],
    pub data: &'a ReportData,
}

pub trait Renderer {
    fn render(&self, ctx: &RenderContext<'_>) -> String;
}

/// The stock single-page renderer.
#[derive(Debug, Default)]
pub struct HtmlRenderer;

/// Stylesheet shipped with the report; inlined for self-contained reports,
/// written to `assets/style.css` otherwise.
pub const STYLE_CSS: &str = "\
body { font-family: Helvetica, Arial, sans-serif; font-size: 12px; margin: 0; padding: 1em; color: #999; }
h1, h2 { color: #111; }
span.passed, .passed .col-result { color: #2e7d32; }
span.failed, .failed .col-result, span.error, .error .col-result { color: #c62828; }
span.skipped, .skipped .col-result, span.xfailed, .xfailed .col-result { color: #ef6c00; }
span.rerun, .rerun .col-result, span.xpassed, .xpassed .col-result { color: #8e24aa; }
table { border-collapse: collapse; color: #111; }
#environment td, #results-table th, #results-table td { padding: 0.35em 0.75em; border: 1px solid #e6e6e6; text-align: left; }
#results-table th { background-color: #f5f5f5; }
.log { display: block; font-family: \"Courier New\", Courier, monospace; white-space: pre-wrap; max-height: 230px; overflow-y: auto; color: #111; background-color: #fafafa; padding: 0.5em; border: 1px solid #e6e6e6; }
.col-links__extra { margin-right: 0.5em; }
.summary__data { margin: 0.5em 0; }
";

impl Renderer for HtmlRenderer {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let data = ctx.data;
        let mut html = String::with_capacity(16_384);

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("  <meta charset=\"utf-8\"/>\n");
        html.push_str(&format!("  <title>{}</title>\n", escape_html(&data.title)));
        if ctx.self_contained {
            html.push_str("  <style>\n");
            html.push_str(ctx.styles);
            html.push_str("  </style>\n");
        } else {
            html.push_str("  <link rel=\"stylesheet\" href=\"assets/style.css\"/>\n");
        }
        html.push_str("</head>\n<body>\n");

        html.push_str(&format!("<h1>{}</h1>\n", escape_html(&data.title)));
        html.push_str(&format!(
            "<p>Report generated on {} at {} by <a href=\"https://github.com/attest-rs/attest\">attest-report</a> v{}</p>\n",
            ctx.date, ctx.time, ctx.version
        ));

        html.push_str("<h2>Environment</h2>\n<table id=\"environment\">\n");
        for (key, value) in &data.environment {
            html.push_str(&format!(
                "  <tr><td>{}</td><td>{}</td></tr>\n",
                escape_html(key),
                escape_html(&display_value(value))
            ));
        }
        html.push_str("</table>\n");

        html.push_str("<h2>Summary</h2>\n<div class=\"summary\">\n");
        for fragment in ctx.prefix {
            html.push_str(fragment);
            html.push('\n');
        }
        html.push_str(&format!(
            "<p class=\"summary__data\">{} tests took {}.</p>\n",
            data.collected_items, data.total_duration.formatted
        ));
        for fragment in ctx.summary {
            html.push_str(fragment);
            html.push('\n');
        }
        for fragment in ctx.postfix {
            html.push_str(fragment);
            html.push('\n');
        }
        html.push_str("</div>\n");

        html.push_str("<h2>Results</h2>\n<table id=\"results-table\">\n<thead>\n  <tr>");
        for cell in ctx.table_head {
            html.push_str(cell);
        }
        html.push_str("</tr>\n</thead>\n<tbody>\n");
        let columns = ctx.table_head.len().max(1);
        for row in &data.tests {
            html.push_str(&format!(
                "  <tr class=\"results-table-row {}\">",
                row.result.to_lowercase()
            ));
            for cell in &row.results_table_row {
                html.push_str(cell);
            }
            html.push_str("</tr>\n");
            html.push_str(&format!(
                "  <tr class=\"log-row\"><td colspan=\"{}\"><div class=\"log\">{}</div></td></tr>\n",
                columns,
                escape_log(&row.log.join("\n"))
            ));
        }
        html.push_str("</tbody>\n</table>\n");

        html.push_str("<script id=\"data-container\" type=\"application/json\">\n");
        html.push_str(&escape_json_for_script(ctx.test_data));
        html.push_str("\n</script>\n</body>\n</html>\n");
        html
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Full escape for attribute/text positions we control.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Log text follows the processor's own convention: only angle brackets are
/// escaped, so already-escaped traceback text is not double-escaped.
fn escape_log(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '<' => {
                out.push_str("&lt;");
            }
            '>' => {
                out.push_str("&gt;");
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Keep the embedded JSON from terminating its own `<script>` block.
fn escape_json_for_script(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ReportData, TestRow};

    fn context<'a>(data: &'a ReportData, test_data: &'a str) -> RenderContext<'a> {
        RenderContext {
            date: "01-Jan-2026",
            time: "12:00:00",
            version: "0.1.0",
            styles: STYLE_CSS,
            self_contained: true,
            test_data,
            table_head: &data.results_table_header,
            prefix: &data.additional_summary.prefix,
            summary: &data.additional_summary.summary,
            postfix: &data.additional_summary.postfix,
            data,
        }
    }

    fn sample_data() -> ReportData {
        let mut data = ReportData::new();
        data.title = "report.html".into();
        data.collected_items = 1;
        data.tests.push(TestRow {
            test_id: "a.py::t".into(),
            result: "Passed".into(),
            duration: "500 ms".into(),
            extras: Vec::new(),
            results_table_row: vec![
                "<td class=\"col-result\">Passed</td>".into(),
                "<td class=\"col-name\">a.py::t</td>".into(),
            ],
            log: vec!["No log output captured.".into()],
        });
        data
    }

    #[test]
    fn rendering_is_idempotent() {
        let data = sample_data();
        let json = serde_json::to_string(&data).unwrap();
        let ctx = context(&data, &json);
        let first = HtmlRenderer.render(&ctx);
        let second = HtmlRenderer.render(&ctx);
        assert_eq!(first, second);
    }

    #[test]
    fn self_contained_inlines_styles() {
        let data = sample_data();
        let json = serde_json::to_string(&data).unwrap();
        let mut ctx = context(&data, &json);
        let html = HtmlRenderer.render(&ctx);
        assert!(html.contains("<style>"));
        assert!(!html.contains("assets/style.css"));

        ctx.self_contained = false;
        let html = HtmlRenderer.render(&ctx);
        assert!(html.contains("<link rel=\"stylesheet\" href=\"assets/style.css\"/>"));
        assert!(!html.contains("<style>"));
    }

    #[test]
    fn rows_and_payload_are_embedded() {
        let data = sample_data();
        let json = serde_json::to_string(&data).unwrap();
        let ctx = context(&data, &json);
        let html = HtmlRenderer.render(&ctx);
        assert!(html.contains("<td class=\"col-result\">Passed</td>"));
        assert!(html.contains("class=\"results-table-row passed\""));
        assert!(html.contains("\"runningState\":\"NotStarted\""));
    }

    #[test]
    fn embedded_json_cannot_close_the_script_block() {
        assert_eq!(
            escape_json_for_script(r#"{"log":"</script>"}"#),
            r#"{"log":"<\/script>"}"#
        );
    }
}
