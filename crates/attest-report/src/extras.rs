//! Attached artifacts ("extras") and their transformation into renderable
//! references.
//!
//! Test code attaches extras while a test runs; during row construction each
//! extra is transformed exactly once: serialized (JSON), decoded (text), or
//! handed to a media sink (image/video), after which its content is either an
//! inline representation or a relative asset path. URL and raw-HTML extras
//! pass through untouched.

use lazy_static::lazy_static;
use regex::Regex;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

lazy_static! {
    static ref UNSAFE_ASSET_CHARS: Regex = Regex::new(r"[^\w.]").expect("static regex");
}

/// How an extra should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraFormat {
    Json,
    Text,
    Image,
    Video,
    Url,
    Html,
}

impl ExtraFormat {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtraFormat::Json => "json",
            ExtraFormat::Text => "text",
            ExtraFormat::Image => "image",
            ExtraFormat::Video => "video",
            ExtraFormat::Url => "url",
            ExtraFormat::Html => "html",
        }
    }

    /// Only these formats render as clickable entries in the links column.
    #[must_use]
    pub fn is_link(&self) -> bool {
        matches!(self, ExtraFormat::Json | ExtraFormat::Text | ExtraFormat::Url)
    }
}

/// Payload of an extra, before and after processing.
///
/// After processing, every sink-handled extra holds `Text` (a reference or an
/// inline data URI); `Bytes` and `Json` only occur pre-processing.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtraContent {
    Text(String),
    Bytes(Vec<u8>),
    Json(serde_json::Value),
}

impl ExtraContent {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ExtraContent::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl Serialize for ExtraContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ExtraContent::Text(s) => serializer.serialize_str(s),
            ExtraContent::Json(v) => v.serialize(serializer),
            // Unprocessed binary payloads should not reach serialization;
            // degrade to lossy text rather than fail the whole document.
            ExtraContent::Bytes(b) => serializer.serialize_str(&String::from_utf8_lossy(b)),
        }
    }
}

/// One artifact attached to a test.
#[derive(Debug, Clone, PartialEq)]
pub struct Extra {
    pub format: ExtraFormat,
    pub content: ExtraContent,
    pub name: String,
    pub mime_type: String,
    pub extension: String,
}

impl Serialize for Extra {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Extra", 5)?;
        s.serialize_field("format_type", self.format.as_str())?;
        s.serialize_field("content", &self.content)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("mime_type", &self.mime_type)?;
        s.serialize_field("extension", &self.extension)?;
        s.end()
    }
}

impl Extra {
    pub fn new(
        format: ExtraFormat,
        content: ExtraContent,
        name: impl Into<String>,
        mime_type: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            format,
            content,
            name: name.into(),
            mime_type: mime_type.into(),
            extension: extension.into(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(
            ExtraFormat::Text,
            ExtraContent::Text(content.into()),
            "Text",
            "text/plain",
            "txt",
        )
    }

    pub fn text_bytes(content: Vec<u8>) -> Self {
        Self::new(
            ExtraFormat::Text,
            ExtraContent::Bytes(content),
            "Text",
            "text/plain",
            "txt",
        )
    }

    pub fn json(content: serde_json::Value) -> Self {
        Self::new(
            ExtraFormat::Json,
            ExtraContent::Json(content),
            "JSON",
            "application/json",
            "json",
        )
    }

    pub fn url(content: impl Into<String>) -> Self {
        Self::new(
            ExtraFormat::Url,
            ExtraContent::Text(content.into()),
            "URL",
            "text/html",
            "html",
        )
    }

    pub fn html(content: impl Into<String>) -> Self {
        Self::new(
            ExtraFormat::Html,
            ExtraContent::Text(content.into()),
            "HTML",
            "text/html",
            "html",
        )
    }

    /// Image from already-base64-encoded content.
    pub fn png(content: impl Into<String>) -> Self {
        Self::new(
            ExtraFormat::Image,
            ExtraContent::Text(content.into()),
            "Image",
            "image/png",
            "png",
        )
    }

    /// Image from raw bytes.
    pub fn png_bytes(content: Vec<u8>) -> Self {
        Self::new(
            ExtraFormat::Image,
            ExtraContent::Bytes(content),
            "Image",
            "image/png",
            "png",
        )
    }

    pub fn jpg(content: impl Into<String>) -> Self {
        Self::new(
            ExtraFormat::Image,
            ExtraContent::Text(content.into()),
            "Image",
            "image/jpeg",
            "jpg",
        )
    }

    pub fn svg(content: impl Into<String>) -> Self {
        Self::new(
            ExtraFormat::Image,
            ExtraContent::Text(content.into()),
            "Image",
            "image/svg+xml",
            "svg",
        )
    }

    pub fn mp4(content: impl Into<String>) -> Self {
        Self::new(
            ExtraFormat::Video,
            ExtraContent::Text(content.into()),
            "Video",
            "video/mp4",
            "mp4",
        )
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Deterministic, collision-resistant-ish asset filename for one extra.
///
/// The test id is sanitized (anything outside word chars and dots becomes
/// `_`), joined with the extra index, the rerun-aware test index and the
/// extension, and truncated from the left so only the trailing `max_len`
/// characters survive. Distinct ids that truncate to the same suffix will
/// collide; that boundary condition is accepted and not detected.
#[must_use]
pub fn asset_filename(
    test_id: &str,
    extra_index: usize,
    test_index: u32,
    extension: &str,
    max_len: usize,
) -> String {
    let sanitized = UNSAFE_ASSET_CHARS.replace_all(test_id, "_");
    let full = format!("{}_{}_{}.{}", sanitized, extra_index, test_index, extension);
    let count = full.chars().count();
    if count > max_len {
        full.chars().skip(count - max_len).collect()
    } else {
        full
    }
}

/// Render the links column for one row from its link-typed extras.
#[must_use]
pub fn process_links(extras: &[Extra]) -> String {
    let mut out = String::new();
    for extra in extras.iter().filter(|e| e.format.is_link()) {
        let href = extra.content.as_text().unwrap_or_default();
        out.push_str(&format!(
            "<a target=\"_blank\" href=\"{}\" class=\"col-links__extra {}\">{}</a>",
            href,
            extra.format.as_str(),
            extra.name
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_filename_sanitizes_and_appends_indices() {
        let name = asset_filename("tests/test_x.py::test_y[a/b]", 0, 0, "png", 255);
        assert_eq!(name, "tests_test_x.py__test_y_a_b__0_0.png");
        assert!(name.ends_with("_0_0.png"));
    }

    #[test]
    fn asset_filename_keeps_trailing_characters_on_overflow() {
        let name = asset_filename("tests/test_x.py::test_y", 3, 1, "json", 12);
        assert_eq!(name.chars().count(), 12);
        assert!(name.ends_with("_3_1.json"));
    }

    #[test]
    fn links_render_only_for_link_formats() {
        let extras = vec![
            Extra::text("assets/a.txt"),
            Extra::png("iVBORw0KGgo="),
            Extra::url("https://example.com").with_name("Example"),
        ];
        let links = process_links(&extras);
        assert!(links.contains("href=\"assets/a.txt\""));
        assert!(links.contains("class=\"col-links__extra text\""));
        assert!(links.contains(">Example</a>"));
        assert!(!links.contains("col-links__extra image"));
    }

    #[test]
    fn extra_serializes_with_wire_field_names() {
        let extra = Extra::json(serde_json::json!({"k": 1}));
        let v = serde_json::to_value(&extra).unwrap();
        assert_eq!(v["format_type"], "json");
        assert_eq!(v["mime_type"], "application/json");
        assert_eq!(v["content"]["k"], 1);
    }
}
