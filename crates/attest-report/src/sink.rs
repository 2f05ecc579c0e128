//! Asset sinks: where processed extra content ends up.
//!
//! The extras processor hands every JSON/text payload to [`AssetSink::data_content`]
//! and every image/video payload to [`AssetSink::media_content`]; the sink
//! returns the string that replaces the extra's content. A self-contained
//! report inlines everything as data URIs; a file-backed report writes
//! sibling files under `assets/` and returns relative paths.

use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tracing::debug;

use crate::error::{ReportError, Result};
use crate::extras::ExtraContent;

pub trait AssetSink {
    /// Store or inline a UTF-8 text payload; returns the renderable reference.
    fn data_content(&self, content: &str, asset_name: &str, mime_type: &str) -> Result<String>;

    /// Store or inline a binary/base64 media payload.
    fn media_content(
        &self,
        content: &ExtraContent,
        asset_name: &str,
        mime_type: &str,
    ) -> Result<String>;
}

/// Inlines every asset into the document itself.
#[derive(Debug, Default)]
pub struct SelfContainedSink;

impl AssetSink for SelfContainedSink {
    fn data_content(&self, content: &str, _asset_name: &str, mime_type: &str) -> Result<String> {
        Ok(data_uri(mime_type, &BASE64.encode(content.as_bytes())))
    }

    fn media_content(
        &self,
        content: &ExtraContent,
        _asset_name: &str,
        mime_type: &str,
    ) -> Result<String> {
        let encoded = match content {
            // Media text content is base64 by convention; inline as-is.
            ExtraContent::Text(b64) => b64.clone(),
            ExtraContent::Bytes(raw) => BASE64.encode(raw),
            ExtraContent::Json(v) => BASE64.encode(v.to_string().as_bytes()),
        };
        Ok(data_uri(mime_type, &encoded))
    }
}

fn data_uri(mime_type: &str, base64_payload: &str) -> String {
    format!("data:{};base64,{}", mime_type, base64_payload)
}

/// Writes assets next to the report and returns report-relative paths.
#[derive(Debug)]
pub struct FileSink {
    assets_dir: PathBuf,
}

impl FileSink {
    pub fn new(assets_dir: PathBuf) -> Self {
        Self { assets_dir }
    }

    fn write(&self, asset_name: &str, bytes: &[u8]) -> Result<String> {
        std::fs::create_dir_all(&self.assets_dir)
            .map_err(|e| ReportError::io(&self.assets_dir, e))?;
        let path = self.assets_dir.join(asset_name);
        std::fs::write(&path, bytes).map_err(|e| ReportError::io(&path, e))?;
        debug!(asset = asset_name, "wrote report asset");
        Ok(format!("assets/{}", asset_name))
    }
}

impl AssetSink for FileSink {
    fn data_content(&self, content: &str, asset_name: &str, _mime_type: &str) -> Result<String> {
        self.write(asset_name, content.as_bytes())
    }

    fn media_content(
        &self,
        content: &ExtraContent,
        asset_name: &str,
        _mime_type: &str,
    ) -> Result<String> {
        match content {
            ExtraContent::Text(b64) => {
                let raw = BASE64
                    .decode(b64.as_bytes())
                    .map_err(|source| ReportError::MediaDecode {
                        asset_name: asset_name.to_string(),
                        source,
                    })?;
                self.write(asset_name, &raw)
            }
            ExtraContent::Bytes(raw) => self.write(asset_name, raw),
            ExtraContent::Json(v) => self.write(asset_name, v.to_string().as_bytes()),
        }
    }
}
