use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the report pipeline.
///
/// Configuration and filesystem problems are fatal; everything else in the
/// pipeline is warn-and-continue and never reaches this type.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid redaction pattern {pattern:?}: {source}")]
    InvalidRedactPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("extra content for {asset_name:?} is not valid UTF-8")]
    Encoding {
        asset_name: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("media content for {asset_name:?} is not valid base64")]
    MediaDecode {
        asset_name: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("failed to write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report data")]
    Json(#[from] serde_json::Error),
}

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
