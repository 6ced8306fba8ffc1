// crates/estat-core/src/error.rs

//! Error taxonomy for fetching and reshaping e-Stat documents.
//!
//! Every failure is surfaced to the caller as an [`EStatError`] carrying the
//! original cause. [`EStatError::kind`] folds the detailed variants into the
//! coarse categories callers usually branch on.

use std::string::FromUtf8Error;
use thiserror::Error;

/// Coarse classification of an [`EStatError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection, DNS, timeout or non-2xx HTTP status.
    Network,
    /// The body was not a gzip stream or did not decode as UTF-8.
    Decode,
    /// Invalid JSON, or JSON missing a path the table/name builders need.
    Parse,
    /// The caller supplied something unusable before any request was made.
    Input,
}

#[derive(Debug, Error)]
pub enum EStatError {
    /// Transport failure from the HTTP client (connect, DNS, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("gzip decode failed: {0}")]
    Gzip(#[source] std::io::Error),

    #[error("response body is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),

    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document has no `{0}`")]
    MissingPath(String),

    #[error("unexpected shape at `{path}`: {reason}")]
    InvalidShape { path: String, reason: String },

    #[error("invalid URL template `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("no application id given (pass one explicitly or set it in Config)")]
    MissingAppId,

    #[error("tables share no column to merge on")]
    NoSharedColumns,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EStatError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(_) | Self::Status { .. } => ErrorKind::Network,
            Self::Gzip(_) | Self::Utf8(_) => ErrorKind::Decode,
            Self::Json(_) | Self::MissingPath(_) | Self::InvalidShape { .. } => ErrorKind::Parse,
            Self::InvalidUrl { .. } | Self::MissingAppId | Self::NoSharedColumns | Self::Io(_) => {
                ErrorKind::Input
            }
        }
    }

    pub(crate) fn invalid_url(url: &str, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(feature = "fetch")]
impl From<reqwest::Error> for EStatError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, EStatError>;
