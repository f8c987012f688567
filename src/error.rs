//! Library error type.
//!
//! Most failures in krasnyy are recovered locally (a missing dictionary is
//! an empty dictionary, a missing locale is the fallback bundle), so this
//! enum mainly travels between a [`DataSource`](crate::source::DataSource)
//! and the component that decides how to recover.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no such document: {0}")]
    NotFound(String),

    #[error("invalid language code: {0:?}")]
    InvalidLanguage(String),

    /// The renderer for this export format is not available in this build.
    #[error("{0} export is not available")]
    ExportUnavailable(&'static str),

    #[error("unknown export format: {0:?}")]
    UnknownFormat(String),

    #[error("failed to write export to {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
