//! Error type shared by the library modules.
//!
//! Fatal conditions (unreadable files, malformed documents, a failed token
//! exchange) surface as [`Error`]. Submission failures do not: they are
//! reported as a [`crate::result::SubmissionResult`] instead.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed transport failure, as returned by [`crate::contract::Transport`].
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to serialize API document: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("unsupported format for {path}: expected a .json, .yaml or .yml file")]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to build archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("token exchange failed: {0}")]
    Auth(String),

    #[error("transport error: {0}")]
    Transport(TransportError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_error_names_the_operation_not_an_empty_path() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let message = Error::Serialize(source).to_string();
        assert!(message.starts_with("failed to serialize API document: "), "{message}");
        assert!(!message.contains(" in :"));
    }
}
