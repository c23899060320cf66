//! Document formatter: turns one API description file into the envelope the
//! discovery service ingests.
//!
//! The envelope records where the document came from:
//!
//! ```json
//! {"api": {...}, "original_format": "yaml",
//!  "data_source": {"source": "github.com/acme/apis", "collector_type": "github"}}
//! ```

use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::archive::ArchiveBuilder;
use crate::error::Error;

/// Collector tag recorded on every document and data source this tool creates.
pub const COLLECTOR_TYPE: &str = "github";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginalFormat {
    Json,
    Yaml,
}

impl OriginalFormat {
    /// `.json` maps to JSON, `.yaml`/`.yml` to YAML; anything else is unsupported.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Some(OriginalFormat::Json),
            Some("yaml") | Some("yml") => Some(OriginalFormat::Yaml),
            _ => None,
        }
    }

    /// Content type announced when the document is sent on its own.
    pub fn content_type(&self) -> &'static str {
        match self {
            OriginalFormat::Json => "application/json",
            OriginalFormat::Yaml => "application/yaml",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSourceRef {
    pub source: String,
    pub collector_type: &'static str,
}

/// A parsed API description wrapped with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiDocument {
    pub api: Value,
    pub original_format: OriginalFormat,
    pub data_source: DataSourceRef,
}

impl ApiDocument {
    /// Reads and parses the file at `path`.
    pub fn load(path: &Path, data_source: &str) -> Result<Self, Error> {
        let original_format =
            OriginalFormat::from_path(path).ok_or_else(|| Error::UnsupportedFormat {
                path: path.to_path_buf(),
            })?;

        let content = std::fs::read_to_string(path).map_err(|e| {
            error!(error = ?e, path = %path.display(), "Failed to read API document");
            Error::io(path, e)
        })?;

        let api = match original_format {
            OriginalFormat::Json => {
                serde_json::from_str(&content).map_err(|source| Error::Json {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            OriginalFormat::Yaml => {
                serde_yaml::from_str(&content).map_err(|source| Error::Yaml {
                    path: path.to_path_buf(),
                    source,
                })?
            }
        };

        Ok(ApiDocument {
            api,
            original_format,
            data_source: DataSourceRef {
                source: data_source.to_string(),
                collector_type: COLLECTOR_TYPE,
            },
        })
    }

    pub fn to_body(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(Error::Serialize)
    }
}

/// Wire body for a single-object submission.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedDocument {
    pub body: String,
    pub content_type: &'static str,
}

/// Formats the document at `path`.
///
/// Without a bundle the body and content type are returned for direct
/// submission. With a bundle the body is added to it under the file's base
/// name and `None` is returned.
pub fn format_document(
    path: &Path,
    data_source: &str,
    bundle: Option<&mut ArchiveBuilder>,
) -> Result<Option<FormattedDocument>, Error> {
    let document = ApiDocument::load(path, data_source)?;
    let body = document.to_body()?;
    debug!(
        path = %path.display(),
        format = ?document.original_format,
        size = body.len(),
        "Formatted API document"
    );

    match bundle {
        Some(archive) => {
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            archive.add(name, body);
            Ok(None)
        }
        None => Ok(Some(FormattedDocument {
            body,
            content_type: document.original_format.content_type(),
        })),
    }
}
