//! # Document Loader
//!
//! Reads a YAML document from disk and classifies every failure into a
//! [`LoadError`] variant. The file is read in full and closed before
//! parsing starts.
//!
//! Parsing stops at `serde_yaml::Value`. Conversion to JSON happens later
//! (see [`crate::convert`]) so that a document which parses but has no
//! JSON equivalent is reported as a recoverable outcome, not a load failure.

use std::io::ErrorKind;
use std::path::Path;

use crate::error::LoadError;

/// Load and parse the YAML document at `path`.
///
/// An empty file yields `serde_yaml::Value::Null`.
///
/// # Errors
///
/// - [`LoadError::FileNotFound`] if nothing exists at `path`.
/// - [`LoadError::Unexpected`] if the file is not valid UTF-8.
/// - [`LoadError::Io`] for any other read failure.
/// - [`LoadError::YamlParse`] if the contents are not valid YAML.
pub fn load_document(path: &Path) -> Result<serde_yaml::Value, LoadError> {
    tracing::debug!(path = %path.display(), "loading document");

    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoadError::FileNotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::InvalidData => LoadError::Unexpected {
            path: path.to_path_buf(),
            detail: format!("{} is not valid UTF-8 text: {e}", path.display()),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    parse_document(&content).map_err(|source| LoadError::YamlParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse YAML text that is already in memory.
pub fn parse_document(content: &str) -> Result<serde_yaml::Value, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(serde_yaml::Value::Null);
    }
    serde_yaml::from_str(content)
}
