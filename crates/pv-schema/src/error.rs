//! # Error Types
//!
//! Every failure the pipeline can hit is one variant of a closed enum.
//! There are two severity tiers:
//!
//! - [`LoadError`] is fatal. The document could not be read or parsed at
//!   all, and the binary exits nonzero after printing it.
//! - [`ExtractError`], [`ConvertError`] and [`ValidateError`] are
//!   recoverable. They are folded into an [`Outcome`](crate::Outcome),
//!   printed, and the run ends normally.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while reading or parsing a document from disk.
///
/// The `Display` text of each variant is the exact line printed to the
/// operator before the process exits.
#[derive(Error, Debug)]
pub enum LoadError {
    /// No file exists at the given path.
    #[error("Error: File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The file was read but is not valid YAML.
    #[error("YAML Parsing Error: {source}")]
    YamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Any other I/O failure (permissions, path is a directory, ...).
    #[error("OS Error: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backstop for failures outside the categories above.
    #[error("Unexpected Error in load_yaml: {detail}")]
    Unexpected { path: PathBuf, detail: String },
}

impl LoadError {
    /// Path of the document that failed to load.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::FileNotFound { path }
            | Self::YamlParse { path, .. }
            | Self::Io { path, .. }
            | Self::Unexpected { path, .. } => path,
        }
    }
}

/// A segment of the promise schema path was absent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// `key` is already rendered: quoted for mapping keys, bare for indices.
    #[error("Missing key {key} in the Promise YAML.")]
    MissingKey { key: String },
}

/// A parsed YAML value has no JSON equivalent.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// Mapping key that is neither a string, number nor bool.
    #[error("unsupported YAML map key type: {key}")]
    UnsupportedKey { key: String },

    /// NaN and the infinities cannot be written as JSON numbers.
    #[error("cannot represent float {value} in JSON")]
    NonFiniteFloat { value: f64 },

    /// Number that fits none of i64, u64 or f64.
    #[error("unsupported YAML number: {number}")]
    UnsupportedNumber { number: String },
}

/// Failure preparing the schema for validation.
#[derive(Error, Debug)]
pub enum ValidateError {
    /// The extracted schema is not a valid JSON Schema.
    #[error("schema compile error: {reason}")]
    SchemaCompile { reason: String },
}
