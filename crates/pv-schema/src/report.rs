//! # Validation Pipeline and Outcome
//!
//! [`validate_resource`] runs load → extract → default → validate for one
//! Promise/resource pair and writes the operator-facing report.
//!
//! Load failures are returned as `Err` and are fatal to the caller.
//! Everything after the documents are on disk is folded into a single
//! [`Outcome`], printed as exactly one outcome line, and returned.

use std::fmt;
use std::io::Write;
use std::path::Path;

use serde_json::Value;

use crate::convert::yaml_to_json;
use crate::error::{ExtractError, LoadError};
use crate::loader::load_document;
use crate::promise::{extract_schema, with_default_type};
use crate::validate::{ResourceValidator, ValidationViolations};

/// Reporting switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Print the extracted schema and resource before validating.
    pub echo: bool,
    /// List every violation after the outcome line, not just the first.
    pub all_errors: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            echo: true,
            all_errors: false,
        }
    }
}

/// Result of one validation run.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The resource satisfies the schema.
    Valid,
    /// The resource violates the schema.
    Invalid { violations: ValidationViolations },
    /// The Promise has no schema at the expected path. `key` is the
    /// rendered segment, e.g. `'spec'`.
    MissingKey { key: String },
    /// A document parsed as YAML but could not be turned into JSON.
    ParseError { detail: String },
    /// Anything else. Full detail is logged, not only printed.
    Unexpected { detail: String },
}

impl Outcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Stable machine-readable name of the outcome category.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid { .. } => "invalid",
            Self::MissingKey { .. } => "missing_key",
            Self::ParseError { .. } => "parse_error",
            Self::Unexpected { .. } => "unexpected",
        }
    }

    /// Violations of an `Invalid` outcome.
    pub fn violations(&self) -> Option<&ValidationViolations> {
        match self {
            Self::Invalid { violations } => Some(violations),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => write!(
                f,
                "✅ Validation successful: The resource is valid according to the Promise schema."
            ),
            Self::Invalid { violations } => {
                write!(f, "❌ Validation failed: {}", violations.primary().message)
            }
            Self::MissingKey { key } => {
                write!(f, "⚠️ Error: Missing key {key} in the Promise YAML.")
            }
            Self::ParseError { detail } => write!(f, "⚠️ YAML Parsing Error: {detail}"),
            Self::Unexpected { detail } => write!(f, "⚠️ Unexpected Error: {detail}"),
        }
    }
}

/// Validate the resource at `resource_path` against the schema embedded in
/// the Promise at `promise_path`, writing the report to `out`.
///
/// # Errors
///
/// Returns the [`LoadError`] of the first document that cannot be read or
/// parsed. Nothing is written to `out` in that case; printing it is the
/// caller's job.
pub fn validate_resource<W: Write>(
    promise_path: &Path,
    resource_path: &Path,
    options: Options,
    out: &mut W,
) -> Result<Outcome, LoadError> {
    let outcome = evaluate(promise_path, resource_path, options, out)?;

    match &outcome {
        Outcome::Valid => tracing::info!(outcome = outcome.kind(), "resource is valid"),
        Outcome::Unexpected { .. } => {}
        other => tracing::info!(outcome = other.kind(), "resource did not validate"),
    }

    if let Err(e) = write_outcome(out, &outcome, options) {
        // Reporting itself failed; there is nowhere left to print to.
        tracing::error!(error = %e, "failed to write validation outcome");
        return Ok(Outcome::Unexpected {
            detail: e.to_string(),
        });
    }
    Ok(outcome)
}

fn evaluate<W: Write>(
    promise_path: &Path,
    resource_path: &Path,
    options: Options,
    out: &mut W,
) -> Result<Outcome, LoadError> {
    let promise = match yaml_to_json(&load_document(promise_path)?) {
        Ok(v) => v,
        Err(e) => {
            return Ok(Outcome::ParseError {
                detail: format!("{}: {e}", promise_path.display()),
            })
        }
    };

    let schema = match extract_schema(&promise) {
        Ok(s) => with_default_type(&s),
        Err(ExtractError::MissingKey { key }) => return Ok(Outcome::MissingKey { key }),
    };
    tracing::debug!(promise = %promise_path.display(), "extracted promise schema");

    let resource = match yaml_to_json(&load_document(resource_path)?) {
        Ok(v) => v,
        Err(e) => {
            return Ok(Outcome::ParseError {
                detail: format!("{}: {e}", resource_path.display()),
            })
        }
    };

    if options.echo {
        if let Err(e) = echo(out, &schema, &resource) {
            return Ok(unexpected("failed to write diagnostic output", &e));
        }
    }

    let validator = match ResourceValidator::new(&schema) {
        Ok(v) => v,
        Err(e) => return Ok(unexpected("invalid schema in Promise", &e)),
    };

    Ok(match validator.validate(&resource) {
        Ok(()) => Outcome::Valid,
        Err(violations) => Outcome::Invalid { violations },
    })
}

fn unexpected(context: &str, error: &dyn std::error::Error) -> Outcome {
    tracing::error!(error = ?error, "{context}");
    Outcome::Unexpected {
        detail: error.to_string(),
    }
}

fn echo<W: Write>(out: &mut W, schema: &Value, resource: &Value) -> std::io::Result<()> {
    writeln!(out, "Extracted Schema:")?;
    writeln!(out, "{}", pretty(schema)?)?;
    writeln!(out, "Resource Data:")?;
    writeln!(out, "{}", pretty(resource)?)?;
    Ok(())
}

fn pretty(value: &Value) -> std::io::Result<String> {
    serde_json::to_string_pretty(value).map_err(std::io::Error::from)
}

fn write_outcome<W: Write>(out: &mut W, outcome: &Outcome, options: Options) -> std::io::Result<()> {
    writeln!(out, "{outcome}")?;
    if options.all_errors {
        if let Some(violations) = outcome.violations() {
            for v in violations.secondary() {
                writeln!(out, "   - {v}")?;
            }
        }
    }
    out.flush()
}
