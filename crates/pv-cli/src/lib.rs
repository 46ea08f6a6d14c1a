//! # pv-cli — Promise Resource Validator CLI
//!
//! Provides the `validate` binary:
//!
//! ```bash
//! validate promise.yaml example-resource.yaml
//! validate --quiet --all-errors promise.yaml example-resource.yaml
//! validate --format json promise.yaml example-resource.yaml
//! ```
//!
//! ## Exit Codes
//!
//! - `1` for wrong usage or when either document cannot be loaded.
//! - `0` otherwise, including when the resource fails validation. A schema
//!   mismatch is a reported result, not a failure of the tool.
//!
//! Argument parsing is kept here so it can be tested without spawning the
//! binary; `main.rs` only wires up tracing and the process exit code.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use pv_schema::{validate_resource, Options, Outcome, Violation};

/// Usage line printed when the arguments are wrong.
pub const USAGE: &str = "Usage: validate <promise.yaml> <example-resource.yaml>";

/// Validate a resource YAML against the schema in a Promise YAML.
///
/// The schema is read from spec.api.spec.versions[0].schema.openAPIV3Schema
/// of the Promise. A schema without a top-level type is treated as an object
/// schema.
#[derive(Parser, Debug)]
#[command(name = "validate", version, about, long_about = None)]
pub struct Cli {
    /// Path to the Promise YAML that embeds the schema.
    pub promise: PathBuf,

    /// Path to the resource YAML to validate.
    pub resource: PathBuf,

    /// Enable verbose logging on stderr. Repeat for more (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// List every violation, not only the first.
    #[arg(long)]
    pub all_errors: bool,

    /// Do not echo the extracted schema and resource.
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// How the result is written to stdout.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Operator-facing lines.
    Text,
    /// A single JSON report object.
    Json,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            echo: !self.quiet && self.format == OutputFormat::Text,
            all_errors: self.all_errors,
        }
    }
}

/// Machine-readable report for `--format json`.
#[derive(Serialize, Debug)]
pub struct JsonReport<'a> {
    pub outcome: &'static str,
    pub message: String,
    pub violations: &'a [Violation],
}

impl<'a> JsonReport<'a> {
    pub fn new(outcome: &'a Outcome) -> Self {
        Self {
            outcome: outcome.kind(),
            message: outcome.to_string(),
            violations: outcome
                .violations()
                .map(|v| v.violations())
                .unwrap_or_default(),
        }
    }
}

/// Run one validation and write the report to `out`.
///
/// Returns the process exit code. Load failures are printed to `out` and
/// yield `1`; every reported outcome yields `0`.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<u8> {
    tracing::debug!(
        promise = %cli.promise.display(),
        resource = %cli.resource.display(),
        "validating resource against promise"
    );

    match cli.format {
        OutputFormat::Text => {
            match validate_resource(&cli.promise, &cli.resource, cli.options(), out) {
                Ok(_) => Ok(0),
                Err(e) => {
                    tracing::debug!(path = %e.path().display(), error = ?e, "document failed to load");
                    writeln!(out, "{e}").context("writing load error")?;
                    Ok(1)
                }
            }
        }
        OutputFormat::Json => {
            // The text report is discarded; the JSON object replaces it.
            let mut sink = std::io::sink();
            match validate_resource(&cli.promise, &cli.resource, cli.options(), &mut sink) {
                Ok(outcome) => {
                    let report = JsonReport::new(&outcome);
                    let json = serde_json::to_string_pretty(&report)
                        .context("serializing JSON report")?;
                    writeln!(out, "{json}").context("writing JSON report")?;
                    Ok(0)
                }
                Err(e) => {
                    writeln!(out, "{e}").context("writing load error")?;
                    Ok(1)
                }
            }
        }
    }
}
