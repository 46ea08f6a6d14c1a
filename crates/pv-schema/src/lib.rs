//! # pv-schema — Promise Resource Validation
//!
//! Validates a resource document against the OpenAPI v3 schema embedded in
//! a Promise document at `spec.api.spec.versions[0].schema.openAPIV3Schema`.
//!
//! The pipeline is strictly linear:
//!
//! 1. [`loader`] reads and parses both YAML documents.
//! 2. [`convert`] turns them into JSON values.
//! 3. [`promise`] extracts the schema and defaults `type` to `object`.
//! 4. [`validate`] compiles the schema and checks the resource.
//! 5. [`report`] folds the result into an [`Outcome`] and prints it.
//!
//! ## Failure Tiers
//!
//! - Load failures ([`LoadError`]) are fatal. They are returned to the
//!   caller, which prints them and exits nonzero.
//! - Missing schema keys, schema violations, conversion failures and
//!   unexpected errors are reported outcomes. The run still succeeds.

pub mod convert;
pub mod error;
pub mod loader;
pub mod promise;
pub mod report;
pub mod validate;

pub use error::{ConvertError, ExtractError, LoadError, ValidateError};
pub use loader::load_document;
pub use promise::{extract_schema, with_default_type, Segment, SCHEMA_PATH};
pub use report::{validate_resource, Options, Outcome};
pub use validate::{ResourceValidator, ValidationViolations, Violation};
