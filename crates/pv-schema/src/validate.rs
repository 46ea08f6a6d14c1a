//! # Resource Validation
//!
//! Compiles the extracted schema with the `jsonschema` crate (Draft
//! 2020-12) and checks a resource document against it.
//!
//! Every violation is collected. The primary violation, the one that ends
//! up on the outcome line, is the one closest to the document root. Among
//! equally deep violations, `anyOf`/`oneOf` failures rank below the rest
//! and evaluation order breaks remaining ties.
//!
//! ## Messages
//!
//! Promise authors are used to the wording of the reference JSON-Schema
//! tooling, where values are quoted with single quotes:
//!
//! ```text
//! 'thirty' is not of type 'integer'
//! 'age' is a required property
//! ```
//!
//! [`render_message`] produces that wording for the common keywords and
//! falls back to the crate's own message for everything else.

use std::fmt;

use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::{ValidationError, Validator};
use serde::Serialize;
use serde_json::Value;

use crate::error::ValidateError;

/// A single validation violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// JSON Pointer to the violating value in the resource.
    pub instance_path: String,
    /// JSON Pointer to the schema keyword that rejected it.
    pub schema_path: String,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    /// Number of segments in the instance path; `0` at the root.
    pub fn depth(&self) -> usize {
        self.instance_path.matches('/').count()
    }

    /// Failures of `anyOf`/`oneOf` only say that no branch matched.
    fn is_weak(&self) -> bool {
        matches!(
            self.schema_path.rsplit('/').next(),
            Some("anyOf") | Some("oneOf")
        )
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// Non-empty collection of violations for one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
    primary: usize,
}

impl ValidationViolations {
    /// Returns `None` for an empty list.
    pub fn new(violations: Vec<Violation>) -> Option<Self> {
        if violations.is_empty() {
            None
        } else {
            let primary = violations
                .iter()
                .enumerate()
                .min_by_key(|(_, v)| (v.depth(), v.is_weak()))
                .map_or(0, |(i, _)| i);
            Some(Self {
                violations,
                primary,
            })
        }
    }

    /// The violation reported on the outcome line.
    pub fn primary(&self) -> &Violation {
        &self.violations[self.primary]
    }

    /// Every violation except the primary one, in evaluation order.
    pub fn secondary(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != self.primary)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {v}")?;
        }
        Ok(())
    }
}

/// A compiled schema ready to check resources.
pub struct ResourceValidator {
    validator: Validator,
    schema: Value,
}

impl fmt::Debug for ResourceValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceValidator").finish_non_exhaustive()
    }
}

impl ResourceValidator {
    /// Compile `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidateError::SchemaCompile`] if `schema` is not a valid
    /// JSON Schema (for example `type: 42`).
    pub fn new(schema: &Value) -> Result<Self, ValidateError> {
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);
        let validator = opts
            .build(schema)
            .map_err(|e| ValidateError::SchemaCompile {
                reason: e.to_string(),
            })?;
        Ok(Self {
            validator,
            schema: schema.clone(),
        })
    }

    /// Check `resource` against the compiled schema.
    ///
    /// # Errors
    ///
    /// Returns every violation found, in evaluation order.
    pub fn validate(&self, resource: &Value) -> Result<(), ValidationViolations> {
        let violations: Vec<Violation> = self
            .validator
            .iter_errors(resource)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: render_message(&e, &self.schema),
            })
            .collect();

        match ValidationViolations::new(violations) {
            None => Ok(()),
            Some(violations) => Err(violations),
        }
    }
}

/// Render a violation in single-quoted JSON-Schema wording.
///
/// `schema` is the schema the error was produced against. It supplies the
/// declared order of a multi-type `type` keyword.
pub fn render_message(error: &ValidationError<'_>, schema: &Value) -> String {
    let instance = py_repr(&error.instance);
    match &error.kind {
        ValidationErrorKind::Type {
            kind: TypeKind::Single(ty),
        } => format!("{instance} is not of type '{ty}'"),
        ValidationErrorKind::Type {
            kind: TypeKind::Multiple(_),
        } => match declared_types(schema, &error.schema_path.to_string()) {
            Some(types) => format!("{instance} is not of type {}", types.join(", ")),
            None => error.to_string(),
        },
        ValidationErrorKind::Required { property } => {
            format!("{} is a required property", py_repr(property))
        }
        ValidationErrorKind::Enum { options } => {
            format!("{instance} is not one of {}", py_repr(options))
        }
        ValidationErrorKind::Constant { expected_value } => {
            format!("{} was expected", py_repr(expected_value))
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            let extras: Vec<String> = unexpected.iter().map(|p| quote(p)).collect();
            let verb = if unexpected.len() == 1 { "was" } else { "were" };
            format!(
                "Additional properties are not allowed ({} {verb} unexpected)",
                extras.join(", ")
            )
        }
        _ => error.to_string(),
    }
}

/// Quoted type names of the `type` keyword at `pointer`, as listed.
fn declared_types(schema: &Value, pointer: &str) -> Option<Vec<String>> {
    let types = schema.pointer(pointer)?.as_array()?;
    types
        .iter()
        .map(|t| t.as_str().map(quote))
        .collect()
}

/// Literal notation for a JSON value with single-quoted strings, `True`,
/// `False` and `None`.
pub fn py_repr(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(py_repr).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Object(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", quote(k), py_repr(v)))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
    }
}

/// Single quotes unless the text contains a single quote and no double
/// quote.
fn quote(s: &str) -> String {
    let delim = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(delim);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delim => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delim);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person_schema() -> Value {
        json!({
            "type": "object",
            "required": ["age"],
            "properties": {
                "name": { "type": "string" },
                "age": { "type": "integer" }
            }
        })
    }

    #[test]
    fn valid_resource_passes() {
        let validator = ResourceValidator::new(&person_schema()).unwrap();
        validator
            .validate(&json!({ "name": "John Doe", "age": 30 }))
            .unwrap();
    }

    #[test]
    fn type_mismatch_message() {
        let validator = ResourceValidator::new(&person_schema()).unwrap();
        let violations = validator
            .validate(&json!({ "name": "John Doe", "age": "thirty" }))
            .unwrap_err();
        assert_eq!(violations.len(), 1);
        let primary = violations.primary();
        assert_eq!(primary.message, "'thirty' is not of type 'integer'");
        assert_eq!(primary.instance_path, "/age");
    }

    #[test]
    fn required_property_message() {
        let validator = ResourceValidator::new(&person_schema()).unwrap();
        let violations = validator
            .validate(&json!({ "name": "John Doe" }))
            .unwrap_err();
        assert_eq!(violations.primary().message, "'age' is a required property");
        assert_eq!(violations.primary().to_string(), "(root): 'age' is a required property");
    }

    #[test]
    fn all_violations_collected() {
        let validator = ResourceValidator::new(&person_schema()).unwrap();
        let violations = validator.validate(&json!({ "name": 7 })).unwrap_err();
        assert_eq!(violations.len(), 2);
        let messages: Vec<&str> = violations
            .violations()
            .iter()
            .map(|v| v.message.as_str())
            .collect();
        assert!(messages.contains(&"'age' is a required property"));
        assert!(messages.contains(&"7 is not of type 'string'"));
    }

    #[test]
    fn root_violation_is_primary_regardless_of_keyword_order() {
        let schema = json!({
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "age": { "type": "integer" }
            },
            "required": ["age"]
        });
        let validator = ResourceValidator::new(&schema).unwrap();
        let violations = validator.validate(&json!({ "name": 7 })).unwrap_err();
        assert_eq!(violations.primary().message, "'age' is a required property");
        let rest: Vec<&str> = violations.secondary().map(|v| v.message.as_str()).collect();
        assert_eq!(rest, ["7 is not of type 'string'"]);
    }

    #[test]
    fn equal_depth_keeps_evaluation_order() {
        let first = Violation {
            instance_path: "/a".to_string(),
            schema_path: "/properties/a/type".to_string(),
            message: "first".to_string(),
        };
        let second = Violation {
            instance_path: "/b".to_string(),
            schema_path: "/properties/b/type".to_string(),
            message: "second".to_string(),
        };
        let violations = ValidationViolations::new(vec![first, second]).unwrap();
        assert_eq!(violations.primary().message, "first");
    }

    #[test]
    fn any_of_ranks_below_equally_deep_violation() {
        let weak = Violation {
            instance_path: "/a".to_string(),
            schema_path: "/properties/a/anyOf".to_string(),
            message: "weak".to_string(),
        };
        let strong = Violation {
            instance_path: "/b".to_string(),
            schema_path: "/properties/b/type".to_string(),
            message: "strong".to_string(),
        };
        let violations = ValidationViolations::new(vec![weak, strong]).unwrap();
        assert_eq!(violations.primary().message, "strong");
    }

    #[test]
    fn multiple_types_listed_in_declared_order() {
        let schema = json!({
            "type": "object",
            "properties": { "id": { "type": ["string", "integer"] } }
        });
        let validator = ResourceValidator::new(&schema).unwrap();
        let violations = validator.validate(&json!({ "id": [1] })).unwrap_err();
        assert_eq!(
            violations.primary().message,
            "[1] is not of type 'string', 'integer'"
        );
    }

    #[test]
    fn enum_message() {
        let schema = json!({ "type": "string", "enum": ["small", "large"] });
        let validator = ResourceValidator::new(&schema).unwrap();
        let violations = validator.validate(&json!("medium")).unwrap_err();
        assert_eq!(
            violations.primary().message,
            "'medium' is not one of ['small', 'large']"
        );
    }

    #[test]
    fn additional_properties_message() {
        let schema = json!({
            "type": "object",
            "properties": { "name": { "type": "string" } },
            "additionalProperties": false
        });
        let validator = ResourceValidator::new(&schema).unwrap();
        let violations = validator
            .validate(&json!({ "name": "x", "extra": 1 }))
            .unwrap_err();
        assert_eq!(
            violations.primary().message,
            "Additional properties are not allowed ('extra' was unexpected)"
        );
    }

    #[test]
    fn other_keywords_use_library_message() {
        let schema = json!({ "type": "integer", "minimum": 10 });
        let validator = ResourceValidator::new(&schema).unwrap();
        let violations = validator.validate(&json!(3)).unwrap_err();
        assert!(violations.primary().message.contains("10"));
    }

    #[test]
    fn invalid_schema_fails_to_compile() {
        let err = ResourceValidator::new(&json!({ "type": 42 })).unwrap_err();
        assert!(matches!(err, ValidateError::SchemaCompile { .. }));
    }

    #[test]
    fn repr_of_values() {
        assert_eq!(py_repr(&json!(null)), "None");
        assert_eq!(py_repr(&json!(true)), "True");
        assert_eq!(py_repr(&json!(false)), "False");
        assert_eq!(py_repr(&json!(30)), "30");
        assert_eq!(py_repr(&json!("it's")), "\"it's\"");
        assert_eq!(py_repr(&json!("say \"hi\"")), "'say \"hi\"'");
        assert_eq!(py_repr(&json!({ "a": [1, "b"] })), "{'a': [1, 'b']}");
    }

    #[test]
    fn empty_violation_list_is_none() {
        assert!(ValidationViolations::new(Vec::new()).is_none());
    }
}
