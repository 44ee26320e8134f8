//! Validation of user-authored page-template packages.
//!
//! A template package is validated against a JSON Schema before it is bundled
//! into a snapshot-bound resource. Schema violations are a normal content
//! failure the author can fix; anything else (unreadable package, broken
//! schema) is unexpected and gets flagged for reporting upstream.

use std::fmt;
use std::path::Path;

use jsonschema::{Draft, JSONSchema};
use serde_json::{Value, json};

const CONTACT_VENDOR_SUFFIX: &str = "\nThis is probably a problem with orgsnap itself, please \
                                     report this issue at https://github.com/orgsnap/orgsnap/issues";

/// One schema violation: where in the package, and what was wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Dotted path into the template package, with the root-instance marker
    /// stripped. Empty for violations of the package root itself.
    pub path: String,
    pub reason: String,
}

impl SchemaViolation {
    fn pretty(&self) -> String {
        if self.path.is_empty() {
            format!(" - {}", self.reason)
        } else {
            format!(" - {}: {}", self.path, self.reason)
        }
    }
}

/// Outcome of failing to validate a template package.
///
/// `Invalid` always carries at least one violation. `Unknown` covers every
/// failure not produced by instance validation itself and is the only variant
/// asking the user to contact the vendor.
#[derive(Debug)]
pub enum TemplateValidationError {
    Invalid { violations: Vec<SchemaViolation> },
    Unknown { detail: String },
}

impl TemplateValidationError {
    pub fn contact_vendor(&self) -> bool {
        matches!(self, TemplateValidationError::Unknown { .. })
    }

    pub fn violations(&self) -> &[SchemaViolation] {
        match self {
            TemplateValidationError::Invalid { violations } => violations,
            TemplateValidationError::Unknown { .. } => &[],
        }
    }

    fn message_body(&self) -> String {
        match self {
            TemplateValidationError::Invalid { violations } => {
                let mut body = String::from("The template package is invalid:");
                for violation in violations {
                    body.push('\n');
                    body.push_str(&violation.pretty());
                }
                body
            }
            TemplateValidationError::Unknown { detail } => format!(
                "An unknown error occurred while validating the template package: {detail}. \
                 Try recreating the package from one of the built-in presets."
            ),
        }
    }
}

impl fmt::Display for TemplateValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message_body())?;
        if self.contact_vendor() {
            f.write_str(CONTACT_VENDOR_SUFFIX)?;
        }
        Ok(())
    }
}

impl std::error::Error for TemplateValidationError {}

/// Validate a template package against a schema, collecting every violation.
pub fn validate_template(
    template: &Value,
    schema: &Value,
) -> Result<(), TemplateValidationError> {
    let compiled = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(schema)
        .map_err(|err| TemplateValidationError::Unknown {
            detail: format!("schema did not compile: {err}"),
        })?;

    match compiled.validate(template) {
        Ok(()) => Ok(()),
        Err(errors) => {
            let violations: Vec<SchemaViolation> = errors
                .map(|err| SchemaViolation {
                    path: strip_instance_marker(&err.instance_path.to_string()),
                    reason: err.to_string(),
                })
                .collect();
            Err(TemplateValidationError::Invalid { violations })
        }
    }
}

/// Read and parse a template package from disk.
///
/// I/O and parse failures are `Unknown`: they did not come from instance
/// validation, so the author cannot fix them by editing template fields.
pub fn load_template_package(path: &Path) -> Result<Value, TemplateValidationError> {
    let raw =
        std::fs::read_to_string(path).map_err(|err| TemplateValidationError::Unknown {
            detail: format!("failed to read template package `{}`: {err}", path.display()),
        })?;
    serde_json::from_str(&raw).map_err(|err| TemplateValidationError::Unknown {
        detail: format!("template package is not valid JSON: {err}"),
    })
}

/// Built-in schema for page-template packages, used when the caller supplies
/// none.
pub fn default_template_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "required": ["name", "markup"],
        "properties": {
            "name": { "type": "string", "minLength": 1 },
            "markup": { "type": "string" },
            "layout": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["title"],
                    "properties": {
                        "title": { "type": "string" },
                        "component": { "type": "string" }
                    }
                }
            }
        }
    })
}

/// Turn a JSON-pointer instance path into a dotted path with the leading
/// root marker removed.
fn strip_instance_marker(pointer: &str) -> String {
    pointer.trim_start_matches('/').replace('/', ".")
}
