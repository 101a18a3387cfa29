//! Declarative payload validation for the user and card schemas.
//!
//! Each schema is a static table of field rules evaluated over the raw JSON
//! body. All violations are collected in a single pass; callers surface only
//! the first violation's message. Unknown fields pass through untouched, and
//! nothing here mutates persisted state.

use serde_json::Value;
use url::Url;
use uuid::Uuid;

mod schemas;

pub use schemas::{CARD_SCHEMA, STATUS_SCHEMA, USER_SCHEMA};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path of the offending field, e.g. `address.houseNumber`
    pub field: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message surfaced to the caller: the first violation found
    pub fn first_message(&self) -> String {
        self.0
            .first()
            .map(|v| v.message.clone())
            .unwrap_or_else(|| "Invalid request body".to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    fn push(&mut self, field: String, message: impl Into<String>) {
        self.0.push(Violation {
            field,
            message: message.into(),
        });
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Format {
    Email,
    /// http or https URI
    HttpUri,
}

#[derive(Debug)]
pub enum Kind {
    Str {
        min: Option<usize>,
        max: Option<usize>,
        format: Option<Format>,
    },
    /// JSON number with an integral value
    Int,
    Bool,
    /// One of a fixed set of string values
    OneOf(&'static [&'static str]),
    /// Array of user-id strings
    UuidArray,
    /// Nested object with its own rules
    Object(&'static [Field]),
}

#[derive(Debug)]
pub struct Field {
    pub name: &'static str,
    /// Human label used in generated messages
    pub label: &'static str,
    /// Message pushed when the field is absent; None marks the field optional
    pub required: Option<&'static str>,
    pub kind: Kind,
}

/// Plain string field with no bounds
pub(crate) const fn string() -> Kind {
    Kind::Str {
        min: None,
        max: None,
        format: None,
    }
}

pub(crate) const fn bounded(min: usize, max: usize) -> Kind {
    Kind::Str {
        min: Some(min),
        max: Some(max),
        format: None,
    }
}

/// Validate `payload` against a schema, collecting every violation
pub fn validate(schema: &[Field], payload: &Value) -> Result<(), Violations> {
    let mut violations = Violations::default();

    match payload {
        Value::Object(_) => validate_fields(schema, payload, "", &mut violations),
        _ => violations.push(String::new(), "Request body must be a JSON object"),
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn validate_fields(schema: &[Field], object: &Value, prefix: &str, out: &mut Violations) {
    for field in schema {
        let path = if prefix.is_empty() {
            field.name.to_string()
        } else {
            format!("{}.{}", prefix, field.name)
        };

        // null is treated like an absent field, as the original schemas did
        let value = match object.get(field.name) {
            Some(Value::Null) | None => {
                handle_missing(field, &path, out);
                continue;
            }
            Some(v) => v,
        };

        check_value(field, value, &path, out);
    }
}

fn handle_missing(field: &Field, path: &str, out: &mut Violations) {
    if let Some(msg) = field.required {
        out.push(path.to_string(), msg);
    } else if let Kind::Object(subfields) = &field.kind {
        // An absent optional object still owes its required members
        if subfields.iter().any(|f| f.required.is_some()) {
            validate_fields(subfields, &Value::Object(Default::default()), path, out);
        }
    }
}

fn check_value(field: &Field, value: &Value, path: &str, out: &mut Violations) {
    match &field.kind {
        Kind::Str { min, max, format } => {
            let Some(s) = value.as_str() else {
                out.push(path.to_string(), format!("{} must be a string", field.label));
                return;
            };
            if s.is_empty() {
                if field.required.is_some() {
                    out.push(path.to_string(), format!("{} cannot be empty", field.label));
                }
                return;
            }
            if let Some(format) = format {
                if let Some(message) = check_format(*format, s) {
                    out.push(path.to_string(), message);
                    return;
                }
            }
            let chars = s.chars().count();
            if let Some(min) = min {
                if chars < *min {
                    out.push(
                        path.to_string(),
                        format!("{} must have at least {} characters", field.label, min),
                    );
                }
            }
            if let Some(max) = max {
                if chars > *max {
                    out.push(
                        path.to_string(),
                        format!("{} can have at most {} characters", field.label, max),
                    );
                }
            }
        }
        Kind::Int => {
            if value.as_i64().is_none() {
                out.push(path.to_string(), format!("{} must be a number", field.label));
            }
        }
        Kind::Bool => {
            if !value.is_boolean() {
                out.push(path.to_string(), format!("{} must be a boolean", field.label));
            }
        }
        Kind::OneOf(allowed) => {
            let ok = value.as_str().is_some_and(|s| allowed.contains(&s));
            if !ok {
                out.push(
                    path.to_string(),
                    format!("{} must be one of: {}", field.label, allowed.join(", ")),
                );
            }
        }
        Kind::UuidArray => {
            let Some(items) = value.as_array() else {
                out.push(
                    path.to_string(),
                    format!("{} must be an array of user ids", field.label),
                );
                return;
            };
            let all_ids = items
                .iter()
                .all(|v| v.as_str().is_some_and(|s| Uuid::parse_str(s).is_ok()));
            if !all_ids {
                out.push(
                    path.to_string(),
                    format!("{} must be an array of user ids", field.label),
                );
            }
        }
        Kind::Object(subfields) => {
            if value.is_object() {
                validate_fields(subfields, value, path, out);
            } else {
                out.push(path.to_string(), format!("{} must be an object", field.label));
            }
        }
    }
}

fn check_format(format: Format, s: &str) -> Option<String> {
    match format {
        Format::Email => {
            if is_valid_email(s) {
                None
            } else {
                Some("Invalid email format".to_string())
            }
        }
        Format::HttpUri => {
            let ok = Url::parse(s)
                .map(|u| matches!(u.scheme(), "http" | "https"))
                .unwrap_or(false);
            if ok {
                None
            } else {
                Some("Invalid web format".to_string())
            }
        }
    }
}

/// Structural email check: one `@`, non-empty local part, dotted domain
fn is_valid_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = s.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
