//! Field-level validation of untyped request bodies.
//!
//! A DTO declares an ordered list of [`FieldRule`]s. Every rule is evaluated and
//! every failure is collected, so a caller sees all problems with a body at once.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// A single constraint a field value can violate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    IsNotEmpty,
    /// Carries the accepted values so the message can name them.
    IsEnum(&'static [&'static str]),
    IsUuid,
    IsString,
}

impl ViolationKind {
    pub fn name(&self) -> &'static str {
        match self {
            ViolationKind::IsNotEmpty => "isNotEmpty",
            ViolationKind::IsEnum(_) => "isEnum",
            ViolationKind::IsUuid => "isUuid",
            ViolationKind::IsString => "isString",
        }
    }

    fn message(&self, field: &str) -> String {
        match self {
            ViolationKind::IsNotEmpty => format!("{field} should not be empty"),
            ViolationKind::IsEnum(allowed) => format!(
                "{field} must be one of the following values: {}",
                allowed.join(", ")
            ),
            ViolationKind::IsUuid => format!("{field} must be a UUID"),
            ViolationKind::IsString => format!("{field} must be a string"),
        }
    }
}

// constraints go over the wire by name only
impl Serialize for ViolationKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

static ABSENT: Value = Value::Null;

/// Predicate over a field value. Absent fields are checked as `null`.
pub type Check = fn(&Value) -> Result<(), ViolationKind>;

pub struct FieldRule {
    pub field: &'static str,
    /// Optional fields skip their checks when absent or `null`.
    pub optional: bool,
    pub checks: &'static [Check],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub constraints: Vec<ViolationKind>,
    pub messages: Vec<String>,
}

impl FieldViolation {
    fn new(field: &str, constraints: Vec<ViolationKind>) -> Self {
        let messages = constraints.iter().map(|kind| kind.message(field)).collect();
        Self {
            field: field.to_string(),
            constraints,
            messages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed for: {}", joined_fields(.violations))]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn single(field: &str, kind: ViolationKind) -> Self {
        Self {
            violations: vec![FieldViolation::new(field, vec![kind])],
        }
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|violation| violation.field.as_str())
    }

    pub fn violation(&self, field: &str) -> Option<&FieldViolation> {
        self.violations.iter().find(|violation| violation.field == field)
    }
}

fn joined_fields(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|violation| violation.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Look up a top-level field. Non-object bodies have no fields.
pub fn field<'a>(body: &'a Value, name: &str) -> Option<&'a Value> {
    body.as_object().and_then(|object| object.get(name))
}

pub fn string_field<'a>(body: &'a Value, name: &str) -> Option<&'a str> {
    field(body, name).and_then(Value::as_str)
}

/// Run every rule against `body`, reporting one entry per failing field.
pub fn validate_fields(body: &Value, rules: &[FieldRule]) -> Result<(), ValidationError> {
    let mut violations = Vec::new();

    for rule in rules {
        let value = field(body, rule.field).unwrap_or(&ABSENT);
        if rule.optional && value.is_null() {
            continue;
        }

        let failed: Vec<ViolationKind> = rule
            .checks
            .iter()
            .filter_map(|check| check(value).err())
            .collect();

        if !failed.is_empty() {
            violations.push(FieldViolation::new(rule.field, failed));
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

pub fn is_not_empty(value: &Value) -> Result<(), ViolationKind> {
    match value {
        Value::Null => Err(ViolationKind::IsNotEmpty),
        Value::String(text) if text.is_empty() => Err(ViolationKind::IsNotEmpty),
        _ => Ok(()),
    }
}

pub fn is_string(value: &Value) -> Result<(), ViolationKind> {
    if value.is_string() {
        Ok(())
    } else {
        Err(ViolationKind::IsString)
    }
}

/// Any version, canonical hyphenated form only.
pub fn is_uuid(value: &Value) -> Result<(), ViolationKind> {
    match value.as_str() {
        Some(text) if text.len() == 36 && uuid::Uuid::try_parse(text).is_ok() => Ok(()),
        _ => Err(ViolationKind::IsUuid),
    }
}
