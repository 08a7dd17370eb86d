//! Validation engine walking a schema alongside the input value.

use serde_json::{Map, Value};

use super::email::is_valid_email;
use super::{
    ArrayConstraint, Check, Constraint, FieldErrors, FieldPath, Kind, NumberConstraint,
    ObjectSchema, Presence, REQUIRED_MESSAGE, Schema, StringConstraint,
};

pub(super) fn validate_root(schema: &Schema, input: &Value) -> Result<Value, FieldErrors> {
    let mut errors = FieldErrors::new();
    let output = validate_slot(schema, Some(input), &FieldPath::root(), &mut errors);
    finish(output, errors)
}

pub(super) fn validate_object_root(
    schema: &ObjectSchema,
    input: &Value,
) -> Result<Value, FieldErrors> {
    let mut errors = FieldErrors::new();
    let path = FieldPath::root();
    let output = match input.as_object() {
        Some(object) => Some(validate_fields(schema, object, &path, &mut errors)),
        None => {
            errors.push(&path, type_mismatch("object", input));
            None
        }
    };
    finish(output, errors)
}

fn finish(output: Option<Value>, errors: FieldErrors) -> Result<Value, FieldErrors> {
    if errors.is_empty() {
        Ok(output.unwrap_or(Value::Null))
    } else {
        Err(errors)
    }
}

/// Validate a value that may be absent. `None` in the result means the value
/// is omitted from the output.
fn validate_slot(
    schema: &Schema,
    input: Option<&Value>,
    path: &FieldPath,
    errors: &mut FieldErrors,
) -> Option<Value> {
    match input {
        Some(value) if !value.is_null() => validate_kind(&schema.kind, value, path, errors),
        _ => match &schema.presence {
            Presence::Optional => None,
            Presence::Default(default) => validate_kind(&schema.kind, default, path, errors),
            Presence::Required => {
                let message = match input {
                    None => schema
                        .required_message
                        .clone()
                        .unwrap_or_else(|| REQUIRED_MESSAGE.to_owned()),
                    Some(null) => type_mismatch(schema.kind.expected(), null),
                };
                errors.push(path, message);
                None
            }
        },
    }
}

fn validate_kind(
    kind: &Kind,
    value: &Value,
    path: &FieldPath,
    errors: &mut FieldErrors,
) -> Option<Value> {
    match kind {
        Kind::String(checks) => {
            let Some(text) = value.as_str() else {
                errors.push(path, type_mismatch(kind.expected(), value));
                return None;
            };
            let length = text.chars().count();
            apply_checks(checks, path, errors, |constraint| match constraint {
                StringConstraint::MinLength(min) => length < *min,
                StringConstraint::MaxLength(max) => length > *max,
                StringConstraint::Email => !is_valid_email(text),
            });
            Some(value.clone())
        }
        Kind::Number(checks) => {
            let Some(number) = value.as_f64() else {
                errors.push(path, type_mismatch(kind.expected(), value));
                return None;
            };
            let whole = value.is_i64() || value.is_u64() || number.fract() == 0.0;
            apply_checks(checks, path, errors, |constraint| match constraint {
                NumberConstraint::Positive => number <= 0.0,
                NumberConstraint::Integer => !whole,
            });
            Some(value.clone())
        }
        Kind::Boolean => {
            if value.is_boolean() {
                Some(value.clone())
            } else {
                errors.push(path, type_mismatch(kind.expected(), value));
                None
            }
        }
        Kind::Array { items, checks } => {
            let Some(elements) = value.as_array() else {
                errors.push(path, type_mismatch(kind.expected(), value));
                return None;
            };
            apply_checks(checks, path, errors, |constraint| match constraint {
                ArrayConstraint::MinItems(min) => elements.len() < *min,
                ArrayConstraint::MaxItems(max) => elements.len() > *max,
            });
            let output = elements
                .iter()
                .enumerate()
                .map(|(position, element)| {
                    validate_slot(items, Some(element), &path.index(position), errors)
                        .unwrap_or(Value::Null)
                })
                .collect();
            Some(Value::Array(output))
        }
        Kind::Object(schema) => {
            let Some(object) = value.as_object() else {
                errors.push(path, type_mismatch(kind.expected(), value));
                return None;
            };
            Some(validate_fields(schema, object, path, errors))
        }
    }
}

fn validate_fields(
    schema: &ObjectSchema,
    object: &Map<String, Value>,
    path: &FieldPath,
    errors: &mut FieldErrors,
) -> Value {
    let mut output = Map::new();
    for (name, field) in &schema.fields {
        if let Some(value) = validate_slot(field, object.get(name), &path.key(name), errors) {
            output.insert(name.clone(), value);
        }
    }
    if !schema.strip_unknown {
        for (name, value) in object {
            if !schema.declares(name) {
                output.insert(name.clone(), value.clone());
            }
        }
    }
    Value::Object(output)
}

fn apply_checks<C: Constraint>(
    checks: &[Check<C>],
    path: &FieldPath,
    errors: &mut FieldErrors,
    violated: impl Fn(&C) -> bool,
) {
    for check in checks {
        if violated(&check.constraint) {
            errors.push(path, check.message());
        }
    }
}

fn type_mismatch(expected: &str, value: &Value) -> String {
    format!("Expected {expected}, received {}", json_type(value))
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
