//! Record validation against object schemas
//!
//! Seeding decodes tabular files into loosely typed JSON records. Before a
//! record reaches the database it is validated and coerced here:
//!
//! - Undeclared keys are dropped
//! - Missing or null values are rejected unless a wrapper allows them
//! - Defaults fill in missing or null values
//! - Decoder output is coerced to the declared kind (numeric strings,
//!   0/1 booleans, JSON text for structured fields, timestamps)
//!
//! Validation does not mutate its input and is deterministic.

use serde_json::{Map, Number, Value};

use super::errors::{SchemaError, SchemaResult, ValidationDetails};
use super::field::{FieldNode, FieldSchema, ObjectSchema};
use crate::sql::dialect::{format_timestamp, parse_timestamp, timestamp_from_millis};

/// A JSON record as decoded from a tabular source
pub type Record = Map<String, Value>;

/// Validates records against one object schema.
pub struct RecordValidator<'a> {
    schema: &'a ObjectSchema,
}

impl<'a> RecordValidator<'a> {
    pub fn new(schema: &'a ObjectSchema) -> Self {
        Self { schema }
    }

    /// Validates and coerces one record.
    pub fn validate_record(&self, record: &Record) -> SchemaResult<Record> {
        coerce_object(record, self.schema, "").map_err(|details| SchemaError::record_invalid(None, details))
    }

    /// Validates every record, failing on the first invalid one.
    ///
    /// The error carries the zero-based row index.
    pub fn validate_records(&self, records: &[Record]) -> SchemaResult<Vec<Record>> {
        records
            .iter()
            .enumerate()
            .map(|(row, record)| {
                coerce_object(record, self.schema, "").map_err(|details| SchemaError::record_invalid(Some(row), details))
            })
            .collect()
    }
}

type Coerced<T> = Result<T, ValidationDetails>;

fn coerce_object(obj: &Record, schema: &ObjectSchema, path_prefix: &str) -> Coerced<Record> {
    let mut out = Record::new();
    for (name, field) in schema.iter() {
        let path = make_path(path_prefix, name);
        let value = coerce_field(obj.get(name), field, &path)?;
        out.insert(name.to_string(), value);
    }
    Ok(out)
}

fn coerce_field(value: Option<&Value>, field: &FieldSchema, path: &str) -> Coerced<Value> {
    let present = value.filter(|v| !v.is_null());

    match &field.node {
        FieldNode::Optional { inner } | FieldNode::Nullable { inner } => match present {
            Some(v) => coerce_field(Some(v), inner, path),
            None => Ok(Value::Null),
        },
        FieldNode::Default { inner, value: default } => match present {
            Some(v) => coerce_field(Some(v), inner, path),
            None => Ok(default.clone()),
        },
        _ => match (value, present) {
            (_, Some(v)) => coerce_value(v, field, path),
            (Some(_), None) => Err(ValidationDetails::null_value(path)),
            (None, None) => Err(ValidationDetails::missing_field(path)),
        },
    }
}

fn coerce_value(value: &Value, field: &FieldSchema, path: &str) -> Coerced<Value> {
    match &field.node {
        FieldNode::Text => match value {
            Value::String(_) => Ok(value.clone()),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            Value::Bool(b) => Ok(Value::String(b.to_string())),
            other => Err(mismatch(path, "text", other)),
        },
        FieldNode::Number { min, max } => {
            let number = match value {
                Value::Number(n) => n.clone(),
                Value::String(s) => parse_number(s.trim()).ok_or_else(|| mismatch(path, "number", value))?,
                other => return Err(mismatch(path, "number", other)),
            };
            let as_f64 = number.as_f64().unwrap_or(f64::NAN);
            if let Some(min) = min {
                if as_f64 < *min {
                    return Err(ValidationDetails::new(path, format!("number >= {}", min), number.to_string()));
                }
            }
            if let Some(max) = max {
                if as_f64 > *max {
                    return Err(ValidationDetails::new(path, format!("number <= {}", max), number.to_string()));
                }
            }
            Ok(Value::Number(number))
        }
        FieldNode::Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::Number(n) if n.as_i64() == Some(0) => Ok(Value::Bool(false)),
            Value::Number(n) if n.as_i64() == Some(1) => Ok(Value::Bool(true)),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Value::Bool(true)),
                "false" | "0" => Ok(Value::Bool(false)),
                _ => Err(mismatch(path, "boolean", value)),
            },
            other => Err(mismatch(path, "boolean", other)),
        },
        FieldNode::Date => {
            let parsed = match value {
                Value::String(s) => parse_timestamp(s),
                Value::Number(n) => n.as_i64().and_then(timestamp_from_millis),
                _ => None,
            };
            parsed
                .map(|ts| Value::String(format_timestamp(&ts)))
                .ok_or_else(|| mismatch(path, "date", value))
        }
        FieldNode::Enum { values } => match value {
            Value::String(s) if values.iter().any(|v| v == s) => Ok(value.clone()),
            Value::String(s) => Err(ValidationDetails::new(
                path,
                format!("one of [{}]", values.join(", ")),
                format!("'{}'", s),
            )),
            other => Err(mismatch(path, "enum string", other)),
        },
        FieldNode::Object { fields } => {
            let parsed = structured(value);
            let obj = parsed
                .as_ref()
                .and_then(Value::as_object)
                .ok_or_else(|| mismatch(path, "object", value))?;
            coerce_object(obj, fields, path).map(Value::Object)
        }
        FieldNode::Array { element } => {
            let parsed = structured(value);
            let items = parsed
                .as_ref()
                .and_then(Value::as_array)
                .ok_or_else(|| mismatch(path, "array", value))?;
            items
                .iter()
                .enumerate()
                .map(|(i, item)| coerce_field(Some(item), element, &format!("{}[{}]", path, i)))
                .collect::<Coerced<Vec<_>>>()
                .map(Value::Array)
        }
        FieldNode::Union { variants } => variants
            .iter()
            .find_map(|variant| coerce_field(Some(value), variant, path).ok())
            .ok_or_else(|| mismatch(path, "union member", value)),
        FieldNode::Any => Ok(value.clone()),
        FieldNode::Optional { .. } | FieldNode::Nullable { .. } | FieldNode::Default { .. } => {
            coerce_field(Some(value), field, path)
        }
    }
}

/// Structured values may arrive as JSON text from flat formats like CSV.
fn structured(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => serde_json::from_str(s).ok(),
        other => Some(other.clone()),
    }
}

fn parse_number(s: &str) -> Option<Number> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Number::from(i));
    }
    s.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(path: &str, expected: &str, actual: &Value) -> ValidationDetails {
    let actual = match actual {
        Value::String(s) => format!("string '{}'", s),
        other => json_type_name(other).to_string(),
    };
    ValidationDetails::type_mismatch(path, expected, actual)
}

/// Creates a field path from prefix and field name.
fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}
