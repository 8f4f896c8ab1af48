//! SQLite dialect: identifier escaping, type mapping and value codecs
//!
//! Every column type maps to one SQL type and one codec. The DDL generator
//! only reads the SQL type; the builder adapter and the seeding path use the
//! codec to move values between JSON records and engine values.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use regex::Regex;
use rusqlite::types::Value as SqlValue;
use serde_json::{Number, Value};
use thiserror::Error;

use crate::table::ColumnType;

/// Quotes an identifier, doubling embedded quotes.
pub fn escape_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Integer,
}

impl SqlType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlType::Text => "TEXT",
            SqlType::Integer => "INTEGER",
        }
    }
}

/// How values of a column type cross the engine boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnCodec {
    /// Stored as-is
    Plain,
    /// 0/1 integers
    Boolean,
    /// ISO-8601 text in UTC
    Date,
    /// Serialized JSON text
    Json,
}

/// One row of the type mapping table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMapping {
    pub column_type: ColumnType,
    pub sql_type: SqlType,
    pub codec: ColumnCodec,
}

pub const TYPE_MAPPINGS: [TypeMapping; 5] = [
    TypeMapping {
        column_type: ColumnType::Text,
        sql_type: SqlType::Text,
        codec: ColumnCodec::Plain,
    },
    TypeMapping {
        column_type: ColumnType::Number,
        sql_type: SqlType::Integer,
        codec: ColumnCodec::Plain,
    },
    TypeMapping {
        column_type: ColumnType::Boolean,
        sql_type: SqlType::Integer,
        codec: ColumnCodec::Boolean,
    },
    TypeMapping {
        column_type: ColumnType::Date,
        sql_type: SqlType::Text,
        codec: ColumnCodec::Date,
    },
    TypeMapping {
        column_type: ColumnType::Json,
        sql_type: SqlType::Text,
        codec: ColumnCodec::Json,
    },
];

/// Looks up the mapping for a column type.
pub fn mapping(column_type: ColumnType) -> &'static TypeMapping {
    match column_type {
        ColumnType::Text => &TYPE_MAPPINGS[0],
        ColumnType::Number => &TYPE_MAPPINGS[1],
        ColumnType::Boolean => &TYPE_MAPPINGS[2],
        ColumnType::Date => &TYPE_MAPPINGS[3],
        ColumnType::Json => &TYPE_MAPPINGS[4],
    }
}

pub fn sql_type(column_type: ColumnType) -> SqlType {
    mapping(column_type).sql_type
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    #[error("cannot encode {actual} as {expected}")]
    Encode { expected: &'static str, actual: String },

    #[error("cannot decode {actual} as {expected}")]
    Decode { expected: &'static str, actual: String },
}

impl ColumnCodec {
    /// JSON record value to engine value. Null stays null.
    pub fn encode(&self, column_type: ColumnType, value: &Value) -> Result<SqlValue, CodecError> {
        if value.is_null() {
            return Ok(SqlValue::Null);
        }
        let fail = || CodecError::Encode {
            expected: column_type.as_str(),
            actual: value.to_string(),
        };

        match self {
            ColumnCodec::Plain => match (column_type, value) {
                (ColumnType::Number, Value::Number(n)) => match n.as_i64() {
                    Some(i) => Ok(SqlValue::Integer(i)),
                    None => n.as_f64().map(SqlValue::Real).ok_or_else(fail),
                },
                (ColumnType::Number, _) => Err(fail()),
                (_, Value::String(s)) => Ok(SqlValue::Text(s.clone())),
                (_, Value::Number(n)) => Ok(SqlValue::Text(n.to_string())),
                (_, Value::Bool(b)) => Ok(SqlValue::Text(b.to_string())),
                _ => Err(fail()),
            },
            ColumnCodec::Boolean => value
                .as_bool()
                .map(|b| SqlValue::Integer(i64::from(b)))
                .ok_or_else(fail),
            ColumnCodec::Date => {
                let parsed = match value {
                    Value::String(s) => parse_timestamp(s),
                    Value::Number(n) => n.as_i64().and_then(timestamp_from_millis),
                    _ => None,
                };
                parsed
                    .map(|ts| SqlValue::Text(format_timestamp(&ts)))
                    .ok_or_else(fail)
            }
            ColumnCodec::Json => serde_json::to_string(value)
                .map(SqlValue::Text)
                .map_err(|_| fail()),
        }
    }

    /// Engine value to JSON record value. Null stays null.
    pub fn decode(&self, column_type: ColumnType, value: SqlValue) -> Result<Value, CodecError> {
        let fail = |actual: &SqlValue| CodecError::Decode {
            expected: column_type.as_str(),
            actual: format!("{:?}", actual),
        };

        match (self, value) {
            (_, SqlValue::Null) => Ok(Value::Null),
            (ColumnCodec::Plain, SqlValue::Text(s)) => Ok(Value::String(s)),
            (ColumnCodec::Plain, SqlValue::Integer(i)) => Ok(Value::Number(i.into())),
            (ColumnCodec::Plain, SqlValue::Real(f)) => Number::from_f64(f)
                .map(Value::Number)
                .ok_or_else(|| fail(&SqlValue::Real(f))),
            (ColumnCodec::Boolean, SqlValue::Integer(i)) => Ok(Value::Bool(i != 0)),
            (ColumnCodec::Date, SqlValue::Text(s)) => parse_timestamp(&s)
                .map(|ts| Value::String(format_timestamp(&ts)))
                .ok_or_else(|| fail(&SqlValue::Text(s))),
            (ColumnCodec::Json, SqlValue::Text(s)) => {
                serde_json::from_str(&s).map_err(|_| fail(&SqlValue::Text(s)))
            }
            (_, other) => Err(fail(&other)),
        }
    }
}

fn native_timestamp() -> &'static Regex {
    static NATIVE: OnceLock<Regex> = OnceLock::new();
    NATIVE.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}").expect("static timestamp pattern")
    })
}

/// Parses ISO-8601 / RFC 3339 text.
///
/// SQLite's `CURRENT_TIMESTAMP` form (`YYYY-MM-DD HH:MM:SS`, no zone) is read
/// as UTC. Bare dates are midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    let candidate = if !s.ends_with('Z') && native_timestamp().is_match(s) {
        format!("{}Z", s.replacen(' ', "T", 1))
    } else {
        s.to_string()
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(&candidate) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Milliseconds since the Unix epoch.
pub fn timestamp_from_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

/// Formats as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
