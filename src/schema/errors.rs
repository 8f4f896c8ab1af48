//! Schema error types
//!
//! Error codes:
//! - SMILE_UNSUPPORTED_TYPE: a field kind has no column mapping
//! - SMILE_RECORD_INVALID: a record does not satisfy its object schema

use std::fmt;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Field kind cannot be stored as a column
    UnsupportedType,
    /// Record failed validation or coercion
    RecordInvalid,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::UnsupportedType => "SMILE_UNSUPPORTED_TYPE",
            SchemaErrorCode::RecordInvalid => "SMILE_RECORD_INVALID",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Validation failure details
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationDetails {
    /// Field path (e.g., "response.key")
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, "field to be present", "missing")
    }

    pub fn null_value(field: impl Into<String>) -> Self {
        Self::new(field, "non-null value", "null")
    }

    pub fn type_mismatch(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(field, expected, actual)
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': expected {}, got {}", self.field, self.expected, self.actual)
    }
}

/// Schema error with context
#[derive(Debug, Clone)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    kind: Option<String>,
    row: Option<usize>,
    details: Option<ValidationDetails>,
}

impl SchemaError {
    /// A field kind with no column mapping (unions, unconstrained values)
    pub fn unsupported_type(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        Self {
            code: SchemaErrorCode::UnsupportedType,
            message: format!("Cannot convert '{}' to a column type", kind),
            kind: Some(kind),
            row: None,
            details: None,
        }
    }

    /// A record that does not satisfy its schema
    pub fn record_invalid(row: Option<usize>, details: ValidationDetails) -> Self {
        let message = match row {
            Some(row) => format!("Record {} failed validation: {}", row, details),
            None => format!("Record failed validation: {}", details),
        };
        Self {
            code: SchemaErrorCode::RecordInvalid,
            message,
            kind: None,
            row,
            details: Some(details),
        }
    }

    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The offending kind name for unsupported-type errors
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Zero-based row index for record errors
    pub fn row(&self) -> Option<usize> {
        self.row
    }

    pub fn details(&self) -> Option<&ValidationDetails> {
        self.details.as_ref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::UnsupportedType.code(), "SMILE_UNSUPPORTED_TYPE");
        assert_eq!(SchemaErrorCode::RecordInvalid.code(), "SMILE_RECORD_INVALID");
    }

    #[test]
    fn test_validation_details_display() {
        let details = ValidationDetails::type_mismatch("position", "number", "string");
        let display = format!("{}", details);
        assert!(display.contains("position"));
        assert!(display.contains("number"));
        assert!(display.contains("string"));
    }

    #[test]
    fn test_record_error_names_row() {
        let err = SchemaError::record_invalid(Some(7), ValidationDetails::missing_field("word"));
        assert_eq!(err.row(), Some(7));
        assert!(err.to_string().contains("Record 7"));
        assert!(err.to_string().contains("word"));
    }
}
