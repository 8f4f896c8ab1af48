//! Table compilation errors
//!
//! Every variant is fatal to the table it names and to nothing else: sibling
//! tables keep compiling.

use thiserror::Error;

/// Result type for table compilation
pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    // Schema translation
    #[error("Table '{table}': cannot convert field '{field}' of kind '{kind}' to a column")]
    UnsupportedType {
        table: String,
        field: String,
        kind: String,
    },

    #[error(
        "Table '{table}': cannot mix primaryKey ({}) with trial/block/condition id tags ({})",
        .primary_keys.join(", "),
        .id_fields.join(", ")
    )]
    ConflictingKeyStrategy {
        table: String,
        primary_keys: Vec<String>,
        id_fields: Vec<String>,
    },

    #[error("Table '{table}': experiment tables must tag exactly one field with trialID")]
    MissingTrialId { table: String },

    #[error("Table '{table}': only one field can be tagged trialID, found {}", .fields.join(", "))]
    MultipleTrialId { table: String, fields: Vec<String> },

    #[error("Table '{table}': only one field can be tagged blockID, found {}", .fields.join(", "))]
    MultipleBlockId { table: String, fields: Vec<String> },

    #[error("Table '{table}': only one field can be tagged conditionID, found {}", .fields.join(", "))]
    MultipleConditionId { table: String, fields: Vec<String> },

    // Model validation
    #[error("Table name must not be empty")]
    EmptyTableName,

    #[error("Table '{table}': tables must have at least one column")]
    NoColumns { table: String },

    #[error("Table '{table}': duplicate index '{index}'")]
    DuplicateIndex { table: String, index: String },

    #[error("Table '{table}': index '{index}' references non-existent column '{column}'")]
    DanglingIndexReference {
        table: String,
        index: String,
        column: String,
    },

    #[error("Table '{table}': index '{index}' has no columns")]
    EmptyIndex { table: String, index: String },

    #[error("Table '{table}': primary key references non-existent column '{column}'")]
    DanglingKeyReference { table: String, column: String },

    #[error("Table '{table}': primary key lists column '{column}' more than once")]
    DuplicateKeyColumn { table: String, column: String },
}

impl CompileError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CompileError::UnsupportedType { .. } => "SMILE_UNSUPPORTED_TYPE",
            CompileError::ConflictingKeyStrategy { .. } => "SMILE_CONFLICTING_KEY_STRATEGY",
            CompileError::MissingTrialId { .. } => "SMILE_MISSING_TRIAL_ID",
            CompileError::MultipleTrialId { .. } => "SMILE_MULTIPLE_TRIAL_ID",
            CompileError::MultipleBlockId { .. } => "SMILE_MULTIPLE_BLOCK_ID",
            CompileError::MultipleConditionId { .. } => "SMILE_MULTIPLE_CONDITION_ID",
            CompileError::EmptyTableName => "SMILE_EMPTY_TABLE_NAME",
            CompileError::NoColumns { .. } => "SMILE_NO_COLUMNS",
            CompileError::DuplicateIndex { .. } => "SMILE_DUPLICATE_INDEX",
            CompileError::DanglingIndexReference { .. } => "SMILE_DANGLING_INDEX_REFERENCE",
            CompileError::EmptyIndex { .. } => "SMILE_EMPTY_INDEX",
            CompileError::DanglingKeyReference { .. } => "SMILE_DANGLING_KEY_REFERENCE",
            CompileError::DuplicateKeyColumn { .. } => "SMILE_DUPLICATE_KEY_COLUMN",
        }
    }

    /// The table the error belongs to
    pub fn table(&self) -> &str {
        match self {
            CompileError::EmptyTableName => "",
            CompileError::UnsupportedType { table, .. }
            | CompileError::ConflictingKeyStrategy { table, .. }
            | CompileError::MissingTrialId { table }
            | CompileError::MultipleTrialId { table, .. }
            | CompileError::MultipleBlockId { table, .. }
            | CompileError::MultipleConditionId { table, .. }
            | CompileError::NoColumns { table }
            | CompileError::DuplicateIndex { table, .. }
            | CompileError::DanglingIndexReference { table, .. }
            | CompileError::EmptyIndex { table, .. }
            | CompileError::DanglingKeyReference { table, .. }
            | CompileError::DuplicateKeyColumn { table, .. } => table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_table_and_identifier() {
        let err = CompileError::DanglingIndexReference {
            table: "trials".into(),
            index: "idx_trials_ghost".into(),
            column: "ghost".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("trials"));
        assert!(msg.contains("ghost"));
        assert_eq!(err.table(), "trials");
        assert_eq!(err.code(), "SMILE_DANGLING_INDEX_REFERENCE");
    }

    #[test]
    fn test_list_fields_are_joined() {
        let err = CompileError::MultipleTrialId {
            table: "t".into(),
            fields: vec!["a".into(), "b".into()],
        };
        assert!(err.to_string().ends_with("found a, b"));
    }
}
