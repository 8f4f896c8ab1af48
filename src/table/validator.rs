//! Post-normalization checks on the table model
//!
//! - Table name is non-empty and there is at least one column
//! - Index names are unique within the table
//! - Every index lists at least one column, and all of them exist
//! - Primary key columns exist and are not repeated

use std::collections::HashSet;

use super::errors::{CompileError, CompileResult};
use super::model::Table;

/// Checks model-level invariants, returning the first violation.
pub fn validate_table(table: &Table) -> CompileResult<()> {
    if table.name.is_empty() {
        return Err(CompileError::EmptyTableName);
    }
    if table.columns.is_empty() {
        return Err(CompileError::NoColumns {
            table: table.name.clone(),
        });
    }

    let mut index_names = HashSet::new();
    for index in &table.indexes {
        if !index_names.insert(index.name.as_str()) {
            return Err(CompileError::DuplicateIndex {
                table: table.name.clone(),
                index: index.name.clone(),
            });
        }
        if index.columns.is_empty() {
            return Err(CompileError::EmptyIndex {
                table: table.name.clone(),
                index: index.name.clone(),
            });
        }
        if let Some(column) = index.columns.iter().find(|c| !table.columns.contains_key(*c)) {
            return Err(CompileError::DanglingIndexReference {
                table: table.name.clone(),
                index: index.name.clone(),
                column: column.clone(),
            });
        }
    }

    if let Some(key) = table.primary_key() {
        let mut seen = HashSet::new();
        for column in key {
            if !table.columns.contains_key(column) {
                return Err(CompileError::DanglingKeyReference {
                    table: table.name.clone(),
                    column: column.clone(),
                });
            }
            if !seen.insert(column.as_str()) {
                return Err(CompileError::DuplicateKeyColumn {
                    table: table.name.clone(),
                    column: column.clone(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, ColumnType, CompositeKeys, Index};
    use indexmap::IndexMap;

    fn table() -> Table {
        let mut columns = IndexMap::new();
        columns.insert("trial".to_string(), Column::new(ColumnType::Number));
        columns.insert("word".to_string(), Column::new(ColumnType::Text));
        Table {
            name: "stimuli".into(),
            columns,
            composite_keys: CompositeKeys {
                primary: Some(vec!["trial".into()]),
            },
            indexes: vec![Index::for_column("stimuli", "word")],
        }
    }

    #[test]
    fn test_valid_table() {
        assert!(validate_table(&table()).is_ok());
    }

    #[test]
    fn test_duplicate_index_names() {
        let mut t = table();
        t.indexes.push(Index::for_column("stimuli", "word"));

        let err = validate_table(&t).unwrap_err();
        assert_eq!(
            err,
            CompileError::DuplicateIndex {
                table: "stimuli".into(),
                index: "idx_stimuli_word".into()
            }
        );
    }

    #[test]
    fn test_dangling_index_reference() {
        let mut t = table();
        t.indexes.push(Index {
            name: "idx_stimuli_color".into(),
            columns: vec!["word".into(), "color".into()],
            unique: true,
        });

        match validate_table(&t).unwrap_err() {
            CompileError::DanglingIndexReference { table, index, column } => {
                assert_eq!(table, "stimuli");
                assert_eq!(index, "idx_stimuli_color");
                assert_eq!(column, "color");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_empty_shapes_rejected() {
        let mut unnamed = table();
        unnamed.name.clear();
        assert_eq!(validate_table(&unnamed).unwrap_err(), CompileError::EmptyTableName);

        let mut empty = table();
        empty.columns.clear();
        empty.indexes.clear();
        empty.composite_keys.primary = None;
        assert!(matches!(validate_table(&empty).unwrap_err(), CompileError::NoColumns { .. }));

        let mut no_index_columns = table();
        no_index_columns.indexes[0].columns.clear();
        assert!(matches!(
            validate_table(&no_index_columns).unwrap_err(),
            CompileError::EmptyIndex { .. }
        ));
    }

    #[test]
    fn test_primary_key_shape() {
        let mut dangling = table();
        dangling.composite_keys.primary = Some(vec!["trial".into(), "block".into()]);
        assert!(matches!(
            validate_table(&dangling).unwrap_err(),
            CompileError::DanglingKeyReference { .. }
        ));

        let mut repeated = table();
        repeated.composite_keys.primary = Some(vec!["trial".into(), "trial".into()]);
        assert!(matches!(
            validate_table(&repeated).unwrap_err(),
            CompileError::DuplicateKeyColumn { .. }
        ));
    }
}
