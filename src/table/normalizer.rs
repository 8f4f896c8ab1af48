//! Object schema to `Table` conversion
//!
//! Key strategy:
//! - Fields tagged `primaryKey` form the key of a meta table.
//! - Otherwise the table is an experiment/stimuli table and its key is
//!   `[trialID, blockID?, conditionID?]`, always in that order.
//! - Mixing the two strategies is rejected.

use indexmap::IndexMap;

use super::errors::{CompileError, CompileResult};
use super::model::{Column, ColumnConstraints, CompositeKeys, Index, Table};
use crate::schema::{inspect, ObjectSchema, Tag};

/// Fields that describe the source file rather than the data
pub const RESERVED_FIELDS: [&str; 2] = ["path", "extension"];

/// Converts a named object schema into a table model.
///
/// The result has not been validated; see `compile_table`.
pub fn normalize(table_name: &str, schema: &ObjectSchema) -> CompileResult<Table> {
    let mut columns = IndexMap::new();
    let mut indexes = Vec::new();

    for (field_name, field) in schema.iter() {
        if RESERVED_FIELDS.contains(&field_name) {
            continue;
        }

        let inspection = inspect(field).map_err(|e| CompileError::UnsupportedType {
            table: table_name.to_string(),
            field: field_name.to_string(),
            kind: e.kind().unwrap_or("unknown").to_string(),
        })?;

        let tags = &inspection.tags;
        let constraints = ColumnConstraints {
            primary_key: tags.contains(&Tag::PrimaryKey),
            unique: tags.contains(&Tag::Unique),
            index: tags.contains(&Tag::Index),
            optional: inspection.optional,
            trial_id: tags.contains(&Tag::TrialId),
            block_id: tags.contains(&Tag::BlockId),
            condition_id: tags.contains(&Tag::ConditionId),
        };

        if constraints.index {
            indexes.push(Index::for_column(table_name, field_name));
        }

        columns.insert(
            field_name.to_string(),
            Column {
                column_type: inspection.column_type,
                constraints,
            },
        );
    }

    let primary = derive_primary_key(table_name, &columns)?;

    Ok(Table {
        name: table_name.to_string(),
        columns,
        composite_keys: CompositeKeys { primary },
        indexes,
    })
}

fn tagged_with<F>(columns: &IndexMap<String, Column>, pick: F) -> Vec<String>
where
    F: Fn(&ColumnConstraints) -> bool,
{
    columns
        .iter()
        .filter(|(_, column)| pick(&column.constraints))
        .map(|(name, _)| name.clone())
        .collect()
}

fn derive_primary_key(table: &str, columns: &IndexMap<String, Column>) -> CompileResult<Option<Vec<String>>> {
    let primary_keys = tagged_with(columns, |c| c.primary_key);
    let trial = tagged_with(columns, |c| c.trial_id);
    let block = tagged_with(columns, |c| c.block_id);
    let condition = tagged_with(columns, |c| c.condition_id);

    if !primary_keys.is_empty() {
        if !trial.is_empty() || !block.is_empty() || !condition.is_empty() {
            let id_fields = trial.into_iter().chain(block).chain(condition).collect();
            return Err(CompileError::ConflictingKeyStrategy {
                table: table.to_string(),
                primary_keys,
                id_fields,
            });
        }
        return Ok(Some(primary_keys));
    }

    match trial.len() {
        0 => {
            return Err(CompileError::MissingTrialId {
                table: table.to_string(),
            })
        }
        1 => {}
        _ => {
            return Err(CompileError::MultipleTrialId {
                table: table.to_string(),
                fields: trial,
            })
        }
    }
    if block.len() > 1 {
        return Err(CompileError::MultipleBlockId {
            table: table.to_string(),
            fields: block,
        });
    }
    if condition.len() > 1 {
        return Err(CompileError::MultipleConditionId {
            table: table.to_string(),
            fields: condition,
        });
    }

    Ok(Some(trial.into_iter().chain(block).chain(condition).collect()))
}
