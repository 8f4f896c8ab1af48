//! Compiling a set of schemas into validated tables
//!
//! Compilation is a pure function of its input. A failing table is reported
//! alongside the tables that compiled; it never stops its siblings.

use super::errors::{CompileError, CompileResult};
use super::model::Table;
use super::normalizer::normalize;
use super::validator::validate_table;
use crate::observability::Logger;
use crate::schema::ObjectSchema;

/// Normalizes and validates one table.
pub fn compile_table(name: &str, schema: &ObjectSchema) -> CompileResult<Table> {
    let table = normalize(name, schema)?;
    validate_table(&table)?;
    Ok(table)
}

/// Tables that compiled plus the errors of those that did not
#[derive(Debug, Clone, Default)]
pub struct CompiledTables {
    pub tables: Vec<Table>,
    pub failures: Vec<CompileError>,
}

impl CompiledTables {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// All tables, or every failure if any table failed
    pub fn into_result(self) -> Result<Vec<Table>, Vec<CompileError>> {
        if self.failures.is_empty() {
            Ok(self.tables)
        } else {
            Err(self.failures)
        }
    }
}

/// Compiles every `(name, schema)` pair, in order.
pub fn compile_tables<'a, I>(schemas: I) -> CompiledTables
where
    I: IntoIterator<Item = (&'a str, &'a ObjectSchema)>,
{
    let mut compiled = CompiledTables::default();

    for (name, schema) in schemas {
        match compile_table(name, schema) {
            Ok(table) => {
                let columns = table.columns.len().to_string();
                Logger::debug("TABLE_COMPILED", &[("table", name), ("columns", &columns)]);
                compiled.tables.push(table);
            }
            Err(e) => {
                Logger::error(
                    "TABLE_COMPILE_FAILED",
                    &[("table", name), ("code", e.code()), ("reason", &e.to_string())],
                );
                compiled.failures.push(e);
            }
        }
    }

    compiled
}
