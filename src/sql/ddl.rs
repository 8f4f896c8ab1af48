//! DDL generation for compiled tables
//!
//! Statement order per table: drop, create, then indexes in declaration order.

use std::fs;
use std::io;
use std::path::Path;

use super::dialect::{escape_identifier, sql_type};
use crate::table::{Column, Table};

/// `DROP TABLE IF EXISTS "<name>";`
pub fn drop_table_if_exists(table: &Table) -> String {
    format!("DROP TABLE IF EXISTS {};", escape_identifier(&table.name))
}

/// `CREATE TABLE` with columns in declaration order.
///
/// A `PRIMARY KEY (...)` clause is only emitted for multi-column keys.
pub fn create_table(table: &Table) -> String {
    let mut lines: Vec<String> = table
        .columns
        .iter()
        .map(|(name, column)| format!("  {}", column_definition(name, column)))
        .collect();

    if table.has_composite_key() {
        let key = table
            .primary_key()
            .unwrap_or_default()
            .iter()
            .map(|c| escape_identifier(c))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("  PRIMARY KEY ({})", key));
    }

    format!(
        "CREATE TABLE {} (\n{}\n);",
        escape_identifier(&table.name),
        lines.join(",\n")
    )
}

fn column_definition(name: &str, column: &Column) -> String {
    let mut parts = vec![
        escape_identifier(name),
        sql_type(column.column_type).as_str().to_string(),
    ];
    if !column.constraints.optional {
        parts.push("NOT NULL".to_string());
    }
    if column.constraints.unique && !column.constraints.primary_key {
        parts.push("UNIQUE".to_string());
    }
    parts.join(" ")
}

/// One `CREATE [UNIQUE] INDEX` per index.
pub fn create_indexes(table: &Table) -> Vec<String> {
    table
        .indexes
        .iter()
        .map(|index| {
            let columns = index
                .columns
                .iter()
                .map(|c| escape_identifier(c))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "CREATE {}INDEX {} ON {} ({});",
                if index.unique { "UNIQUE " } else { "" },
                escape_identifier(&index.name),
                escape_identifier(&table.name),
                columns
            )
        })
        .collect()
}

/// Every statement needed to (re)create a table, in execution order.
pub fn table_statements(table: &Table) -> Vec<String> {
    let mut statements = vec![drop_table_if_exists(table), create_table(table)];
    statements.extend(create_indexes(table));
    statements
}

/// Renders the statements of all tables as one SQL script.
pub fn render_script(tables: &[Table]) -> String {
    let mut script = String::new();
    for table in tables {
        script.push_str(&format!("-- {}\n", table.name));
        for statement in table_statements(table) {
            script.push_str(&statement);
            script.push('\n');
        }
        script.push('\n');
    }
    script
}

/// Writes `render_script` output to `path`, creating parent directories.
pub fn write_script(path: &Path, tables: &[Table]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_script(tables))
}
