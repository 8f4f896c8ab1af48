//! Query-time table definitions
//!
//! `TableDefinition` is the ORM-style view of a compiled `Table`: one column
//! builder per column, one index builder per index. Column builders carry the
//! codec for their type, so reads and writes go through the same conversions
//! the DDL was generated for.
//!
//! Constraint order on a column builder is fixed: primary key, then unique
//! (skipped on primary keys), then not-null (skipped on optional columns).

use rusqlite::types::Value as SqlValue;
use serde_json::Value;

use crate::schema::Record;
use crate::sql::dialect::{escape_identifier, mapping, CodecError, ColumnCodec, SqlType};
use crate::table::{Column, ColumnType, Table};

/// Builder for a single column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBuilder {
    name: String,
    column_type: ColumnType,
    primary_key: bool,
    auto_increment: bool,
    unique: bool,
    not_null: bool,
}

impl ColumnBuilder {
    fn new(name: &str, column_type: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            column_type,
            primary_key: false,
            auto_increment: false,
            unique: false,
            not_null: false,
        }
    }

    pub fn text(name: &str) -> Self {
        Self::new(name, ColumnType::Text)
    }

    pub fn integer(name: &str) -> Self {
        Self::new(name, ColumnType::Number)
    }

    /// Integer column in boolean mode
    pub fn boolean(name: &str) -> Self {
        Self::new(name, ColumnType::Boolean)
    }

    /// Text column with the date codec
    pub fn date(name: &str) -> Self {
        Self::new(name, ColumnType::Date)
    }

    /// Text column with the JSON codec
    pub fn json(name: &str) -> Self {
        Self::new(name, ColumnType::Json)
    }

    /// Picks the builder for a column type.
    pub fn for_type(name: &str, column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Text => Self::text(name),
            ColumnType::Number => Self::integer(name),
            ColumnType::Boolean => Self::boolean(name),
            ColumnType::Date => Self::date(name),
            ColumnType::Json => Self::json(name),
        }
    }

    pub fn primary_key(mut self, auto_increment: bool) -> Self {
        self.primary_key = true;
        self.auto_increment = auto_increment;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Builds the column for a compiled model column.
    pub fn from_column(name: &str, column: &Column) -> Self {
        let constraints = &column.constraints;
        let mut builder = Self::for_type(name, column.column_type);

        if constraints.primary_key {
            builder = builder.primary_key(column.column_type == ColumnType::Number);
        }
        if constraints.unique && !constraints.primary_key {
            builder = builder.unique();
        }
        if !constraints.optional {
            builder = builder.not_null();
        }
        builder
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn sql_type(&self) -> SqlType {
        mapping(self.column_type).sql_type
    }

    pub fn codec(&self) -> ColumnCodec {
        mapping(self.column_type).codec
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn is_auto_increment(&self) -> bool {
        self.auto_increment
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn is_not_null(&self) -> bool {
        self.not_null
    }

    pub fn encode(&self, value: &Value) -> Result<SqlValue, CodecError> {
        self.codec().encode(self.column_type, value)
    }

    pub fn decode(&self, value: SqlValue) -> Result<Value, CodecError> {
        self.codec().decode(self.column_type, value)
    }
}

/// Builder for a named index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexBuilder {
    name: String,
    columns: Vec<String>,
    unique: bool,
}

impl IndexBuilder {
    pub fn index(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
            unique: false,
        }
    }

    pub fn on<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }
}

/// ORM-style definition of one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    name: String,
    columns: Vec<ColumnBuilder>,
    indexes: Vec<IndexBuilder>,
    primary_key: Option<Vec<String>>,
}

impl TableDefinition {
    pub fn from_table(table: &Table) -> Self {
        let columns = table
            .columns
            .iter()
            .map(|(name, column)| ColumnBuilder::from_column(name, column))
            .collect();

        let indexes = table
            .indexes
            .iter()
            .map(|index| {
                let builder = IndexBuilder::index(&index.name).on(index.columns.iter().cloned());
                if index.unique {
                    builder.unique()
                } else {
                    builder
                }
            })
            .collect();

        Self {
            name: table.name.clone(),
            columns,
            indexes,
            primary_key: table.primary_key().map(<[String]>::to_vec),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[ColumnBuilder] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnBuilder> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn indexes(&self) -> &[IndexBuilder] {
        &self.indexes
    }

    pub fn primary_key(&self) -> Option<&[String]> {
        self.primary_key.as_deref()
    }

    fn column_list(&self) -> String {
        self.columns
            .iter()
            .map(|c| escape_identifier(&c.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Single-row parameterized insert over every column.
    pub fn insert_statement(&self) -> String {
        let placeholders = (1..=self.columns.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            escape_identifier(&self.name),
            self.column_list(),
            placeholders
        )
    }

    /// Selects every column in definition order.
    pub fn select_statement(&self) -> String {
        format!(
            "SELECT {} FROM {}",
            self.column_list(),
            escape_identifier(&self.name)
        )
    }

    /// Encodes a record into insert parameters. Absent keys become NULL.
    pub fn encode_record(&self, record: &Record) -> Result<Vec<SqlValue>, CodecError> {
        self.columns
            .iter()
            .map(|column| column.encode(record.get(&column.name).unwrap_or(&Value::Null)))
            .collect()
    }

    /// Decodes a row selected with `select_statement`.
    pub fn decode_row(&self, values: Vec<SqlValue>) -> Result<Record, CodecError> {
        self.columns
            .iter()
            .zip(values)
            .map(|(column, value)| Ok((column.name.clone(), column.decode(value)?)))
            .collect()
    }
}
