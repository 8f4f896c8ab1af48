//! Engine-agnostic table model
//!
//! A `Table` is produced once per dataset by the normalizer, checked by the
//! validator and then only read: by the DDL generator, the builder adapter and
//! the seeding engine. It serializes to the JSON shape emitted by
//! `smiledb tables`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Storage kinds a column can have. Structured values use `Json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Number,
    Boolean,
    Date,
    Json,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Number => "number",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::Json => "json",
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Per-column constraints derived from field tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnConstraints {
    #[serde(default, skip_serializing_if = "is_false")]
    pub primary_key: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub unique: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub index: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, rename = "trialID", skip_serializing_if = "is_false")]
    pub trial_id: bool,
    #[serde(default, rename = "blockID", skip_serializing_if = "is_false")]
    pub block_id: bool,
    #[serde(default, rename = "conditionID", skip_serializing_if = "is_false")]
    pub condition_id: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub constraints: ColumnConstraints,
}

impl Column {
    pub fn new(column_type: ColumnType) -> Self {
        Self {
            column_type,
            constraints: ColumnConstraints::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeKeys {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub columns: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub unique: bool,
}

impl Index {
    /// Single-column index named `idx_<table>_<column>`
    pub fn for_column(table: &str, column: &str) -> Self {
        Self {
            name: format!("idx_{}_{}", table, column),
            columns: vec![column.to_string()],
            unique: false,
        }
    }
}

/// Intermediate table representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub name: String,
    /// Columns in schema declaration order
    pub columns: IndexMap<String, Column>,
    pub composite_keys: CompositeKeys,
    pub indexes: Vec<Index>,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// The derived primary key columns, if any
    pub fn primary_key(&self) -> Option<&[String]> {
        self.composite_keys
            .primary
            .as_deref()
            .filter(|columns| !columns.is_empty())
    }

    /// True when the key spans more than one column
    pub fn has_composite_key(&self) -> bool {
        self.primary_key().map_or(false, |columns| columns.len() > 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_json_shape() {
        let mut columns = IndexMap::new();
        let mut id = Column::new(ColumnType::Text);
        id.constraints.primary_key = true;
        columns.insert("id".to_string(), id);

        let table = Table {
            name: "participants".into(),
            columns,
            composite_keys: CompositeKeys {
                primary: Some(vec!["id".into()]),
            },
            indexes: vec![Index::for_column("participants", "id")],
        };

        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(value["columns"]["id"]["type"], "text");
        assert_eq!(value["columns"]["id"]["constraints"]["primaryKey"], true);
        assert_eq!(value["columns"]["id"]["constraints"]["optional"], false);
        assert_eq!(value["compositeKeys"]["primary"][0], "id");
        assert_eq!(value["indexes"][0]["name"], "idx_participants_id");

        let back: Table = serde_json::from_value(value).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_composite_key_detection() {
        let mut table = Table {
            name: "t".into(),
            columns: IndexMap::new(),
            composite_keys: CompositeKeys::default(),
            indexes: vec![],
        };
        assert!(table.primary_key().is_none());

        table.composite_keys.primary = Some(vec!["trial".into()]);
        assert!(!table.has_composite_key());

        table.composite_keys.primary = Some(vec!["trial".into(), "block".into()]);
        assert!(table.has_composite_key());
    }
}
