//! Field schema inspection
//!
//! Unwraps modifier chains to the base kind, merges tags from every level of
//! the chain, and maps the base kind to a column type.

use super::errors::{SchemaError, SchemaResult};
use super::field::{FieldNode, FieldSchema, Tags};
use crate::table::ColumnType;

/// What a field schema means for storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInspection {
    /// Column type of the innermost node
    pub column_type: ColumnType,
    /// Tags merged across the wrapper chain
    pub tags: Tags,
    /// True if any wrapper is optional, nullable or defaulted
    pub optional: bool,
}

/// Inspects a field schema for table compilation.
pub fn inspect(field: &FieldSchema) -> SchemaResult<FieldInspection> {
    Ok(FieldInspection {
        column_type: column_type(field)?,
        tags: merged_tags(field),
        optional: is_optional(field),
    })
}

/// Returns the innermost non-wrapper node.
pub fn unwrap_base(field: &FieldSchema) -> &FieldSchema {
    match field.node.wrapped() {
        Some(inner) => unwrap_base(inner),
        None => field,
    }
}

/// Returns the union of tags attached anywhere in the wrapper chain.
pub fn merged_tags(field: &FieldSchema) -> Tags {
    let mut tags = field.tags.clone();
    if let Some(inner) = field.node.wrapped() {
        tags.extend(merged_tags(inner));
    }
    tags
}

/// True if any wrapper in the chain is optional, nullable or has a default.
pub fn is_optional(field: &FieldSchema) -> bool {
    match &field.node {
        FieldNode::Optional { .. } | FieldNode::Nullable { .. } | FieldNode::Default { .. } => true,
        _ => field.node.wrapped().map_or(false, is_optional),
    }
}

/// Maps the base kind to a column type.
pub fn column_type(field: &FieldSchema) -> SchemaResult<ColumnType> {
    let base = unwrap_base(field);
    match &base.node {
        FieldNode::Text | FieldNode::Enum { .. } => Ok(ColumnType::Text),
        FieldNode::Number { .. } => Ok(ColumnType::Number),
        FieldNode::Boolean => Ok(ColumnType::Boolean),
        FieldNode::Date => Ok(ColumnType::Date),
        FieldNode::Object { .. } | FieldNode::Array { .. } => Ok(ColumnType::Json),
        other => Err(SchemaError::unsupported_type(other.kind_name())),
    }
}
