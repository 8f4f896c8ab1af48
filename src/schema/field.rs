//! Declarative field schema definitions
//!
//! A field schema is a base kind optionally wrapped in `optional`, `nullable`
//! or `default` modifiers, with semantic tags attached at any level of the
//! chain. Tag and modifier methods consume the schema and return a new one.
//!
//! Serialized form (used by configuration files):
//!
//! ```json
//! { "type": "text", "tags": ["primaryKey"] }
//! { "type": "optional", "inner": { "type": "number", "min": 1 }, "tags": ["index"] }
//! ```

use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Semantic tags that drive key and index derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tag {
    #[serde(rename = "primaryKey")]
    PrimaryKey,
    #[serde(rename = "unique")]
    Unique,
    #[serde(rename = "index")]
    Index,
    #[serde(rename = "trialID")]
    TrialId,
    #[serde(rename = "blockID")]
    BlockId,
    #[serde(rename = "conditionID")]
    ConditionId,
}

impl Tag {
    /// Returns the tag name as written in schemas
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::PrimaryKey => "primaryKey",
            Tag::Unique => "unique",
            Tag::Index => "index",
            Tag::TrialId => "trialID",
            Tag::BlockId => "blockID",
            Tag::ConditionId => "conditionID",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered set of tags attached to one node
pub type Tags = BTreeSet<Tag>;

/// The closed set of field schema kinds, including wrapper nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldNode {
    /// UTF-8 text
    Text,
    /// Numeric value with optional inclusive bounds
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    /// Boolean
    Boolean,
    /// Point in time, stored as an ISO-8601 string
    Date,
    /// One of a fixed list of strings
    Enum { values: Vec<String> },
    /// Nested object
    Object { fields: ObjectSchema },
    /// Homogeneous list
    Array { element: Box<FieldSchema> },
    /// Any of several schemas; has no storage mapping
    Union { variants: Vec<FieldSchema> },
    /// Unconstrained value; has no storage mapping
    Any,
    /// Value may be absent
    Optional { inner: Box<FieldSchema> },
    /// Value may be null
    Nullable { inner: Box<FieldSchema> },
    /// Absent or null values are replaced by `value`
    Default { inner: Box<FieldSchema>, value: Value },
}

impl FieldNode {
    /// Returns the kind name for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldNode::Text => "text",
            FieldNode::Number { .. } => "number",
            FieldNode::Boolean => "boolean",
            FieldNode::Date => "date",
            FieldNode::Enum { .. } => "enum",
            FieldNode::Object { .. } => "object",
            FieldNode::Array { .. } => "array",
            FieldNode::Union { .. } => "union",
            FieldNode::Any => "any",
            FieldNode::Optional { .. } => "optional",
            FieldNode::Nullable { .. } => "nullable",
            FieldNode::Default { .. } => "default",
        }
    }

    /// Returns the wrapped schema for modifier nodes
    pub fn wrapped(&self) -> Option<&FieldSchema> {
        match self {
            FieldNode::Optional { inner }
            | FieldNode::Nullable { inner }
            | FieldNode::Default { inner, .. } => Some(inner),
            _ => None,
        }
    }
}

/// A field schema node plus the tags annotated on it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(flatten)]
    pub node: FieldNode,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: Tags,
}

impl FieldSchema {
    /// Wraps a bare node with no tags
    pub fn new(node: FieldNode) -> Self {
        Self {
            node,
            tags: Tags::new(),
        }
    }

    pub fn text() -> Self {
        Self::new(FieldNode::Text)
    }

    pub fn number() -> Self {
        Self::new(FieldNode::Number {
            min: None,
            max: None,
        })
    }

    pub fn boolean() -> Self {
        Self::new(FieldNode::Boolean)
    }

    pub fn date() -> Self {
        Self::new(FieldNode::Date)
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(FieldNode::Enum {
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    pub fn object(fields: ObjectSchema) -> Self {
        Self::new(FieldNode::Object { fields })
    }

    pub fn array(element: FieldSchema) -> Self {
        Self::new(FieldNode::Array {
            element: Box::new(element),
        })
    }

    pub fn union(variants: Vec<FieldSchema>) -> Self {
        Self::new(FieldNode::Union { variants })
    }

    pub fn any() -> Self {
        Self::new(FieldNode::Any)
    }

    /// Sets an inclusive lower bound. Only meaningful on number nodes.
    pub fn min(mut self, bound: f64) -> Self {
        if let FieldNode::Number { min, .. } = &mut self.node {
            *min = Some(bound);
        }
        self
    }

    /// Sets an inclusive upper bound. Only meaningful on number nodes.
    pub fn max(mut self, bound: f64) -> Self {
        if let FieldNode::Number { max, .. } = &mut self.node {
            *max = Some(bound);
        }
        self
    }

    pub fn optional(self) -> Self {
        Self::new(FieldNode::Optional {
            inner: Box::new(self),
        })
    }

    pub fn nullable(self) -> Self {
        Self::new(FieldNode::Nullable {
            inner: Box::new(self),
        })
    }

    pub fn with_default(self, value: Value) -> Self {
        Self::new(FieldNode::Default {
            inner: Box::new(self),
            value,
        })
    }

    /// Returns a copy of this schema carrying `tag`
    pub fn tagged(mut self, tag: Tag) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn primary_key(self) -> Self {
        self.tagged(Tag::PrimaryKey)
    }

    pub fn unique(self) -> Self {
        self.tagged(Tag::Unique)
    }

    pub fn index(self) -> Self {
        self.tagged(Tag::Index)
    }

    pub fn trial_id(self) -> Self {
        self.tagged(Tag::TrialId)
    }

    pub fn block_id(self) -> Self {
        self.tagged(Tag::BlockId)
    }

    pub fn condition_id(self) -> Self {
        self.tagged(Tag::ConditionId)
    }
}

/// An object-shaped schema: field name to field schema, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectSchema {
    fields: IndexMap<String, FieldSchema>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field, replacing any earlier field with the same name
    pub fn field(mut self, name: impl Into<String>, schema: FieldSchema) -> Self {
        self.fields.insert(name.into(), schema);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSchema)> {
        self.fields.iter().map(|(name, schema)| (name.as_str(), schema))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, FieldSchema)> for ObjectSchema {
    fn from_iter<T: IntoIterator<Item = (S, FieldSchema)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
