//! Declarative field schemas
//!
//! Experiment authors describe their data with field schemas: a base kind
//! (text, number, boolean, date, enum, object, array) wrapped in optional,
//! nullable or default modifiers and annotated with semantic tags
//! (`primaryKey`, `unique`, `index`, `trialID`, `blockID`, `conditionID`).
//!
//! - `field`: the schema node types and their builder methods
//! - `inspector`: unwraps a field to its column type, tags and optionality
//! - `validator`: validates and coerces decoded records before seeding

mod errors;
mod field;
pub mod inspector;
mod validator;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, ValidationDetails};
pub use field::{FieldNode, FieldSchema, ObjectSchema, Tag, Tags};
pub use inspector::{inspect, FieldInspection};
pub use validator::{Record, RecordValidator};
