//! Built-in meta tables present in every deployment

use serde_json::json;

use crate::schema::{FieldSchema, ObjectSchema};

pub const PARTICIPANTS: &str = "participants";
pub const SESSIONS: &str = "sessions";
pub const BLOCKS: &str = "blocks";
pub const TRIALS: &str = "trials";

pub fn participant_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field("id", FieldSchema::text().primary_key())
        .field("experiment", FieldSchema::text().index())
        .field("platform", FieldSchema::text().index())
        .field("startedAt", FieldSchema::date().index())
        .field("completedAt", FieldSchema::date().optional())
        .field(
            "status",
            FieldSchema::enumeration(["active", "completed", "withdrawn"])
                .with_default(json!("active"))
                .index(),
        )
        .field("metadata", FieldSchema::object(ObjectSchema::new()).optional())
}

pub fn session_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field("id", FieldSchema::text().primary_key())
        .field("participant", FieldSchema::text().index())
        .field("platform", FieldSchema::text().index())
        .field("experiment", FieldSchema::text().index())
        .field("condition", FieldSchema::text().optional())
        .field("startedAt", FieldSchema::date().index())
        .field("completedAt", FieldSchema::date().optional())
        .field("timezone", FieldSchema::text().optional())
        .field("metadata", FieldSchema::object(ObjectSchema::new()))
}

pub fn block_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field("id", FieldSchema::text().primary_key())
        .field("sessionId", FieldSchema::text().index())
        .field("blockNumber", FieldSchema::number().index())
        .field("blockType", FieldSchema::text().optional())
        .field("startedAt", FieldSchema::date().index())
        .field("completedAt", FieldSchema::date().optional())
}

pub fn trial_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field("id", FieldSchema::text().primary_key())
        .field("sessionID", FieldSchema::text().index())
        .field("blockID", FieldSchema::text().optional().index())
        .field("trialNumber", FieldSchema::number().index())
        .field("stimuliID", FieldSchema::text().index())
        .field("stimuliTable", FieldSchema::text().index())
        .field("presentedAt", FieldSchema::date().index())
        .field("respondedAt", FieldSchema::date().optional())
        .field("response", FieldSchema::object(ObjectSchema::new()).optional())
        .field("reactionTime", FieldSchema::number().optional())
        .field("metadata", FieldSchema::object(ObjectSchema::new()).optional())
}

/// The meta table schemas in creation order
pub fn meta_schemas() -> Vec<(&'static str, ObjectSchema)> {
    vec![
        (PARTICIPANTS, participant_schema()),
        (SESSIONS, session_schema()),
        (BLOCKS, block_schema()),
        (TRIALS, trial_schema()),
    ]
}
