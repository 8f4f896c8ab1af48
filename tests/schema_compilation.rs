//! Schema Compilation Tests
//!
//! Field schemas to tables to DDL:
//! - Wrapper chains are optional and unwrap to their innermost kind
//! - Key strategy: explicit primary key or trial/block/condition ids
//! - Index validation names the table and the offending identifier
//! - DDL text is exact

use smiledb::schema::{inspect, FieldSchema, ObjectSchema};
use smiledb::sql::{create_indexes, create_table, table_statements};
use smiledb::table::{compile_table, compile_tables, validate_table, ColumnType, CompileError, Index};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn experiment_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field("condition", FieldSchema::text().condition_id())
        .field("rt", FieldSchema::number().optional())
        .field("block", FieldSchema::number().block_id())
        .field("trial", FieldSchema::number().trial_id().index())
}

// =============================================================================
// Inspector Tests
// =============================================================================

#[test]
fn test_wrapper_chains_are_optional() {
    let chains = vec![
        (FieldSchema::text().optional(), ColumnType::Text),
        (FieldSchema::number().nullable(), ColumnType::Number),
        (FieldSchema::boolean().with_default(json!(false)), ColumnType::Boolean),
        (FieldSchema::date().optional().nullable(), ColumnType::Date),
        (
            FieldSchema::object(ObjectSchema::new()).nullable().with_default(json!({})).optional(),
            ColumnType::Json,
        ),
        (FieldSchema::array(FieldSchema::text()).optional().optional(), ColumnType::Json),
    ];

    for (field, expected) in chains {
        let inspection = inspect(&field).unwrap();
        assert!(inspection.optional, "{:?}", field);
        assert_eq!(inspection.column_type, expected);
    }
}

#[test]
fn test_tags_merge_across_wrappers() {
    let field = FieldSchema::text().unique().optional().index();
    let table = compile_table("_experiment-v1", &experiment_schema().field("label", field)).unwrap();

    let label = table.column("label").unwrap();
    assert!(label.constraints.unique);
    assert!(label.constraints.index);
    assert!(label.constraints.optional);
}

// =============================================================================
// Key Strategy Tests
// =============================================================================

#[test]
fn test_meta_primary_key() {
    let schema = ObjectSchema::new()
        .field("id", FieldSchema::text().primary_key())
        .field("name", FieldSchema::text());
    let table = compile_table("participants", &schema).unwrap();
    assert_eq!(table.composite_keys.primary, Some(vec!["id".to_string()]));

    let mixed = schema.field("trial", FieldSchema::number().trial_id());
    let err = compile_table("participants", &mixed).unwrap_err();
    assert!(matches!(err, CompileError::ConflictingKeyStrategy { .. }));
    assert!(err.to_string().contains("cannot mix primaryKey"));
}

#[test]
fn test_trial_id_cardinality() {
    let none = ObjectSchema::new().field("word", FieldSchema::text());
    assert_eq!(
        compile_table("_stimuli-words", &none).unwrap_err(),
        CompileError::MissingTrialId { table: "_stimuli-words".into() }
    );

    let two = ObjectSchema::new()
        .field("a", FieldSchema::number().trial_id())
        .field("b", FieldSchema::number().trial_id());
    assert!(matches!(
        compile_table("_stimuli-words", &two).unwrap_err(),
        CompileError::MultipleTrialId { ref fields, .. } if fields == &["a", "b"]
    ));
}

#[test]
fn test_composite_key_order_is_fixed() {
    let table = compile_table("_experiment-v1", &experiment_schema()).unwrap();
    assert_eq!(
        table.composite_keys.primary,
        Some(vec!["trial".to_string(), "block".to_string(), "condition".to_string()])
    );
    assert!(create_table(&table).ends_with("  PRIMARY KEY (\"trial\", \"block\", \"condition\")\n);"));
}

// =============================================================================
// DDL Tests
// =============================================================================

#[test]
fn test_create_table_exact_text() {
    let schema = ObjectSchema::new()
        .field("id", FieldSchema::text().primary_key())
        .field("name", FieldSchema::text().optional());
    let table = compile_table("t", &schema).unwrap();

    assert_eq!(
        create_table(&table),
        "CREATE TABLE \"t\" (\n  \"id\" TEXT NOT NULL,\n  \"name\" TEXT\n);"
    );
}

#[test]
fn test_statement_order() {
    let table = compile_table("_experiment-v1", &experiment_schema()).unwrap();
    let statements = table_statements(&table);

    assert_eq!(statements[0], "DROP TABLE IF EXISTS \"_experiment-v1\";");
    assert!(statements[1].starts_with("CREATE TABLE \"_experiment-v1\""));
    assert_eq!(
        &statements[2..],
        &["CREATE INDEX \"idx__experiment-v1_trial\" ON \"_experiment-v1\" (\"trial\");".to_string()]
    );
    assert_eq!(create_indexes(&table).len(), 1);
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_dangling_index_names_table_and_column() {
    let mut table = compile_table("_experiment-v1", &experiment_schema()).unwrap();
    table.indexes.push(Index::for_column("_experiment-v1", "ghost"));

    let err = validate_table(&table).unwrap_err();
    assert_eq!(
        err,
        CompileError::DanglingIndexReference {
            table: "_experiment-v1".into(),
            index: "idx__experiment-v1_ghost".into(),
            column: "ghost".into(),
        }
    );
    let msg = err.to_string();
    assert!(msg.contains("_experiment-v1") && msg.contains("ghost"));
}

#[test]
fn test_duplicate_index_names_table_and_index() {
    let mut table = compile_table("_experiment-v1", &experiment_schema()).unwrap();
    table.indexes.push(Index::for_column("_experiment-v1", "trial"));

    let err = validate_table(&table).unwrap_err();
    assert_eq!(
        err,
        CompileError::DuplicateIndex {
            table: "_experiment-v1".into(),
            index: "idx__experiment-v1_trial".into(),
        }
    );
}

#[test]
fn test_failing_table_does_not_stop_siblings() {
    let good = experiment_schema();
    let bad = ObjectSchema::new().field("choice", FieldSchema::union(vec![FieldSchema::text(), FieldSchema::number()]));

    let compiled = compile_tables(vec![("_experiment-v1", &good), ("_experiment-v2", &bad)]);
    assert_eq!(compiled.tables.len(), 1);
    assert!(matches!(
        &compiled.failures[0],
        CompileError::UnsupportedType { table, field, kind } if table == "_experiment-v2" && field == "choice" && kind == "union"
    ));
}

#[test]
fn test_tables_serialize_to_json() {
    let table = compile_table("_experiment-v1", &experiment_schema()).unwrap();
    let value = serde_json::to_value(&table).unwrap();

    assert_eq!(value["name"], "_experiment-v1");
    assert_eq!(value["columns"]["trial"]["type"], "number");
    assert_eq!(value["columns"]["trial"]["constraints"]["trialID"], true);
    assert_eq!(value["columns"]["rt"]["constraints"]["optional"], true);
    assert_eq!(value["compositeKeys"]["primary"], json!(["trial", "block", "condition"]));
}
