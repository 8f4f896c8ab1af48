//! Build Pipeline Tests
//!
//! Config file to seeded database, end to end:
//! - Meta, experiment and stimuli tables all exist after a build
//! - Stimuli are seeded from files under the stimuli directory
//! - Rebuilding recreates tables instead of appending
//! - Invalid experiment versions are skipped

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use smiledb::config::Config;
use smiledb::database::Database;
use smiledb::experiment::{build, build_into};
use smiledb::seed::SeedOutcome;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

const CONFIG: &str = r#"{
    "log_level": "warn",
    "sql_output": ".smile/sql/tables.sql",
    "experiments": {
        "stroop-v1": {
            "schema": {
                "trial": { "type": "number", "tags": ["trialID"] },
                "block": { "type": "text", "tags": ["blockID"] },
                "response": { "type": "enum", "values": ["left", "right"] },
                "rt": { "type": "optional", "inner": { "type": "number", "min": 0 } }
            },
            "stimuli": {
                "name": "colorWords",
                "source": ["words/*.csv", "extra.jsonl"],
                "schema": {
                    "item": { "type": "number", "tags": ["trialID"] },
                    "word": { "type": "text", "tags": ["index"] },
                    "ink": { "type": "text" }
                }
            }
        },
        "9-bad-version": {
            "stimuli": { "name": "ignored", "source": "nothing/*.csv" }
        }
    }
}"#;

fn setup_project() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let stimuli = tmp.path().join("stimuli");
    fs::create_dir_all(stimuli.join("words")).unwrap();
    fs::write(stimuli.join("words/congruent.csv"), "item,word,ink\n1,red,red\n2,blue,blue\n").unwrap();
    fs::write(stimuli.join("words/incongruent.csv"), "item,word,ink\n3,red,blue\n").unwrap();
    fs::write(stimuli.join("words/.draft.csv"), "item,word,ink\n99,x,y\n").unwrap();
    fs::write(stimuli.join("extra.jsonl"), "{\"item\": 4, \"word\": \"green\", \"ink\": \"red\"}\n").unwrap();

    let config_path = tmp.path().join("smile.json");
    fs::write(&config_path, CONFIG).unwrap();
    (tmp, config_path)
}

fn count_rows(db_path: &Path, table: &str) -> i64 {
    let conn = Connection::open(db_path).unwrap();
    conn.query_row(&format!("SELECT COUNT(*) FROM \"{}\"", table), [], |row| row.get(0))
        .unwrap()
}

// =============================================================================
// End-to-end Tests
// =============================================================================

#[tokio::test]
async fn test_build_from_config_file() {
    let (tmp, config_path) = setup_project();
    let config = Config::load(&config_path).unwrap();

    let report = build(&config).await.unwrap();
    assert!(report.is_clean(), "{:?}", report);
    assert_eq!(
        report.tables,
        vec![
            "participants",
            "sessions",
            "blocks",
            "trials",
            "_experiment-stroop-v1",
            "_stimuli-color-words",
        ]
    );
    assert_eq!(report.seeded[0].outcome, SeedOutcome::AllSucceeded { count: 4 });
    assert_eq!(report.seeded[0].sources, 3);

    let db_path = tmp.path().join(".smile/database/smile.db");
    assert_eq!(count_rows(&db_path, "_stimuli-color-words"), 4);
    assert_eq!(count_rows(&db_path, "_experiment-stroop-v1"), 0);

    let script = fs::read_to_string(tmp.path().join(".smile/sql/tables.sql")).unwrap();
    assert!(script.contains("PRIMARY KEY (\"trial\", \"block\")"));
    assert!(script.contains("CREATE INDEX \"idx__stimuli-color-words_word\""));
    assert!(!script.contains("ignored"));
}

#[tokio::test]
async fn test_rebuild_recreates_tables() {
    let (tmp, config_path) = setup_project();
    let config = Config::load(&config_path).unwrap();

    build(&config).await.unwrap();
    let report = build(&config).await.unwrap();
    assert_eq!(report.seeded[0].outcome, SeedOutcome::AllSucceeded { count: 4 });

    let db_path = tmp.path().join(".smile/database/smile.db");
    assert_eq!(count_rows(&db_path, "_stimuli-color-words"), 4);
}

#[tokio::test]
async fn test_dev_participant_after_build() {
    let (_tmp, config_path) = setup_project();
    let config = Config::load(&config_path).unwrap();
    let database = Database::open_in_memory().unwrap();

    build_into(&config, &database).await.unwrap();
    let participant = database.create_test_participant("stroop-v1").await.unwrap();
    database.create_test_session(&participant, "stroop-v1").await.unwrap();

    let names = database.table_names().await.unwrap();
    assert!(names.contains(&"participants".to_string()));
    assert!(names.contains(&"_stimuli-color-words".to_string()));
}
