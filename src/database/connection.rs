//! SQLite-backed database handle

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};
use serde_json::{json, Value};
use uuid::Uuid;

use super::errors::{DatabaseError, DatabaseResult};
use crate::builder::TableDefinition;
use crate::observability::{Logger, ObservationScope};
use crate::schema::Record;
use crate::seed::{RecordSink, SeedError, SeedResult};
use crate::sql::dialect::format_timestamp;
use crate::sql::table_statements;
use crate::table::meta::{participant_schema, session_schema, PARTICIPANTS, SESSIONS};
use crate::table::{compile_table, Table};

const DEFER_FOREIGN_KEYS: &str = "PRAGMA defer_foreign_keys = ON;";

/// Shared handle to one SQLite database
///
/// Clones share the connection. Statements run on blocking workers.
#[derive(Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("path", &self.path).finish()
    }
}

fn with_connection<T>(
    connection: &Mutex<Connection>,
    f: impl FnOnce(&mut Connection) -> DatabaseResult<T>,
) -> DatabaseResult<T> {
    let mut guard = connection.lock().map_err(|_| DatabaseError::Poisoned)?;
    f(&mut guard)
}

impl Database {
    /// Opens (or creates) the database file, creating parent directories.
    pub fn open(path: &Path) -> DatabaseResult<Self> {
        let open_error = |reason: String| DatabaseError::Open {
            path: path.display().to_string(),
            reason,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| open_error(e.to_string()))?;
        }
        let connection = Connection::open(path).map_err(|e| open_error(e.to_string()))?;

        Logger::debug("DATABASE_OPENED", &[("path", &path.display().to_string())]);
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
            path: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> DatabaseResult<Self> {
        let connection = Connection::open_in_memory()?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
            path: None,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn run<T, F>(&self, f: F) -> DatabaseResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> DatabaseResult<T> + Send + 'static,
    {
        let connection = self.connection.clone();
        tokio::task::spawn_blocking(move || with_connection(&connection, f))
            .await
            .map_err(|e| DatabaseError::Worker(e.to_string()))?
    }

    /// Drops and recreates every table in one transaction.
    ///
    /// Statements run in order (per table: drop, create, indexes) with
    /// foreign key checks deferred until commit. Any failure rolls back the
    /// whole batch. Returns the number of statements executed.
    pub async fn initialize(&self, tables: &[Table]) -> DatabaseResult<usize> {
        let statements: Vec<String> = tables.iter().flat_map(table_statements).collect();
        let scope = ObservationScope::with_fields("DATABASE_INITIALIZE", &[("tables", &tables.len().to_string())]);

        let result = self
            .run(move |connection| {
                let tx = connection.transaction()?;
                tx.execute_batch(DEFER_FOREIGN_KEYS)?;
                for statement in &statements {
                    Logger::debug("DDL_EXECUTE", &[("statement", statement)]);
                    tx.execute_batch(statement).map_err(|e| DatabaseError::Ddl {
                        statement: statement.clone(),
                        reason: e.to_string(),
                    })?;
                }
                tx.commit()?;
                Ok(statements.len())
            })
            .await;

        match &result {
            Ok(count) => scope.complete_with_fields(&[("statements", &count.to_string())]),
            Err(e) => scope.fail(&e.to_string()),
        }
        result
    }

    /// Names of all user tables, sorted.
    pub async fn table_names(&self) -> DatabaseResult<Vec<String>> {
        self.run(|connection| {
            let mut stmt = connection
                .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name")?;
            let names = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(names)
        })
        .await
    }

    /// Reads every row of a table back through the column codecs.
    pub async fn select_all(&self, table: &TableDefinition) -> DatabaseResult<Vec<Record>> {
        let definition = table.clone();
        self.run(move |connection| {
            let width = definition.columns().len();
            let mut stmt = connection.prepare(&definition.select_statement())?;
            let raw = stmt
                .query_map([], |row| (0..width).map(|i| row.get::<_, SqlValue>(i)).collect::<Result<Vec<_>, _>>())?
                .collect::<Result<Vec<_>, _>>()?;

            raw.into_iter()
                .map(|values| definition.decode_row(values).map_err(DatabaseError::from))
                .collect()
        })
        .await
    }

    async fn insert_one(&self, table: &TableDefinition, record: Record) -> DatabaseResult<()> {
        let params = table.encode_record(&record)?;
        let sql = table.insert_statement();
        self.run(move |connection| {
            connection.execute(&sql, params_from_iter(params))?;
            Ok(())
        })
        .await
    }

    /// Inserts a dev participant for `experiment` and returns its id.
    pub async fn create_test_participant(&self, experiment: &str) -> DatabaseResult<String> {
        let table = TableDefinition::from_table(&compile_table(PARTICIPANTS, &participant_schema())?);
        let id = format!("test-{}", Uuid::new_v4());

        let record = json!({
            "id": id,
            "experiment": experiment,
            "platform": "dev",
            "startedAt": format_timestamp(&Utc::now()),
            "status": "active",
        });
        self.insert_one(&table, into_record(record)).await?;

        Logger::debug("TEST_PARTICIPANT_CREATED", &[("id", &id), ("experiment", experiment)]);
        Ok(id)
    }

    /// Inserts a dev session for an existing participant and returns its id.
    pub async fn create_test_session(&self, participant: &str, experiment: &str) -> DatabaseResult<String> {
        let table = TableDefinition::from_table(&compile_table(SESSIONS, &session_schema())?);
        let id = format!("session-{}", Uuid::new_v4());

        let record = json!({
            "id": id,
            "participant": participant,
            "experiment": experiment,
            "platform": "dev",
            "startedAt": format_timestamp(&Utc::now()),
            "metadata": {},
        });
        self.insert_one(&table, into_record(record)).await?;

        Logger::debug("TEST_SESSION_CREATED", &[("id", &id), ("participant", participant)]);
        Ok(id)
    }
}

fn into_record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}

fn insert_rows(connection: &mut Connection, sql: &str, rows: Vec<Vec<SqlValue>>) -> DatabaseResult<usize> {
    let tx = connection.transaction()?;
    let mut inserted = 0;
    {
        let mut stmt = tx.prepare(sql)?;
        for row in rows {
            inserted += stmt.execute(params_from_iter(row))?;
        }
    }
    tx.commit()?;
    Ok(inserted)
}

#[async_trait]
impl RecordSink for Database {
    async fn insert_batch(&self, table: &TableDefinition, records: &[Record]) -> SeedResult<usize> {
        let name = table.name().to_string();
        let rows = records
            .iter()
            .enumerate()
            .map(|(row, record)| {
                table.encode_record(record).map_err(|e| SeedError::Encode {
                    table: name.clone(),
                    row,
                    reason: e.to_string(),
                })
            })
            .collect::<SeedResult<Vec<_>>>()?;
        let sql = table.insert_statement();

        self.run(move |connection| insert_rows(connection, &sql, rows))
            .await
            .map_err(|e| match e {
                DatabaseError::Worker(reason) => SeedError::Worker(reason),
                other => SeedError::Insert {
                    table: name,
                    reason: other.to_string(),
                },
            })
    }
}
