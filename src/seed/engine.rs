//! Batched seeding with per-source and per-batch failure isolation
//!
//! Datasets seed concurrently, and so do the sources of one dataset. The
//! batches of one source are inserted in order, one at a time.

use futures_util::future::join_all;

use super::outcome::{SeedOutcome, SeedReport};
use super::sink::RecordSink;
use crate::builder::TableDefinition;
use crate::observability::Logger;
use crate::schema::{ObjectSchema, RecordValidator};
use crate::source::ResolvedSource;
use crate::table::Table;

pub const DEFAULT_BATCH_SIZE: usize = 100;

/// A compiled table with the schema it came from and its resolved sources
#[derive(Debug, Clone)]
pub struct SeedDataset {
    pub table: Table,
    pub schema: ObjectSchema,
    pub sources: Vec<ResolvedSource>,
}

#[derive(Debug, Default, Clone, Copy)]
struct SourceTally {
    rows: usize,
    inserted: usize,
    skipped: bool,
    batches: usize,
    failed_batches: usize,
}

impl SourceTally {
    fn skipped(rows: usize) -> Self {
        Self {
            rows,
            skipped: true,
            ..Self::default()
        }
    }
}

/// Seeds datasets into a `RecordSink`
pub struct Seeder<'a, S: RecordSink + ?Sized> {
    sink: &'a S,
    batch_size: usize,
}

impl<'a, S: RecordSink + ?Sized> Seeder<'a, S> {
    pub fn new(sink: &'a S) -> Self {
        Self {
            sink,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Sets the batch size. Zero is treated as one.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Seeds every dataset concurrently. Reports come back in input order.
    pub async fn seed_all(&self, datasets: Vec<SeedDataset>) -> Vec<SeedReport> {
        join_all(datasets.into_iter().map(|dataset| self.seed_dataset(dataset))).await
    }

    /// Seeds one table from all of its sources.
    pub async fn seed_dataset(&self, dataset: SeedDataset) -> SeedReport {
        let SeedDataset {
            table,
            schema,
            sources,
        } = dataset;
        let definition = TableDefinition::from_table(&table);
        let validator = RecordValidator::new(&schema);
        let source_count = sources.len();

        let tallies = join_all(
            sources
                .into_iter()
                .map(|source| self.seed_source(&definition, &validator, source)),
        )
        .await;

        let mut report = SeedReport {
            table: table.name.clone(),
            outcome: SeedOutcome::AllSucceeded { count: 0 },
            sources: source_count,
            skipped_sources: 0,
            batches: 0,
            failed_batches: 0,
        };
        let mut total = 0;
        let mut inserted = 0;
        for tally in tallies {
            total += tally.rows;
            inserted += tally.inserted;
            report.batches += tally.batches;
            report.failed_batches += tally.failed_batches;
            if tally.skipped {
                report.skipped_sources += 1;
            }
        }
        report.outcome =
            SeedOutcome::classify(total, inserted, report.skipped_sources, report.failed_batches);

        log_outcome(&report);
        report
    }

    async fn seed_source(
        &self,
        definition: &TableDefinition,
        validator: &RecordValidator<'_>,
        source: ResolvedSource,
    ) -> SourceTally {
        let table = definition.name();
        let path = source.path().display().to_string();

        let frame = match source.load().await {
            Ok(frame) => frame,
            Err(e) => {
                Logger::error(
                    "SOURCE_LOAD_FAILED",
                    &[("table", table), ("path", &path), ("code", e.code()), ("reason", &e.to_string())],
                );
                return SourceTally::skipped(0);
            }
        };

        let records = match frame.to_records() {
            Ok(records) => records,
            Err(e) => {
                Logger::error(
                    "SOURCE_LOAD_FAILED",
                    &[("table", table), ("path", &path), ("code", e.code()), ("reason", &e.to_string())],
                );
                return SourceTally::skipped(frame.height());
            }
        };

        let validated = match validator.validate_records(&records) {
            Ok(validated) => validated,
            Err(e) => {
                let row = e.row().map(|r| r.to_string()).unwrap_or_default();
                Logger::error(
                    "SOURCE_VALIDATION_FAILED",
                    &[
                        ("table", table),
                        ("path", &path),
                        ("row", &row),
                        ("code", e.code().code()),
                        ("reason", e.message()),
                    ],
                );
                return SourceTally::skipped(records.len());
            }
        };

        let mut tally = SourceTally {
            rows: validated.len(),
            ..SourceTally::default()
        };
        for (index, batch) in validated.chunks(self.batch_size).enumerate() {
            tally.batches += 1;
            match self.sink.insert_batch(definition, batch).await {
                Ok(count) => tally.inserted += count,
                Err(e) => {
                    tally.failed_batches += 1;
                    Logger::error(
                        "BATCH_INSERT_FAILED",
                        &[
                            ("table", table),
                            ("path", &path),
                            ("batch", &index.to_string()),
                            ("size", &batch.len().to_string()),
                            ("code", e.code()),
                            ("reason", &e.to_string()),
                        ],
                    );
                }
            }
        }

        Logger::debug(
            "SOURCE_SEEDED",
            &[
                ("table", table),
                ("path", &path),
                ("rows", &tally.rows.to_string()),
                ("inserted", &tally.inserted.to_string()),
            ],
        );
        tally
    }
}

fn log_outcome(report: &SeedReport) {
    let table = report.table.as_str();
    match report.outcome {
        SeedOutcome::AllSucceeded { count } => {
            Logger::info("TABLE_SEEDED", &[("table", table), ("count", &count.to_string())]);
        }
        SeedOutcome::NoneSucceeded { total } => {
            Logger::error("TABLE_SEED_FAILED", &[("table", table), ("total", &total.to_string())]);
        }
        SeedOutcome::Partial { succeeded, total } => {
            Logger::warn(
                "TABLE_SEED_PARTIAL",
                &[
                    ("table", table),
                    ("succeeded", &succeeded.to_string()),
                    ("total", &total.to_string()),
                    ("skipped_sources", &report.skipped_sources.to_string()),
                    ("failed_batches", &report.failed_batches.to_string()),
                ],
            );
        }
    }
}
