//! Decoders, chosen strictly by file extension

use std::fs::File;
use std::io::{BufReader, Seek};
use std::path::Path;
use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use arrow_csv::reader::Format;
use arrow_json::reader::infer_json_schema_from_seekable;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::errors::{SourceError, SourceResult};
use super::frame::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Tsv,
    /// Line-delimited JSON (`.jsonl` / `.ndjson`)
    Jsonl,
    Parquet,
}

impl SourceFormat {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(SourceFormat::Csv),
            "tsv" => Some(SourceFormat::Tsv),
            "jsonl" | "ndjson" => Some(SourceFormat::Jsonl),
            "parquet" => Some(SourceFormat::Parquet),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> SourceResult<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_extension(&extension).ok_or_else(|| SourceError::UnsupportedSourceType {
            extension,
            path: path.display().to_string(),
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Csv => "csv",
            SourceFormat::Tsv => "tsv",
            SourceFormat::Jsonl => "jsonl",
            SourceFormat::Parquet => "parquet",
        }
    }

    /// Reads the whole file. Blocking.
    pub fn decode(&self, path: &Path) -> SourceResult<Frame> {
        match self {
            SourceFormat::Csv => decode_delimited(path, b','),
            SourceFormat::Tsv => decode_delimited(path, b'\t'),
            SourceFormat::Jsonl => decode_jsonl(path),
            SourceFormat::Parquet => decode_parquet(path),
        }
    }
}

fn collect_batches<I>(path: &Path, reader: I) -> SourceResult<Vec<RecordBatch>>
where
    I: Iterator<Item = Result<RecordBatch, ArrowError>>,
{
    reader
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| SourceError::decode(path, e))
}

fn decode_delimited(path: &Path, delimiter: u8) -> SourceResult<Frame> {
    let mut file = File::open(path).map_err(|e| SourceError::io(path, e))?;
    let format = Format::default().with_header(true).with_delimiter(delimiter);

    let (inferred, _) = format
        .infer_schema(&mut file, Some(0))
        .map_err(|e| SourceError::decode(path, e))?;
    file.rewind().map_err(|e| SourceError::io(path, e))?;

    let schema = Arc::new(text_schema(&inferred));
    let reader = arrow_csv::ReaderBuilder::new(schema.clone())
        .with_format(format)
        .build(file)
        .map_err(|e| SourceError::decode(path, e))?;

    let batches = collect_batches(path, reader)?;
    Ok(Frame::new(path.to_path_buf(), schema, batches))
}

/// Delimited cells stay text; record validation coerces them to the declared types.
fn text_schema(inferred: &Schema) -> Schema {
    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|field| Field::new(field.name(), DataType::Utf8, true))
        .collect();
    Schema::new(fields)
}

fn decode_jsonl(path: &Path) -> SourceResult<Frame> {
    let file = File::open(path).map_err(|e| SourceError::io(path, e))?;
    let mut reader = BufReader::new(file);

    let (schema, _) = infer_json_schema_from_seekable(&mut reader, None)
        .map_err(|e| SourceError::decode(path, e))?;

    let schema = Arc::new(schema);
    let reader = arrow_json::ReaderBuilder::new(schema.clone())
        .build(reader)
        .map_err(|e| SourceError::decode(path, e))?;

    let batches = collect_batches(path, reader)?;
    Ok(Frame::new(path.to_path_buf(), schema, batches))
}

fn decode_parquet(path: &Path) -> SourceResult<Frame> {
    let file = File::open(path).map_err(|e| SourceError::io(path, e))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| SourceError::decode(path, e))?;

    let schema = builder.schema().clone();
    let reader = builder.build().map_err(|e| SourceError::decode(path, e))?;

    let batches = collect_batches(path, reader)?;
    Ok(Frame::new(path.to_path_buf(), schema, batches))
}
