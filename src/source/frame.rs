//! In-memory columnar frames

use std::path::{Path, PathBuf};

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use arrow_json::ArrayWriter;

use super::errors::{SourceError, SourceResult};
use crate::schema::Record;

/// The decoded contents of one source file
#[derive(Debug, Clone)]
pub struct Frame {
    origin: PathBuf,
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
}

impl Frame {
    pub fn new(origin: PathBuf, schema: SchemaRef, batches: Vec<RecordBatch>) -> Self {
        Self {
            origin,
            schema,
            batches,
        }
    }

    pub fn origin(&self) -> &Path {
        &self.origin
    }

    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Number of rows across all batches
    pub fn height(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.schema.fields().iter().map(|f| f.name().clone()).collect()
    }

    /// Converts every row to a JSON record.
    ///
    /// Null cells are left out of the record, so optional fields see them as
    /// missing.
    pub fn to_records(&self) -> SourceResult<Vec<Record>> {
        if self.height() == 0 {
            return Ok(Vec::new());
        }

        let mut writer = ArrayWriter::new(Vec::new());
        let batches: Vec<&RecordBatch> = self.batches.iter().collect();
        writer
            .write_batches(&batches)
            .map_err(|e| SourceError::decode(&self.origin, e))?;
        writer
            .finish()
            .map_err(|e| SourceError::decode(&self.origin, e))?;

        serde_json::from_slice(&writer.into_inner()).map_err(|e| SourceError::decode(&self.origin, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use serde_json::json;
    use std::sync::Arc;

    fn words_frame() -> Frame {
        let schema = Arc::new(Schema::new(vec![
            Field::new("trial", DataType::Int64, false),
            Field::new("word", DataType::Utf8, true),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(Int64Array::from(vec![1, 2])),
            Arc::new(StringArray::from(vec![Some("red"), None])),
        ];
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
        Frame::new(PathBuf::from("/tmp/words.csv"), schema, vec![batch.clone(), batch])
    }

    #[test]
    fn test_height_spans_batches() {
        let frame = words_frame();
        assert_eq!(frame.height(), 4);
        assert_eq!(frame.column_names(), vec!["trial", "word"]);
    }

    #[test]
    fn test_to_records_omits_nulls() {
        let records = words_frame().to_records().unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(serde_json::Value::Object(records[0].clone()), json!({"trial": 1, "word": "red"}));
        assert_eq!(serde_json::Value::Object(records[1].clone()), json!({"trial": 2}));
    }

    #[test]
    fn test_empty_frame() {
        let schema = Arc::new(Schema::new(vec![Field::new("a", DataType::Utf8, true)]));
        let frame = Frame::new(PathBuf::from("/tmp/empty.csv"), schema, Vec::new());
        assert_eq!(frame.height(), 0);
        assert!(frame.to_records().unwrap().is_empty());
    }
}
