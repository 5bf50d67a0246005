use crate::model::{EntityKind, ParseError};
use std::collections::HashMap;
use thiserror::Error;

pub mod builder;
pub mod csv_source;

pub use builder::build_graph;
pub use csv_source::CsvDirectory;

/// One positional row as it came out of a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based line in the underlying source, used for diagnostics.
    pub line: u64,
    pub fields: Vec<String>,
}

impl RawRecord {
    pub fn new(line: u64, fields: Vec<String>) -> Self {
        Self { line, fields }
    }
}

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("malformed record in {origin} at line {line}: {cause}")]
    MalformedRecord {
        origin: String,
        line: u64,
        #[source]
        cause: ParseError,
    },

    #[error("unreadable CSV in {origin} at line {line}: {cause}")]
    InvalidCsv {
        origin: String,
        line: u64,
        #[source]
        cause: csv::Error,
    },

    #[error("source {origin} is unavailable: {cause}")]
    SourceUnavailable {
        origin: String,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// First fatal error of a load, tagged with the pass it aborted.
#[derive(Error, Debug)]
#[error("ingestion failed while loading {kind} records")]
pub struct IngestionFailure {
    pub kind: EntityKind,
    #[source]
    pub cause: IngestError,
}

/// Supplies the records of one entity kind at a time.
///
/// Implementations must acquire whatever backs `kind` inside the call and
/// release it before returning, on success and on every error path, so the
/// builder never holds two sources open at once.
pub trait RecordSource {
    /// Name used in log lines and error messages (a file name, usually).
    fn origin(&self, kind: EntityKind) -> String;

    fn for_each_record(
        &mut self,
        kind: EntityKind,
        visit: &mut dyn FnMut(RawRecord) -> Result<(), IngestError>,
    ) -> Result<(), IngestError>;
}

/// Records already materialized in memory, mostly useful for tests and
/// for callers that fetch the dataset some other way.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: HashMap<EntityKind, Vec<Vec<String>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows<R, F>(mut self, kind: EntityKind, rows: R) -> Self
    where
        R: IntoIterator<Item = F>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        let entry = self.records.entry(kind).or_default();
        entry.extend(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect()),
        );
        self
    }
}

impl RecordSource for MemorySource {
    fn origin(&self, kind: EntityKind) -> String {
        format!("memory:{}", kind)
    }

    fn for_each_record(
        &mut self,
        kind: EntityKind,
        visit: &mut dyn FnMut(RawRecord) -> Result<(), IngestError>,
    ) -> Result<(), IngestError> {
        let rows = self.records.get(&kind).map(Vec::as_slice).unwrap_or(&[]);
        for (index, fields) in rows.iter().enumerate() {
            visit(RawRecord::new(index as u64 + 1, fields.clone()))?;
        }
        Ok(())
    }
}
