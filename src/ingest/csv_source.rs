use super::*;
use crate::config::DataConfig;
use csv::ReaderBuilder;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads the four dataset files from a single directory.
pub struct CsvDirectory {
    dir: PathBuf,
    data: DataConfig,
    show_progress: bool,
}

impl CsvDirectory {
    pub fn new(dir: &Path, data: &DataConfig) -> Self {
        Self {
            dir: dir.to_path_buf(),
            data: data.clone(),
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn path_for(&self, kind: EntityKind) -> PathBuf {
        self.dir.join(self.data.file_name(kind))
    }

    fn progress_bar(&self, kind: EntityKind) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] {msg}: {pos} records",
            )
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(self.data.file_name(kind).to_string());
        pb
    }
}

impl RecordSource for CsvDirectory {
    fn origin(&self, kind: EntityKind) -> String {
        self.data.file_name(kind).to_string()
    }

    fn for_each_record(
        &mut self,
        kind: EntityKind,
        visit: &mut dyn FnMut(RawRecord) -> Result<(), IngestError>,
    ) -> Result<(), IngestError> {
        let path = self.path_for(kind);
        let origin = self.origin(kind);

        debug!("Opening {}", path.display());
        // The reader owns the file handle and is dropped on every return path.
        let mut reader = ReaderBuilder::new()
            .has_headers(self.data.has_headers)
            .flexible(true)
            .from_path(&path)
            .map_err(|cause| read_error(&origin, cause))?;

        let pb = self.progress_bar(kind);
        let result = read_records(&mut reader, &origin, visit, &pb);
        pb.finish_and_clear();

        result
    }
}

fn read_records<R: std::io::Read>(
    reader: &mut csv::Reader<R>,
    origin: &str,
    visit: &mut dyn FnMut(RawRecord) -> Result<(), IngestError>,
    pb: &ProgressBar,
) -> Result<(), IngestError> {
    // Byte records, so a stray non-UTF-8 byte in a free-text field only
    // degrades that field instead of rejecting the row.
    for record in reader.byte_records() {
        let record = record.map_err(|cause| read_error(origin, cause))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let fields = record
            .iter()
            .map(|field| String::from_utf8_lossy(field).into_owned())
            .collect();
        visit(RawRecord::new(line, fields))?;
        pb.inc(1);
    }
    Ok(())
}

fn read_error(origin: &str, cause: csv::Error) -> IngestError {
    if cause.is_io_error() {
        return IngestError::SourceUnavailable {
            origin: origin.to_string(),
            cause: Box::new(cause),
        };
    }

    IngestError::InvalidCsv {
        origin: origin.to_string(),
        line: cause.position().map(|p| p.line()).unwrap_or(0),
        cause,
    }
}
