/// Streaming reader for the tabular recipe export.
///
/// Yields one [`RawRow`] per CSV record, keyed by the header row. Records that
/// cannot be decoded are skipped with a warning and counted; an I/O failure ends
/// the stream.
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::warn;

use crate::error::CoreError;
use crate::model::RawRow;

pub struct RowReader<R> {
    reader: csv::Reader<R>,
    headers: Vec<String>,
    record: csv::StringRecord,
    skipped: usize,
}

impl RowReader<File> {
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        if !path.is_file() {
            return Err(CoreError::NotFound(path.to_path_buf()));
        }
        let reader = builder().from_path(path)?;
        Self::new(reader)
    }
}

impl<R: Read> RowReader<R> {
    pub fn from_reader(rdr: R) -> Result<Self, CoreError> {
        Self::new(builder().from_reader(rdr))
    }

    fn new(mut reader: csv::Reader<R>) -> Result<Self, CoreError> {
        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        Ok(Self {
            reader,
            headers,
            record: csv::StringRecord::new(),
            skipped: 0,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Records dropped because they could not be decoded.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<R: Read> Iterator for RowReader<R> {
    type Item = RawRow;

    fn next(&mut self) -> Option<RawRow> {
        loop {
            match self.reader.read_record(&mut self.record) {
                Ok(true) => {
                    return Some(
                        self.headers
                            .iter()
                            .zip(self.record.iter())
                            .map(|(h, v)| (h.as_str(), v))
                            .collect(),
                    );
                }
                Ok(false) => return None,
                Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => {
                    warn!(error = %e, "csv read aborted");
                    return None;
                }
                Err(e) => {
                    self.skipped += 1;
                    warn!(
                        error = %e,
                        line = e.position().map(|p| p.line()),
                        "skipping undecodable csv record"
                    );
                }
            }
        }
    }
}

fn builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).flexible(true);
    builder
}
