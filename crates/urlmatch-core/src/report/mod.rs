//! Result sinks. Rows are appended as each verdict is computed so that a
//! crash mid-run keeps everything already written.

mod csv;

use thiserror::Error;

use crate::verdict::Verdict;

pub use csv::{CsvSink, CSV_HEADER};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("open result file {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("write result row: {0}")]
    Write(#[from] std::io::Error),
}

/// Append-only destination for verdicts.
pub trait ResultSink {
    fn append(&mut self, verdict: &Verdict) -> Result<(), ReportError>;
}

/// In-memory sink, handy for tests and embedding.
impl ResultSink for Vec<Verdict> {
    fn append(&mut self, verdict: &Verdict) -> Result<(), ReportError> {
        self.push(verdict.clone());
        Ok(())
    }
}
