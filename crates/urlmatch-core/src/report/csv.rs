//! Comma-separated result file, header written once per file.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::verdict::Verdict;

use super::{ReportError, ResultSink};

pub const CSV_HEADER: [&str; 5] = [
    "Request Id",
    "Redirection URL",
    "Destination URL",
    "Final Destination URL",
    "Final Status",
];

/// Appends verdict rows to a CSV file, flushing after every row.
#[derive(Debug)]
pub struct CsvSink {
    path: PathBuf,
    file: File,
}

impl CsvSink {
    /// Opens `path` for appending. The header row is written only when the
    /// file is new or empty, so repeated runs share one header.
    pub fn open(path: &Path) -> Result<Self, ReportError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| ReportError::Open {
                path: path.display().to_string(),
                source,
            })?;
        let len = file.metadata()?.len();
        if len == 0 {
            file.write_all(format_row(&CSV_HEADER).as_bytes())?;
            file.flush()?;
            tracing::debug!(path = %path.display(), "wrote CSV header");
        }
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for CsvSink {
    fn append(&mut self, verdict: &Verdict) -> Result<(), ReportError> {
        let row = format_row(&[
            verdict.request_id.as_str(),
            verdict.redirection_url.as_str(),
            verdict.destination_url.as_str(),
            verdict.final_destination_url.as_str(),
            verdict.final_status.as_str(),
        ]);
        self.file.write_all(row.as_bytes())?;
        self.file.flush()?;
        Ok(())
    }
}

fn format_row(fields: &[&str]) -> String {
    let mut line = fields
        .iter()
        .map(|f| escape_field(f))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

/// Quotes a field when it contains a delimiter, quote, line break, or
/// leading/trailing whitespace. Embedded quotes are doubled.
fn escape_field(field: &str) -> String {
    let needs_quotes = field.contains([',', '"', '\r', '\n'])
        || field.starts_with(char::is_whitespace)
        || field.ends_with(char::is_whitespace);
    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
