//! Input list: a header line followed by `redirection,destination` rows.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::verdict::ValidationTask;

#[derive(Debug, Error)]
pub enum TaskListError {
    #[error("read URL list {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 1-based line number in the input file (the header is line 1).
    #[error("line {line}: expected `redirection_url,destination_url`, got {content:?}")]
    MissingComma { line: usize, content: String },
}

/// Reads and parses the whole list before anything is navigated.
pub fn load_tasks(path: &Path) -> Result<Vec<ValidationTask>, TaskListError> {
    let text = std::fs::read_to_string(path).map_err(|source| TaskListError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_tasks(&text)
}

/// Parses list text. The first line is always skipped. Anything after a
/// second comma on a row is ignored.
pub fn parse_tasks(text: &str) -> Result<Vec<ValidationTask>, TaskListError> {
    let mut tasks = Vec::new();
    for (idx, line) in text.lines().enumerate().skip(1) {
        let mut parts = line.split(',');
        let redirection = parts.next().unwrap_or_default();
        let destination = parts.next().ok_or_else(|| TaskListError::MissingComma {
            line: idx + 1,
            content: line.to_string(),
        })?;
        tasks.push(ValidationTask::new(redirection.trim(), destination.trim()));
    }
    tracing::debug!(count = tasks.len(), "parsed URL list");
    Ok(tasks)
}
