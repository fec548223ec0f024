//! Outcome evaluation: compare the resolved domain with the expected one.

use std::fmt;

use crate::domain::extract_domain;

/// One input row: where to navigate and where the chain should end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationTask {
    pub redirection_url: String,
    pub destination_url: String,
}

impl ValidationTask {
    pub fn new(redirection_url: impl Into<String>, destination_url: impl Into<String>) -> Self {
        Self {
            redirection_url: redirection_url.into(),
            destination_url: destination_url.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalStatus {
    Success,
    Failure,
}

impl FinalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FinalStatus::Success => "Success",
            FinalStatus::Failure => "Failure",
        }
    }
}

impl fmt::Display for FinalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One output row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Primary request id latched for the navigation; empty if none.
    pub request_id: String,
    pub redirection_url: String,
    pub destination_url: String,
    pub final_destination_url: String,
    pub final_status: FinalStatus,
}

impl Verdict {
    /// Failure row for a task whose navigation errored without producing any events.
    pub fn navigation_failed(task: &ValidationTask) -> Self {
        Self {
            request_id: String::new(),
            redirection_url: task.redirection_url.clone(),
            destination_url: task.destination_url.clone(),
            final_destination_url: String::new(),
            final_status: FinalStatus::Failure,
        }
    }

    pub fn is_success(&self) -> bool {
        self.final_status == FinalStatus::Success
    }
}

/// Success iff the extracted domains are exactly equal.
///
/// An empty final URL only matches an expectation that also extracts to
/// `""`, so an unresolved chain fails against any real destination.
pub fn evaluate(task: &ValidationTask, request_id: Option<&str>, final_url: &str) -> Verdict {
    let final_domain = extract_domain(final_url);
    let expected_domain = extract_domain(&task.destination_url);
    let final_status = if final_domain == expected_domain {
        FinalStatus::Success
    } else {
        FinalStatus::Failure
    };
    tracing::debug!(
        final_domain = %final_domain,
        expected_domain = %expected_domain,
        status = %final_status,
        "evaluated redirect outcome"
    );
    Verdict {
        request_id: request_id.unwrap_or_default().to_string(),
        redirection_url: task.redirection_url.clone(),
        destination_url: task.destination_url.clone(),
        final_destination_url: final_url.to_string(),
        final_status,
    }
}
