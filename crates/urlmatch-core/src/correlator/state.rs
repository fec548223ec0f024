//! Immutable snapshot of what a correlator retained.

use crate::event::{RequestSent, ResponseReceived};

/// Retained chain for one navigation, read by the chain resolver.
///
/// `retained_requests` only holds requests carrying the primary id.
/// `retained_responses` holds every response seen during the window,
/// whatever its id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrelationState {
    pub primary_request_id: Option<String>,
    pub retained_requests: Vec<RequestSent>,
    pub retained_responses: Vec<ResponseReceived>,
    pub closed: bool,
    /// Requests dropped because they were foreign or arrived after close.
    pub ignored_requests: usize,
}

impl CorrelationState {
    /// No event of any kind was observed.
    pub fn is_empty(&self) -> bool {
        self.primary_request_id.is_none()
    }

    /// Responses retained under `request_id`, in arrival order.
    pub fn responses_for<'a>(
        &'a self,
        request_id: &'a str,
    ) -> impl Iterator<Item = &'a ResponseReceived> + 'a {
        self.retained_responses
            .iter()
            .filter(move |r| r.request_id == request_id)
    }
}
