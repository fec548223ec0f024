//! Navigation correlator: decides which network events belong to the
//! navigation under test.
//!
//! Latch-on-first: the identifier of the very first event observed (request
//! or response) becomes the primary identifier for the lifetime of the
//! instance. Requests under that identifier accumulate as the redirect chain
//! until a request with any other identifier shows up; from then on the
//! request side is closed. Responses are retained unconditionally.
//!
//! The decision depends on arrival order only. Replaying the same events in a
//! different order can latch a different identifier.

mod state;

use crate::event::{NetworkEvent, RequestSent, ResponseReceived};

pub use state::CorrelationState;

/// Ingests the event stream of exactly one navigation attempt.
///
/// Create one immediately before navigating, feed it with [`ingest`], then
/// consume it with [`finish`] once the settle window has elapsed. Consuming
/// the correlator is what guarantees nothing mutates the retained chain after
/// the window closes.
///
/// [`ingest`]: Correlator::ingest
/// [`finish`]: Correlator::finish
#[derive(Debug, Default)]
pub struct Correlator {
    primary_request_id: Option<String>,
    requests: Vec<RequestSent>,
    responses: Vec<ResponseReceived>,
    closed: bool,
    ignored_requests: usize,
}

impl Correlator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the ingestion rule to one event, in arrival order.
    pub fn ingest(&mut self, event: NetworkEvent) {
        if self.primary_request_id.is_none() {
            tracing::debug!(request_id = event.request_id(), "latched primary request id");
            self.primary_request_id = Some(event.request_id().to_string());
            match event {
                NetworkEvent::RequestSent(r) => self.requests.push(r),
                NetworkEvent::ResponseReceived(r) => self.responses.push(r),
            }
            return;
        }

        match event {
            NetworkEvent::RequestSent(r) => self.ingest_request(r),
            NetworkEvent::ResponseReceived(r) => self.responses.push(r),
        }
    }

    fn ingest_request(&mut self, request: RequestSent) {
        if self.closed {
            self.ignored_requests += 1;
            return;
        }
        if self.is_primary(&request.request_id) {
            self.requests.push(request);
        } else {
            tracing::debug!(
                request_id = %request.request_id,
                retained = self.requests.len(),
                "foreign request id observed, closing request chain"
            );
            self.closed = true;
            self.ignored_requests += 1;
        }
    }

    fn is_primary(&self, request_id: &str) -> bool {
        self.primary_request_id.as_deref() == Some(request_id)
    }

    pub fn primary_request_id(&self) -> Option<&str> {
        self.primary_request_id.as_deref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Closes the observation window and hands back the retained chain.
    pub fn finish(self) -> CorrelationState {
        CorrelationState {
            primary_request_id: self.primary_request_id,
            retained_requests: self.requests,
            retained_responses: self.responses,
            closed: self.closed,
            ignored_requests: self.ignored_requests,
        }
    }
}
