//! Chain resolver: reduce a retained redirect chain to the final URL reached.
//!
//! The last retained request is the final hop. Its URL is rebuilt from the
//! `:authority` and `:path` pseudo-headers with no separator and no scheme.

use crate::correlator::CorrelationState;
use crate::event::RequestSent;

/// Final URL of the chain, or `""` when no request was retained.
pub fn resolve_final(state: &CorrelationState) -> String {
    state
        .retained_requests
        .last()
        .map(RequestSent::url_fragment)
        .unwrap_or_default()
}

/// Every retained hop in arrival order.
pub fn redirect_chain(state: &CorrelationState) -> Vec<String> {
    state
        .retained_requests
        .iter()
        .map(RequestSent::url_fragment)
        .collect()
}

/// Status code of the last response retained under the primary id.
pub fn final_status_code(state: &CorrelationState) -> Option<u16> {
    let primary = state.primary_request_id.as_deref()?;
    state
        .responses_for(primary)
        .filter_map(|r| r.status_code)
        .last()
}
