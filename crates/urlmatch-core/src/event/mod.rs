//! Typed network lifecycle events observed during one navigation.
//!
//! Raw protocol events are reduced by [`classify`] to the two shapes the
//! correlator cares about. Everything else on the wire is ignored.

mod classify;

pub use classify::{classify, REQUEST_SENT_EVENT, RESPONSE_RECEIVED_EVENT};

/// A request left the browser. `authority` and `path` come from the HTTP/2
/// pseudo-headers and are absent when the payload lacks them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSent {
    pub request_id: String,
    pub authority: Option<String>,
    pub path: Option<String>,
}

impl RequestSent {
    /// `authority ++ path`, absent parts contributing nothing.
    pub fn url_fragment(&self) -> String {
        let mut out = String::new();
        out.push_str(self.authority.as_deref().unwrap_or(""));
        out.push_str(self.path.as_deref().unwrap_or(""));
        out
    }
}

/// Response headers arrived for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseReceived {
    pub request_id: String,
    pub status_code: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkEvent {
    RequestSent(RequestSent),
    ResponseReceived(ResponseReceived),
}

impl NetworkEvent {
    pub fn request_id(&self) -> &str {
        match self {
            NetworkEvent::RequestSent(r) => &r.request_id,
            NetworkEvent::ResponseReceived(r) => &r.request_id,
        }
    }

    /// Convenience constructor used heavily by tests and fakes.
    pub fn request(id: &str, authority: &str, path: &str) -> Self {
        NetworkEvent::RequestSent(RequestSent {
            request_id: id.to_string(),
            authority: Some(authority.to_string()),
            path: Some(path.to_string()),
        })
    }

    pub fn response(id: &str, status_code: u16) -> Self {
        NetworkEvent::ResponseReceived(ResponseReceived {
            request_id: id.to_string(),
            status_code: Some(status_code),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_fragment_concatenates_without_separator() {
        let r = RequestSent {
            request_id: "1".into(),
            authority: Some("example.com".into()),
            path: Some("/page".into()),
        };
        assert_eq!(r.url_fragment(), "example.com/page");
    }

    #[test]
    fn url_fragment_with_missing_parts() {
        let no_path = RequestSent {
            request_id: "1".into(),
            authority: Some("example.com".into()),
            path: None,
        };
        assert_eq!(no_path.url_fragment(), "example.com");

        let no_authority = RequestSent {
            request_id: "1".into(),
            authority: None,
            path: Some("/page".into()),
        };
        assert_eq!(no_authority.url_fragment(), "/page");

        let neither = RequestSent {
            request_id: "1".into(),
            authority: None,
            path: None,
        };
        assert_eq!(neither.url_fragment(), "");
    }

    #[test]
    fn request_id_of_both_variants() {
        assert_eq!(NetworkEvent::request("a", "h", "/").request_id(), "a");
        assert_eq!(NetworkEvent::response("b", 302).request_id(), "b");
    }
}
