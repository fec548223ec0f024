//! Reduce raw DevTools events to [`NetworkEvent`]s.
//!
//! Permissive: a payload missing a field yields an absent value, never an
//! error. Unknown event names return `None`.

use serde_json::Value;

use super::{NetworkEvent, RequestSent, ResponseReceived};

/// Carries the real request headers, including `:authority` and `:path`.
pub const REQUEST_SENT_EVENT: &str = "Network.requestWillBeSentExtraInfo";
/// Carries the real response status line.
pub const RESPONSE_RECEIVED_EVENT: &str = "Network.responseReceivedExtraInfo";

/// Classifies one protocol event. Accepts names with or without the
/// `Network.` domain prefix.
pub fn classify(method: &str, params: &Value) -> Option<NetworkEvent> {
    let name = method.strip_prefix("Network.").unwrap_or(method);
    match name {
        "requestWillBeSentExtraInfo" => Some(NetworkEvent::RequestSent(RequestSent {
            request_id: request_id(params),
            authority: header(params, ":authority"),
            path: header(params, ":path"),
        })),
        "responseReceivedExtraInfo" => Some(NetworkEvent::ResponseReceived(ResponseReceived {
            request_id: request_id(params),
            status_code: params
                .get("statusCode")
                .and_then(Value::as_u64)
                .and_then(|c| u16::try_from(c).ok()),
        })),
        _ => None,
    }
}

fn request_id(params: &Value) -> String {
    params
        .get("requestId")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn header(params: &Value, name: &str) -> Option<String> {
    params
        .get("headers")
        .and_then(|h| h.get(name))
        .and_then(Value::as_str)
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_extra_info_reads_pseudo_headers() {
        let params = json!({
            "requestId": "1000.1",
            "headers": { ":authority": "short.ly", ":path": "/x", ":method": "GET" }
        });
        let ev = classify(REQUEST_SENT_EVENT, &params).unwrap();
        assert_eq!(ev, NetworkEvent::request("1000.1", "short.ly", "/x"));
    }

    #[test]
    fn response_extra_info_reads_status() {
        let params = json!({ "requestId": "1000.1", "statusCode": 301, "headers": {} });
        let ev = classify(RESPONSE_RECEIVED_EVENT, &params).unwrap();
        assert_eq!(ev, NetworkEvent::response("1000.1", 301));
    }

    #[test]
    fn bare_event_names_are_accepted() {
        let params = json!({ "requestId": "7", "statusCode": 200 });
        assert!(classify("responseReceivedExtraInfo", &params).is_some());
        let params = json!({ "requestId": "7", "headers": {} });
        assert!(classify("requestWillBeSentExtraInfo", &params).is_some());
    }

    #[test]
    fn unknown_events_are_ignored() {
        let params = json!({ "requestId": "1" });
        assert!(classify("Network.requestWillBeSent", &params).is_none());
        assert!(classify("Page.frameNavigated", &params).is_none());
        assert!(classify("", &Value::Null).is_none());
    }

    #[test]
    fn missing_headers_yield_absent_parts() {
        let params = json!({ "requestId": "1", "headers": { ":path": "/only-path" } });
        match classify(REQUEST_SENT_EVENT, &params).unwrap() {
            NetworkEvent::RequestSent(r) => {
                assert_eq!(r.authority, None);
                assert_eq!(r.path.as_deref(), Some("/only-path"));
                assert_eq!(r.url_fragment(), "/only-path");
            }
            other => panic!("expected RequestSent, got {other:?}"),
        }

        let params = json!({ "requestId": "1" });
        match classify(REQUEST_SENT_EVENT, &params).unwrap() {
            NetworkEvent::RequestSent(r) => assert_eq!(r.url_fragment(), ""),
            other => panic!("expected RequestSent, got {other:?}"),
        }
    }

    #[test]
    fn missing_request_id_or_status() {
        let ev = classify(RESPONSE_RECEIVED_EVENT, &json!({})).unwrap();
        match ev {
            NetworkEvent::ResponseReceived(r) => {
                assert_eq!(r.request_id, "");
                assert_eq!(r.status_code, None);
            }
            other => panic!("expected ResponseReceived, got {other:?}"),
        }
    }
}
