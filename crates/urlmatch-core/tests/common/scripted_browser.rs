//! Browser stand-in that replays canned DevTools events per navigated URL.
//!
//! Every scripted event is delivered as soon as navigation is triggered,
//! interleaved exactly as listed. URLs without a script produce no traffic.

use std::collections::HashMap;

use serde_json::json;
use tokio::sync::mpsc;
use urlmatch_core::browser::{BrowserController, BrowserError, CdpEvent, EventSubscription};
use urlmatch_core::event::{REQUEST_SENT_EVENT, RESPONSE_RECEIVED_EVENT};

pub fn request(id: &str, authority: &str, path: &str) -> CdpEvent {
    CdpEvent {
        method: REQUEST_SENT_EVENT.to_string(),
        params: json!({
            "requestId": id,
            "headers": { ":authority": authority, ":path": path, ":method": "GET" }
        }),
    }
}

pub fn response(id: &str, status: u16) -> CdpEvent {
    CdpEvent {
        method: RESPONSE_RECEIVED_EVENT.to_string(),
        params: json!({ "requestId": id, "statusCode": status, "headers": {} }),
    }
}

#[derive(Default)]
pub struct ScriptedBrowser {
    scripts: HashMap<String, Vec<CdpEvent>>,
    unreachable: Vec<String>,
    sender: Option<mpsc::UnboundedSender<CdpEvent>>,
}

impl ScriptedBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, url: &str, events: Vec<CdpEvent>) -> Self {
        self.scripts.insert(url.to_string(), events);
        self
    }

    pub fn unreachable(mut self, url: &str) -> Self {
        self.unreachable.push(url.to_string());
        self
    }
}

impl BrowserController for ScriptedBrowser {
    fn subscribe(&mut self) -> EventSubscription {
        let (tx, subscription) = EventSubscription::channel();
        self.sender = Some(tx);
        subscription
    }

    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        if self.unreachable.iter().any(|u| u == url) {
            return Err(BrowserError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_CONNECTION_REFUSED".to_string(),
            });
        }
        if let (Some(tx), Some(events)) = (&self.sender, self.scripts.get(url)) {
            for ev in events {
                let _ = tx.send(ev.clone());
            }
        }
        Ok(())
    }
}
