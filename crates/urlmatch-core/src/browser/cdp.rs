//! Chrome DevTools Protocol client over WebSocket.
//!
//! Commands carry auto-incrementing ids and are matched to their responses by
//! a background reader task. Events (messages with a `method` and no `id`) are
//! forwarded to whichever subscription is currently bound; binding a new one
//! drops the previous sender so nothing from an earlier navigation leaks into
//! the next.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use super::error::BrowserError;
use super::EventSubscription;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type Pending = Arc<Mutex<HashMap<u64, oneshot::Sender<CdpResponse>>>>;
type SubscriberSlot = Arc<std::sync::Mutex<Option<mpsc::UnboundedSender<CdpEvent>>>>;

/// A protocol event as delivered by the browser.
#[derive(Debug, Clone, PartialEq)]
pub struct CdpEvent {
    /// e.g. `Network.requestWillBeSentExtraInfo`.
    pub method: String,
    pub params: Value,
}

#[derive(Debug, Serialize)]
struct CdpCommand<'a> {
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Clone)]
pub struct CdpResponse {
    pub id: u64,
    pub result: Option<Value>,
    pub error: Option<CdpResponseError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CdpResponseError {
    pub code: i64,
    pub message: String,
}

/// One WebSocket session attached to a page target.
pub struct CdpClient {
    next_id: AtomicU64,
    pending: Pending,
    writer: Mutex<WsSink>,
    subscriber: SubscriberSlot,
    command_timeout: Duration,
    reader: tokio::task::JoinHandle<()>,
}

impl CdpClient {
    /// Connects to `ws://host:port/devtools/page/<id>`.
    pub async fn connect(ws_url: &str, command_timeout: Duration) -> Result<Self, BrowserError> {
        tracing::info!(url = ws_url, "connecting to DevTools WebSocket");

        let (stream, _) = tokio_tungstenite::connect_async(ws_url).await.map_err(|e| {
            BrowserError::ConnectionFailed {
                url: ws_url.to_string(),
                reason: e.to_string(),
            }
        })?;
        let (writer, reader) = stream.split();

        let pending: Pending = Arc::new(Mutex::new(HashMap::new()));
        let subscriber: SubscriberSlot = Arc::new(std::sync::Mutex::new(None));

        let reader = tokio::spawn(read_loop(
            reader,
            Arc::clone(&pending),
            Arc::clone(&subscriber),
        ));

        Ok(Self {
            next_id: AtomicU64::new(1),
            pending,
            writer: Mutex::new(writer),
            subscriber,
            command_timeout,
            reader,
        })
    }

    /// Sends a command and waits for its result, bounded by the command timeout.
    pub async fn send_command(&self, method: &str, params: Value) -> Result<Value, BrowserError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let json = serde_json::to_string(&CdpCommand { id, method, params }).map_err(|e| {
            BrowserError::Protocol {
                detail: format!("failed to serialize command: {e}"),
            }
        })?;

        tracing::debug!(id, method, "sending CDP command");

        // Register before sending so a fast response is never lost.
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id, tx);

        let sent = self.writer.lock().await.send(Message::Text(json.into())).await;
        if let Err(e) = sent {
            self.pending.lock().await.remove(&id);
            return Err(BrowserError::Protocol {
                detail: format!("failed to send WebSocket message: {e}"),
            });
        }

        let response = match tokio::time::timeout(self.command_timeout, rx).await {
            Ok(Ok(response)) => response,
            Ok(Err(_)) => {
                return Err(BrowserError::Protocol {
                    detail: "response channel closed unexpectedly".to_string(),
                })
            }
            Err(_) => {
                self.pending.lock().await.remove(&id);
                return Err(BrowserError::Timeout {
                    method: method.to_string(),
                    duration: self.command_timeout,
                });
            }
        };

        if let Some(err) = response.error {
            return Err(BrowserError::Cdp {
                code: err.code,
                message: err.message,
            });
        }
        Ok(response.result.unwrap_or(Value::Null))
    }

    /// Enables a CDP domain so it starts emitting events.
    pub async fn enable_domain(&self, domain: &str) -> Result<(), BrowserError> {
        self.send_command(&format!("{domain}.enable"), serde_json::json!({}))
            .await?;
        Ok(())
    }

    /// Binds a fresh subscription, replacing (and disconnecting) the old one.
    pub fn subscribe(&self) -> EventSubscription {
        let (tx, subscription) = EventSubscription::channel();
        match self.subscriber.lock() {
            Ok(mut slot) => *slot = Some(tx),
            Err(poisoned) => *poisoned.into_inner() = Some(tx),
        }
        subscription
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

/// Dispatches responses to pending commands and events to the bound
/// subscriber until the socket closes.
async fn read_loop(mut reader: SplitStream<WsStream>, pending: Pending, subscriber: SubscriberSlot) {
    while let Some(msg) = reader.next().await {
        let text = match msg {
            Ok(Message::Text(t)) => t.to_string(),
            Ok(Message::Binary(b)) => match String::from_utf8(b.to_vec()) {
                Ok(s) => s,
                Err(_) => continue,
            },
            Ok(Message::Close(_)) => {
                tracing::info!("DevTools WebSocket closed by browser");
                break;
            }
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!(error = %e, "WebSocket read error, stopping reader");
                break;
            }
        };

        let json: Value = match serde_json::from_str(&text) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse CDP message as JSON");
                continue;
            }
        };

        if let Some(response) = parse_cdp_response(&json) {
            if let Some(tx) = pending.lock().await.remove(&response.id) {
                let _ = tx.send(response);
            } else {
                tracing::debug!(id = response.id, "response for unknown command id");
            }
        } else if let Some(event) = parse_cdp_event(&json) {
            if let Ok(slot) = subscriber.lock() {
                if let Some(tx) = slot.as_ref() {
                    let _ = tx.send(event);
                }
            }
        }
    }

    // Fail every waiter; the session is gone.
    for (id, tx) in pending.lock().await.drain() {
        let _ = tx.send(CdpResponse {
            id,
            result: None,
            error: Some(CdpResponseError {
                code: -1,
                message: "WebSocket connection closed".to_string(),
            }),
        });
    }
    if let Ok(mut slot) = subscriber.lock() {
        slot.take();
    }
}

/// A message with a numeric `id` is a command response.
pub fn parse_cdp_response(json: &Value) -> Option<CdpResponse> {
    let id = json.get("id")?.as_u64()?;
    Some(CdpResponse {
        id,
        result: json.get("result").cloned(),
        error: json
            .get("error")
            .and_then(|e| serde_json::from_value(e.clone()).ok()),
    })
}

/// A message with a `method` and no `id` is an event.
pub fn parse_cdp_event(json: &Value) -> Option<CdpEvent> {
    if json.get("id").is_some() {
        return None;
    }
    let method = json.get("method")?.as_str()?.to_string();
    let params = json.get("params").cloned().unwrap_or(Value::Null);
    Some(CdpEvent { method, params })
}
