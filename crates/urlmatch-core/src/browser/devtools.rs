//! DevTools HTTP endpoint discovery.
//!
//! A browser started with `--remote-debugging-port` serves a small JSON API
//! next to its WebSocket targets. We use it to find (or open) a page target
//! and read its `webSocketDebuggerUrl`. Blocking (libcurl); call from
//! `spawn_blocking` when on the async runtime.

use std::str;
use std::time::{Duration, Instant};

use serde::Deserialize;
use url::Url;

use super::error::BrowserError;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// One entry of `/json/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct DevtoolsTarget {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, rename = "webSocketDebuggerUrl")]
    pub websocket_debugger_url: Option<String>,
}

/// Parses an endpoint like `http://127.0.0.1:9222` (a trailing slash is added
/// so relative joins stay under it).
pub fn parse_endpoint(raw: &str) -> Result<Url, BrowserError> {
    let mut url = Url::parse(raw.trim()).map_err(|e| BrowserError::Discovery {
        endpoint: raw.to_string(),
        reason: format!("invalid endpoint URL: {e}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(BrowserError::Discovery {
            endpoint: raw.to_string(),
            reason: format!("unsupported scheme {:?}", url.scheme()),
        });
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// First page target that exposes a WebSocket URL.
pub fn select_page_target(targets: &[DevtoolsTarget]) -> Option<&DevtoolsTarget> {
    targets
        .iter()
        .find(|t| t.kind == "page" && t.websocket_debugger_url.is_some())
}

/// WebSocket URL of a page target on `endpoint`, opening a blank tab when
/// the browser has none.
pub fn page_websocket_url(endpoint: &Url, timeout: Duration) -> Result<String, BrowserError> {
    let list_url = join(endpoint, "json/list")?;
    let body = http_request(&list_url, "GET", timeout)?;
    let targets: Vec<DevtoolsTarget> =
        serde_json::from_slice(&body).map_err(|e| discovery_error(endpoint, e))?;
    if let Some((target, ws)) = select_page_target(&targets)
        .and_then(|t| t.websocket_debugger_url.as_deref().map(|ws| (t, ws)))
    {
        tracing::debug!(ws_url = ws, page_url = %target.url, "using existing page target");
        return Ok(ws.to_string());
    }

    // Recent Chrome versions require PUT for /json/new.
    let new_url = join(endpoint, "json/new?about:blank")?;
    let body = http_request(&new_url, "PUT", timeout)?;
    let target: DevtoolsTarget =
        serde_json::from_slice(&body).map_err(|e| discovery_error(endpoint, e))?;
    target
        .websocket_debugger_url
        .ok_or_else(|| BrowserError::Discovery {
            endpoint: endpoint.to_string(),
            reason: "new target has no webSocketDebuggerUrl".to_string(),
        })
}

/// Polls `/json/version` until the endpoint answers or `timeout` elapses.
pub fn wait_for_endpoint(endpoint: &Url, timeout: Duration) -> Result<(), BrowserError> {
    let version_url = join(endpoint, "json/version")?;
    let deadline = Instant::now() + timeout;
    loop {
        match http_request(&version_url, "GET", POLL_INTERVAL * 10) {
            Ok(_) => return Ok(()),
            Err(e) if Instant::now() >= deadline => {
                return Err(BrowserError::Discovery {
                    endpoint: endpoint.to_string(),
                    reason: format!("not ready after {timeout:?}: {e}"),
                })
            }
            Err(_) => std::thread::sleep(POLL_INTERVAL),
        }
    }
}

fn join(endpoint: &Url, path: &str) -> Result<Url, BrowserError> {
    endpoint.join(path).map_err(|e| discovery_error(endpoint, e))
}

fn discovery_error(endpoint: &Url, e: impl std::fmt::Display) -> BrowserError {
    BrowserError::Discovery {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    }
}

fn http_request(url: &Url, method: &str, timeout: Duration) -> Result<Vec<u8>, BrowserError> {
    let mut body = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url.as_str())?;
    if method != "GET" {
        easy.custom_request(method)?;
    }
    easy.connect_timeout(timeout)?;
    easy.timeout(timeout)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(BrowserError::Discovery {
            endpoint: url.to_string(),
            reason: format!("{method} returned HTTP {code}"),
        });
    }
    Ok(body)
}
