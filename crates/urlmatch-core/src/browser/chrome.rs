//! [`BrowserController`] backed by a Chrome DevTools page session.

use std::time::Duration;

use serde_json::{json, Value};

use crate::config::BrowserConfig;

use super::cdp::CdpClient;
use super::devtools;
use super::error::BrowserError;
use super::launch::{self, LaunchedBrowser};
use super::{BrowserController, EventSubscription};

const BLANK_PAGE: &str = "about:blank";

/// One page session shared by every task of a run.
pub struct ChromeController {
    client: CdpClient,
    // Dropped after the client so the socket closes before the process dies.
    _browser: Option<LaunchedBrowser>,
}

impl ChromeController {
    /// Attaches to `cfg.devtools_url` when set, otherwise launches a browser.
    pub async fn start(cfg: &BrowserConfig) -> Result<Self, BrowserError> {
        let blocking_cfg = cfg.clone();
        let (ws_url, browser) = tokio::task::spawn_blocking(move || discover(&blocking_cfg))
            .await
            .map_err(|e| BrowserError::Launch {
                reason: format!("startup task failed: {e}"),
            })??;
        Self::attach(&ws_url, cfg.command_timeout(), browser).await
    }

    async fn attach(
        ws_url: &str,
        command_timeout: Duration,
        browser: Option<LaunchedBrowser>,
    ) -> Result<Self, BrowserError> {
        let client = CdpClient::connect(ws_url, command_timeout).await?;
        client.enable_domain("Network").await?;
        Ok(Self {
            client,
            _browser: browser,
        })
    }
}

/// Resolves the page WebSocket URL, launching a browser if no endpoint is
/// configured. Blocking.
fn discover(cfg: &BrowserConfig) -> Result<(String, Option<LaunchedBrowser>), BrowserError> {
    match cfg.devtools_url.as_deref() {
        Some(raw) => {
            let endpoint = devtools::parse_endpoint(raw)?;
            tracing::info!(endpoint = %endpoint, "attaching to running browser");
            devtools::wait_for_endpoint(&endpoint, cfg.startup_timeout())?;
            let ws = devtools::page_websocket_url(&endpoint, cfg.command_timeout())?;
            Ok((ws, None))
        }
        None => {
            let browser = launch::launch(cfg)?;
            let ws = devtools::page_websocket_url(browser.endpoint(), cfg.command_timeout())?;
            Ok((ws, Some(browser)))
        }
    }
}

impl BrowserController for ChromeController {
    fn subscribe(&mut self) -> EventSubscription {
        self.client.subscribe()
    }

    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        let result = self
            .client
            .send_command("Page.navigate", json!({ "url": url }))
            .await?;
        navigation_outcome(url, &result)
    }

    async fn reset(&self) -> Result<(), BrowserError> {
        self.client
            .send_command("Page.navigate", json!({ "url": BLANK_PAGE }))
            .await?;
        Ok(())
    }
}

/// `Page.navigate` reports load failures (DNS, refused connection, ...) via
/// `errorText` rather than a protocol error. `net::ERR_ABORTED` also lands
/// here when the last hop is a download or a 204, so callers still read the
/// events the navigation produced.
fn navigation_outcome(url: &str, result: &Value) -> Result<(), BrowserError> {
    match result.get("errorText").and_then(Value::as_str) {
        Some(reason) if !reason.is_empty() => Err(BrowserError::Navigation {
            url: url.to_string(),
            reason: reason.to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigate_result_without_error_text_is_ok() {
        let result = json!({ "frameId": "F", "loaderId": "L" });
        assert!(navigation_outcome("http://short.ly/x", &result).is_ok());
    }

    #[test]
    fn navigate_result_with_error_text_is_navigation_error() {
        let result = json!({ "frameId": "F", "errorText": "net::ERR_NAME_NOT_RESOLVED" });
        match navigation_outcome("http://nope.invalid/", &result) {
            Err(BrowserError::Navigation { url, reason }) => {
                assert_eq!(url, "http://nope.invalid/");
                assert_eq!(reason, "net::ERR_NAME_NOT_RESOLVED");
            }
            other => panic!("expected navigation error, got {other:?}"),
        }
    }

    #[test]
    fn empty_error_text_is_ok() {
        assert!(navigation_outcome("u", &json!({ "errorText": "" })).is_ok());
    }
}
