//! Errors raised while driving the browser.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrowserError {
    /// WebSocket handshake to the DevTools target failed.
    #[error("failed to connect to DevTools at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    /// A CDP command came back with an error object.
    #[error("CDP error {code}: {message}")]
    Cdp { code: i64, message: String },

    #[error("CDP command '{method}' timed out after {duration:?}")]
    Timeout { method: String, duration: Duration },

    /// Serialization, unexpected message shape, closed socket.
    #[error("CDP protocol error: {detail}")]
    Protocol { detail: String },

    /// The browser refused or failed to start loading the URL.
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("failed to launch browser: {reason}")]
    Launch { reason: String },

    /// The HTTP debug endpoint did not yield a usable page target.
    #[error("DevTools discovery at {endpoint} failed: {reason}")]
    Discovery { endpoint: String, reason: String },

    #[error("HTTP request to DevTools endpoint failed: {0}")]
    Curl(#[from] curl::Error),
}
