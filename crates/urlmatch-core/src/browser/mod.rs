//! Browser side of a validation run.
//!
//! The orchestrator only needs two things from a browser: a way to start a
//! navigation and a fresh stream of protocol events for it. Those are the
//! [`BrowserController`] seam. [`ChromeController`] implements it over the
//! Chrome DevTools Protocol; tests implement it with scripted events.

pub mod cdp;
mod chrome;
pub mod devtools;
mod error;
pub mod launch;

use std::future::Future;

use tokio::sync::mpsc;

pub use cdp::{CdpClient, CdpEvent};
pub use chrome::ChromeController;
pub use error::BrowserError;

/// Minimal browser surface the orchestrator drives.
pub trait BrowserController {
    /// Rebinds the event stream. Events delivered before this call never
    /// reach the returned subscription.
    fn subscribe(&mut self) -> EventSubscription;

    /// Starts loading `url`. Completion is not awaited; observe it through
    /// the subscription.
    fn navigate(&self, url: &str) -> impl Future<Output = Result<(), BrowserError>>;

    /// Parks the page on an empty document so the previous task's traffic
    /// winds down before the next subscription is bound.
    fn reset(&self) -> impl Future<Output = Result<(), BrowserError>> {
        async { Ok(()) }
    }
}

/// Receiving end of the browser's event stream for one navigation.
#[derive(Debug)]
pub struct EventSubscription {
    rx: mpsc::UnboundedReceiver<CdpEvent>,
}

impl EventSubscription {
    /// Creates a connected sender/subscription pair.
    pub fn channel() -> (mpsc::UnboundedSender<CdpEvent>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }

    /// Next event, or `None` once the source has gone away.
    pub async fn recv(&mut self) -> Option<CdpEvent> {
        self.rx.recv().await
    }
}
