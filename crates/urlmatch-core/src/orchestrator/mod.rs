//! Run orchestration: one navigation at a time, one correlator per task.
//!
//! For each task the page is parked on a blank document, the event
//! subscription is rebound, a fresh [`Correlator`] is created, navigation is
//! triggered, and events are ingested until the settle window elapses. There is no reliable "redirects finished" signal, so the
//! window is a best-effort deadline: chains slower than it are cut short.

mod progress;

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use crate::browser::{BrowserController, EventSubscription};
use crate::config::UrlmatchConfig;
use crate::correlator::Correlator;
use crate::event::classify;
use crate::report::ResultSink;
use crate::resolver::{final_status_code, redirect_chain, resolve_final};
use crate::verdict::{evaluate, ValidationTask, Verdict};

pub use progress::{BatchProgress, BatchSummary};

/// Timing knobs for a batch.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub settle_window: Duration,
    pub inter_task_delay: Duration,
}

impl From<&UrlmatchConfig> for RunOptions {
    fn from(cfg: &UrlmatchConfig) -> Self {
        Self {
            settle_window: cfg.settle_window(),
            inter_task_delay: cfg.inter_task_delay(),
        }
    }
}

/// Validates every task in order, appending each verdict to `sink` as soon
/// as it is known. Navigations that fail without producing any events become
/// Failure rows; a sink failure aborts the run.
pub async fn run_batch<B, S>(
    browser: &mut B,
    tasks: &[ValidationTask],
    sink: &mut S,
    opts: RunOptions,
    progress_tx: Option<&mpsc::Sender<BatchProgress>>,
) -> Result<BatchSummary>
where
    B: BrowserController,
    S: ResultSink,
{
    let total = tasks.len();
    let mut summary = BatchSummary::default();

    for (idx, task) in tasks.iter().enumerate() {
        let verdict = validate_one(browser, task, opts.settle_window).await;
        sink.append(&verdict)
            .with_context(|| format!("record verdict for {}", task.redirection_url))?;
        summary.record(&verdict);

        tracing::info!(
            processed = idx + 1,
            total,
            status = %verdict.final_status,
            "processed redirection URL"
        );
        if let Some(tx) = progress_tx {
            let _ = tx
                .send(BatchProgress {
                    processed: idx + 1,
                    total,
                    verdict,
                })
                .await;
        }

        if idx + 1 < total && !opts.inter_task_delay.is_zero() {
            tokio::time::sleep(opts.inter_task_delay).await;
        }
    }

    Ok(summary)
}

/// Navigates to one redirection URL and judges where it ended up.
pub async fn validate_one<B>(browser: &mut B, task: &ValidationTask, settle_window: Duration) -> Verdict
where
    B: BrowserController,
{
    if let Err(e) = browser.reset().await {
        tracing::debug!(error = %e, "blank page reset failed");
    }
    let mut subscription = browser.subscribe();
    let mut correlator = Correlator::new();

    tracing::debug!(url = %task.redirection_url, "navigating");
    // A load error can arrive after the whole chain was seen (downloads and
    // 204s end in net::ERR_ABORTED), so the window is observed regardless.
    let navigation = browser.navigate(&task.redirection_url).await;
    if let Err(e) = &navigation {
        tracing::warn!(url = %task.redirection_url, error = %e, "navigation reported an error");
    }

    observe(&mut subscription, &mut correlator, settle_window).await;
    drop(subscription);

    let state = correlator.finish();
    if state.is_empty() {
        if navigation.is_err() {
            return Verdict::navigation_failed(task);
        }
        tracing::warn!(url = %task.redirection_url, "no network events observed in settle window");
    }
    let final_url = resolve_final(&state);
    tracing::debug!(
        url = %task.redirection_url,
        primary = state.primary_request_id.as_deref().unwrap_or(""),
        chain = ?redirect_chain(&state),
        status_code = ?final_status_code(&state),
        ignored_requests = state.ignored_requests,
        "settle window closed"
    );
    evaluate(task, state.primary_request_id.as_deref(), &final_url)
}

/// Feeds classified events into the correlator until the window elapses or
/// the event source disappears. The deadline is checked first on every turn
/// so nothing is ingested once it has passed.
async fn observe(
    subscription: &mut EventSubscription,
    correlator: &mut Correlator,
    settle_window: Duration,
) {
    let deadline = tokio::time::sleep(settle_window);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            biased;
            _ = &mut deadline => break,
            event = subscription.recv() => match event {
                Some(raw) => {
                    if let Some(ev) = classify(&raw.method, &raw.params) {
                        correlator.ingest(ev);
                    }
                }
                None => {
                    tracing::warn!("event stream ended before settle window elapsed");
                    break;
                }
            },
        }
    }
}
