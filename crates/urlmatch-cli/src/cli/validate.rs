//! `urlmatch <url_list>` – validate every row and append verdicts to the CSV.

use anyhow::{Context, Result};
use std::path::Path;
use urlmatch_core::browser::ChromeController;
use urlmatch_core::config::UrlmatchConfig;
use urlmatch_core::orchestrator::{self, BatchProgress, RunOptions};
use urlmatch_core::report::CsvSink;
use urlmatch_core::task_list;

pub async fn run_validation(url_list: &Path, cfg: &UrlmatchConfig) -> Result<()> {
    println!("--------------------------\nUrl Redirection Validator\n--------------------------\n");

    // Whole list is parsed before the result file or the browser is touched.
    println!("Reading URLs from {}", url_list.display());
    let tasks = task_list::load_tasks(url_list)?;
    println!("{} URL(s) read.\n", tasks.len());

    let mut sink = CsvSink::open(&cfg.output_path)?;

    println!("Starting browser.\n");
    let mut browser = ChromeController::start(&cfg.browser)
        .await
        .context("start browser session")?;

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<BatchProgress>(16);
    let progress_handle = tokio::spawn(async move {
        while let Some(p) = progress_rx.recv().await {
            let v = &p.verdict;
            println!(
                "{} -> {} [{}]",
                v.redirection_url,
                if v.final_destination_url.is_empty() {
                    "(unresolved)"
                } else {
                    v.final_destination_url.as_str()
                },
                v.final_status
            );
            println!("Processed URLs: {} / {}\n", p.processed, p.total);
        }
    });

    let result = orchestrator::run_batch(
        &mut browser,
        &tasks,
        &mut sink,
        RunOptions::from(cfg),
        Some(&progress_tx),
    )
    .await;
    drop(progress_tx);
    let _ = progress_handle.await;

    let summary = result?;
    println!(
        "All URLs have been processed: {} succeeded, {} failed. Results in {}",
        summary.succeeded,
        summary.failed,
        sink.path().display()
    );
    Ok(())
}
