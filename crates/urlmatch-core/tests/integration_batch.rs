//! Integration test: URL list file → orchestrator with a scripted browser →
//! CSV result file.

mod common;

use std::time::Duration;

use common::scripted_browser::{request, response, ScriptedBrowser};
use tempfile::tempdir;
use urlmatch_core::orchestrator::{self, RunOptions};
use urlmatch_core::report::CsvSink;
use urlmatch_core::task_list;

const HEADER: &str = "Request Id,Redirection URL,Destination URL,Final Destination URL,Final Status";

fn opts() -> RunOptions {
    RunOptions {
        settle_window: Duration::from_secs(3),
        inter_task_delay: Duration::from_millis(100),
    }
}

fn browser() -> ScriptedBrowser {
    ScriptedBrowser::new()
        .on(
            "http://short.ly/x",
            vec![
                request("1000.1", "short.ly", "/x"),
                response("1000.1", 301),
                request("1000.1", "example.com", "/page"),
                request("1000.7", "fonts.test", "/font.woff2"),
                response("1000.1", 200),
                response("1000.7", 200),
            ],
        )
        .on(
            "http://promo.test/go",
            vec![
                request("2000.1", "promo.test", "/go"),
                response("2000.1", 302),
                request("2000.1", "attacker.test", "/page"),
                response("2000.1", 200),
            ],
        )
        .unreachable("http://down.test/")
}

#[tokio::test(start_paused = true)]
async fn batch_writes_one_row_per_task() {
    let dir = tempdir().unwrap();
    let list = dir.path().join("url_list.txt");
    std::fs::write(
        &list,
        "redirection,destination\n\
         http://short.ly/x, https://example.com/page\n\
         http://promo.test/go,https://www.example.com/\n\
         http://down.test/,https://example.com/\n\
         http://silent.test/,https://example.com/\n",
    )
    .unwrap();
    let out = dir.path().join("result.csv");

    let tasks = task_list::load_tasks(&list).unwrap();
    let mut sink = CsvSink::open(&out).unwrap();
    let mut browser = browser();
    let summary = orchestrator::run_batch(&mut browser, &tasks, &mut sink, opts(), None)
        .await
        .unwrap();
    assert_eq!(summary.processed, 4);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 3);

    let text = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        [
            HEADER,
            "1000.1,http://short.ly/x,https://example.com/page,example.com/page,Success",
            "2000.1,http://promo.test/go,https://www.example.com/,attacker.test/page,Failure",
            ",http://down.test/,https://example.com/,,Failure",
            ",http://silent.test/,https://example.com/,,Failure",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn repeated_runs_share_one_header() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("result.csv");
    let tasks = task_list::parse_tasks("h\nhttp://short.ly/x,https://example.com/page\n").unwrap();

    for _ in 0..2 {
        let mut sink = CsvSink::open(&out).unwrap();
        let mut browser = browser();
        orchestrator::run_batch(&mut browser, &tasks, &mut sink, opts(), None)
            .await
            .unwrap();
    }

    let text = std::fs::read_to_string(&out).unwrap();
    assert_eq!(text.matches(HEADER).count(), 1);
    assert_eq!(text.lines().count(), 3);
}

#[tokio::test(start_paused = true)]
async fn malformed_list_aborts_before_navigation() {
    let dir = tempdir().unwrap();
    let list = dir.path().join("url_list.txt");
    std::fs::write(&list, "h\nhttp://short.ly/x https://example.com/page\n").unwrap();
    assert!(task_list::load_tasks(&list).is_err());
}
