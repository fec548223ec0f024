//! CLI parse tests.

use super::Cli;
use clap::Parser;
use std::path::Path;
use urlmatch_core::config::UrlmatchConfig;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn cli_parse_url_list_only() {
    let cli = parse(&["urlmatch", "url_list.txt"]);
    assert_eq!(cli.url_list, Path::new("url_list.txt"));
    assert!(cli.output.is_none());
    assert!(cli.settle_ms.is_none());
    assert!(cli.devtools.is_none());
    assert!(!cli.headless);
}

#[test]
fn cli_requires_exactly_one_list() {
    assert!(Cli::try_parse_from(["urlmatch"]).is_err());
    assert!(Cli::try_parse_from(["urlmatch", "a.txt", "b.txt"]).is_err());
}

#[test]
fn cli_parse_options() {
    let cli = parse(&[
        "urlmatch",
        "urls.txt",
        "--output",
        "/tmp/out.csv",
        "--settle-ms",
        "5000",
        "--devtools",
        "http://127.0.0.1:9222",
        "--browser",
        "/usr/bin/chromium",
        "--headless",
    ]);
    assert_eq!(cli.output.as_deref(), Some(Path::new("/tmp/out.csv")));
    assert_eq!(cli.settle_ms, Some(5000));
    assert_eq!(cli.devtools.as_deref(), Some("http://127.0.0.1:9222"));
    assert_eq!(cli.browser.as_deref(), Some("/usr/bin/chromium"));
    assert!(cli.headless);
}

#[test]
fn overrides_replace_config_values() {
    let cli = parse(&[
        "urlmatch",
        "urls.txt",
        "--output",
        "out.csv",
        "--settle-ms",
        "750",
        "--headless",
    ]);
    let mut cfg = UrlmatchConfig::default();
    cli.apply_overrides(&mut cfg);
    assert_eq!(cfg.output_path, Path::new("out.csv"));
    assert_eq!(cfg.settle_window_ms, 750);
    assert!(cfg.browser.headless);
    assert!(cfg.browser.devtools_url.is_none());
}

#[test]
fn no_flags_keep_config_values() {
    let cli = parse(&["urlmatch", "urls.txt"]);
    let mut cfg = UrlmatchConfig {
        settle_window_ms: 1234,
        ..UrlmatchConfig::default()
    };
    cfg.browser.headless = true;
    cli.apply_overrides(&mut cfg);
    assert_eq!(cfg.settle_window_ms, 1234);
    assert!(cfg.browser.headless);
    assert_eq!(cfg.output_path, Path::new("result.csv"));
}
