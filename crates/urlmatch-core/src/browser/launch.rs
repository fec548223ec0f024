//! Launch a private Chrome/Chromium instance with remote debugging enabled.
//!
//! Each launch gets a throw-away profile directory and an ephemeral debug
//! port. The process is killed and the profile removed when the returned
//! [`LaunchedBrowser`] is dropped.

use std::net::TcpListener;
use std::process::{Child, Command, Stdio};

use tempfile::TempDir;
use url::Url;

use crate::config::BrowserConfig;

use super::devtools;
use super::error::BrowserError;

/// Loosened security so redirects are observed as the server issues them,
/// regardless of certificate problems or mixed content.
const BASE_FLAGS: &[&str] = &[
    "--no-first-run",
    "--no-default-browser-check",
    "--disable-features=IsolateOrigins,site-per-process",
    "--disable-web-security",
    "--allow-running-insecure-content",
    "--disable-extensions",
    "--ignore-certificate-errors",
    "--disable-notifications",
    "--disable-popup-blocking",
    "--disable-usb-device-redirector",
];

const DEFAULT_BINARIES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "chrome",
];

/// Environment override for the browser executable.
pub const BROWSER_BIN_ENV: &str = "URLMATCH_BROWSER_BIN";

/// A running browser owned by this process.
#[derive(Debug)]
pub struct LaunchedBrowser {
    child: Child,
    endpoint: Url,
    _profile: TempDir,
}

impl LaunchedBrowser {
    /// HTTP debug endpoint, e.g. `http://127.0.0.1:41233/`.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl Drop for LaunchedBrowser {
    fn drop(&mut self) {
        if let Err(e) = self.child.kill() {
            tracing::debug!(error = %e, "browser already exited");
        }
        let _ = self.child.wait();
    }
}

/// Starts the browser and blocks until its debug endpoint answers.
pub fn launch(cfg: &BrowserConfig) -> Result<LaunchedBrowser, BrowserError> {
    let port = pick_ephemeral_port()?;
    let profile = tempfile::Builder::new()
        .prefix("urlmatch-profile-")
        .tempdir()
        .map_err(|e| BrowserError::Launch {
            reason: format!("failed to create profile dir: {e}"),
        })?;
    let args = browser_args(port, &profile.path().display().to_string(), cfg);

    let mut last_error = None;
    let mut spawned = None;
    for candidate in binary_candidates(cfg.binary_path.as_deref()) {
        match Command::new(&candidate)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => {
                tracing::info!(binary = %candidate, port, "launched browser");
                spawned = Some(child);
                break;
            }
            Err(e) => last_error = Some(format!("{candidate}: {e}")),
        }
    }
    let child = spawned.ok_or_else(|| BrowserError::Launch {
        reason: last_error.unwrap_or_else(|| "no browser candidates".to_string()),
    })?;

    let endpoint = devtools::parse_endpoint(&format!("http://127.0.0.1:{port}"))?;
    let browser = LaunchedBrowser {
        child,
        endpoint,
        _profile: profile,
    };
    // On failure `browser` drops here and the process is killed.
    devtools::wait_for_endpoint(&browser.endpoint, cfg.startup_timeout())?;
    Ok(browser)
}

fn browser_args(port: u16, profile_dir: &str, cfg: &BrowserConfig) -> Vec<String> {
    let mut args = vec![
        format!("--remote-debugging-port={port}"),
        "--remote-debugging-address=127.0.0.1".to_string(),
        format!("--user-data-dir={profile_dir}"),
    ];
    args.extend(BASE_FLAGS.iter().map(|f| f.to_string()));
    if cfg.headless {
        args.push("--headless=new".to_string());
        args.push("--disable-gpu".to_string());
    }
    args.extend(
        cfg.extra_args
            .iter()
            .filter(|a| !a.trim().is_empty())
            .cloned(),
    );
    args.push("about:blank".to_string());
    args
}

fn binary_candidates(configured: Option<&str>) -> Vec<String> {
    let mut candidates = Vec::new();
    if let Some(path) = configured.filter(|p| !p.trim().is_empty()) {
        candidates.push(path.to_string());
    }
    if let Ok(env_path) = std::env::var(BROWSER_BIN_ENV) {
        if !env_path.trim().is_empty() {
            candidates.push(env_path);
        }
    }
    candidates.extend(DEFAULT_BINARIES.iter().map(|s| s.to_string()));
    candidates
}

fn pick_ephemeral_port() -> Result<u16, BrowserError> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|e| BrowserError::Launch {
        reason: format!("port bind failed: {e}"),
    })?;
    let port = listener
        .local_addr()
        .map_err(|e| BrowserError::Launch {
            reason: format!("port lookup failed: {e}"),
        })?
        .port();
    Ok(port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_include_debug_port_profile_and_base_flags() {
        let cfg = BrowserConfig::default();
        let args = browser_args(9333, "/tmp/p", &cfg);
        assert_eq!(args[0], "--remote-debugging-port=9333");
        assert!(args.contains(&"--user-data-dir=/tmp/p".to_string()));
        assert!(args.contains(&"--ignore-certificate-errors".to_string()));
        assert!(!args.iter().any(|a| a.starts_with("--headless")));
        assert_eq!(args.last().map(String::as_str), Some("about:blank"));
    }

    #[test]
    fn headless_and_extra_args() {
        let cfg = BrowserConfig {
            headless: true,
            extra_args: vec!["--lang=en-US".to_string(), "  ".to_string()],
            ..BrowserConfig::default()
        };
        let args = browser_args(1, "/tmp/p", &cfg);
        assert!(args.contains(&"--headless=new".to_string()));
        assert!(args.contains(&"--lang=en-US".to_string()));
        assert!(!args.iter().any(|a| a.trim().is_empty()));
    }

    #[test]
    fn configured_binary_is_tried_first() {
        let candidates = binary_candidates(Some("/opt/chrome/chrome"));
        assert_eq!(candidates[0], "/opt/chrome/chrome");
        assert!(candidates.contains(&"chromium".to_string()));
    }

    #[test]
    fn blank_configured_binary_is_skipped() {
        let candidates = binary_candidates(Some("   "));
        assert!(!candidates.iter().any(|c| c.trim().is_empty()));
    }

    #[test]
    fn ephemeral_port_is_nonzero() {
        assert_ne!(pick_ephemeral_port().unwrap(), 0);
    }
}
