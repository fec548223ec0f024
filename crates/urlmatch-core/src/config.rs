use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// How to reach a browser (optional `[browser]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// HTTP debug endpoint of an already running browser
    /// (e.g. `http://127.0.0.1:9222`). When unset a browser is launched.
    #[serde(default)]
    pub devtools_url: Option<String>,
    /// Chrome/Chromium executable. When unset, common names on PATH are tried.
    #[serde(default)]
    pub binary_path: Option<String>,
    #[serde(default)]
    pub headless: bool,
    /// Extra command-line flags passed to a launched browser.
    #[serde(default)]
    pub extra_args: Vec<String>,
    /// How long a launched browser may take to expose its debug endpoint.
    pub startup_timeout_secs: u64,
    /// Upper bound for a single DevTools command round trip.
    pub command_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            devtools_url: None,
            binary_path: None,
            headless: false,
            extra_args: Vec::new(),
            startup_timeout_secs: 10,
            command_timeout_secs: 30,
        }
    }
}

impl BrowserConfig {
    pub fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.startup_timeout_secs)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}

/// Global configuration loaded from `~/.config/urlmatch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlmatchConfig {
    /// Time to observe network traffic after starting each navigation.
    /// A best-effort heuristic: slow chains may not finish inside it.
    pub settle_window_ms: u64,
    /// Pause between consecutive tasks.
    pub inter_task_delay_ms: u64,
    /// CSV file verdicts are appended to.
    pub output_path: PathBuf,
    #[serde(default)]
    pub browser: BrowserConfig,
}

impl Default for UrlmatchConfig {
    fn default() -> Self {
        Self {
            settle_window_ms: 3000,
            inter_task_delay_ms: 100,
            output_path: PathBuf::from("result.csv"),
            browser: BrowserConfig::default(),
        }
    }
}

impl UrlmatchConfig {
    pub fn settle_window(&self) -> Duration {
        Duration::from_millis(self.settle_window_ms)
    }

    pub fn inter_task_delay(&self) -> Duration {
        Duration::from_millis(self.inter_task_delay_ms)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("urlmatch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<UrlmatchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = UrlmatchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: UrlmatchConfig = toml::from_str(&data)?;
    Ok(cfg)
}
