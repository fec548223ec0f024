//! CLI for the urlmatch redirect validator.

mod validate;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use urlmatch_core::config::{self, UrlmatchConfig};

use validate::run_validation;

/// Navigate to each redirection URL and check that it lands on the expected domain.
#[derive(Debug, Parser)]
#[command(name = "urlmatch")]
#[command(about = "Validate URL redirections against expected destinations", long_about = None)]
pub struct Cli {
    /// Text file: a header line, then one `redirection_url,destination_url` per line.
    pub url_list: PathBuf,

    /// CSV file results are appended to (default from config: result.csv).
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Milliseconds to observe network traffic after each navigation.
    #[arg(long, value_name = "MS")]
    pub settle_ms: Option<u64>,

    /// Attach to a running browser's debug endpoint (e.g. http://127.0.0.1:9222) instead of launching one.
    #[arg(long, value_name = "URL")]
    pub devtools: Option<String>,

    /// Chrome/Chromium executable to launch.
    #[arg(long, value_name = "PATH")]
    pub browser: Option<String>,

    /// Launch the browser headless.
    #[arg(long)]
    pub headless: bool,
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        cli.apply_overrides(&mut cfg);
        tracing::debug!("effective config: {:?}", cfg);
        run_validation(&cli.url_list, &cfg).await
    }

    /// Command-line flags win over config.toml.
    pub fn apply_overrides(&self, cfg: &mut UrlmatchConfig) {
        if let Some(output) = &self.output {
            cfg.output_path = output.clone();
        }
        if let Some(ms) = self.settle_ms {
            cfg.settle_window_ms = ms;
        }
        if let Some(url) = &self.devtools {
            cfg.browser.devtools_url = Some(url.clone());
        }
        if let Some(bin) = &self.browser {
            cfg.browser.binary_path = Some(bin.clone());
        }
        if self.headless {
            cfg.browser.headless = true;
        }
    }
}

#[cfg(test)]
mod tests;
