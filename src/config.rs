use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::scores::thescore::DEFAULT_BASE_URL;

/// Caching scoreboard proxy for theScore NBA/MLB feeds
#[derive(Parser, Debug, Clone)]
#[command(name = "scores-proxy", version, about)]
pub struct Config {
    /// Address the scoreboard server listens on
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8887")]
    pub listen_addr: String,

    /// Upstream scores API base URL
    #[arg(long, env = "UPSTREAM_URL", default_value = DEFAULT_BASE_URL)]
    pub upstream_url: String,

    /// Request timeout for upstream calls in seconds (HTTP client default when unset)
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS")]
    pub upstream_timeout_secs: Option<u64>,

    /// Directory holding css/, js/ and images/{sport}/ static assets
    #[arg(long, env = "ASSETS_DIR", default_value = "assets")]
    pub assets_dir: PathBuf,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        let url = url::Url::parse(&self.upstream_url)
            .map_err(|e| anyhow::anyhow!("UPSTREAM_URL '{}' is invalid: {}", self.upstream_url, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("UPSTREAM_URL must use http or https, got '{}'", url.scheme());
        }
        if self.upstream_timeout_secs == Some(0) {
            anyhow::bail!("upstream_timeout_secs must be positive");
        }
        if !self.assets_dir.is_dir() {
            anyhow::bail!("assets_dir '{}' is not a directory", self.assets_dir.display());
        }
        Ok(())
    }

    pub fn upstream_timeout(&self) -> Option<Duration> {
        self.upstream_timeout_secs.map(Duration::from_secs)
    }
}
