use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::select::CsvColumns;

/// Per-fetch timeout applied when the config does not override it.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// How a feed body is split into records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FeedFormat {
    /// One URL or domain per line; blank lines and `#` comments are skipped.
    Plaintext,
    /// Comma-separated rows with a header row at position 0.
    Csv(CsvColumns),
}

/// One configured phishing feed and where its blocklist goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    /// Short identifier used in logs and `--source` selection.
    pub name: String,
    /// HTTP/HTTPS location of the feed.
    pub url: String,
    /// Output hosts file. Relative paths resolve against `output_dir`.
    pub output: PathBuf,
    /// Reject URLs carrying a path, query or fragment instead of reducing them to their host.
    #[serde(default)]
    pub domain_only: bool,
    pub format: FeedFormat,
}

/// Global configuration loaded from `~/.config/phishblock/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Connect + transfer timeout for each feed fetch, in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// User-Agent sent with feed requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Base directory for relative output paths (None = current directory).
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    pub sources: Vec<FeedSource>,
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    format!("phishblock/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            user_agent: default_user_agent(),
            output_dir: None,
            sources: vec![
                FeedSource {
                    name: "openphish".to_string(),
                    url: "https://raw.githubusercontent.com/openphish/public_feed/refs/heads/main/feed.txt"
                        .to_string(),
                    output: PathBuf::from("openphish_hosts.txt"),
                    domain_only: false,
                    format: FeedFormat::Plaintext,
                },
                FeedSource {
                    name: "phishtank".to_string(),
                    url: "http://data.phishtank.com/data/online-valid.csv".to_string(),
                    output: PathBuf::from("phishtank_hosts.txt"),
                    domain_only: true,
                    format: FeedFormat::Csv(CsvColumns {
                        url_column: 1,
                        verified_column: Some(4),
                    }),
                },
            ],
        }
    }
}

impl FeedConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Where `source` writes its blocklist.
    pub fn output_path(&self, source: &FeedSource) -> PathBuf {
        match &self.output_dir {
            Some(dir) if source.output.is_relative() => dir.join(&source.output),
            _ => source.output.clone(),
        }
    }

    /// Sources named in `names`, in config order; all sources when `names` is empty.
    pub fn select_sources(&self, names: &[String]) -> Result<Vec<&FeedSource>> {
        for name in names {
            if !self.sources.iter().any(|s| &s.name == name) {
                bail!("unknown source '{}'", name);
            }
        }
        Ok(self
            .sources
            .iter()
            .filter(|s| names.is_empty() || names.contains(&s.name))
            .collect())
    }

    /// Rejects configs the pipeline cannot run meaningfully.
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            bail!("no sources configured");
        }
        if self.fetch_timeout_secs == 0 {
            bail!("fetch_timeout_secs must be greater than zero");
        }
        let mut names = HashSet::new();
        let mut outputs = HashSet::new();
        for source in &self.sources {
            if source.name.trim().is_empty() {
                bail!("source with empty name");
            }
            if source.url.trim().is_empty() {
                bail!("source '{}' has an empty url", source.name);
            }
            if !names.insert(source.name.as_str()) {
                bail!("duplicate source name '{}'", source.name);
            }
            if !outputs.insert(self.output_path(source)) {
                bail!(
                    "source '{}' writes to {} which another source also writes",
                    source.name,
                    source.output.display()
                );
            }
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("phishblock")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FeedConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FeedConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load and validate configuration from an explicit path. A missing file is an error.
pub fn load_from(path: &Path) -> Result<FeedConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: FeedConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
