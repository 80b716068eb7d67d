//! Command-line configuration.
//!
//! Every option has a default matching the public endpoints, so running the
//! binary with no arguments gives the full dashboard.  Each option can also
//! come from a `HYPERADAR_*` environment variable.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;

pub const DEFAULT_RELAY: &str = "https://api.allorigins.win/get?url=";
pub const DEFAULT_SOCIAL_URL: &str = "https://www.reddit.com/r/popular.json";
pub const DEFAULT_NEWS_URL: &str = "https://hacker-news.firebaseio.com/v0";

#[derive(Debug, Clone, Parser)]
#[command(name = "hyperadar")]
#[command(about = "Live dashboard of search trends, Reddit popular posts and Hacker News")]
pub struct Config {
    /// Region code for the search-trend feed.
    #[arg(long, env = "HYPERADAR_REGION", default_value = "IN")]
    pub region: String,

    /// CORS relay prefix the trend feed URL is appended to.
    #[arg(long, env = "HYPERADAR_RELAY", default_value = DEFAULT_RELAY)]
    pub relay: String,

    /// Fetch the trend feed directly instead of through the relay.
    #[arg(long)]
    pub no_relay: bool,

    /// Popular-posts listing endpoint.
    #[arg(long, env = "HYPERADAR_SOCIAL_URL", default_value = DEFAULT_SOCIAL_URL)]
    pub social_url: String,

    /// Tech-news API root.
    #[arg(long, env = "HYPERADAR_NEWS_URL", default_value = DEFAULT_NEWS_URL)]
    pub news_url: String,

    /// Seconds between automatic refreshes.
    #[arg(long, env = "HYPERADAR_INTERVAL_SECS", default_value_t = 300)]
    pub interval_secs: u64,

    /// Per-source timeout in seconds.
    #[arg(long, env = "HYPERADAR_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Log file; the terminal itself is taken by the UI.
    #[arg(long, env = "HYPERADAR_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            bail!("--interval-secs must be greater than zero");
        }
        if self.timeout_secs == 0 {
            bail!("--timeout-secs must be greater than zero");
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The relay prefix, or `None` when disabled.
    pub fn relay(&self) -> Option<String> {
        (!self.no_relay && !self.relay.is_empty()).then(|| self.relay.clone())
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("hyperadar.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("hyperadar").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_point_at_public_endpoints() {
        let config = parse(&[]);

        assert_eq!(config.region, "IN");
        assert_eq!(config.relay().as_deref(), Some(DEFAULT_RELAY));
        assert_eq!(config.social_url, DEFAULT_SOCIAL_URL);
        assert_eq!(config.news_url, DEFAULT_NEWS_URL);
        assert_eq!(config.interval(), Duration::from_secs(300));
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn no_relay_disables_relay() {
        let config = parse(&["--no-relay"]);
        assert!(config.relay().is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let config = parse(&["--region", "US", "--interval-secs", "60", "--timeout-secs", "3"]);

        assert_eq!(config.region, "US");
        assert_eq!(config.interval(), Duration::from_secs(60));
        assert_eq!(config.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = parse(&["--interval-secs", "0"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = parse(&["--timeout-secs", "0"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn log_path_defaults_to_temp_dir() {
        let config = parse(&[]);
        assert!(config.log_path().ends_with("hyperadar.log"));

        let config = parse(&["--log-file", "/tmp/radar.log"]);
        assert_eq!(config.log_path(), PathBuf::from("/tmp/radar.log"));
    }
}
