use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// Cached dashboard results are reused for one hour by default.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// The fixed NYSE watchlist the dashboard tracks when the config does not
/// override it.
pub fn default_tickers() -> Vec<String> {
    [
        "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "META", "NVDA", "JPM", "WMT", "UNH", "KO", "PEP",
        "V", "BAC", "HD", "DIS", "MA", "PYPL", "INTC", "IBM", "CSCO", "ORCL", "NFLX", "T", "CVX",
        "PFE", "XOM", "C", "MCD", "BA", "ABT", "CRM", "MRK", "QCOM", "NKE",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YahooProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub yahoo: Option<YahooProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            yahoo: Some(YahooProviderConfig {
                base_url: "https://query1.finance.yahoo.com".to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_tickers")]
    pub tickers: Vec<String>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            tickers: default_tickers(),
            providers: ProvidersConfig::default(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config file found, using defaults");
            return Ok(AppConfig::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "bolsa")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn yahoo_base_url(&self) -> &str {
        self.providers
            .yahoo
            .as_ref()
            .map_or("https://query1.finance.yahoo.com", |p| &p.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
tickers:
  - "AAPL"
  - "MSFT"
providers:
  yahoo:
    base_url: "http://example.com/yahoo"
cache_ttl_secs: 60
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.tickers, vec!["AAPL", "MSFT"]);
        assert_eq!(
            config.providers.yahoo.unwrap().base_url,
            "http://example.com/yahoo"
        );
        assert_eq!(config.cache_ttl_secs, 60);
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.tickers.len(), 35);
        assert_eq!(config.tickers[0], "AAPL");
        assert_eq!(config.tickers[34], "NKE");
        assert_eq!(config.cache_ttl_secs, 3600);
        assert_eq!(
            config.yahoo_base_url(),
            "https://query1.finance.yahoo.com"
        );
    }

    #[test]
    fn test_default_watchlist_has_no_duplicates() {
        let tickers = default_tickers();
        let unique: std::collections::HashSet<_> = tickers.iter().collect();
        assert_eq!(unique.len(), tickers.len());
    }
}
