use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::feed::Period;
use crate::indicator::IndicatorConfig;
use crate::plan::ChartStyle;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub dashboard: DashboardConfig,
    pub indicators: IndicatorConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_base_url")]
    pub quote_base_url: String,
    pub tickers: Vec<String>,
    pub period: Period,
    pub refresh_secs: u64,
    pub chart_style: ChartStyle,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub frame_rate_ms: u64,
    pub max_log_lines: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

fn default_base_url() -> String {
    crate::feed::yahoo::DEFAULT_BASE_URL.to_string()
}

fn default_cache_ttl_secs() -> u64 {
    300
}

impl DashboardConfig {
    /// Uppercased, trimmed, deduplicated ticker list in config order.
    pub fn watched_tickers(&self) -> Vec<String> {
        let mut out = Vec::new();
        for ticker in &self.tickers {
            let t = ticker.trim().to_ascii_uppercase();
            if !t.is_empty() && !out.iter().any(|v| v == &t) {
                out.push(t);
            }
        }
        out
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Path::new("config/default.toml");
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        Self::from_toml(&config_str)
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(config_str).context("failed to parse config/default.toml")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.dashboard.watched_tickers().is_empty() {
            bail!("dashboard.tickers must name at least one ticker");
        }
        if self.dashboard.refresh_secs == 0 {
            bail!("dashboard.refresh_secs must be > 0");
        }
        if self.ui.frame_rate_ms == 0 {
            bail!("ui.frame_rate_ms must be > 0");
        }
        self.indicators
            .validate()
            .context("indicators section is invalid")?;
        Ok(())
    }
}
