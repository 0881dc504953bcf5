pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::AppError;
use crate::model::PriceSeries;

use self::macd::Macd;
use self::rsi::Rsi;
use self::sma::Sma;

/// Canonical series names. The planner and renderer look indicators up by
/// these, so they are the contract between engine and chart.
pub mod names {
    pub const SMA: &str = "SMA";
    pub const RSI: &str = "RSI";
    pub const MACD: &str = "MACD";
    pub const SIGNAL: &str = "Signal";
}

/// Which indicators to compute, and with what windows. MACD uses the fixed
/// 12/26/9 windows from `macd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IndicatorConfig {
    pub sma_enabled: bool,
    pub sma_period: usize,
    pub rsi_enabled: bool,
    pub rsi_period: usize,
    pub macd_enabled: bool,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_enabled: true,
            sma_period: 20,
            rsi_enabled: true,
            rsi_period: 14,
            macd_enabled: false,
        }
    }
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.sma_period == 0 {
            return Err(AppError::Config("indicators.sma_period must be >= 1".into()));
        }
        if self.rsi_period == 0 {
            return Err(AppError::Config("indicators.rsi_period must be >= 1".into()));
        }
        Ok(())
    }
}

/// A numeric series aligned 1:1 by index with the bars it was derived from.
/// The `None` prefix is the indicator's warm-up.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub fn first_defined(&self) -> Option<usize> {
        self.values.iter().position(|v| v.is_some())
    }
}

/// Result of one engine run: only enabled indicators are present, so the
/// planner can test for presence instead of re-reading the config.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    ticker: String,
    len: usize,
    series: HashMap<String, IndicatorSeries>,
    short_window: Vec<String>,
}

impl IndicatorSet {
    fn new(ticker: &str, len: usize) -> Self {
        Self {
            ticker: ticker.to_string(),
            len,
            series: HashMap::new(),
            short_window: Vec::new(),
        }
    }

    fn insert(&mut self, name: &str, values: Vec<Option<f64>>) {
        debug_assert_eq!(values.len(), self.len);
        if values.iter().all(|v| v.is_none()) {
            tracing::warn!(
                ticker = %self.ticker,
                indicator = name,
                bars = self.len,
                "series shorter than indicator window, all values undefined"
            );
            self.short_window.push(name.to_string());
        }
        self.series.insert(
            name.to_string(),
            IndicatorSeries {
                name: name.to_string(),
                values,
            },
        );
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Bar count of the source series; every contained series has this length.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, name: &str) -> Option<&IndicatorSeries> {
        self.series.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.series.contains_key(name)
    }

    /// Indicators whose window exceeded the series length (all-undefined
    /// output). Distinct from the no-data case, which is an error instead.
    pub fn short_window(&self) -> &[String] {
        &self.short_window
    }
}

/// Compute the enabled indicator series for one price series.
///
/// Pure and deterministic: identical inputs yield identical output. An empty
/// series is a `NoData` error; the chart planner must not be invoked for it.
pub fn compute_indicators(
    series: &PriceSeries,
    config: &IndicatorConfig,
) -> Result<IndicatorSet, AppError> {
    if series.is_empty() {
        return Err(AppError::NoData {
            ticker: series.ticker().to_string(),
        });
    }

    let closes = series.closes();
    let mut set = IndicatorSet::new(series.ticker(), closes.len());

    if config.sma_enabled {
        let mut sma = Sma::new(config.sma_period);
        let values = closes.iter().map(|&c| sma.push(c)).collect();
        set.insert(names::SMA, values);
    }

    if config.rsi_enabled {
        let mut rsi = Rsi::new(config.rsi_period);
        let values = closes.iter().map(|&c| rsi.push(c)).collect();
        set.insert(names::RSI, values);
    }

    if config.macd_enabled {
        let mut macd = Macd::new();
        let mut line = Vec::with_capacity(closes.len());
        let mut signal = Vec::with_capacity(closes.len());
        for &c in &closes {
            match macd.push(c) {
                Some(p) => {
                    line.push(Some(p.macd));
                    signal.push(Some(p.signal));
                }
                None => {
                    line.push(None);
                    signal.push(None);
                }
            }
        }
        set.insert(names::MACD, line);
        set.insert(names::SIGNAL, signal);
    }

    Ok(set)
}
