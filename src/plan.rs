use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::AppError;
use crate::indicator::{names, IndicatorSet};

pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartStyle {
    Line,
    Candle,
}

impl ChartStyle {
    pub fn toggled(self) -> Self {
        match self {
            ChartStyle::Line => ChartStyle::Candle,
            ChartStyle::Candle => ChartStyle::Line,
        }
    }
}

impl fmt::Display for ChartStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartStyle::Line => f.write_str("line"),
            ChartStyle::Candle => f.write_str("candle"),
        }
    }
}

impl FromStr for ChartStyle {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "line" => Ok(ChartStyle::Line),
            "candle" => Ok(ChartStyle::Candle),
            other => Err(AppError::Config(format!(
                "unknown chart style '{}', expected 'line' or 'candle'",
                other
            ))),
        }
    }
}

/// Fixed horizontal rule a renderer must draw on a panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefLine {
    pub value: f64,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Price,
    Rsi,
    Macd,
}

/// One chart row: its title, 1-based row number, the indicator series drawn
/// on it, and any fixed reference lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub kind: PanelKind,
    pub title: String,
    pub row: usize,
    pub series: Vec<String>,
    pub ref_lines: Vec<RefLine>,
}

/// Deterministic layout for one ticker's chart. Rebuilt from the current
/// indicator set on every refresh tick, never cached across ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPlan {
    pub style: ChartStyle,
    pub panels: Vec<Panel>,
}

impl ChartPlan {
    pub fn rows(&self) -> usize {
        self.panels.len()
    }

    pub fn panel(&self, kind: PanelKind) -> Option<&Panel> {
        self.panels.iter().find(|p| p.kind == kind)
    }
}

/// Lay out the chart rows for the indicators actually present in `set`.
///
/// Candidate panels are walked in fixed order (price, RSI, MACD), filtered to
/// the ones present, and numbered sequentially. The price panel is always row
/// 1; an enabled SMA overlays it rather than taking a row of its own.
pub fn plan_chart(set: &IndicatorSet, style: ChartStyle) -> ChartPlan {
    let mut price_series = Vec::new();
    if set.contains(names::SMA) {
        price_series.push(names::SMA.to_string());
    }

    let candidates = [
        (
            PanelKind::Price,
            format!("{} Price", set.ticker()),
            true,
            price_series,
            Vec::new(),
        ),
        (
            PanelKind::Rsi,
            "RSI".to_string(),
            set.contains(names::RSI),
            vec![names::RSI.to_string()],
            vec![
                RefLine {
                    value: RSI_OVERBOUGHT,
                    label: "overbought",
                },
                RefLine {
                    value: RSI_OVERSOLD,
                    label: "oversold",
                },
            ],
        ),
        (
            PanelKind::Macd,
            "MACD".to_string(),
            set.contains(names::MACD),
            vec![names::MACD.to_string(), names::SIGNAL.to_string()],
            Vec::new(),
        ),
    ];

    let panels = candidates
        .into_iter()
        .filter(|(_, _, enabled, _, _)| *enabled)
        .enumerate()
        .map(|(i, (kind, title, _, series, ref_lines))| Panel {
            kind,
            title,
            row: i + 1,
            series,
            ref_lines,
        })
        .collect();

    ChartPlan { style, panels }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::{compute_indicators, IndicatorConfig};
    use crate::model::{PriceBar, PriceSeries};

    fn series(closes: &[f64]) -> PriceSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                timestamp_ms: (i as u64 + 1) * 60_000,
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 100.0,
            })
            .collect();
        PriceSeries::new("AAPL", bars)
    }

    fn set_for(config: IndicatorConfig) -> crate::indicator::IndicatorSet {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        compute_indicators(&series(&closes), &config).unwrap()
    }

    #[test]
    fn sma_only_is_a_single_row() {
        let set = set_for(IndicatorConfig {
            sma_enabled: true,
            sma_period: 5,
            rsi_enabled: false,
            rsi_period: 14,
            macd_enabled: false,
        });
        let plan = plan_chart(&set, ChartStyle::Line);
        assert_eq!(plan.rows(), 1);
        assert_eq!(plan.panels[0].title, "AAPL Price");
        assert_eq!(plan.panels[0].row, 1);
        // SMA overlays the price row, it never gets a row of its own.
        assert_eq!(plan.panels[0].series, vec!["SMA".to_string()]);
    }

    #[test]
    fn rsi_only_takes_row_two() {
        let set = set_for(IndicatorConfig {
            sma_enabled: false,
            sma_period: 20,
            rsi_enabled: true,
            rsi_period: 14,
            macd_enabled: false,
        });
        let plan = plan_chart(&set, ChartStyle::Line);
        assert_eq!(plan.rows(), 2);
        let rsi = plan.panel(PanelKind::Rsi).unwrap();
        assert_eq!(rsi.row, 2);
        assert_eq!(rsi.title, "RSI");
        let levels: Vec<f64> = rsi.ref_lines.iter().map(|r| r.value).collect();
        assert_eq!(levels, vec![70.0, 30.0]);
    }

    #[test]
    fn macd_without_rsi_takes_row_two() {
        let set = set_for(IndicatorConfig {
            sma_enabled: false,
            sma_period: 20,
            rsi_enabled: false,
            rsi_period: 14,
            macd_enabled: true,
        });
        let plan = plan_chart(&set, ChartStyle::Line);
        assert_eq!(plan.rows(), 2);
        let macd = plan.panel(PanelKind::Macd).unwrap();
        assert_eq!(macd.row, 2);
        assert_eq!(
            macd.series,
            vec!["MACD".to_string(), "Signal".to_string()]
        );
    }

    #[test]
    fn rsi_and_macd_puts_macd_last() {
        let set = set_for(IndicatorConfig {
            sma_enabled: true,
            sma_period: 20,
            rsi_enabled: true,
            rsi_period: 14,
            macd_enabled: true,
        });
        let plan = plan_chart(&set, ChartStyle::Candle);
        assert_eq!(plan.rows(), 3);
        assert_eq!(plan.panels[0].kind, PanelKind::Price);
        assert_eq!(plan.panel(PanelKind::Rsi).unwrap().row, 2);
        assert_eq!(plan.panel(PanelKind::Macd).unwrap().row, 3);
        assert_eq!(plan.style, ChartStyle::Candle);
    }

    #[test]
    fn rows_follow_current_flags_on_every_call() {
        // Same set of closes, different flags per call: row assignment must
        // track the flags, not any earlier plan.
        let with_both = set_for(IndicatorConfig {
            sma_enabled: false,
            sma_period: 20,
            rsi_enabled: true,
            rsi_period: 14,
            macd_enabled: true,
        });
        let macd_only = set_for(IndicatorConfig {
            sma_enabled: false,
            sma_period: 20,
            rsi_enabled: false,
            rsi_period: 14,
            macd_enabled: true,
        });
        assert_eq!(plan_chart(&with_both, ChartStyle::Line).panel(PanelKind::Macd).unwrap().row, 3);
        assert_eq!(plan_chart(&macd_only, ChartStyle::Line).panel(PanelKind::Macd).unwrap().row, 2);
    }

    #[test]
    fn chart_style_parses_and_toggles() {
        assert_eq!("line".parse::<ChartStyle>().unwrap(), ChartStyle::Line);
        assert_eq!("Candle".parse::<ChartStyle>().unwrap(), ChartStyle::Candle);
        assert!("bars".parse::<ChartStyle>().is_err());
        assert_eq!(ChartStyle::Line.toggled(), ChartStyle::Candle);
    }
}
