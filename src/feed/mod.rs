pub mod cache;
pub mod yahoo;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::AppError;
use crate::model::PriceSeries;

pub use self::cache::QuoteCache;
pub use self::yahoo::QuoteClient;

/// Lookback window for a fetch. Each period maps to the bar interval the
/// quote API is asked for, so intraday windows get intraday bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Period {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDay,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonth,
    #[serde(rename = "6mo")]
    SixMonth,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYear,
    #[serde(rename = "5y")]
    FiveYear,
}

impl Period {
    pub const ALL: [Period; 8] = [
        Period::OneDay,
        Period::FiveDay,
        Period::OneMonth,
        Period::ThreeMonth,
        Period::SixMonth,
        Period::OneYear,
        Period::TwoYear,
        Period::FiveYear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneDay => "1d",
            Period::FiveDay => "5d",
            Period::OneMonth => "1mo",
            Period::ThreeMonth => "3mo",
            Period::SixMonth => "6mo",
            Period::OneYear => "1y",
            Period::TwoYear => "2y",
            Period::FiveYear => "5y",
        }
    }

    pub fn bar_interval(&self) -> &'static str {
        match self {
            Period::OneDay => "5m",
            Period::FiveDay => "30m",
            Period::OneMonth | Period::ThreeMonth | Period::SixMonth | Period::OneYear => "1d",
            Period::TwoYear | Period::FiveYear => "1wk",
        }
    }

    pub fn next(&self) -> Period {
        let idx = Period::ALL.iter().position(|p| p == self).unwrap_or(0);
        Period::ALL[(idx + 1) % Period::ALL.len()]
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .iter()
            .find(|p| p.as_str() == s.trim())
            .copied()
            .ok_or_else(|| AppError::Config(format!("unknown period '{}'", s)))
    }
}

/// Outcome of one batched fetch. Failures stay per-ticker so the rest of the
/// batch still renders.
#[derive(Debug, Default)]
pub struct FetchBatch {
    pub series: HashMap<String, PriceSeries>,
    pub errors: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_round_trips_through_str() {
        for p in Period::ALL {
            assert_eq!(p.as_str().parse::<Period>().unwrap(), p);
        }
        assert!("10y".parse::<Period>().is_err());
    }

    #[test]
    fn period_cycle_wraps() {
        assert_eq!(Period::FiveYear.next(), Period::OneDay);
        assert_eq!(Period::OneDay.next(), Period::FiveDay);
    }

    #[test]
    fn intraday_periods_use_intraday_bars() {
        assert_eq!(Period::OneDay.bar_interval(), "5m");
        assert_eq!(Period::OneMonth.bar_interval(), "1d");
        assert_eq!(Period::FiveYear.bar_interval(), "1wk");
    }
}
