/// One OHLCV bar. Immutable once fetched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBar {
    pub timestamp_ms: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

/// Ordered OHLC history for one ticker.
///
/// Invariant: timestamps are strictly ascending with no duplicates. The
/// constructor sorts and dedups (last bar per timestamp wins), so a series
/// built from any fetch payload upholds it.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    ticker: String,
    bars: Vec<PriceBar>,
}

/// Header metrics for the dashboard, derived from the series alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSummary {
    pub last_price: f64,
    pub change: f64,
    pub change_pct: f64,
    pub period_high: f64,
    pub period_low: f64,
    pub volume: f64,
}

impl PriceSeries {
    pub fn new(ticker: impl Into<String>, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.timestamp_ms);
        // dedup_by passes (later, earlier); copy the later bar into the kept slot.
        bars.dedup_by(|later, kept| {
            if later.timestamp_ms == kept.timestamp_ms {
                *kept = *later;
                true
            } else {
                false
            }
        });
        Self {
            ticker: ticker.into(),
            bars,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last_bar(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Summary metrics for the header row. None for an empty series.
    pub fn summary(&self) -> Option<SeriesSummary> {
        let last = self.bars.last()?;
        let prev_close = if self.bars.len() >= 2 {
            self.bars[self.bars.len() - 2].close
        } else {
            last.open
        };
        let change = last.close - prev_close;
        let change_pct = if prev_close.abs() > f64::EPSILON {
            change / prev_close * 100.0
        } else {
            0.0
        };
        let period_high = self.bars.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let period_low = self.bars.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        Some(SeriesSummary {
            last_price: last.close,
            change,
            change_pct,
            period_high,
            period_low,
            volume: last.volume,
        })
    }
}
