use super::sma::Sma;

/// Relative Strength Index over close-to-close deltas.
///
/// Gains and losses are averaged with a simple rolling mean over `period`
/// deltas, so the first defined value lands at bar index `period` (the first
/// bar produces no delta). When the average loss is zero the value is exactly
/// 100 rather than the division-by-zero the raw formula would give.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    prev_close: Option<f64>,
    avg_gain: Sma,
    avg_loss: Sma,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "RSI period must be > 0");
        Self {
            period,
            prev_close: None,
            avg_gain: Sma::new(period),
            avg_loss: Sma::new(period),
        }
    }

    /// Push a close price, return the current RSI if enough deltas are in.
    pub fn push(&mut self, close: f64) -> Option<f64> {
        let prev = match self.prev_close.replace(close) {
            Some(p) => p,
            None => return None,
        };
        let delta = close - prev;
        let gain = self.avg_gain.push(delta.max(0.0));
        let loss = self.avg_loss.push((-delta).max(0.0));
        match (gain, loss) {
            (Some(_), Some(loss)) if loss == 0.0 => Some(100.0),
            (Some(gain), Some(loss)) => Some(100.0 - 100.0 / (1.0 + gain / loss)),
            _ => None,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}
