/// Exponential Moving Average seeded with the first pushed value.
///
/// The seed makes the series fully defined from the first sample, so EMA-based
/// indicators have no warm-up gap. Smoothing factor is 2 / (period + 1).
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    alpha: f64,
    ema: Option<f64>,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "EMA period must be > 0");
        Self {
            period,
            alpha: 2.0 / (period as f64 + 1.0),
            ema: None,
        }
    }

    /// Push a new value. Defined from the very first push.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        let next = match self.ema {
            Some(prev) => prev + (value - prev) * self.alpha,
            None => value,
        };
        self.ema = Some(next);
        self.ema
    }

    pub fn value(&self) -> Option<f64> {
        self.ema
    }

    pub fn period(&self) -> usize {
        self.period
    }
}
