use super::ema::Ema;

pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPoint {
    pub macd: f64,
    pub signal: f64,
}

/// MACD line (fast EMA minus slow EMA) plus its signal EMA.
///
/// Built on first-value-seeded EMAs, so both lines are defined from index 0.
/// Windows are the conventional 12/26/9 and not configurable.
#[derive(Debug, Clone)]
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
}

impl Macd {
    pub fn new() -> Self {
        Self {
            fast: Ema::new(MACD_FAST),
            slow: Ema::new(MACD_SLOW),
            signal: Ema::new(MACD_SIGNAL),
        }
    }

    pub fn push(&mut self, close: f64) -> Option<MacdPoint> {
        let fast = self.fast.push(close)?;
        let slow = self.slow.push(close)?;
        let line = fast - slow;
        let signal = self.signal.push(line)?;
        Some(MacdPoint { macd: line, signal })
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defined_from_first_push() {
        let mut macd = Macd::new();
        let p = macd.push(100.0).unwrap();
        // Both EMAs seed with the first close, so the line starts at zero.
        assert!((p.macd - 0.0).abs() < f64::EPSILON);
        assert!((p.signal - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rising_closes_push_line_positive() {
        let mut macd = Macd::new();
        let mut last = None;
        for i in 0..40 {
            last = macd.push(100.0 + i as f64);
        }
        let p = last.unwrap();
        // Fast EMA tracks a rising series closer than the slow one.
        assert!(p.macd > 0.0);
        assert!(p.signal > 0.0);
        assert!(p.macd > p.signal);
    }
}
