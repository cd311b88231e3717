//! Rolling extremes — trailing support (min low) and resistance (max high).
//!
//! Lookback: period - 1. The window includes the current candle, so a
//! candle printing a fresh low is its own support level that tick.

use crate::domain::Candle;

use super::Indicator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtremeKind {
    Support,
    Resistance,
}

#[derive(Debug, Clone)]
pub struct Extreme {
    period: usize,
    kind: ExtremeKind,
    name: String,
}

impl Extreme {
    /// Rolling minimum of lows, named `support_{period}`.
    pub fn support(period: usize) -> Self {
        assert!(period >= 1, "extreme period must be >= 1");
        Self {
            period,
            kind: ExtremeKind::Support,
            name: format!("support_{period}"),
        }
    }

    /// Rolling maximum of highs, named `resistance_{period}`.
    pub fn resistance(period: usize) -> Self {
        assert!(period >= 1, "extreme period must be >= 1");
        Self {
            period,
            kind: ExtremeKind::Resistance,
            name: format!("resistance_{period}"),
        }
    }
}

impl Indicator for Extreme {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        let n = candles.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        for i in (self.period - 1)..n {
            let window = &candles[(i + 1 - self.period)..=i];
            let mut acc = match self.kind {
                ExtremeKind::Support => f64::INFINITY,
                ExtremeKind::Resistance => f64::NEG_INFINITY,
            };
            let mut has_nan = false;
            for candle in window {
                let v = match self.kind {
                    ExtremeKind::Support => candle.low,
                    ExtremeKind::Resistance => candle.high,
                };
                if v.is_nan() {
                    has_nan = true;
                    break;
                }
                acc = match self.kind {
                    ExtremeKind::Support => acc.min(v),
                    ExtremeKind::Resistance => acc.max(v),
                };
            }
            if !has_nan {
                result[i] = acc;
            }
        }

        result
    }
}
