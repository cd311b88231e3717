//! Simple Moving Average (SMA).
//!
//! Rolling mean over a trailing window, over either close prices or volume
//! (the rolling volume-participation average entry guards compare against).
//! Lookback: period - 1 (first valid value at index period-1).

use crate::domain::Candle;

use super::Indicator;

/// Which candle field the rolling mean runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SmaSource {
    Close,
    Volume,
}

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    source: SmaSource,
    name: String,
}

impl Sma {
    /// Rolling mean of close prices, named `sma_{period}`.
    pub fn close(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            source: SmaSource::Close,
            name: format!("sma_{period}"),
        }
    }

    /// Rolling mean of volume, named `volume_sma_{period}`.
    pub fn volume(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            source: SmaSource::Volume,
            name: format!("volume_sma_{period}"),
        }
    }

    fn field(&self, candle: &Candle) -> f64 {
        match self.source {
            SmaSource::Close => candle.close,
            SmaSource::Volume => candle.volume,
        }
    }
}

impl Indicator for Sma {
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
            let mut sum = 0.0;
            let mut has_nan = false;
            for candle in window {
                let v = self.field(candle);
                if v.is_nan() {
                    has_nan = true;
                    break;
                }
                sum += v;
            }
            if !has_nan {
                result[i] = sum / self.period as f64;
            }
        }

        result
    }
}
