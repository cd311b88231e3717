//! Moving Average Convergence/Divergence (MACD).
//!
//! Three aligned series, exposed as separate named instances:
//! - Line: EMA(close, fast) - EMA(close, slow)
//! - Signal: EMA(line, signal period), seeded where the line becomes valid
//! - Histogram: line - signal
//!
//! Lookback: slow - 1 for the line, slow + signal - 2 for signal/histogram.

use crate::domain::Candle;

use super::ema::{ema_of_series, ema_skipping_warmup};
use super::Indicator;

/// Which MACD series an instance computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdSeries {
    Line,
    Signal,
    Histogram,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    series: MacdSeries,
    name: String,
}

impl Macd {
    pub fn line(fast: usize, slow: usize, signal: usize) -> Self {
        Self::build(fast, slow, signal, MacdSeries::Line, "macd")
    }

    pub fn signal(fast: usize, slow: usize, signal: usize) -> Self {
        Self::build(fast, slow, signal, MacdSeries::Signal, "macd_signal")
    }

    pub fn histogram(fast: usize, slow: usize, signal: usize) -> Self {
        Self::build(fast, slow, signal, MacdSeries::Histogram, "macd_hist")
    }

    fn build(fast: usize, slow: usize, signal: usize, series: MacdSeries, prefix: &str) -> Self {
        assert!(fast >= 1 && slow >= 1 && signal >= 1, "MACD periods must be >= 1");
        assert!(fast < slow, "MACD fast period must be < slow period");
        Self {
            fast,
            slow,
            signal,
            series,
            name: format!("{prefix}_{fast}_{slow}_{signal}"),
        }
    }

    fn line_series(&self, closes: &[f64]) -> Vec<f64> {
        let fast = ema_of_series(closes, self.fast);
        let slow = ema_of_series(closes, self.slow);
        fast.iter()
            .zip(&slow)
            .map(|(f, s)| f - s) // NaN wherever either EMA is NaN
            .collect()
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.series {
            MacdSeries::Line => self.slow - 1,
            MacdSeries::Signal | MacdSeries::Histogram => self.slow + self.signal - 2,
        }
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let line = self.line_series(&closes);

        match self.series {
            MacdSeries::Line => line,
            MacdSeries::Signal => ema_skipping_warmup(&line, self.signal),
            MacdSeries::Histogram => {
                let signal = ema_skipping_warmup(&line, self.signal);
                line.iter().zip(&signal).map(|(l, s)| l - s).collect()
            }
        }
    }
}
