//! Bollinger Bands — moving average +/- standard deviation multiplier.
//!
//! Four series (separate Indicator instances):
//! - Middle: SMA(close, period)
//! - Upper: middle + mult * stddev(close, period)
//! - Lower: middle - mult * stddev(close, period)
//! - PercentB: (close - lower) / (upper - lower), the price-relative-to-band
//!   ratio entry rules compare against, computed once here rather than in
//!   every predicate.
//!
//! Uses population stddev (divide by N).
//! Lookback: period - 1.

use crate::domain::Candle;

use super::Indicator;

/// Which Bollinger series to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
    PercentB,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::build(period, multiplier, BollingerBand::Upper, "bb_upper")
    }

    pub fn middle(period: usize, multiplier: f64) -> Self {
        Self::build(period, multiplier, BollingerBand::Middle, "bb_middle")
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::build(period, multiplier, BollingerBand::Lower, "bb_lower")
    }

    pub fn percent_b(period: usize, multiplier: f64) -> Self {
        Self::build(period, multiplier, BollingerBand::PercentB, "bb_pct")
    }

    fn build(period: usize, multiplier: f64, band: BollingerBand, prefix: &str) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        assert!(
            multiplier > 0.0 && multiplier.is_finite(),
            "Bollinger multiplier must be positive and finite"
        );
        Self {
            period,
            multiplier,
            band,
            name: format!("{prefix}_{period}_{multiplier}"),
        }
    }
}

impl Indicator for Bollinger {
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
                if candle.close.is_nan() {
                    has_nan = true;
                    break;
                }
                sum += candle.close;
            }
            if has_nan {
                continue;
            }

            let mean = sum / self.period as f64;

            if self.band == BollingerBand::Middle {
                result[i] = mean;
                continue;
            }

            // Population stddev
            let variance: f64 = window
                .iter()
                .map(|candle| {
                    let diff = candle.close - mean;
                    diff * diff
                })
                .sum::<f64>()
                / self.period as f64;
            let stddev = variance.sqrt();

            result[i] = match self.band {
                BollingerBand::Upper => mean + self.multiplier * stddev,
                BollingerBand::Lower => mean - self.multiplier * stddev,
                BollingerBand::PercentB => {
                    let upper = mean + self.multiplier * stddev;
                    let lower = mean - self.multiplier * stddev;
                    let width = upper - lower;
                    if width == 0.0 {
                        f64::NAN // flat window: position within the band is undefined
                    } else {
                        (candles[i].close - lower) / width
                    }
                }
                BollingerBand::Middle => unreachable!(),
            };
        }

        result
    }
}
