//! Concrete indicator implementations.
//!
//! All indicators implement the [`Indicator`] trait: candle history in,
//! numeric series out, aligned index-for-index with the candles. Values
//! before an indicator's lookback are `f64::NAN` ("not yet available") and
//! downstream predicates treat them as no-signal.
//!
//! Multi-series indicators (MACD, Bollinger) are exposed as separate named
//! instances per series, keeping the single-series trait unchanged.

pub mod bollinger;
pub mod ema;
pub mod extreme;
pub mod frame;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{Bollinger, BollingerBand};
pub use ema::Ema;
pub use extreme::Extreme;
pub use frame::IndicatorFrame;
pub use macd::{Macd, MacdSeries};
pub use rsi::Rsi;
pub use sma::Sma;

use crate::domain::Candle;

/// Trait for indicators.
///
/// Indicators take a full candle window and produce a numeric output series
/// of the same length. The first `lookback()` values are `f64::NAN` (warmup).
///
/// # Look-ahead guard
/// No indicator value at index t may depend on candle data from index t+1 or
/// later — the evaluator re-reads the same series every tick and a trailing
/// recomputation must reproduce it.
pub trait Indicator: Send + Sync {
    /// Series name the frame stores this under (e.g., "rsi_14", "ema_200").
    fn name(&self) -> &str;

    /// Number of candles needed before the indicator produces valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire candle window.
    ///
    /// Returns a `Vec<f64>` of the same length as `candles`, NaN before
    /// `lookback()` and wherever an input was NaN.
    fn compute(&self, candles: &[Candle]) -> Vec<f64>;
}

/// Create synthetic candles from close prices for testing.
///
/// Generates plausible OHLV: open = prev close (or close for the first
/// candle), high/low bracket open and close, volume = 1000.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<Candle> {
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle {
                timestamp: base + chrono::Duration::hours(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: (open.min(close) - 1.0).max(0.01),
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
