//! Candle — the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// OHLCV candle for a single pair on a single timeframe interval.
///
/// Candles are immutable once produced by the host's data feed. A window
/// passed to the engine must be ordered by timestamp, strictly increasing,
/// with no duplicates — [`validate_series`] enforces this per tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Returns true if any OHLCV field is NaN or infinite.
    pub fn is_void(&self) -> bool {
        !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite())
    }

    /// Basic OHLCV sanity check: high >= low, high bounds open/close,
    /// prices positive, volume non-negative.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
            && self.low > 0.0
            && self.volume >= 0.0
    }
}

/// Validate a candle window: every candle sane, timestamps strictly
/// increasing. The failing index is reported so the host can log which
/// candle the feed corrupted.
pub fn validate_series(candles: &[Candle]) -> Result<(), EngineError> {
    for (i, candle) in candles.iter().enumerate() {
        if !candle.is_sane() {
            let reason = if candle.is_void() {
                "non-finite OHLCV field".to_string()
            } else {
                format!(
                    "inconsistent OHLC: open={} high={} low={} close={}",
                    candle.open, candle.high, candle.low, candle.close
                )
            };
            return Err(EngineError::MalformedCandle { index: i, reason });
        }
        if i > 0 && candle.timestamp <= candles[i - 1].timestamp {
            return Err(EngineError::NonMonotonicTimestamps { index: i });
        }
    }
    Ok(())
}
