//! IndicatorFrame — named series aligned with a candle window.
//!
//! Built once per tick, then queried by index during signal evaluation.
//! The raw `close`, `volume`, `low`, and `high` series are stored alongside
//! the derived indicators so predicates address price and indicators
//! uniformly by name.

use std::collections::HashMap;

use crate::domain::Candle;

/// Container for indicator series computed over one candle window.
#[derive(Debug, Clone, Default)]
pub struct IndicatorFrame {
    candle_len: usize,
    series: HashMap<String, Vec<f64>>,
}

impl IndicatorFrame {
    /// Start a frame from a candle window, seeding the built-in price and
    /// volume series.
    pub fn from_candles(candles: &[Candle]) -> Self {
        let mut frame = Self {
            candle_len: candles.len(),
            series: HashMap::new(),
        };
        frame.insert("close", candles.iter().map(|c| c.close).collect());
        frame.insert("open", candles.iter().map(|c| c.open).collect());
        frame.insert("high", candles.iter().map(|c| c.high).collect());
        frame.insert("low", candles.iter().map(|c| c.low).collect());
        frame.insert("volume", candles.iter().map(|c| c.volume).collect());
        frame
    }

    /// Insert a named series. The series must be aligned with the candle
    /// window the frame was built from.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        debug_assert_eq!(values.len(), self.candle_len, "series/candle misalignment");
        self.series.insert(name.into(), values);
    }

    /// Value of a named series at a candle index. `None` when the series is
    /// absent or the index is out of range; NaN when inside the warmup.
    pub fn value(&self, name: &str, index: usize) -> Option<f64> {
        self.series.get(name).and_then(|v| v.get(index).copied())
    }

    /// Full series for a name.
    pub fn series(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    pub fn has_series(&self, name: &str) -> bool {
        self.series.contains_key(name)
    }

    /// Number of candles the frame is aligned with.
    pub fn candle_len(&self) -> usize {
        self.candle_len
    }

    /// Index of the most recent candle, if any.
    pub fn latest_index(&self) -> Option<usize> {
        self.candle_len.checked_sub(1)
    }
}
