//! Factory — converts indicator specs into runtime trait objects.
//!
//! Multi-series specs (MACD, Bollinger) expand into one instance per series
//! so the frame stays a flat map of single series.

use crate::config::IndicatorSpec;
use crate::indicators::{Bollinger, Ema, Extreme, Indicator, Macd, Rsi, Sma};

/// Instantiate every configured indicator.
pub fn build_indicators(specs: &[IndicatorSpec]) -> Vec<Box<dyn Indicator>> {
    let mut out: Vec<Box<dyn Indicator>> = Vec::new();
    for spec in specs {
        match *spec {
            IndicatorSpec::Rsi { period } => out.push(Box::new(Rsi::new(period))),
            IndicatorSpec::Ema { period } => out.push(Box::new(Ema::new(period))),
            IndicatorSpec::Sma { period } => out.push(Box::new(Sma::close(period))),
            IndicatorSpec::VolumeSma { period } => out.push(Box::new(Sma::volume(period))),
            IndicatorSpec::Macd { fast, slow, signal } => {
                out.push(Box::new(Macd::line(fast, slow, signal)));
                out.push(Box::new(Macd::signal(fast, slow, signal)));
                out.push(Box::new(Macd::histogram(fast, slow, signal)));
            }
            IndicatorSpec::Bollinger { period, multiplier } => {
                out.push(Box::new(Bollinger::upper(period, multiplier)));
                out.push(Box::new(Bollinger::middle(period, multiplier)));
                out.push(Box::new(Bollinger::lower(period, multiplier)));
                out.push(Box::new(Bollinger::percent_b(period, multiplier)));
            }
            IndicatorSpec::Support { period } => out.push(Box::new(Extreme::support(period))),
            IndicatorSpec::Resistance { period } => {
                out.push(Box::new(Extreme::resistance(period)))
            }
        }
    }
    out
}

/// Warm-up length of an indicator set: the largest lookback.
pub fn warmup_length(indicators: &[Box<dyn Indicator>]) -> usize {
    indicators.iter().map(|i| i.lookback()).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_multi_series_specs() {
        let specs = vec![
            IndicatorSpec::Rsi { period: 14 },
            IndicatorSpec::Macd { fast: 12, slow: 26, signal: 9 },
            IndicatorSpec::Bollinger { period: 20, multiplier: 2.0 },
        ];
        let indicators = build_indicators(&specs);
        let names: Vec<&str> = indicators.iter().map(|i| i.name()).collect();
        assert_eq!(
            names,
            vec![
                "rsi_14",
                "macd_12_26_9",
                "macd_signal_12_26_9",
                "macd_hist_12_26_9",
                "bb_upper_20_2",
                "bb_middle_20_2",
                "bb_lower_20_2",
                "bb_pct_20_2",
            ]
        );
    }

    #[test]
    fn factory_names_match_spec_series_names() {
        let specs = vec![
            IndicatorSpec::Sma { period: 50 },
            IndicatorSpec::VolumeSma { period: 20 },
            IndicatorSpec::Support { period: 30 },
            IndicatorSpec::Resistance { period: 30 },
            IndicatorSpec::Ema { period: 200 },
        ];
        for spec in &specs {
            let built: Vec<String> = build_indicators(std::slice::from_ref(spec))
                .iter()
                .map(|i| i.name().to_string())
                .collect();
            assert_eq!(built, spec.series_names(), "mismatch for {spec:?}");
        }
    }

    #[test]
    fn warmup_is_max_lookback() {
        let specs = vec![
            IndicatorSpec::Rsi { period: 14 },
            IndicatorSpec::Ema { period: 200 },
            IndicatorSpec::Sma { period: 20 },
        ];
        let indicators = build_indicators(&specs);
        assert_eq!(warmup_length(&indicators), 199);
    }

    #[test]
    fn empty_set_has_zero_warmup() {
        assert_eq!(warmup_length(&[]), 0);
    }
}
