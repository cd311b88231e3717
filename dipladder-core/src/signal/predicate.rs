//! Data-described predicates over named indicator series.
//!
//! A strategy profile declares its entry and exit rules as predicate trees
//! in configuration; nothing here is variant-specific code. Comparisons read
//! the [`IndicatorFrame`] by series name, so a rule like
//! "close > ema_200 * 0.97" is one `Condition` referencing two series.
//!
//! Unavailable inputs never satisfy a comparison: a missing series, an
//! out-of-range index, or a NaN warmup value evaluates to false, so no
//! predicate can fire before its indicators are defined.

use serde::{Deserialize, Serialize};

use crate::indicators::IndicatorFrame;

/// Comparison operator between a series value and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Comparison::Lt => lhs < rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Gt => lhs > rhs,
            Comparison::Ge => lhs >= rhs,
        }
    }
}

/// Right-hand side of a comparison: a constant threshold or another series,
/// optionally scaled (e.g. 97% of a long moving average).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    Value {
        value: f64,
    },
    Series {
        rhs_series: String,
        #[serde(default = "default_factor")]
        factor: f64,
    },
}

fn default_factor() -> f64 {
    1.0
}

impl Operand {
    fn resolve(&self, frame: &IndicatorFrame, index: usize) -> Option<f64> {
        match self {
            Operand::Value { value } => Some(*value),
            Operand::Series { rhs_series, factor } => frame
                .value(rhs_series, index)
                .map(|v| v * factor)
                .filter(|v| !v.is_nan()),
        }
    }
}

/// A single comparison over the frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub series: String,
    pub cmp: Comparison,
    #[serde(flatten)]
    pub rhs: Operand,
}

impl Condition {
    /// Evaluate at a candle index. False when either side is unavailable.
    pub fn eval(&self, frame: &IndicatorFrame, index: usize) -> bool {
        let Some(lhs) = frame.value(&self.series, index).filter(|v| !v.is_nan()) else {
            return false;
        };
        let Some(rhs) = self.rhs.resolve(frame, index) else {
            return false;
        };
        self.cmp.apply(lhs, rhs)
    }
}

/// A predicate tree: comparisons combined with all/any, plus the degenerate
/// `Always` variant some accumulation profiles use for their entry rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Predicate {
    Compare(Condition),
    All { preds: Vec<Predicate> },
    Any { preds: Vec<Predicate> },
    Always,
}

impl Predicate {
    /// Evaluate at a candle index. Unavailable inputs evaluate to false.
    pub fn eval(&self, frame: &IndicatorFrame, index: usize) -> bool {
        match self {
            Predicate::Compare(cond) => cond.eval(frame, index),
            Predicate::All { preds } => preds.iter().all(|p| p.eval(frame, index)),
            Predicate::Any { preds } => preds.iter().any(|p| p.eval(frame, index)),
            Predicate::Always => true,
        }
    }

    /// Collect every series name the tree references, for config-time
    /// validation against the configured indicator set.
    pub fn referenced_series(&self, out: &mut Vec<String>) {
        match self {
            Predicate::Compare(cond) => {
                out.push(cond.series.clone());
                if let Operand::Series { rhs_series, .. } = &cond.rhs {
                    out.push(rhs_series.clone());
                }
            }
            Predicate::All { preds } | Predicate::Any { preds } => {
                for p in preds {
                    p.referenced_series(out);
                }
            }
            Predicate::Always => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_candles;

    fn frame_with(name: &str, values: Vec<f64>) -> IndicatorFrame {
        let closes = vec![100.0; values.len()];
        let mut frame = IndicatorFrame::from_candles(&make_candles(&closes));
        frame.insert(name, values);
        frame
    }

    fn compare(series: &str, cmp: Comparison, value: f64) -> Predicate {
        Predicate::Compare(Condition {
            series: series.into(),
            cmp,
            rhs: Operand::Value { value },
        })
    }

    #[test]
    fn compare_against_constant() {
        let frame = frame_with("rsi_14", vec![f64::NAN, 25.0, 75.0]);

        let oversold = compare("rsi_14", Comparison::Lt, 30.0);
        assert!(!oversold.eval(&frame, 0)); // NaN → false
        assert!(oversold.eval(&frame, 1));
        assert!(!oversold.eval(&frame, 2));
    }

    #[test]
    fn compare_against_scaled_series() {
        let closes = vec![100.0, 95.0];
        let mut frame = IndicatorFrame::from_candles(&make_candles(&closes));
        frame.insert("ema_2", vec![100.0, 100.0]);

        // close >= ema_2 * 0.97 — the not-in-freefall guard shape
        let guard = Predicate::Compare(Condition {
            series: "close".into(),
            cmp: Comparison::Ge,
            rhs: Operand::Series {
                rhs_series: "ema_2".into(),
                factor: 0.97,
            },
        });
        assert!(guard.eval(&frame, 0)); // 100 >= 97
        assert!(!guard.eval(&frame, 1)); // 95 < 97
    }

    #[test]
    fn missing_series_never_fires() {
        let frame = frame_with("rsi_14", vec![25.0]);
        let pred = compare("rsi_99", Comparison::Lt, 30.0);
        assert!(!pred.eval(&frame, 0));

        let out_of_range = compare("rsi_14", Comparison::Lt, 30.0);
        assert!(!out_of_range.eval(&frame, 5));
    }

    #[test]
    fn all_and_any_combine() {
        let mut frame = frame_with("rsi_14", vec![25.0]);
        frame.insert("bb_pct", vec![0.1]);

        let both = Predicate::All {
            preds: vec![
                compare("rsi_14", Comparison::Lt, 30.0),
                compare("bb_pct", Comparison::Lt, 0.2),
            ],
        };
        assert!(both.eval(&frame, 0));

        let either = Predicate::Any {
            preds: vec![
                compare("rsi_14", Comparison::Gt, 90.0),
                compare("bb_pct", Comparison::Lt, 0.2),
            ],
        };
        assert!(either.eval(&frame, 0));

        let neither = Predicate::Any {
            preds: vec![
                compare("rsi_14", Comparison::Gt, 90.0),
                compare("bb_pct", Comparison::Gt, 0.9),
            ],
        };
        assert!(!neither.eval(&frame, 0));
    }

    #[test]
    fn always_fires_without_inputs() {
        let frame = IndicatorFrame::from_candles(&[]);
        assert!(Predicate::Always.eval(&frame, 0));
    }

    #[test]
    fn referenced_series_walks_the_tree() {
        let tree = Predicate::All {
            preds: vec![
                compare("rsi_14", Comparison::Lt, 30.0),
                Predicate::Compare(Condition {
                    series: "close".into(),
                    cmp: Comparison::Gt,
                    rhs: Operand::Series {
                        rhs_series: "ema_200".into(),
                        factor: 0.97,
                    },
                }),
            ],
        };
        let mut names = Vec::new();
        tree.referenced_series(&mut names);
        assert_eq!(names, vec!["rsi_14", "close", "ema_200"]);
    }

    #[test]
    fn predicate_toml_roundtrip() {
        let toml_src = r#"
type = "all"

[[preds]]
type = "compare"
series = "rsi_14"
cmp = "lt"
value = 30.0

[[preds]]
type = "compare"
series = "close"
cmp = "ge"
rhs_series = "ema_200"
factor = 0.97
"#;
        let pred: Predicate = toml::from_str(toml_src).unwrap();
        match &pred {
            Predicate::All { preds } => {
                assert_eq!(preds.len(), 2);
                match &preds[1] {
                    Predicate::Compare(cond) => {
                        assert_eq!(cond.cmp, Comparison::Ge);
                        assert_eq!(
                            cond.rhs,
                            Operand::Series {
                                rhs_series: "ema_200".into(),
                                factor: 0.97
                            }
                        );
                    }
                    other => panic!("expected compare, got {other:?}"),
                }
            }
            other => panic!("expected all, got {other:?}"),
        }
    }
}
