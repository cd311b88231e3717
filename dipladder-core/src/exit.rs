//! Exit price policy — a small premium over the proposed rate when the
//! position is comfortably in profit.

use serde::{Deserialize, Serialize};

/// Profit-gated exit premium.
///
/// Profiles range from `{0.0, 0.0}` (immediate exit at the proposed rate)
/// to holding out for up to 0.2% above market.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExitPricePolicy {
    /// Unrealized-profit ratio above which the premium applies.
    pub profit_trigger: f64,
    /// Fractional premium added to the proposed rate (>= 0).
    pub premium_factor: f64,
}

impl ExitPricePolicy {
    /// Exit at the proposed rate unconditionally.
    pub fn market() -> Self {
        Self {
            profit_trigger: 0.0,
            premium_factor: 0.0,
        }
    }

    /// Adjust a proposed exit rate. Never returns less than the proposal;
    /// returns exactly the proposal at or below the trigger.
    pub fn adjust(&self, proposed_rate: f64, profit_ratio: f64) -> f64 {
        if profit_ratio > self.profit_trigger {
            proposed_rate * (1.0 + self.premium_factor)
        } else {
            proposed_rate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premium_applies_above_trigger() {
        let policy = ExitPricePolicy {
            profit_trigger: 0.05,
            premium_factor: 0.002,
        };
        let rate = policy.adjust(100.0, 0.08);
        assert!((rate - 100.2).abs() < 1e-9);
    }

    #[test]
    fn at_or_below_trigger_returns_proposal_exactly() {
        let policy = ExitPricePolicy {
            profit_trigger: 0.05,
            premium_factor: 0.002,
        };
        assert_eq!(policy.adjust(100.0, 0.05), 100.0);
        assert_eq!(policy.adjust(100.0, 0.0), 100.0);
        assert_eq!(policy.adjust(100.0, -0.10), 100.0);
    }

    #[test]
    fn never_below_proposed_rate() {
        let policy = ExitPricePolicy {
            profit_trigger: 0.01,
            premium_factor: 0.002,
        };
        for ratio in [-0.5, 0.0, 0.01, 0.02, 1.0] {
            assert!(policy.adjust(250.0, ratio) >= 250.0);
        }
    }

    #[test]
    fn market_profile_is_identity() {
        let policy = ExitPricePolicy::market();
        assert_eq!(policy.adjust(100.0, 0.50), 100.0);
    }
}
