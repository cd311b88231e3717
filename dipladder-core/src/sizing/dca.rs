//! DCA decision engine — whether and how much to add to a losing position.
//!
//! A tiered policy over the position's unrealized-profit ratio, re-evaluated
//! every tick. Deciding is a pure query: the position is only mutated by the
//! host's confirmed-fill callback, so the same inputs always produce the
//! same outcome no matter how often they are asked.

use serde::{Deserialize, Serialize};

use crate::domain::{Position, StakeBounds};
use crate::error::EngineError;

/// One loss tier: breach the bound, stake `min_stake * stake_multiplier`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DcaTier {
    /// Negative ratio this tier activates at (e.g. -0.05 for 5% down).
    pub loss_ratio_bound: f64,
    pub stake_multiplier: f64,
}

/// Outcome of one averaging query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DcaOutcome {
    /// Position is flat, profitable, or not down far enough.
    NoAction,
    /// A tier is breached but the position already holds the maximum
    /// number of entries. A defined no-op, never an error.
    BlockedMaxEntries,
    /// Commit an additional stake. `tier` is the index of the breached
    /// tier in the policy's table.
    Commit { stake: f64, tier: usize },
}

impl DcaOutcome {
    /// The stake to place, if any.
    pub fn stake(&self) -> Option<f64> {
        match self {
            DcaOutcome::Commit { stake, .. } => Some(*stake),
            _ => None,
        }
    }
}

/// Tiered averaging policy for one strategy profile.
///
/// `tiers` are ordered least-severe to most-severe loss (bounds strictly
/// decreasing, all negative); config validation also requires non-decreasing
/// multipliers so a deeper loss never sizes a smaller add-on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcaPolicy {
    pub tiers: Vec<DcaTier>,
    pub max_additional_entries: usize,
    /// Averaging is only considered below this (negative) ratio; a winning
    /// or flat position is never averaged into.
    pub profit_floor: f64,
}

impl DcaPolicy {
    /// Decide whether to add to `position` at the current profit ratio.
    ///
    /// Worst-loss-wins: the most severe tier whose bound the ratio has
    /// breached supplies the multiplier. The entry-count ceiling is checked
    /// after tier selection so a capped position reports `BlockedMaxEntries`
    /// rather than `NoAction`.
    pub fn decide(
        &self,
        position: &Position,
        profit_ratio: f64,
        bounds: StakeBounds,
    ) -> Result<DcaOutcome, EngineError> {
        bounds.validate()?;

        if profit_ratio >= self.profit_floor {
            return Ok(DcaOutcome::NoAction);
        }

        // Most severe breached tier: tiers are ordered least→most severe,
        // so scan from the deep end.
        let breached = self
            .tiers
            .iter()
            .enumerate()
            .rev()
            .find(|(_, tier)| profit_ratio <= tier.loss_ratio_bound);
        let Some((tier_index, tier)) = breached else {
            return Ok(DcaOutcome::NoAction);
        };

        if position.entry_count() >= self.max_additional_entries + 1 {
            return Ok(DcaOutcome::BlockedMaxEntries);
        }

        let stake = bounds.clamp(bounds.min_stake * tier.stake_multiplier);
        Ok(DcaOutcome::Commit {
            stake,
            tier: tier_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn policy() -> DcaPolicy {
        DcaPolicy {
            tiers: vec![
                DcaTier {
                    loss_ratio_bound: -0.03,
                    stake_multiplier: 1.0,
                },
                DcaTier {
                    loss_ratio_bound: -0.06,
                    stake_multiplier: 2.0,
                },
                DcaTier {
                    loss_ratio_bound: -0.10,
                    stake_multiplier: 4.0,
                },
            ],
            max_additional_entries: 3,
            profit_floor: -0.02,
        }
    }

    fn position(entries: usize) -> Position {
        let ts = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        let mut pos = Position::open("BTC/USDT", 50.0, 40_000.0, ts);
        for i in 1..entries {
            pos.record_fill(50.0, 39_000.0, ts + chrono::Duration::hours(i as i64));
        }
        pos
    }

    fn bounds() -> StakeBounds {
        StakeBounds::new(10.0, 500.0)
    }

    #[test]
    fn no_action_above_profit_floor() {
        let policy = policy();
        for ratio in [0.10, 0.0, -0.01, -0.02] {
            let outcome = policy.decide(&position(1), ratio, bounds()).unwrap();
            assert_eq!(outcome, DcaOutcome::NoAction, "ratio {ratio}");
        }
    }

    #[test]
    fn no_action_below_floor_but_above_first_tier() {
        let policy = policy();
        // floor -0.02, first tier -0.03: -0.025 breaches nothing
        let outcome = policy.decide(&position(1), -0.025, bounds()).unwrap();
        assert_eq!(outcome, DcaOutcome::NoAction);
    }

    #[test]
    fn worst_loss_wins_tier_selection() {
        let policy = policy();

        let outcome = policy.decide(&position(1), -0.04, bounds()).unwrap();
        assert_eq!(
            outcome,
            DcaOutcome::Commit {
                stake: 10.0,
                tier: 0
            }
        );

        // -0.07 breaches tiers 0 and 1; tier 1 (more severe) wins
        let outcome = policy.decide(&position(1), -0.07, bounds()).unwrap();
        assert_eq!(
            outcome,
            DcaOutcome::Commit {
                stake: 20.0,
                tier: 1
            }
        );

        let outcome = policy.decide(&position(1), -0.25, bounds()).unwrap();
        assert_eq!(
            outcome,
            DcaOutcome::Commit {
                stake: 40.0,
                tier: 2
            }
        );
    }

    #[test]
    fn exact_bound_breaches_its_tier() {
        let policy = policy();
        let outcome = policy.decide(&position(1), -0.06, bounds()).unwrap();
        assert_eq!(
            outcome,
            DcaOutcome::Commit {
                stake: 20.0,
                tier: 1
            }
        );
    }

    #[test]
    fn blocked_at_max_entries_regardless_of_depth() {
        let policy = policy();
        // max_additional_entries = 3 → ceiling at 4 total entries
        for ratio in [-0.04, -0.08, -0.50] {
            let outcome = policy.decide(&position(4), ratio, bounds()).unwrap();
            assert_eq!(outcome, DcaOutcome::BlockedMaxEntries, "ratio {ratio}");
        }
        // One below the ceiling still commits
        assert!(matches!(
            policy.decide(&position(3), -0.04, bounds()).unwrap(),
            DcaOutcome::Commit { .. }
        ));
    }

    #[test]
    fn stake_clamped_into_bounds() {
        let policy = policy();
        let tight = StakeBounds::new(10.0, 25.0);
        // tier 2 wants 40.0 → clamped to max_stake
        let outcome = policy.decide(&position(1), -0.15, tight).unwrap();
        assert_eq!(
            outcome,
            DcaOutcome::Commit {
                stake: 25.0,
                tier: 2
            }
        );
    }

    #[test]
    fn deciding_is_idempotent() {
        let policy = policy();
        let pos = position(2);
        let a = policy.decide(&pos, -0.07, bounds()).unwrap();
        let b = policy.decide(&pos, -0.07, bounds()).unwrap();
        assert_eq!(a, b);
        assert_eq!(pos.entry_count(), 2); // query did not mutate
    }

    #[test]
    fn invalid_bounds_fail_loudly() {
        let policy = policy();
        let err = policy
            .decide(&position(1), -0.07, StakeBounds::new(100.0, 10.0))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidBounds { .. }));
    }
}
