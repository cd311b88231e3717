//! Stake sizing — how much capital a new first-time entry commits.
//!
//! The multiplier table is configuration, not code: a flat
//! fraction-of-proposed mode, and a day-of-week-indexed mode that commits
//! more early in a weekly cycle and conserves later. Every result is clamped
//! into the host-supplied `[min_stake, max_stake]`.

pub mod dca;

pub use dca::{DcaOutcome, DcaPolicy, DcaTier};

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::StakeBounds;
use crate::error::EngineError;

/// Multiplier selection mode for initial entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StakeMode {
    /// Commit a fixed fraction of the host's proposed stake.
    Flat { fraction: f64 },
    /// Scale the proposed stake by a weekday-indexed multiplier,
    /// Monday first.
    Weekday { multipliers: [f64; 7] },
}

/// Initial-stake policy: proposed stake in, committed stake out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialStakePolicy {
    #[serde(flatten)]
    pub mode: StakeMode,
    /// Raises the lower clamp to `min_stake * floor_factor`; must be >= 1
    /// so the policy can never commit less than the exchange minimum.
    #[serde(default = "default_floor_factor")]
    pub floor_factor: f64,
}

fn default_floor_factor() -> f64 {
    1.0
}

impl InitialStakePolicy {
    pub fn flat(fraction: f64) -> Self {
        Self {
            mode: StakeMode::Flat { fraction },
            floor_factor: 1.0,
        }
    }

    pub fn weekday(multipliers: [f64; 7]) -> Self {
        Self {
            mode: StakeMode::Weekday { multipliers },
            floor_factor: 1.0,
        }
    }

    fn multiplier(&self, now: DateTime<Utc>) -> f64 {
        match &self.mode {
            StakeMode::Flat { fraction } => *fraction,
            StakeMode::Weekday { multipliers } => {
                multipliers[now.weekday().num_days_from_monday() as usize]
            }
        }
    }

    /// Size a first-time entry: `proposed * multiplier`, clamped into
    /// `[min_stake * floor_factor, max_stake]` (which sits inside the host
    /// bounds since `floor_factor >= 1`).
    pub fn size(
        &self,
        bounds: StakeBounds,
        proposed: f64,
        now: DateTime<Utc>,
    ) -> Result<f64, EngineError> {
        bounds.validate()?;
        let raw = proposed * self.multiplier(now);
        // Degenerate host bounds (min * factor > max) still land in [min, max].
        let floor = (bounds.min_stake * self.floor_factor).min(bounds.max_stake);
        Ok(raw.clamp(floor, bounds.max_stake))
    }
}
