//! Stake bounds — exchange minimum and free-balance ceiling, resolved by
//! the host at decision time.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Per-decision stake limits supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StakeBounds {
    pub min_stake: f64,
    pub max_stake: f64,
}

impl StakeBounds {
    pub fn new(min_stake: f64, max_stake: f64) -> Self {
        Self {
            min_stake,
            max_stake,
        }
    }

    /// Reject nonsensical bounds before any sizing math runs.
    pub fn validate(&self) -> Result<(), EngineError> {
        let invalid = !self.min_stake.is_finite()
            || !self.max_stake.is_finite()
            || self.min_stake <= 0.0
            || self.min_stake > self.max_stake;
        if invalid {
            return Err(EngineError::InvalidBounds {
                min: self.min_stake,
                max: self.max_stake,
            });
        }
        Ok(())
    }

    /// Clamp an amount into `[min_stake, max_stake]`.
    pub fn clamp(&self, amount: f64) -> f64 {
        amount.clamp(self.min_stake, self.max_stake)
    }

    pub fn contains(&self, amount: f64) -> bool {
        amount >= self.min_stake && amount <= self.max_stake
    }
}
