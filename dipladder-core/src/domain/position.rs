//! Position — an open long accumulation with its entry history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One filled entry order: quote-currency stake at a fill price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub stake_amount: f64,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

/// An open long position for a single pair.
///
/// Entries are append-only: only the host's confirmed-fill callback calls
/// [`record_fill`](Position::record_fill). Every decision function in this
/// crate takes the position by shared reference and never mutates it, so
/// querying the DCA engine any number of times between fills is idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub pair: String,
    pub opened_at: DateTime<Utc>,
    entries: Vec<Entry>,
}

impl Position {
    /// Open a position with its first confirmed fill.
    pub fn open(
        pair: impl Into<String>,
        stake_amount: f64,
        price: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            pair: pair.into(),
            opened_at: timestamp,
            entries: vec![Entry {
                stake_amount,
                price,
                timestamp,
            }],
        }
    }

    /// Append a confirmed averaging fill.
    pub fn record_fill(&mut self, stake_amount: f64, price: f64, timestamp: DateTime<Utc>) {
        self.entries.push(Entry {
            stake_amount,
            price,
            timestamp,
        });
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Total quote-currency stake committed across all entries.
    pub fn total_stake(&self) -> f64 {
        self.entries.iter().map(|e| e.stake_amount).sum()
    }

    /// Volume-weighted average entry price:
    /// total stake divided by total base-currency amount bought.
    ///
    /// Strictly positive for any position built from sane fills
    /// (positive stakes at positive prices).
    pub fn average_entry_price(&self) -> f64 {
        let stake: f64 = self.total_stake();
        let amount: f64 = self.entries.iter().map(|e| e.stake_amount / e.price).sum();
        stake / amount
    }

    /// (current_price - average_entry_price) / average_entry_price.
    pub fn unrealized_profit_ratio(&self, current_price: f64) -> f64 {
        let avg = self.average_entry_price();
        (current_price - avg) / avg
    }
}
