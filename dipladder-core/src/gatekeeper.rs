//! Trade lifecycle gatekeeper — the final confirmation hook before the host
//! places an order.
//!
//! The trait's return value is the only thing the host honors, so an
//! implementation may add real veto logic (spread or liquidity checks)
//! without breaking callers. The default gate only logs and approves.

use chrono::{DateTime, Utc};

use crate::domain::StakeBounds;

/// Everything the gate sees before an entry order.
#[derive(Debug, Clone)]
pub struct EntryContext {
    pub pair: String,
    pub stake: f64,
    pub rate: f64,
    pub bounds: StakeBounds,
    pub timestamp: DateTime<Utc>,
    /// True for an averaging add-on, false for a first entry.
    pub is_dca: bool,
}

/// Everything the gate sees before an exit order.
#[derive(Debug, Clone)]
pub struct ExitContext {
    pub pair: String,
    pub rate: f64,
    pub profit_ratio: f64,
    pub timestamp: DateTime<Utc>,
}

/// Final yes/no before an order is placed. Implementations must be
/// side-effect-free with respect to trading state.
pub trait TradeGate: Send + Sync {
    fn confirm_entry(&self, ctx: &EntryContext) -> bool;
    fn confirm_exit(&self, ctx: &ExitContext) -> bool;
}

/// Default gate: log the order about to be placed, approve it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingGate;

impl TradeGate for LoggingGate {
    fn confirm_entry(&self, ctx: &EntryContext) -> bool {
        tracing::info!(
            pair = %ctx.pair,
            stake = ctx.stake,
            rate = ctx.rate,
            is_dca = ctx.is_dca,
            "confirming entry order"
        );
        true
    }

    fn confirm_exit(&self, ctx: &ExitContext) -> bool {
        tracing::info!(
            pair = %ctx.pair,
            rate = ctx.rate,
            profit_ratio = ctx.profit_ratio,
            "confirming exit order"
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry_ctx() -> EntryContext {
        EntryContext {
            pair: "BTC/USDT".into(),
            stake: 50.0,
            rate: 40_000.0,
            bounds: StakeBounds::new(10.0, 500.0),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap(),
            is_dca: false,
        }
    }

    #[test]
    fn logging_gate_approves() {
        let gate = LoggingGate;
        assert!(gate.confirm_entry(&entry_ctx()));
        assert!(gate.confirm_exit(&ExitContext {
            pair: "BTC/USDT".into(),
            rate: 42_000.0,
            profit_ratio: 0.05,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap(),
        }));
    }

    #[test]
    fn custom_gate_can_veto() {
        struct MinStakeGate(f64);
        impl TradeGate for MinStakeGate {
            fn confirm_entry(&self, ctx: &EntryContext) -> bool {
                ctx.stake >= self.0
            }
            fn confirm_exit(&self, _ctx: &ExitContext) -> bool {
                true
            }
        }

        let gate = MinStakeGate(100.0);
        assert!(!gate.confirm_entry(&entry_ctx()));
    }
}
