//! Decision events — observability separated from decision logic.
//!
//! Decision functions are referentially transparent; the engine reports
//! what it decided *after* deciding, through this sink. Hosts plug in their
//! own sink to ship events wherever they like; the default forwards to
//! `tracing`.

use serde::Serialize;

use crate::signal::SignalState;

/// What the engine decided on one tick, as data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DecisionEvent {
    SignalEvaluated {
        pair: String,
        index: usize,
        state: SignalState,
    },
    EntrySized {
        pair: String,
        proposed: f64,
        stake: f64,
    },
    EntryRejected {
        pair: String,
        stake: f64,
    },
    DcaCommitted {
        pair: String,
        stake: f64,
        tier: usize,
        profit_ratio: f64,
    },
    /// The max-entry ceiling blocked an averaging order. A defined no-op
    /// outcome, always reported.
    DcaBlocked {
        pair: String,
        entry_count: usize,
        profit_ratio: f64,
    },
    ExitProposed {
        pair: String,
        rate: f64,
        profit_ratio: f64,
    },
    ExitRejected {
        pair: String,
        rate: f64,
    },
}

/// Receiver for decision events.
pub trait DecisionSink: Send + Sync {
    fn report(&self, event: &DecisionEvent);
}

/// Forward events to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DecisionSink for TracingSink {
    fn report(&self, event: &DecisionEvent) {
        match event {
            DecisionEvent::DcaBlocked {
                pair,
                entry_count,
                profit_ratio,
            } => {
                tracing::warn!(
                    pair = %pair,
                    entry_count,
                    profit_ratio,
                    "averaging blocked: max entries reached"
                );
            }
            other => {
                tracing::info!(decision = ?other, "tick decision");
            }
        }
    }
}

/// Discard every event. Useful in tests and benchmarks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DecisionSink for NullSink {
    fn report(&self, _event: &DecisionEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_tags() {
        let event = DecisionEvent::DcaCommitted {
            pair: "BTC/USDT".into(),
            stake: 20.0,
            tier: 1,
            profit_ratio: -0.07,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"dca_committed\""));
        assert!(json.contains("\"tier\":1"));
    }

    #[test]
    fn sinks_accept_events() {
        let event = DecisionEvent::EntryRejected {
            pair: "ETH/USDT".into(),
            stake: 15.0,
        };
        NullSink.report(&event);
        TracingSink.report(&event);
    }
}
