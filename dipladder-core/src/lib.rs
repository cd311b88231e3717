//! dipladder core — signal-driven position-accumulation engine.
//!
//! Given a candle window per trading pair, this crate computes technical
//! indicators, derives entry/exit signals, sizes first entries, and decides
//! whether a losing position should be averaged down — the decision core of
//! a spot-market accumulation bot. The host process owns everything at the
//! boundary: candle retrieval, balances, order placement, scheduling.
//!
//! - Domain types (candles, positions, stake bounds)
//! - Indicator engine with NaN warm-up semantics
//! - Configuration-driven signal evaluator (predicates are data)
//! - Initial-stake and DCA sizing policies
//! - Exit-price premium policy and trade gatekeeper
//! - Per-tick engine tying them into one synchronous decision

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod events;
pub mod exit;
pub mod factory;
pub mod gatekeeper;
pub mod indicators;
pub mod signal;
pub mod sizing;
