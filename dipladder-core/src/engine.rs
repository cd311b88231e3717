//! Tick engine — one pair, one tick, one synchronous decision.
//!
//! The host owns candle retrieval, balances, and order placement; it calls
//! [`Engine::evaluate_tick`] once per scheduling interval per pair with the
//! latest window, the open position (if any), and the stake bounds resolved
//! at decision time. Everything in here is pure computation over those
//! inputs — no I/O, no suspension points, no shared state across pairs.
//! `Engine` is `Send + Sync`, so hosts may evaluate distinct pairs on
//! parallel threads.

use chrono::{DateTime, Utc};

use crate::config::{ConfigError, StrategyProfile};
use crate::domain::{validate_series, Candle, Position, StakeBounds};
use crate::error::EngineError;
use crate::events::{DecisionEvent, DecisionSink, TracingSink};
use crate::factory::{build_indicators, warmup_length};
use crate::gatekeeper::{EntryContext, ExitContext, LoggingGate, TradeGate};
use crate::indicators::{Indicator, IndicatorFrame};
use crate::signal::{SignalEvaluator, SignalState};
use crate::sizing::DcaOutcome;

/// Per-tick inputs the host resolves before calling in.
#[derive(Debug, Clone)]
pub struct TickContext {
    pub pair: String,
    pub bounds: StakeBounds,
    /// The host's proposed stake for a first entry (e.g. balance / slots).
    pub proposed_stake: f64,
    pub now: DateTime<Utc>,
}

/// The order the host should place this tick, if any.
#[derive(Debug, Clone, PartialEq)]
pub enum TickAction {
    None,
    Enter { stake: f64 },
    AverageDown { stake: f64, tier: usize },
    Exit { rate: f64 },
}

/// Outcome of one tick evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct TickDecision {
    pub signal: SignalState,
    pub action: TickAction,
}

/// A compiled strategy profile plus its runtime collaborators.
pub struct Engine {
    profile: StrategyProfile,
    indicators: Vec<Box<dyn Indicator>>,
    evaluator: SignalEvaluator,
    gate: Box<dyn TradeGate>,
    sink: Box<dyn DecisionSink>,
}

impl Engine {
    /// Compile a validated profile. The default gate logs and approves;
    /// the default sink forwards decisions to `tracing`.
    pub fn new(profile: StrategyProfile) -> Result<Self, ConfigError> {
        profile.validate()?;
        let indicators = build_indicators(&profile.indicators);
        let warmup = warmup_length(&indicators);
        let evaluator = SignalEvaluator::new(profile.entry.clone(), profile.exit.clone(), warmup);
        Ok(Self {
            profile,
            indicators,
            evaluator,
            gate: Box::new(LoggingGate),
            sink: Box::new(TracingSink),
        })
    }

    pub fn with_gate(mut self, gate: Box<dyn TradeGate>) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_sink(mut self, sink: Box<dyn DecisionSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn profile(&self) -> &StrategyProfile {
        &self.profile
    }

    /// Largest lookback among configured indicators.
    pub fn warmup(&self) -> usize {
        self.evaluator.warmup()
    }

    /// Minimum window length before decisions are made: the latest candle
    /// must sit past every indicator's lookback.
    pub fn required_candles(&self) -> usize {
        self.warmup() + 1
    }

    /// Validate a candle window and compute every configured indicator.
    pub fn compute_indicators(&self, candles: &[Candle]) -> Result<IndicatorFrame, EngineError> {
        validate_series(candles)?;
        Ok(self.build_frame(candles))
    }

    fn build_frame(&self, candles: &[Candle]) -> IndicatorFrame {
        let mut frame = IndicatorFrame::from_candles(candles);
        for indicator in &self.indicators {
            frame.insert(indicator.name(), indicator.compute(candles));
        }
        frame
    }

    /// Evaluate entry/exit rules at a candle index. Never signals inside
    /// the warm-up.
    pub fn evaluate_signals(&self, frame: &IndicatorFrame, index: usize) -> SignalState {
        self.evaluator.evaluate(frame, index)
    }

    /// Size a first-time entry.
    pub fn size_initial_stake(
        &self,
        bounds: StakeBounds,
        proposed: f64,
        now: DateTime<Utc>,
    ) -> Result<f64, EngineError> {
        self.profile.stake.size(bounds, proposed, now)
    }

    /// Ask the DCA policy about an open position. Pure query; a blocked
    /// outcome is reported through the sink every time it occurs.
    pub fn decide_additional_stake(
        &self,
        position: &Position,
        profit_ratio: f64,
        bounds: StakeBounds,
    ) -> Result<DcaOutcome, EngineError> {
        let outcome = self.profile.dca.decide(position, profit_ratio, bounds)?;
        if outcome == DcaOutcome::BlockedMaxEntries {
            self.sink.report(&DecisionEvent::DcaBlocked {
                pair: position.pair.clone(),
                entry_count: position.entry_count(),
                profit_ratio,
            });
        }
        Ok(outcome)
    }

    /// Apply the profit-gated exit premium to a proposed rate.
    pub fn adjust_exit_price(&self, proposed_rate: f64, profit_ratio: f64) -> f64 {
        self.profile.exit_price.adjust(proposed_rate, profit_ratio)
    }

    pub fn confirm_entry(&self, ctx: &EntryContext) -> bool {
        self.gate.confirm_entry(ctx)
    }

    pub fn confirm_exit(&self, ctx: &ExitContext) -> bool {
        self.gate.confirm_exit(ctx)
    }

    /// The per-tick decision unit.
    ///
    /// Errors are structured per-tick failures: the window was malformed or
    /// too short, or the host's bounds were nonsensical. Nothing is mutated
    /// either way — entries are appended only by the host's confirmed-fill
    /// callback on the `Position`.
    pub fn evaluate_tick(
        &self,
        candles: &[Candle],
        position: Option<&Position>,
        ctx: &TickContext,
    ) -> Result<TickDecision, EngineError> {
        validate_series(candles)?;

        let required = self.required_candles();
        if candles.len() < required {
            return Err(EngineError::InsufficientHistory {
                required,
                actual: candles.len(),
            });
        }

        let frame = self.build_frame(candles);
        let index = candles.len() - 1;
        let signal = self.evaluator.evaluate(&frame, index);
        self.sink.report(&DecisionEvent::SignalEvaluated {
            pair: ctx.pair.clone(),
            index,
            state: signal,
        });

        let current_price = candles[index].close;
        let action = match position {
            Some(pos) => self.position_action(pos, signal, current_price, ctx)?,
            None => self.entry_action(signal, current_price, ctx)?,
        };

        Ok(TickDecision { signal, action })
    }

    /// Open position: an exit signal wins the tick; otherwise the DCA
    /// policy is consulted regardless of signal flags.
    fn position_action(
        &self,
        position: &Position,
        signal: SignalState,
        current_price: f64,
        ctx: &TickContext,
    ) -> Result<TickAction, EngineError> {
        let profit_ratio = position.unrealized_profit_ratio(current_price);

        if signal.exit {
            let rate = self.adjust_exit_price(current_price, profit_ratio);
            let exit_ctx = ExitContext {
                pair: ctx.pair.clone(),
                rate,
                profit_ratio,
                timestamp: ctx.now,
            };
            if self.gate.confirm_exit(&exit_ctx) {
                self.sink.report(&DecisionEvent::ExitProposed {
                    pair: ctx.pair.clone(),
                    rate,
                    profit_ratio,
                });
                return Ok(TickAction::Exit { rate });
            }
            self.sink.report(&DecisionEvent::ExitRejected {
                pair: ctx.pair.clone(),
                rate,
            });
            return Ok(TickAction::None);
        }

        match self.decide_additional_stake(position, profit_ratio, ctx.bounds)? {
            DcaOutcome::Commit { stake, tier } => {
                let entry_ctx = EntryContext {
                    pair: ctx.pair.clone(),
                    stake,
                    rate: current_price,
                    bounds: ctx.bounds,
                    timestamp: ctx.now,
                    is_dca: true,
                };
                if self.gate.confirm_entry(&entry_ctx) {
                    self.sink.report(&DecisionEvent::DcaCommitted {
                        pair: ctx.pair.clone(),
                        stake,
                        tier,
                        profit_ratio,
                    });
                    Ok(TickAction::AverageDown { stake, tier })
                } else {
                    self.sink.report(&DecisionEvent::EntryRejected {
                        pair: ctx.pair.clone(),
                        stake,
                    });
                    Ok(TickAction::None)
                }
            }
            DcaOutcome::NoAction | DcaOutcome::BlockedMaxEntries => Ok(TickAction::None),
        }
    }

    /// No position: an entry signal sizes a first stake, gated before the
    /// host places the order.
    fn entry_action(
        &self,
        signal: SignalState,
        current_price: f64,
        ctx: &TickContext,
    ) -> Result<TickAction, EngineError> {
        if !signal.enter {
            return Ok(TickAction::None);
        }

        let stake = self.size_initial_stake(ctx.bounds, ctx.proposed_stake, ctx.now)?;
        let entry_ctx = EntryContext {
            pair: ctx.pair.clone(),
            stake,
            rate: current_price,
            bounds: ctx.bounds,
            timestamp: ctx.now,
            is_dca: false,
        };
        if self.gate.confirm_entry(&entry_ctx) {
            self.sink.report(&DecisionEvent::EntrySized {
                pair: ctx.pair.clone(),
                proposed: ctx.proposed_stake,
                stake,
            });
            Ok(TickAction::Enter { stake })
        } else {
            self.sink.report(&DecisionEvent::EntryRejected {
                pair: ctx.pair.clone(),
                stake,
            });
            Ok(TickAction::None)
        }
    }
}
