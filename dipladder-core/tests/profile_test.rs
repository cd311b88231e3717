//! The shipped profile parses, validates, compiles, and trades.

use chrono::{TimeZone, Utc};
use dipladder_core::config::StrategyProfile;
use dipladder_core::domain::{Candle, StakeBounds};
use dipladder_core::engine::{Engine, TickAction, TickContext};
use dipladder_core::signal::Predicate;

const PROFILE_TOML: &str = include_str!("../profiles/dip_accumulator.toml");

#[test]
fn shipped_profile_parses_and_validates() {
    let profile = StrategyProfile::from_toml_str(PROFILE_TOML).unwrap();
    assert_eq!(profile.name, "dip-accumulator");
    assert_eq!(profile.timeframe, "1h");
    assert_eq!(profile.indicators.len(), 4);
    assert_eq!(profile.dca.tiers.len(), 3);
    assert!(matches!(profile.entry, Predicate::All { .. }));
}

#[test]
fn profile_hash_is_stable_across_parses() {
    let a = StrategyProfile::from_toml_str(PROFILE_TOML).unwrap();
    let b = StrategyProfile::from_toml_str(PROFILE_TOML).unwrap();
    assert_eq!(a.profile_hash(), b.profile_hash());

    let mut c = StrategyProfile::from_toml_str(PROFILE_TOML).unwrap();
    c.dca.profit_floor = -0.05;
    assert_ne!(a.profile_hash(), c.profile_hash());
}

#[test]
fn shipped_profile_compiles_with_ema_warmup() {
    let profile = StrategyProfile::from_toml_str(PROFILE_TOML).unwrap();
    let engine = Engine::new(profile).unwrap();
    // The 200-EMA dominates: lookback 199, so 200 candles are required.
    assert_eq!(engine.warmup(), 199);
    assert_eq!(engine.required_candles(), 200);
}

#[test]
fn shipped_profile_buys_a_guarded_dip() {
    let profile = StrategyProfile::from_toml_str(PROFILE_TOML).unwrap();
    let engine = Engine::new(profile).unwrap();

    // 250 candles drifting gently upward, then a sharp two-day dip that
    // stays above 97% of the long EMA. Volume holds steady.
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut closes: Vec<f64> = (0..230).map(|i| 100.0 + i as f64 * 0.02).collect();
    let peak = *closes.last().unwrap();
    for i in 0..20 {
        closes.push(peak - (i + 1) as f64 * 0.12);
    }
    let candles: Vec<Candle> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle {
                timestamp: base + chrono::Duration::hours(i as i64),
                open,
                high: open.max(close) * 1.001,
                low: open.min(close) * 0.999,
                close,
                volume: 1000.0,
            }
        })
        .collect();

    let ctx = TickContext {
        pair: "ETH/USDT".into(),
        bounds: StakeBounds::new(10.0, 500.0),
        proposed_stake: 100.0,
        // A Monday: the weekday table commits the full proposed stake.
        now: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
    };
    let decision = engine.evaluate_tick(&candles, None, &ctx).unwrap();

    assert!(decision.signal.enter, "20 straight losses must read oversold");
    assert_eq!(decision.action, TickAction::Enter { stake: 100.0 });
}
