//! Strategy profiles — the data that selects a variant.
//!
//! A profile is a TOML document: indicator set, entry/exit predicate trees,
//! stake policy, DCA tiers, exit-price policy. Variants differ only in this
//! data; there is no per-variant code. `validate()` aggregates every
//! violation so a profile author sees the full list at once, and
//! `profile_hash()` gives a deterministic content identity for grouping
//! decisions by exact configuration.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::exit::ExitPricePolicy;
use crate::signal::Predicate;
use crate::sizing::{DcaPolicy, InitialStakePolicy, StakeMode};

/// Errors raised when loading or validating a profile.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse profile TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid strategy profile: {}", .problems.join("; "))]
    Invalid { problems: Vec<String> },
}

/// Deterministic content identity of a profile (blake3 of canonical JSON).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileHash(pub String);

impl fmt::Display for ProfileHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One configured indicator instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IndicatorSpec {
    Rsi { period: usize },
    Ema { period: usize },
    Sma { period: usize },
    VolumeSma { period: usize },
    Macd { fast: usize, slow: usize, signal: usize },
    Bollinger { period: usize, multiplier: f64 },
    Support { period: usize },
    Resistance { period: usize },
}

impl IndicatorSpec {
    /// Series names this spec contributes to the frame.
    pub fn series_names(&self) -> Vec<String> {
        match self {
            IndicatorSpec::Rsi { period } => vec![format!("rsi_{period}")],
            IndicatorSpec::Ema { period } => vec![format!("ema_{period}")],
            IndicatorSpec::Sma { period } => vec![format!("sma_{period}")],
            IndicatorSpec::VolumeSma { period } => vec![format!("volume_sma_{period}")],
            IndicatorSpec::Macd { fast, slow, signal } => vec![
                format!("macd_{fast}_{slow}_{signal}"),
                format!("macd_signal_{fast}_{slow}_{signal}"),
                format!("macd_hist_{fast}_{slow}_{signal}"),
            ],
            IndicatorSpec::Bollinger { period, multiplier } => vec![
                format!("bb_upper_{period}_{multiplier}"),
                format!("bb_middle_{period}_{multiplier}"),
                format!("bb_lower_{period}_{multiplier}"),
                format!("bb_pct_{period}_{multiplier}"),
            ],
            IndicatorSpec::Support { period } => vec![format!("support_{period}")],
            IndicatorSpec::Resistance { period } => vec![format!("resistance_{period}")],
        }
    }

    fn check(&self, problems: &mut Vec<String>) {
        let period_ok = |p: usize| p >= 1;
        match self {
            IndicatorSpec::Rsi { period }
            | IndicatorSpec::Ema { period }
            | IndicatorSpec::Sma { period }
            | IndicatorSpec::VolumeSma { period }
            | IndicatorSpec::Support { period }
            | IndicatorSpec::Resistance { period } => {
                if !period_ok(*period) {
                    problems.push(format!("indicator period must be >= 1: {self:?}"));
                }
            }
            IndicatorSpec::Macd { fast, slow, signal } => {
                if !period_ok(*fast) || !period_ok(*slow) || !period_ok(*signal) {
                    problems.push(format!("MACD periods must be >= 1: {self:?}"));
                }
                if fast >= slow {
                    problems.push(format!("MACD fast must be < slow: {fast} >= {slow}"));
                }
            }
            IndicatorSpec::Bollinger { period, multiplier } => {
                if !period_ok(*period) {
                    problems.push(format!("Bollinger period must be >= 1: {self:?}"));
                }
                if !(*multiplier > 0.0 && multiplier.is_finite()) {
                    problems.push(format!(
                        "Bollinger multiplier must be positive and finite: {multiplier}"
                    ));
                }
            }
        }
    }
}

/// Series the frame always carries, available to predicates without any
/// configured indicator.
const BUILTIN_SERIES: [&str; 5] = ["close", "open", "high", "low", "volume"];

/// Complete strategy profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyProfile {
    pub name: String,
    /// Scheduling interval the host runs this profile on (e.g. "5m", "1h").
    pub timeframe: String,
    #[serde(default)]
    pub indicators: Vec<IndicatorSpec>,
    pub entry: Predicate,
    pub exit: Predicate,
    pub stake: InitialStakePolicy,
    pub dca: DcaPolicy,
    pub exit_price: ExitPricePolicy,
}

impl StrategyProfile {
    /// Parse and validate a profile from TOML.
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let profile: Self = toml::from_str(src)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Check every constraint, collecting all violations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if self.name.trim().is_empty() {
            problems.push("profile name must not be empty".into());
        }
        if self.timeframe.trim().is_empty() {
            problems.push("timeframe must not be empty".into());
        }

        for spec in &self.indicators {
            spec.check(&mut problems);
        }

        // Duplicate series names would shadow each other in the frame.
        let mut produced: Vec<String> = BUILTIN_SERIES.iter().map(|s| s.to_string()).collect();
        for spec in &self.indicators {
            for name in spec.series_names() {
                if produced.contains(&name) {
                    problems.push(format!("duplicate indicator series: {name}"));
                } else {
                    produced.push(name);
                }
            }
        }

        // Every series a predicate references must exist in the frame.
        let mut referenced = Vec::new();
        self.entry.referenced_series(&mut referenced);
        self.exit.referenced_series(&mut referenced);
        for name in referenced {
            if !produced.contains(&name) {
                problems.push(format!("predicate references unconfigured series: {name}"));
            }
        }

        self.check_stake(&mut problems);
        self.check_dca(&mut problems);

        if !(self.exit_price.premium_factor >= 0.0 && self.exit_price.premium_factor.is_finite()) {
            problems.push(format!(
                "exit premium_factor must be >= 0 and finite: {}",
                self.exit_price.premium_factor
            ));
        }
        if !self.exit_price.profit_trigger.is_finite() {
            problems.push("exit profit_trigger must be finite".into());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid { problems })
        }
    }

    fn check_stake(&self, problems: &mut Vec<String>) {
        match &self.stake.mode {
            StakeMode::Flat { fraction } => {
                if !(*fraction > 0.0 && fraction.is_finite()) {
                    problems.push(format!("stake fraction must be positive: {fraction}"));
                }
            }
            StakeMode::Weekday { multipliers } => {
                if multipliers.iter().any(|m| !(*m >= 0.0 && m.is_finite())) {
                    problems.push("weekday multipliers must be >= 0 and finite".into());
                }
            }
        }
        if !(self.stake.floor_factor >= 1.0 && self.stake.floor_factor.is_finite()) {
            problems.push(format!(
                "stake floor_factor must be >= 1 so min_stake is never undercut: {}",
                self.stake.floor_factor
            ));
        }
    }

    fn check_dca(&self, problems: &mut Vec<String>) {
        let dca = &self.dca;
        if dca.tiers.is_empty() {
            problems.push("dca tiers must not be empty".into());
        }
        if !(dca.profit_floor < 0.0 && dca.profit_floor.is_finite()) {
            problems.push(format!(
                "dca profit_floor must be negative: {}",
                dca.profit_floor
            ));
        }
        for window in dca.tiers.windows(2) {
            if window[1].loss_ratio_bound >= window[0].loss_ratio_bound {
                problems.push(format!(
                    "dca tiers must be ordered least to most severe: {} then {}",
                    window[0].loss_ratio_bound, window[1].loss_ratio_bound
                ));
            }
            if window[1].stake_multiplier < window[0].stake_multiplier {
                problems.push(format!(
                    "dca multipliers must not shrink with loss depth: {} then {}",
                    window[0].stake_multiplier, window[1].stake_multiplier
                ));
            }
        }
        for tier in &dca.tiers {
            if !(tier.loss_ratio_bound < 0.0 && tier.loss_ratio_bound.is_finite()) {
                problems.push(format!(
                    "dca tier bound must be negative: {}",
                    tier.loss_ratio_bound
                ));
            }
            if !(tier.stake_multiplier > 0.0 && tier.stake_multiplier.is_finite()) {
                problems.push(format!(
                    "dca tier multiplier must be positive: {}",
                    tier.stake_multiplier
                ));
            }
        }
    }

    /// Content hash identifying this exact configuration.
    ///
    /// Canonical JSON via serde (field order is declaration order, stable),
    /// hashed with blake3.
    pub fn profile_hash(&self) -> ProfileHash {
        let json = serde_json::to_string(self).expect("StrategyProfile must serialize");
        ProfileHash(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}
