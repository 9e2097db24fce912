use thiserror::Error;

/// Input rejected at the boundary before it reaches the analysis core.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("match {match_id}: {market} odds must be a finite, non-negative decimal, got {odds}")]
    InvalidOdds {
        match_id: String,
        market: &'static str,
        odds: f64,
    },
    #[error("unknown league alias: {0}")]
    UnknownLeague(String),
    #[error("unknown bet type code: {0}")]
    UnknownBetType(String),
    #[error("unknown settlement outcome: {0} (expected win, loss or void)")]
    UnknownOutcome(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f64 },
    #[error("{name} must be within [0, 1], got {value}")]
    OutOfUnitRange { name: &'static str, value: f64 },
    #[error("odds window is inverted: min_odds {min} > max_odds {max}")]
    InvertedOddsWindow { min: f64, max: f64 },
    #[error("unit_size must be positive, got {0}")]
    NonPositiveStake(f64),
    #[error("max_daily_tips must be at least 1")]
    ZeroTipCap,
}
