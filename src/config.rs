use std::env;
use std::path::PathBuf;

use crate::error::ConfigError;

const APP_DIR: &str = "matchday_tips";
const DB_FILE: &str = "betting_history.sqlite";

/// Thresholds and staking for one selection run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TipConfig {
    pub unit_size: f64,
    pub max_daily_tips: usize,
    pub min_confidence: f64,
    pub min_value: f64,
    pub min_odds: f64,
    pub max_odds: f64,
}

impl Default for TipConfig {
    fn default() -> Self {
        Self {
            unit_size: 10.0,
            max_daily_tips: 3,
            min_confidence: 0.65,
            min_value: 0.05,
            min_odds: 1.40,
            max_odds: 3.50,
        }
    }
}

impl TipConfig {
    /// Defaults overridden by `TIPS_*` variables; unparseable values are ignored.
    pub fn from_env() -> Result<Self, ConfigError> {
        let d = Self::default();
        let cfg = Self {
            unit_size: env_parse("TIPS_UNIT_SIZE").unwrap_or(d.unit_size),
            max_daily_tips: env_parse("TIPS_MAX_DAILY").unwrap_or(d.max_daily_tips),
            min_confidence: env_parse("TIPS_MIN_CONFIDENCE").unwrap_or(d.min_confidence),
            min_value: env_parse("TIPS_MIN_VALUE").unwrap_or(d.min_value),
            min_odds: env_parse("TIPS_MIN_ODDS").unwrap_or(d.min_odds),
            max_odds: env_parse("TIPS_MAX_ODDS").unwrap_or(d.max_odds),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("unit_size", self.unit_size),
            ("min_confidence", self.min_confidence),
            ("min_value", self.min_value),
            ("min_odds", self.min_odds),
            ("max_odds", self.max_odds),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { name, value });
            }
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::OutOfUnitRange {
                name: "min_confidence",
                value: self.min_confidence,
            });
        }
        if self.unit_size <= 0.0 {
            return Err(ConfigError::NonPositiveStake(self.unit_size));
        }
        if self.max_daily_tips == 0 {
            return Err(ConfigError::ZeroTipCap);
        }
        if self.min_odds > self.max_odds {
            return Err(ConfigError::InvertedOddsWindow {
                min: self.min_odds,
                max: self.max_odds,
            });
        }
        Ok(())
    }

    pub fn odds_in_window(&self, odds: f64) -> bool {
        odds >= self.min_odds && odds <= self.max_odds
    }
}

/// Process-level settings for the command-line front end.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: Option<PathBuf>,
    pub parallelism: Option<usize>,
    pub seed: Option<u64>,
    pub log_filter: String,
    pub log_json: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let db_path = env::var("TIPS_DB_PATH")
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from)
            .or_else(default_db_path);
        let parallelism = env_parse::<usize>("TIPS_PARALLELISM").map(|n| n.clamp(1, 32));
        let log_filter = env::var("TIPS_LOG")
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .unwrap_or_else(|| "warn".to_string());
        let log_json = env::var("TIPS_LOG_FORMAT")
            .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        Self {
            db_path,
            parallelism,
            seed: env_parse("TIPS_SEED"),
            log_filter,
            log_json,
        }
    }
}

pub fn app_data_dir() -> Option<PathBuf> {
    if let Ok(base) = env::var("XDG_DATA_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(APP_DIR));
    }
    let home = env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR),
    )
}

pub fn default_db_path() -> Option<PathBuf> {
    app_data_dir().map(|dir| dir.join(DB_FILE))
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key)
        .ok()
        .and_then(|val| val.trim().parse::<T>().ok())
}
