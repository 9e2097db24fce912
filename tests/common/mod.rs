#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use matchday_tips::types::FormResult;
use matchday_tips::{HeadToHead, League, MarketOdds, Match, TeamStats};

pub fn kickoff() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 4, 18)
        .and_then(|d| d.and_hms_opt(15, 0, 0))
        .expect("valid kickoff")
}

pub fn issued_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 4, 17)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .expect("valid timestamp")
}

pub fn team(name: &str, position: u32, played: u32, goals_for: u32, goals_against: u32, form: &str) -> TeamStats {
    TeamStats {
        name: name.to_string(),
        position,
        played,
        goals_for,
        goals_against,
        form: FormResult::parse_line(form),
        ..TeamStats::default()
    }
}

pub fn fixture(id: &str, home: TeamStats, away: TeamStats, odds: MarketOdds, h2h: HeadToHead) -> Match {
    Match {
        id: id.to_string(),
        league: League::PremierLeague,
        home: Arc::new(home),
        away: Arc::new(away),
        kickoff: kickoff(),
        venue: String::new(),
        odds,
        h2h,
    }
}

/// Strong home favourite priced generously: 1X2 home clears the default thresholds.
pub fn value_home_favourite(id: &str) -> Arc<Match> {
    Arc::new(fixture(
        id,
        team(&format!("{id}-home"), 2, 20, 42, 16, "WWWDW"),
        team(&format!("{id}-away"), 15, 20, 18, 32, "LDLLW"),
        MarketOdds::from_raw(2.00, 3.20, 3.80, 0.0, 0.0),
        HeadToHead {
            home_wins: 3,
            draws: 1,
            away_wins: 1,
            avg_goals: 2.4,
        },
    ))
}

/// Evenly matched sides at fair prices: nothing should clear the thresholds.
pub fn coin_flip(id: &str) -> Arc<Match> {
    Arc::new(fixture(
        id,
        team(&format!("{id}-home"), 9, 20, 20, 20, "WDLWD"),
        team(&format!("{id}-away"), 10, 20, 20, 20, "WDLWD"),
        MarketOdds::from_raw(2.60, 3.20, 2.90, 1.95, 2.00),
        HeadToHead::default(),
    ))
}

/// Away side ahead on form, table, H2H and goal difference, at margin-free prices.
pub fn away_favourite(id: &str) -> Arc<Match> {
    Arc::new(fixture(
        id,
        team(&format!("{id}-home"), 18, 20, 15, 35, "LLLLL"),
        team(&format!("{id}-away"), 2, 20, 40, 15, "WWWWW"),
        MarketOdds::from_raw(4.00, 3.20, 2.30, 0.0, 0.0),
        HeadToHead {
            home_wins: 0,
            draws: 1,
            away_wins: 4,
            avg_goals: 2.6,
        },
    ))
}
