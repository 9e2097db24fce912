use std::collections::BTreeMap;

use tracing::debug;

use crate::bet_type::BetType;
use crate::probability;
use crate::types::{Match, quoted};

// Assumed bookmaker margin on a compound market priced from its components.
const DOUBLE_CHANCE_MARGIN: f64 = 1.05;

#[derive(Debug, Clone, PartialEq)]
pub struct MarketAnalysis {
    pub bet_type: BetType,
    pub probability: f64,
    /// Quoted or synthesized price; `None` when the market cannot be priced.
    pub odds: Option<f64>,
    /// `probability - 1/odds`; `None` whenever `odds` is `None`.
    pub value: Option<f64>,
    pub reasons: Vec<String>,
}

impl MarketAnalysis {
    fn new(bet_type: BetType, probability: f64, odds: Option<f64>, reasons: Vec<String>) -> Self {
        Self {
            bet_type,
            probability,
            odds,
            value: odds.map(|o| value(probability, o)),
            reasons,
        }
    }

    pub fn value_or_zero(&self) -> f64 {
        self.value.unwrap_or(0.0)
    }
}

pub type MatchAnalysis = BTreeMap<BetType, MarketAnalysis>;

pub fn implied_probability(odds: f64) -> f64 {
    1.0 / odds
}

pub fn value(probability: f64, odds: f64) -> f64 {
    probability - implied_probability(odds)
}

/// Price for a two-outcome compound market, `None` unless both legs are quoted.
pub fn double_chance_odds(odds_a: Option<f64>, odds_b: Option<f64>) -> Option<f64> {
    let a = quoted(odds_a?)?;
    let b = quoted(odds_b?)?;
    Some(1.0 / ((implied_probability(a) + implied_probability(b)) * DOUBLE_CHANCE_MARGIN))
}

/// The price a tip on `bet_type` would be struck at, if one exists.
pub fn resolve_odds(m: &Match, bet_type: BetType) -> Option<f64> {
    let odds = &m.odds;
    let raw = match bet_type {
        BetType::HomeWin => odds.home,
        BetType::Draw => odds.draw,
        BetType::AwayWin => odds.away,
        BetType::BttsYes => odds.btts_yes,
        BetType::Over25 => odds.over_25,
        BetType::HomeOrDraw => return double_chance_odds(odds.home, odds.draw),
        BetType::AwayOrDraw => return double_chance_odds(odds.away, odds.draw),
        BetType::BttsNo | BetType::Over35 | BetType::Under25 => None,
    };
    raw.and_then(quoted)
}

/// Scores every market of a match. Markets without a price are kept with no value.
pub fn analyze_match(m: &Match) -> MatchAnalysis {
    let primary = probability::primary(m);
    let btts = probability::both_teams_score(m);
    let over_25 = probability::over_line(m, 2.5);
    let over_35 = probability::over_line(m, 3.5);

    let mut home_or_draw_reasons = primary.reasons.home.clone();
    home_or_draw_reasons.push("Draw as cover".to_string());
    let mut away_or_draw_reasons = primary.reasons.away.clone();
    away_or_draw_reasons.push("Draw as cover".to_string());

    let entries = [
        (BetType::HomeWin, primary.home, primary.reasons.home),
        (BetType::Draw, primary.draw, primary.reasons.draw),
        (BetType::AwayWin, primary.away, primary.reasons.away),
        (BetType::HomeOrDraw, primary.home + primary.draw, home_or_draw_reasons),
        (BetType::AwayOrDraw, primary.away + primary.draw, away_or_draw_reasons),
        (BetType::BttsYes, btts.probability, btts.reasons),
        (
            BetType::BttsNo,
            1.0 - btts.probability,
            vec!["Weak attacks or strong defences".to_string()],
        ),
        (BetType::Over25, over_25.probability, over_25.reasons),
        (
            BetType::Under25,
            1.0 - over_25.probability,
            vec!["Defensive set-up from both sides".to_string()],
        ),
        (
            BetType::Over35,
            over_35.probability,
            vec!["Very attacking sides".to_string()],
        ),
    ];

    let analysis: MatchAnalysis = entries
        .into_iter()
        .map(|(bet_type, p, reasons)| {
            let market = MarketAnalysis::new(bet_type, p, resolve_odds(m, bet_type), reasons);
            (bet_type, market)
        })
        .collect();

    debug!(
        match_id = %m.id,
        fixture = %m.fixture(),
        priced = analysis.values().filter(|a| a.value.is_some()).count(),
        "analyzed match"
    );
    analysis
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::league::League;
    use crate::types::{HeadToHead, MarketOdds, TeamStats};

    fn sample_match(odds: MarketOdds) -> Match {
        let team = |name: &str, position: u32| TeamStats {
            name: name.to_string(),
            position,
            played: 20,
            wins: 10,
            draws: 5,
            losses: 5,
            goals_for: 30,
            goals_against: 22,
            ..TeamStats::default()
        };
        Match {
            id: "m".to_string(),
            league: League::SerieA,
            home: Arc::new(team("Roma", 6)),
            away: Arc::new(team("Lazio", 7)),
            kickoff: NaiveDate::from_ymd_opt(2026, 1, 1)
                .and_then(|d| d.and_hms_opt(20, 45, 0))
                .unwrap(),
            venue: String::new(),
            odds,
            h2h: HeadToHead::default(),
        }
    }

    #[test]
    fn double_chance_odds_include_margin() {
        let odds = double_chance_odds(Some(2.0), Some(4.0)).unwrap();
        assert!((odds - 1.0 / (0.75 * 1.05)).abs() < 1e-12);
        assert!(double_chance_odds(Some(2.0), None).is_none());
        assert!(double_chance_odds(Some(2.0), Some(0.0)).is_none());
    }

    #[test]
    fn value_only_defined_for_priced_markets() {
        let m = sample_match(MarketOdds {
            home: Some(2.1),
            draw: Some(3.3),
            away: Some(3.6),
            btts_yes: None,
            over_25: Some(1.9),
        });
        let analysis = analyze_match(&m);
        assert_eq!(analysis.len(), 10);

        let home = &analysis[&BetType::HomeWin];
        assert_eq!(home.odds, Some(2.1));
        assert!((home.value.unwrap() - (home.probability - 1.0 / 2.1)).abs() < 1e-12);

        assert!(analysis[&BetType::BttsYes].value.is_none());
        assert_eq!(analysis[&BetType::BttsYes].value_or_zero(), 0.0);
        for complement in [BetType::BttsNo, BetType::Under25, BetType::Over35] {
            assert!(analysis[&complement].odds.is_none());
        }
        assert!(analysis[&BetType::HomeOrDraw].value.is_some());
    }

    #[test]
    fn complements_sum_to_one() {
        let analysis = analyze_match(&sample_match(MarketOdds::default()));
        let btts = analysis[&BetType::BttsYes].probability + analysis[&BetType::BttsNo].probability;
        let goals =
            analysis[&BetType::Over25].probability + analysis[&BetType::Under25].probability;
        assert!((btts - 1.0).abs() < 1e-12);
        assert!((goals - 1.0).abs() < 1e-12);
    }
}
