use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::bet_type::BetType;
use crate::error::InputError;
use crate::league::League;

const FORM_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormResult {
    Win,
    Draw,
    Loss,
}

impl FormResult {
    pub fn points(self) -> u32 {
        match self {
            FormResult::Win => 3,
            FormResult::Draw => 1,
            FormResult::Loss => 0,
        }
    }

    /// Parses a form line such as "WWDLW"; unknown symbols are skipped.
    pub fn parse_line(raw: &str) -> Vec<FormResult> {
        raw.chars()
            .filter_map(|ch| match ch.to_ascii_uppercase() {
                'W' => Some(FormResult::Win),
                'D' => Some(FormResult::Draw),
                'L' => Some(FormResult::Loss),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamStats {
    pub name: String,
    pub position: u32,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    // Most recent result last.
    pub form: Vec<FormResult>,
    pub injuries: Vec<String>,
}

impl TeamStats {
    pub fn points(&self) -> u32 {
        self.wins * 3 + self.draws
    }

    /// Points from the last five results over the 15 available, 0.5 without form.
    pub fn form_score(&self) -> f64 {
        if self.form.is_empty() {
            return 0.5;
        }
        let start = self.form.len().saturating_sub(FORM_WINDOW);
        let points: u32 = self.form[start..].iter().map(|r| r.points()).sum();
        points as f64 / (FORM_WINDOW as u32 * 3) as f64
    }

    pub fn goals_per_game(&self) -> f64 {
        self.goals_for as f64 / self.played.max(1) as f64
    }

    pub fn conceded_per_game(&self) -> f64 {
        self.goals_against as f64 / self.played.max(1) as f64
    }

    pub fn goal_diff_per_game(&self) -> f64 {
        self.goals_per_game() - self.conceded_per_game()
    }

    // Rough approximation from goals conceded; no per-match clean sheet data.
    pub fn clean_sheet_rate(&self) -> f64 {
        if self.played == 0 {
            return 0.0;
        }
        (1.0 - self.conceded_per_game() / 2.0).max(0.0)
    }
}

/// Bookmaker prices. `None` means the market is not quoted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarketOdds {
    pub home: Option<f64>,
    pub draw: Option<f64>,
    pub away: Option<f64>,
    pub btts_yes: Option<f64>,
    pub over_25: Option<f64>,
}

impl MarketOdds {
    /// Builds odds from raw feed values where 0 stands for "not quoted".
    pub fn from_raw(home: f64, draw: f64, away: f64, btts_yes: f64, over_25: f64) -> Self {
        Self {
            home: quoted(home),
            draw: quoted(draw),
            away: quoted(away),
            btts_yes: quoted(btts_yes),
            over_25: quoted(over_25),
        }
    }

    pub fn primary(&self) -> Option<(f64, f64, f64)> {
        Some((quoted(self.home?)?, quoted(self.draw?)?, quoted(self.away?)?))
    }

    fn fields(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("home", self.home),
            ("draw", self.draw),
            ("away", self.away),
            ("btts_yes", self.btts_yes),
            ("over_2.5", self.over_25),
        ]
    }
}

/// A usable decimal price, or `None` for zero, negative or non-finite input.
pub fn quoted(odds: f64) -> Option<f64> {
    (odds.is_finite() && odds > 0.0).then_some(odds)
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeadToHead {
    pub home_wins: u32,
    pub draws: u32,
    pub away_wins: u32,
    // 0.0 when unknown.
    pub avg_goals: f64,
}

impl HeadToHead {
    pub fn total(&self) -> u32 {
        self.home_wins + self.draws + self.away_wins
    }

    pub fn home_win_rate(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.home_wins as f64 / total as f64)
    }

    pub fn away_win_rate(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.away_wins as f64 / total as f64)
    }

    pub fn known_avg_goals(&self) -> Option<f64> {
        (self.avg_goals > 0.0).then_some(self.avg_goals)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub id: String,
    pub league: League,
    pub home: Arc<TeamStats>,
    pub away: Arc<TeamStats>,
    pub kickoff: NaiveDateTime,
    pub venue: String,
    pub odds: MarketOdds,
    pub h2h: HeadToHead,
}

impl Match {
    pub fn fixture(&self) -> String {
        format!("{} vs {}", self.home.name, self.away.name)
    }

    /// Rejects prices that are negative or not finite. Zero and `None` are fine.
    pub fn validate(&self) -> Result<(), InputError> {
        for (market, odds) in self.odds.fields() {
            let Some(odds) = odds else { continue };
            if !odds.is_finite() || odds < 0.0 {
                return Err(InputError::InvalidOdds {
                    match_id: self.id.clone(),
                    market,
                    odds,
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.home.name, self.away.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    Void,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Win => "WIN",
            Outcome::Loss => "LOSS",
            Outcome::Void => "VOID",
        }
    }

    pub fn profit(self, stake: f64, odds: f64) -> f64 {
        match self {
            Outcome::Win => stake * odds - stake,
            Outcome::Loss => -stake,
            Outcome::Void => 0.0,
        }
    }
}

impl FromStr for Outcome {
    type Err = InputError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "win" | "w" => Ok(Outcome::Win),
            "loss" | "lose" | "l" => Ok(Outcome::Loss),
            "void" | "v" => Ok(Outcome::Void),
            _ => Err(InputError::UnknownOutcome(raw.to_string())),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueBand {
    Low,
    Medium,
    High,
}

impl ValueBand {
    pub fn from_value(value: f64) -> Self {
        if value >= 0.15 {
            ValueBand::High
        } else if value >= 0.08 {
            ValueBand::Medium
        } else {
            ValueBand::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ValueBand::Low => "[LOW]",
            ValueBand::Medium => "[MEDIUM]",
            ValueBand::High => "[HIGH]",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tip {
    pub fixture: Arc<Match>,
    pub bet_type: BetType,
    pub odds: f64,
    pub confidence: f64,
    pub value: f64,
    pub stake: f64,
    pub reasoning: Vec<String>,
    pub issued_at: NaiveDateTime,
    pub result: Option<Outcome>,
    pub profit: Option<f64>,
}

impl Tip {
    pub fn potential_return(&self) -> f64 {
        self.stake * self.odds
    }

    pub fn confidence_stars(&self) -> String {
        let stars = ((self.confidence * 5.0) as i64).clamp(1, 5) as usize;
        "*".repeat(stars)
    }

    pub fn value_band(&self) -> ValueBand {
        ValueBand::from_value(self.value)
    }

    pub fn settle(&mut self, outcome: Outcome) -> f64 {
        let profit = outcome.profit(self.stake, self.odds);
        self.result = Some(outcome);
        self.profit = Some(profit);
        profit
    }
}
