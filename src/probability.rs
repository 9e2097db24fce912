//! Market probability model.
//!
//! Turns the statistics carried by a [`Match`] into probabilities for the
//! 1X2, both-teams-to-score and over/under markets, together with the
//! human-readable reasons that moved each number. Every function here is pure:
//! the same match always yields the same output.

use crate::types::Match;

const PRIOR_HOME: f64 = 0.45;
const PRIOR_DRAW: f64 = 0.25;
const PRIOR_AWAY: f64 = 0.30;

const FORM_EDGE: f64 = 0.20;
const FORM_BONUS: f64 = 0.08;
const HOME_ADVANTAGE: f64 = 0.05;
const POSITION_EDGE: i64 = 5;
const POSITION_BONUS: f64 = 0.06;
const H2H_BONUS: f64 = 0.04;
const GOAL_BALANCE_EDGE: f64 = 0.5;
const GOAL_BALANCE_BONUS: f64 = 0.05;
const INJURY_LIMIT: usize = 2;
const INJURY_PENALTY: f64 = 0.04;
// Share of the opposing side's modifier subtracted from a side.
const OPPOSING_WEIGHT: f64 = 0.5;

const SIDE_MIN: f64 = 0.10;
const SIDE_MAX: f64 = 0.85;
const DRAW_MIN: f64 = 0.15;
const DRAW_MAX: f64 = 0.40;

const DRAW_FORM_GAP: f64 = 0.1;
const DRAW_POSITION_GAP: i64 = 3;

const SCORE_PROB_CAP: f64 = 0.95;
const SCORING_RATE_DIVISOR: f64 = 3.0;
const HOME_SCORING_NOTE: f64 = 1.5;
const AWAY_SCORING_NOTE: f64 = 1.3;
const CONCEDING_NOTE: f64 = 1.2;

const CONCEDED_WEIGHT: f64 = 0.3;
const GOALS_SLOPE: f64 = 0.15;
const LINE_PROB_MIN: f64 = 0.15;
const LINE_PROB_MAX: f64 = 0.85;
const HIGH_XG_NOTE: f64 = 2.5;
const ATTACKING_NOTE: f64 = 3.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SideReasons {
    pub home: Vec<String>,
    pub draw: Vec<String>,
    pub away: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryProbabilities {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
    /// Starting point before modifiers: margin-free implied odds or the priors.
    pub baseline: (f64, f64, f64),
    /// Clipped home/draw/away values before the final renormalization.
    pub clipped: (f64, f64, f64),
    pub reasons: SideReasons,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketEstimate {
    pub probability: f64,
    pub reasons: Vec<String>,
}

/// Margin-free probabilities implied by three 1X2 prices.
pub fn normalized_implied(home: f64, draw: f64, away: f64) -> (f64, f64, f64) {
    let (h, d, a) = (1.0 / home, 1.0 / draw, 1.0 / away);
    let total = h + d + a;
    (h / total, d / total, a / total)
}

pub fn primary(m: &Match) -> PrimaryProbabilities {
    let home = &m.home;
    let away = &m.away;
    let mut reasons = SideReasons::default();

    let baseline = match m.odds.primary() {
        Some((h, d, a)) => normalized_implied(h, d, a),
        None => (PRIOR_HOME, PRIOR_DRAW, PRIOR_AWAY),
    };

    let mut home_mod = 0.0;
    let mut away_mod = 0.0;

    let form_diff = home.form_score() - away.form_score();
    if form_diff > FORM_EDGE {
        home_mod += FORM_BONUS;
        reasons.home.push(format!(
            "Better form: {:.0}% vs {:.0}%",
            home.form_score() * 100.0,
            away.form_score() * 100.0
        ));
    } else if form_diff < -FORM_EDGE {
        away_mod += FORM_BONUS;
        reasons
            .away
            .push(format!("Away side in better form: {:.0}%", away.form_score() * 100.0));
    }

    home_mod += HOME_ADVANTAGE;
    reasons.home.push("Home advantage".to_string());

    // Higher number = lower in the table.
    let position_gap = away.position as i64 - home.position as i64;
    if position_gap > POSITION_EDGE {
        home_mod += POSITION_BONUS;
        reasons.home.push(format!(
            "Higher league position ({} vs {})",
            home.position, away.position
        ));
    } else if position_gap < -POSITION_EDGE {
        away_mod += POSITION_BONUS;
        reasons
            .away
            .push(format!("Away side higher in the table ({})", away.position));
    }

    if let (Some(home_rate), Some(away_rate)) = (m.h2h.home_win_rate(), m.h2h.away_win_rate()) {
        if home_rate > 0.5 {
            home_mod += H2H_BONUS;
            reasons.home.push(format!(
                "Favourable H2H: {}W-{}D-{}L",
                m.h2h.home_wins, m.h2h.draws, m.h2h.away_wins
            ));
        } else if away_rate > 0.5 {
            away_mod += H2H_BONUS;
            reasons.away.push("Favourable H2H for the away side".to_string());
        }
    }

    let home_gd = home.goal_diff_per_game();
    let away_gd = away.goal_diff_per_game();
    if home_gd > away_gd + GOAL_BALANCE_EDGE {
        home_mod += GOAL_BALANCE_BONUS;
        reasons.home.push(format!(
            "Better goal difference per game: {home_gd:+.1} vs {away_gd:+.1}"
        ));
    } else if away_gd > home_gd + GOAL_BALANCE_EDGE {
        away_mod += GOAL_BALANCE_BONUS;
        reasons
            .away
            .push("Away side has the better goal difference".to_string());
    }

    if home.injuries.len() > INJURY_LIMIT {
        home_mod -= INJURY_PENALTY;
        reasons.away.push(format!(
            "Home injuries: {} players out",
            home.injuries.len()
        ));
    }
    if away.injuries.len() > INJURY_LIMIT {
        away_mod -= INJURY_PENALTY;
        reasons.home.push(format!(
            "Away injuries: {} players out",
            away.injuries.len()
        ));
    }

    let (base_home, _, base_away) = baseline;
    let p_home = clip(base_home + home_mod - away_mod * OPPOSING_WEIGHT, SIDE_MIN, SIDE_MAX);
    let p_away = clip(base_away + away_mod - home_mod * OPPOSING_WEIGHT, SIDE_MIN, SIDE_MAX);
    let p_draw = clip(1.0 - p_home - p_away, DRAW_MIN, DRAW_MAX);

    let total = p_home + p_draw + p_away;

    if form_diff.abs() < DRAW_FORM_GAP {
        reasons.draw.push("Evenly matched form".to_string());
    }
    if position_gap.abs() <= DRAW_POSITION_GAP {
        reasons.draw.push("Similar league positions".to_string());
    }

    PrimaryProbabilities {
        home: p_home / total,
        draw: p_draw / total,
        away: p_away / total,
        baseline,
        clipped: (p_home, p_draw, p_away),
        reasons,
    }
}

/// Both teams to score, treating each side scoring as an independent event.
pub fn both_teams_score(m: &Match) -> MarketEstimate {
    let home = &m.home;
    let away = &m.away;
    let mut reasons = Vec::new();

    let home_scores = home.goals_per_game();
    let away_scores = away.goals_per_game();
    let home_concedes = home.conceded_per_game();
    let away_concedes = away.conceded_per_game();

    let (p_home, p_away) = scoring_chances(m);

    if home_scores > HOME_SCORING_NOTE {
        reasons.push(format!(
            "{} score {:.1} goals per game",
            home.name, home_scores
        ));
    }
    if away_scores > AWAY_SCORING_NOTE {
        reasons.push(format!(
            "{} score {:.1} goals per game",
            away.name, away_scores
        ));
    }
    if home_concedes > CONCEDING_NOTE {
        reasons.push(format!(
            "{} concede {:.1} goals per game",
            home.name, home_concedes
        ));
    }
    if away_concedes > CONCEDING_NOTE {
        reasons.push(format!(
            "{} concede {:.1} goals per game",
            away.name, away_concedes
        ));
    }

    MarketEstimate {
        probability: p_home * p_away,
        reasons,
    }
}

/// Per-side probability of scoring at least once, each capped at 0.95.
pub fn scoring_chances(m: &Match) -> (f64, f64) {
    let p_home = ((m.home.goals_per_game() + m.away.conceded_per_game()) / SCORING_RATE_DIVISOR)
        .min(SCORE_PROB_CAP);
    let p_away = ((m.away.goals_per_game() + m.home.conceded_per_game()) / SCORING_RATE_DIVISOR)
        .min(SCORE_PROB_CAP);
    (p_home, p_away)
}

/// Expected total goals, blended with the head-to-head average when one is known.
pub fn expected_goals(m: &Match) -> f64 {
    let from_form = (m.home.goals_per_game()
        + m.away.goals_per_game()
        + m.home.conceded_per_game() * CONCEDED_WEIGHT
        + m.away.conceded_per_game() * CONCEDED_WEIGHT)
        / 2.0;
    match m.h2h.known_avg_goals() {
        Some(h2h) => (from_form + h2h) / 2.0,
        None => from_form,
    }
}

/// Linear stand-in for a goals distribution: 0.15 per goal away from the line.
pub fn over_probability(expected: f64, line: f64) -> f64 {
    let p = if expected > line {
        0.5 + (expected - line) * GOALS_SLOPE
    } else {
        0.5 - (line - expected) * GOALS_SLOPE
    };
    clip(p, LINE_PROB_MIN, LINE_PROB_MAX)
}

pub fn over_line(m: &Match, line: f64) -> MarketEstimate {
    let mut reasons = Vec::new();
    let expected = expected_goals(m);

    if let Some(h2h) = m.h2h.known_avg_goals()
        && h2h > line
    {
        reasons.push(format!("H2H average of {h2h:.1} goals"));
    }
    if expected > HIGH_XG_NOTE {
        reasons.push(format!("High expected goals: {expected:.1}"));
    }
    let home_gpg = m.home.goals_per_game();
    let away_gpg = m.away.goals_per_game();
    if home_gpg + away_gpg > ATTACKING_NOTE {
        reasons.push(format!(
            "Attacking sides: {home_gpg:.1} + {away_gpg:.1} goals per game"
        ));
    }

    MarketEstimate {
        probability: over_probability(expected, line),
        reasons,
    }
}

fn clip(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}
