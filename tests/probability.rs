mod common;

use chrono::NaiveDate;

use common::{away_favourite, fixture, team};
use matchday_tips::probability::{self, over_probability};
use matchday_tips::sample_feed::SampleProvider;
use matchday_tips::value::{self, analyze_match};
use matchday_tips::{BetType, HeadToHead, League, MarketOdds, Outcome};

#[test]
fn form_and_position_edges_lift_the_home_side() {
    let m = fixture(
        "edge",
        team("Arsenal", 2, 20, 30, 20, "WWWWL"),
        team("Burnley", 15, 20, 24, 22, "WLWLL"),
        MarketOdds::from_raw(2.00, 3.20, 3.80, 0.0, 0.0),
        HeadToHead {
            home_wins: 3,
            draws: 1,
            away_wins: 1,
            avg_goals: 2.4,
        },
    );

    let p = probability::primary(&m);
    let baseline = 0.5 / (0.5 + 1.0 / 3.20 + 1.0 / 3.80);

    assert!((p.baseline.0 - baseline).abs() < 1e-12);
    assert!(p.home > baseline, "home {} vs baseline {baseline}", p.home);
    assert!(p.reasons.home.iter().any(|r| r.starts_with("Better form")));
    assert!(p.reasons.home.iter().any(|r| r.starts_with("Higher league position")));
    assert!(p.reasons.home.iter().any(|r| r.starts_with("Favourable H2H")));
    assert!(p.reasons.away.is_empty());
}

#[test]
fn away_edges_credit_the_away_side() {
    let m = away_favourite("away");
    let p = probability::primary(&m);

    let expected = [
        "Away side in better form: 100%",
        "Away side higher in the table (2)",
        "Favourable H2H for the away side",
        "Away side has the better goal difference",
    ];
    assert_eq!(p.reasons.away, expected);
    assert_eq!(p.reasons.home, ["Home advantage"]);

    // Away modifiers sum to 0.23; home keeps only its 0.05 advantage.
    let (_, _, base_away) = p.baseline;
    assert!((p.clipped.2 - (base_away + 0.23 - 0.025)).abs() < 1e-12);
    assert!(p.away > base_away);
    assert!(p.away > p.home && p.away > p.draw);
}

#[test]
fn prolific_sides_hit_the_btts_cap() {
    let m = fixture(
        "btts",
        team("Home", 5, 10, 20, 15, "WDWDW"),
        team("Away", 6, 10, 20, 15, "WDWDW"),
        MarketOdds::default(),
        HeadToHead::default(),
    );

    let est = probability::both_teams_score(&m);
    assert!((est.probability - 0.9025).abs() < 1e-12);
    assert_eq!(probability::scoring_chances(&m), (0.95, 0.95));
    assert!(est.reasons.iter().any(|r| r == "Home score 2.0 goals per game"));
    assert!(est.reasons.iter().any(|r| r == "Away concede 1.5 goals per game"));
}

#[test]
fn three_expected_goals_against_a_two_and_a_half_line() {
    assert!((over_probability(3.0, 2.5) - 0.575).abs() < 1e-12);

    // (2.6 + 2.8 + 0.3 + 0.3) / 2 = 3.0
    let m = fixture(
        "goals",
        team("Home", 4, 10, 26, 10, ""),
        team("Away", 8, 10, 28, 10, ""),
        MarketOdds::default(),
        HeadToHead::default(),
    );
    assert!((probability::expected_goals(&m) - 3.0).abs() < 1e-9);

    let over = probability::over_line(&m, 2.5);
    assert!((over.probability - 0.575).abs() < 1e-9);
    assert!(over.reasons.iter().any(|r| r.starts_with("High expected goals")));
    assert!(over.reasons.iter().any(|r| r.starts_with("Attacking sides")));

    let analysis = analyze_match(&m);
    let under = &analysis[&BetType::Under25];
    assert!((under.probability - 0.425).abs() < 1e-9);
}

#[test]
fn winning_tip_profit_matches_stake_times_odds_minus_one() {
    for (stake, odds) in [(10.0, 1.85), (25.0, 2.40), (7.5, 3.10)] {
        let profit = Outcome::Win.profit(stake, odds);
        assert_eq!(profit, stake * odds - stake);
        assert!((profit - stake * (odds - 1.0)).abs() < 1e-9);
    }
    assert_eq!(Outcome::Loss.profit(10.0, 2.0), -10.0);
    assert_eq!(Outcome::Void.profit(10.0, 2.0), 0.0);
}

#[test]
fn sample_matches_respect_probability_bounds() {
    let now = NaiveDate::from_ymd_opt(2026, 4, 17)
        .and_then(|d| d.and_hms_opt(9, 30, 0))
        .expect("valid now");
    let mut provider = SampleProvider::new(Some(7));

    for league in League::ALL {
        for m in provider.upcoming_matches(league, 7, now) {
            let p = probability::primary(&m);
            assert!((p.home + p.draw + p.away - 1.0).abs() < 1e-9, "{}", m.id);

            let (home, draw, away) = p.clipped;
            assert!((0.10..=0.85).contains(&home));
            assert!((0.10..=0.85).contains(&away));
            assert!((0.15..=0.40).contains(&draw));

            let btts = probability::both_teams_score(&m).probability;
            assert!(btts <= 0.95 * 0.95 + 1e-12);

            for market in analyze_match(&m).values() {
                match (market.odds, market.value) {
                    (Some(odds), Some(v)) => {
                        assert!((v - (market.probability - 1.0 / odds)).abs() < 1e-12);
                        assert_eq!(value::resolve_odds(&m, market.bet_type), Some(odds));
                    }
                    (None, None) => {}
                    other => panic!("odds and value disagree for {}: {other:?}", market.bet_type),
                }
            }
        }
    }
}

#[test]
fn unplayed_teams_do_not_divide_by_zero() {
    let m = fixture(
        "fresh",
        team("Home", 1, 0, 0, 0, ""),
        team("Away", 2, 0, 0, 0, ""),
        MarketOdds::from_raw(2.20, 3.30, 3.40, 1.90, 2.05),
        HeadToHead::default(),
    );

    let analysis = analyze_match(&m);
    assert_eq!(analysis.len(), BetType::all().count());
    for market in analysis.values() {
        assert!(market.probability.is_finite(), "{}", market.bet_type);
    }
    assert_eq!(analysis[&BetType::BttsYes].probability, 0.0);
}
