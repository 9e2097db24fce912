use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDateTime;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::bet_type::BetType;
use crate::config::TipConfig;
use crate::types::{Match, Tip};
use crate::value::{self, MarketAnalysis};

/// A market that passed every admission threshold.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub fixture: Arc<Match>,
    // Position of the match in the input batch; used as a ranking tie-break.
    pub batch_index: usize,
    pub bet_type: BetType,
    pub probability: f64,
    pub value: f64,
    pub odds: f64,
    pub reasons: Vec<String>,
}

impl Candidate {
    /// Expected-value proxy used for ranking.
    pub fn score(&self) -> f64 {
        self.value * self.probability
    }

    fn into_tip(self, stake: f64, issued_at: NaiveDateTime) -> Tip {
        Tip {
            fixture: self.fixture,
            bet_type: self.bet_type,
            odds: self.odds,
            confidence: self.probability,
            value: self.value,
            stake,
            reasoning: self.reasons,
            issued_at,
            result: None,
            profit: None,
        }
    }
}

pub fn admit(market: &MarketAnalysis, cfg: &TipConfig) -> Option<(f64, f64)> {
    let odds = market.odds?;
    let value = market.value?;
    if market.probability < cfg.min_confidence {
        return None;
    }
    if value < cfg.min_value {
        return None;
    }
    if !cfg.odds_in_window(odds) {
        return None;
    }
    Some((odds, value))
}

/// Analyzes one match and keeps the markets that clear the thresholds.
pub fn match_candidates(
    fixture: &Arc<Match>,
    batch_index: usize,
    cfg: &TipConfig,
) -> Vec<Candidate> {
    value::analyze_match(fixture)
        .into_values()
        .filter_map(|market| {
            let (odds, value) = admit(&market, cfg)?;
            debug!(
                match_id = %fixture.id,
                bet = market.bet_type.code(),
                probability = market.probability,
                value,
                odds,
                "candidate admitted"
            );
            Some(Candidate {
                fixture: Arc::clone(fixture),
                batch_index,
                bet_type: market.bet_type,
                probability: market.probability,
                value,
                odds,
                reasons: market.reasons,
            })
        })
        .collect()
}

/// Best first; ties fall back to batch order, then catalogue order.
pub fn rank(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        b.score()
            .partial_cmp(&a.score())
            .unwrap_or(Ordering::Equal)
            .then(a.batch_index.cmp(&b.batch_index))
            .then(a.bet_type.cmp(&b.bet_type))
    });
}

/// Walks ranked candidates keeping at most one per match, up to `max_tips`.
pub fn pick_one_per_match(ranked: Vec<Candidate>, max_tips: usize) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for candidate in ranked {
        if out.len() >= max_tips {
            break;
        }
        if !seen.insert(candidate.fixture.id.clone()) {
            continue;
        }
        out.push(candidate);
    }
    out
}

pub struct TipSelector {
    config: TipConfig,
    pool: Option<rayon::ThreadPool>,
}

impl TipSelector {
    /// Evaluates matches on rayon's global pool.
    pub fn new(config: TipConfig) -> Self {
        Self { config, pool: None }
    }

    /// Evaluates matches on a dedicated pool of `threads` workers. Falls back
    /// to the global pool if the pool cannot be built.
    pub fn with_parallelism(config: TipConfig, threads: usize) -> Self {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|idx| format!("tips-eval-{idx}"))
            .build()
            .ok();
        Self { config, pool }
    }

    pub fn config(&self) -> &TipConfig {
        &self.config
    }

    /// Every admitted candidate across the batch, in batch order.
    pub fn candidates(&self, matches: &[Arc<Match>]) -> Vec<Candidate> {
        let cfg = &self.config;
        let evaluate = || {
            matches
                .par_iter()
                .enumerate()
                .map(|(idx, fixture)| match_candidates(fixture, idx, cfg))
                .collect::<Vec<_>>()
        };
        let per_match = match self.pool.as_ref() {
            Some(pool) => pool.install(evaluate),
            None => evaluate(),
        };
        per_match.into_iter().flatten().collect()
    }

    pub fn select(&self, matches: &[Arc<Match>], issued_at: NaiveDateTime) -> Vec<Tip> {
        let mut candidates = self.candidates(matches);
        let admitted = candidates.len();
        rank(&mut candidates);

        let tips: Vec<Tip> = pick_one_per_match(candidates, self.config.max_daily_tips)
            .into_iter()
            .map(|c| c.into_tip(self.config.unit_size, issued_at))
            .collect();

        info!(
            matches = matches.len(),
            admitted,
            selected = tips.len(),
            "tip selection finished"
        );
        tips
    }
}

/// One-shot selection on the global pool.
pub fn select_tips(matches: &[Arc<Match>], cfg: &TipConfig, issued_at: NaiveDateTime) -> Vec<Tip> {
    TipSelector::new(*cfg).select(matches, issued_at)
}
