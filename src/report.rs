use crate::config::TipConfig;
use crate::history::{HistoryStats, StoredTip};
use crate::league::League;
use crate::types::Tip;

const RULE_WIDTH: usize = 60;

pub fn format_header(cfg: &TipConfig, leagues: &[League]) -> String {
    let names = leagues
        .iter()
        .map(|l| format!("{} ({})", l.name(), l.country()))
        .collect::<Vec<_>>()
        .join(" | ");
    let rule = "#".repeat(RULE_WIDTH);
    [
        String::new(),
        rule.clone(),
        "      MATCHDAY TIPS".to_string(),
        rule.clone(),
        format!("  Leagues: {names}"),
        format!("  Unit stake: {:.0} / tip", cfg.unit_size),
        format!("  Max tips per day: {}", cfg.max_daily_tips),
        rule,
    ]
    .join("\n")
}

pub fn format_tip(tip: &Tip, index: usize) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let m = &tip.fixture;
    let mut lines = vec![
        rule.clone(),
        format!("  TIP #{index}: {} {}", m.league.flag(), m.league.name()),
        rule,
        String::new(),
        format!("  {m}"),
        format!("  Kickoff: {}", m.kickoff.format("%Y-%m-%d %H:%M")),
        String::new(),
        format!("  BET: {} - {}", tip.bet_type.code(), tip.bet_type.description()),
        format!("  Odds: {:.2}", tip.odds),
        format!("  Stake: {:.0}", tip.stake),
        format!("  Potential return: {:.2}", tip.potential_return()),
        String::new(),
        format!(
            "  Confidence: {:.0}% {}",
            tip.confidence * 100.0,
            tip.confidence_stars()
        ),
        format!("  Value: {:.1}% {}", tip.value * 100.0, tip.value_band().label()),
        String::new(),
        "  RATIONALE:".to_string(),
    ];
    for reason in &tip.reasoning {
        lines.push(format!("    - {reason}"));
    }
    lines.push(String::new());
    lines.join("\n")
}

pub fn format_daily_summary(tips: &[Tip], stats: &HistoryStats) -> String {
    let rule = "#".repeat(RULE_WIDTH);
    let stake: f64 = tips.iter().map(|t| t.stake).sum();
    let potential: f64 = tips.iter().map(|t| t.potential_return()).sum();
    let mut lines = vec![
        String::new(),
        rule.clone(),
        "  DAILY SUMMARY".to_string(),
        rule.clone(),
        String::new(),
        format!("  Tips: {}", tips.len()),
        format!("  Total stake: {stake:.0}"),
        format!("  Potential return: {potential:.2}"),
        String::new(),
    ];
    if tips.is_empty() {
        lines.push("  No market cleared the thresholds today.".to_string());
        lines.push(String::new());
    }
    if stats.total > 0 {
        lines.extend([
            "  RECORD (last 30 days):".to_string(),
            format!("    Hit rate: {:.1}%", stats.success_rate),
            format!("    ROI: {:+.1}%", stats.roi),
            format!("    Profit: {:+.2}", stats.total_profit),
            String::new(),
        ]);
    }
    lines.push(rule);
    lines.join("\n")
}

pub fn format_stats(stats: &HistoryStats, days: i64) -> String {
    let rule = "#".repeat(RULE_WIDTH);
    [
        String::new(),
        rule.clone(),
        format!("  STATISTICS ({days} days)"),
        rule.clone(),
        format!("  Settled tips: {}", stats.total),
        format!("  Won: {} ({:.1}%)", stats.wins, stats.success_rate),
        format!("  Lost: {}", stats.losses),
        String::new(),
        format!("  Staked: {:.0}", stats.total_stake),
        format!("  Profit: {:+.2}", stats.total_profit),
        format!("  ROI: {:+.1}%", stats.roi),
        rule,
    ]
    .join("\n")
}

pub fn format_recent(tips: &[StoredTip], limit: usize) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec![
        String::new(),
        rule.clone(),
        format!("  LAST {limit} TIPS"),
        rule,
        String::new(),
    ];
    for tip in tips {
        let result = tip.result.as_deref().unwrap_or("PENDING");
        let profit = tip
            .profit
            .map(|p| format!("{p:+.2}"))
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!("  #{} {} | {}", tip.id, tip.date, tip.league));
        lines.push(format!("  {}", tip.fixture));
        lines.push(format!(
            "  {} @ {:.2} | {} | {}",
            tip.bet_type, tip.odds, result, profit
        ));
        lines.push(String::new());
    }
    lines.join("\n")
}
