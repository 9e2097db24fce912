use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use rusqlite::Connection;
use tracing::warn;

use matchday_tips::config::AppConfig;
use matchday_tips::{
    League, Match, Outcome, TipConfig, TipSelector, export, history, logging, report,
    sample_feed::SampleProvider,
};

const UPCOMING_WINDOW_DAYS: i64 = 7;
const DEFAULT_STATS_DAYS: i64 = 30;
const DEFAULT_HISTORY_LIMIT: usize = 10;

const HELP: &str = r#"
matchday_tips - football value tips

Usage:
  matchday_tips                       generate today's tips (all leagues)
  matchday_tips tips [league ...]     generate tips, e.g. `tips epl serie`
  matchday_tips stats [days]          settled-tip statistics (default 30 days)
  matchday_tips history [limit]       most recent tips (default 10)
  matchday_tips settle <id> <result>  record win | loss | void for a tip
  matchday_tips export <file.xlsx>    write the history to a workbook
  matchday_tips help                  this text

Options:
  --db <path>     sqlite history file (env TIPS_DB_PATH)
  --seed <n>      seed the sample fixture generator (env TIPS_SEED)
"#;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let app = AppConfig::from_env();
    logging::init(&app.log_filter, app.log_json);

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let (flags, positional) = split_flags(&args);

    let db_path = flag_value(&flags, "--db")
        .map(PathBuf::from)
        .or_else(|| app.db_path.clone())
        .context("unable to resolve sqlite path (set TIPS_DB_PATH or pass --db)")?;
    let seed = match flag_value(&flags, "--seed") {
        Some(raw) => Some(raw.parse::<u64>().context("--seed expects an integer")?),
        None => app.seed,
    };

    let command = positional
        .first()
        .map(|c| c.to_lowercase())
        .unwrap_or_else(|| "tips".to_string());
    let rest = positional.get(1..).unwrap_or(&[]);

    match command.as_str() {
        "tips" => {
            let mut conn = history::open_db(&db_path)?;
            run_tips(&mut conn, &app, seed, rest)
        }
        "stats" => {
            let conn = history::open_db(&db_path)?;
            let days = parse_optional(rest.first(), DEFAULT_STATS_DAYS)?;
            let stats = history::stats(&conn, days, Local::now().date_naive())?;
            println!("{}", report::format_stats(&stats, days));
            Ok(())
        }
        "history" => {
            let conn = history::open_db(&db_path)?;
            let limit = parse_optional(rest.first(), DEFAULT_HISTORY_LIMIT)?;
            let tips = history::recent_tips(&conn, limit)?;
            println!("{}", report::format_recent(&tips, limit));
            Ok(())
        }
        "settle" => {
            let (Some(id), Some(outcome)) = (rest.first(), rest.get(1)) else {
                return Err(anyhow!("usage: settle <id> <win|loss|void>"));
            };
            let id = id.parse::<i64>().context("tip id must be an integer")?;
            let outcome = outcome.parse::<Outcome>()?;
            let mut conn = history::open_db(&db_path)?;
            let profit = history::settle_tip(&mut conn, id, outcome)?;
            println!("Tip #{id} settled as {outcome}: {profit:+.2}");
            Ok(())
        }
        "export" => {
            let path = rest
                .first()
                .map(PathBuf::from)
                .ok_or_else(|| anyhow!("usage: export <file.xlsx>"))?;
            let conn = history::open_db(&db_path)?;
            let summary = export::export_history(&conn, &path)?;
            println!(
                "Exported {} tips and {} days to {}",
                summary.tips,
                summary.days,
                path.display()
            );
            Ok(())
        }
        "help" | "--help" | "-h" => {
            println!("{HELP}");
            Ok(())
        }
        other => Err(anyhow!("unknown command: {other} (try `help`)")),
    }
}

fn run_tips(
    conn: &mut Connection,
    app: &AppConfig,
    seed: Option<u64>,
    league_args: &[String],
) -> Result<()> {
    let cfg = TipConfig::from_env()?;
    let leagues = resolve_leagues(league_args);
    println!("{}", report::format_header(&cfg, &leagues));

    let now = Local::now().naive_local();
    let mut provider = SampleProvider::new(seed);
    let mut matches: Vec<Arc<Match>> = Vec::new();
    for league in &leagues {
        let fetched = provider.upcoming_matches(*league, UPCOMING_WINDOW_DAYS, now);
        println!("  Loaded {} matches from {}", fetched.len(), league.name());
        for m in fetched {
            match m.validate() {
                Ok(()) => matches.push(m),
                Err(err) => warn!(%err, "skipping match"),
            }
        }
    }
    println!();

    let selector = match app.parallelism {
        Some(threads) => TipSelector::with_parallelism(cfg, threads),
        None => TipSelector::new(cfg),
    };
    let tips = selector.select(&matches, now);

    let tx = conn.transaction().context("begin save transaction")?;
    for (idx, tip) in tips.iter().enumerate() {
        println!("{}", report::format_tip(tip, idx + 1));
        history::save_tip(&tx, tip)?;
    }
    history::refresh_daily_stats(&tx, &now.format("%Y-%m-%d").to_string())?;
    tx.commit().context("commit saved tips")?;

    let stats = history::stats(conn, DEFAULT_STATS_DAYS, now.date())?;
    println!("{}", report::format_daily_summary(&tips, &stats));
    Ok(())
}

fn resolve_leagues(args: &[String]) -> Vec<League> {
    let mut leagues = Vec::new();
    for arg in args {
        match League::from_alias(arg) {
            Ok(league) if !leagues.contains(&league) => leagues.push(league),
            Ok(_) => {}
            Err(err) => warn!(%err, "ignoring league argument"),
        }
    }
    if leagues.is_empty() {
        leagues.extend(League::ALL);
    }
    leagues
}

/// Separates `--flag value` / `--flag=value` pairs from positional arguments.
fn split_flags(args: &[String]) -> (Vec<(String, String)>, Vec<String>) {
    let mut flags = Vec::new();
    let mut positional = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if !arg.starts_with("--") || arg == "--help" {
            positional.push(arg.clone());
            continue;
        }
        if let Some((name, value)) = arg.split_once('=') {
            flags.push((name.to_string(), value.trim().to_string()));
        } else if let Some(value) = iter.next() {
            flags.push((arg.clone(), value.trim().to_string()));
        }
    }
    (flags, positional)
}

fn flag_value<'a>(flags: &'a [(String, String)], name: &str) -> Option<&'a str> {
    flags
        .iter()
        .rev()
        .find(|(flag, value)| flag == name && !value.is_empty())
        .map(|(_, value)| value.as_str())
}

fn parse_optional<T>(raw: Option<&String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid number: {raw}")),
        None => Ok(default),
    }
}
