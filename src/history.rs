use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::info;

use crate::types::{Outcome, Tip};

#[derive(Debug, Clone, PartialEq)]
pub struct StoredTip {
    pub id: i64,
    pub date: String,
    pub league: String,
    pub fixture: String,
    pub bet_type: String,
    pub odds: f64,
    pub stake: f64,
    pub confidence: f64,
    pub value: f64,
    pub reasoning: Vec<String>,
    pub result: Option<String>,
    pub profit: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryStats {
    pub total: u32,
    pub wins: u32,
    pub losses: u32,
    pub total_stake: f64,
    pub total_profit: f64,
    pub roi: f64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyStats {
    pub date: String,
    pub tips_count: u32,
    pub wins: u32,
    pub losses: u32,
    pub total_stake: f64,
    pub total_return: f64,
    pub profit: f64,
    pub roi: f64,
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create history dir {}", parent.display()))?;
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("open in-memory sqlite db")?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS tips (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            league TEXT NOT NULL,
            fixture TEXT NOT NULL,
            bet_type TEXT NOT NULL,
            odds REAL NOT NULL,
            stake REAL NOT NULL,
            confidence REAL NOT NULL,
            value REAL NOT NULL,
            reasoning TEXT NOT NULL,
            result TEXT NULL,
            profit REAL NULL,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_tips_date ON tips(date);

        CREATE TABLE IF NOT EXISTS daily_stats (
            date TEXT PRIMARY KEY,
            tips_count INTEGER NOT NULL DEFAULT 0,
            wins INTEGER NOT NULL DEFAULT 0,
            losses INTEGER NOT NULL DEFAULT 0,
            total_stake REAL NOT NULL DEFAULT 0,
            total_return REAL NOT NULL DEFAULT 0,
            profit REAL NOT NULL DEFAULT 0,
            roi REAL NOT NULL DEFAULT 0
        );
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

pub fn save_tip(conn: &Connection, tip: &Tip) -> Result<i64> {
    let reasoning = serde_json::to_string(&tip.reasoning).context("serialize tip reasoning")?;
    conn.execute(
        r#"
        INSERT INTO tips (
            date, league, fixture, bet_type, odds, stake, confidence, value,
            reasoning, result, profit, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
        params![
            tip.issued_at.format("%Y-%m-%d").to_string(),
            tip.fixture.league.name(),
            tip.fixture.fixture(),
            tip.bet_type.code(),
            tip.odds,
            tip.stake,
            tip.confidence,
            tip.value,
            reasoning,
            tip.result.map(|r| r.as_str()),
            tip.profit,
            Utc::now().to_rfc3339(),
        ],
    )
    .context("insert tip")?;
    let id = conn.last_insert_rowid();
    info!(tip_id = id, bet = tip.bet_type.code(), fixture = %tip.fixture, "tip saved");
    Ok(id)
}

pub fn load_tip(conn: &Connection, id: i64) -> Result<Option<StoredTip>> {
    conn.query_row(
        &format!("SELECT {TIP_COLUMNS} FROM tips WHERE id = ?1"),
        params![id],
        stored_tip_from_row,
    )
    .optional()
    .context("query tip")
}

/// Records the outcome of a stored tip, returning the realized profit.
pub fn settle_tip(conn: &mut Connection, id: i64, outcome: Outcome) -> Result<f64> {
    let tip = load_tip(conn, id)?.ok_or_else(|| anyhow!("no tip with id {id}"))?;
    let profit = outcome.profit(tip.stake, tip.odds);

    let tx = conn.transaction().context("begin settle transaction")?;
    tx.execute(
        "UPDATE tips SET result = ?1, profit = ?2 WHERE id = ?3",
        params![outcome.as_str(), profit, id],
    )
    .context("update tip result")?;
    refresh_daily_stats(&tx, &tip.date)?;
    tx.commit().context("commit settle transaction")?;

    info!(tip_id = id, outcome = %outcome, profit, "tip settled");
    Ok(profit)
}

/// Rebuilds the `daily_stats` row for `date` from its tips.
pub fn refresh_daily_stats(conn: &Connection, date: &str) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO daily_stats (
            date, tips_count, wins, losses, total_stake, total_return, profit, roi
        )
        SELECT
            ?1,
            COUNT(*),
            COALESCE(SUM(CASE WHEN result = 'WIN' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN result = 'LOSS' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(stake), 0),
            COALESCE(SUM(CASE WHEN result IS NOT NULL THEN stake + COALESCE(profit, 0) ELSE 0 END), 0),
            COALESCE(SUM(COALESCE(profit, 0)), 0),
            CASE WHEN COALESCE(SUM(stake), 0) > 0
                 THEN COALESCE(SUM(COALESCE(profit, 0)), 0) * 100.0 / SUM(stake)
                 ELSE 0 END
        FROM tips WHERE date = ?1
        ON CONFLICT(date) DO UPDATE SET
            tips_count = excluded.tips_count,
            wins = excluded.wins,
            losses = excluded.losses,
            total_stake = excluded.total_stake,
            total_return = excluded.total_return,
            profit = excluded.profit,
            roi = excluded.roi
        "#,
        params![date],
    )
    .context("refresh daily stats")?;
    Ok(())
}

pub fn daily_stats(conn: &Connection) -> Result<Vec<DailyStats>> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT date, tips_count, wins, losses, total_stake, total_return, profit, roi
            FROM daily_stats
            ORDER BY date DESC
            "#,
        )
        .context("prepare daily stats query")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(DailyStats {
                date: row.get(0)?,
                tips_count: row.get(1)?,
                wins: row.get(2)?,
                losses: row.get(3)?,
                total_stake: row.get(4)?,
                total_return: row.get(5)?,
                profit: row.get(6)?,
                roi: row.get(7)?,
            })
        })
        .context("query daily stats")?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode daily stats row")?);
    }
    Ok(out)
}

/// Aggregates settled tips dated within the last `days` days of `today`.
pub fn stats(conn: &Connection, days: i64, today: NaiveDate) -> Result<HistoryStats> {
    let since = ChronoDuration::try_days(days)
        .and_then(|window| today.checked_sub_signed(window))
        .ok_or_else(|| anyhow!("stats window of {days} days is out of range"))?
        .format("%Y-%m-%d")
        .to_string();
    let (total, wins, losses, total_stake, total_profit) = conn
        .query_row(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN result = 'WIN' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN result = 'LOSS' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(stake), 0),
                COALESCE(SUM(COALESCE(profit, 0)), 0)
            FROM tips
            WHERE date >= ?1 AND result IS NOT NULL
            "#,
            params![since],
            |row| {
                Ok((
                    row.get::<_, u32>(0)?,
                    row.get::<_, u32>(1)?,
                    row.get::<_, u32>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, f64>(4)?,
                ))
            },
        )
        .context("query history stats")?;

    if total == 0 {
        return Ok(HistoryStats::default());
    }
    Ok(HistoryStats {
        total,
        wins,
        losses,
        total_stake,
        total_profit,
        roi: if total_stake > 0.0 {
            total_profit / total_stake * 100.0
        } else {
            0.0
        },
        success_rate: wins as f64 / total as f64 * 100.0,
    })
}

pub fn recent_tips(conn: &Connection, limit: usize) -> Result<Vec<StoredTip>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {TIP_COLUMNS} FROM tips ORDER BY created_at DESC, id DESC LIMIT ?1"
        ))
        .context("prepare recent tips query")?;
    let rows = stmt
        .query_map(params![limit as i64], stored_tip_from_row)
        .context("query recent tips")?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode tip row")?);
    }
    Ok(out)
}

pub fn all_tips(conn: &Connection) -> Result<Vec<StoredTip>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {TIP_COLUMNS} FROM tips ORDER BY id ASC"))
        .context("prepare tips query")?;
    let rows = stmt
        .query_map([], stored_tip_from_row)
        .context("query tips")?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode tip row")?);
    }
    Ok(out)
}

const TIP_COLUMNS: &str = "id, date, league, fixture, bet_type, odds, stake, confidence, value, \
                           reasoning, result, profit";

fn stored_tip_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredTip> {
    let raw_reasoning: String = row.get(9)?;
    Ok(StoredTip {
        id: row.get(0)?,
        date: row.get(1)?,
        league: row.get(2)?,
        fixture: row.get(3)?,
        bet_type: row.get(4)?,
        odds: row.get(5)?,
        stake: row.get(6)?,
        confidence: row.get(7)?,
        value: row.get(8)?,
        // Older rows may hold free text instead of a JSON array.
        reasoning: serde_json::from_str(&raw_reasoning).unwrap_or_else(|_| vec![raw_reasoning]),
        result: row.get(10)?,
        profit: row.get(11)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_are_empty_without_settled_tips() {
        let conn = open_in_memory().unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        assert_eq!(stats(&conn, 30, today).unwrap(), HistoryStats::default());
    }

    #[test]
    fn oversized_stats_window_is_an_error() {
        let conn = open_in_memory().unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        let err = stats(&conn, 999_999_999_999, today).unwrap_err();
        assert!(err.to_string().contains("out of range"));
        assert!(stats(&conn, i64::MIN, today).is_err());
    }

    #[test]
    fn open_db_reports_unusable_parent_dir() {
        let dir =
            std::env::temp_dir().join(format!("matchday_tips_history_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        // A regular file where the parent directory should be.
        let blocker = dir.join("not_a_dir");
        std::fs::write(&blocker, b"x").unwrap();

        let err = open_db(&blocker.join("tips.sqlite")).unwrap_err();
        assert!(err.to_string().contains("create history dir"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn settling_unknown_tip_fails() {
        let mut conn = open_in_memory().unwrap();
        assert!(settle_tip(&mut conn, 99, Outcome::Win).is_err());
    }
}
