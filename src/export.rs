use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::history::{self, DailyStats, StoredTip};

pub struct ExportReport {
    pub tips: usize,
    pub days: usize,
}

/// Writes the tip history and per-day aggregates to an xlsx workbook.
pub fn export_history(conn: &Connection, path: &Path) -> Result<ExportReport> {
    let tips = history::all_tips(conn)?;
    let days = history::daily_stats(conn)?;

    let mut tip_rows = vec![vec![
        "ID".to_string(),
        "Date".to_string(),
        "League".to_string(),
        "Match".to_string(),
        "Bet".to_string(),
        "Odds".to_string(),
        "Stake".to_string(),
        "Confidence".to_string(),
        "Value".to_string(),
        "Result".to_string(),
        "Profit".to_string(),
        "Rationale".to_string(),
    ]];
    tip_rows.extend(tips.iter().map(tip_row));

    let mut day_rows = vec![vec![
        "Date".to_string(),
        "Tips".to_string(),
        "Wins".to_string(),
        "Losses".to_string(),
        "Stake".to_string(),
        "Return".to_string(),
        "Profit".to_string(),
        "ROI %".to_string(),
    ]];
    day_rows.extend(days.iter().map(day_row));

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Tips")?;
        write_rows(sheet, &tip_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("DailyStats")?;
        write_rows(sheet, &day_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        tips: tips.len(),
        days: days.len(),
    })
}

fn tip_row(tip: &StoredTip) -> Vec<String> {
    vec![
        tip.id.to_string(),
        tip.date.clone(),
        tip.league.clone(),
        tip.fixture.clone(),
        tip.bet_type.clone(),
        format!("{:.2}", tip.odds),
        format!("{:.2}", tip.stake),
        format!("{:.3}", tip.confidence),
        format!("{:.3}", tip.value),
        tip.result.clone().unwrap_or_default(),
        tip.profit.map(|p| format!("{p:.2}")).unwrap_or_default(),
        tip.reasoning.join("; "),
    ]
}

fn day_row(day: &DailyStats) -> Vec<String> {
    vec![
        day.date.clone(),
        day.tips_count.to_string(),
        day.wins.to_string(),
        day.losses.to_string(),
        format!("{:.2}", day.total_stake),
        format!("{:.2}", day.total_return),
        format!("{:.2}", day.profit),
        format!("{:.1}", day.roi),
    ]
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
