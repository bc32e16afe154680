// src/leaders.rs

use crate::error::Result;
use crate::table::Table;
use tracing::{debug, info, instrument};

/// Columns pulled from the source table, in output order.
pub const SOURCE_COLUMNS: [&str; 3] = ["Year", "Winner(s)", "HR"];

/// Names written to the CSV header.
pub const OUTPUT_COLUMNS: [&str; 3] = ["yearID", "player", "HR"];

/// One award-leader record: a year, its leader(s), and their home run count.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordRow {
    /// Digits only.
    pub year_id: String,
    /// Possibly several names, as they appear in the source cell.
    pub player: String,
    /// `None` when the source cell didn't parse as a number.
    pub hr: Option<f64>,
}

/// Cleaned records plus what the cleaning did to get there.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaderTable {
    pub rows: Vec<RecordRow>,
    /// Rows removed because the year wasn't a digit string.
    pub dropped: usize,
    /// Rows kept with a missing HR.
    pub hr_missing: usize,
}

/// Project → rename → filter years → coerce HR.
pub fn extract_leaders(table: &Table) -> Result<LeaderTable> {
    let projected = project_and_rename(table)?;
    let (filtered, dropped) = filter_valid_years(projected);
    let mut leaders = coerce_numeric(filtered);
    leaders.dropped = dropped;
    Ok(leaders)
}

/// Keeps `Year`, `Winner(s)`, `HR` and renames them to `yearID`, `player`, `HR`.
pub fn project_and_rename(table: &Table) -> Result<Table> {
    Ok(table.project(&SOURCE_COLUMNS)?.rename(&OUTPUT_COLUMNS))
}

/// Drops every row whose `yearID` isn't made of ASCII digits only.
/// Returns the kept rows and the number dropped.
#[instrument(level = "debug", skip_all, fields(rows = table.num_rows()))]
pub fn filter_valid_years(mut table: Table) -> (Table, usize) {
    let before = table.rows.len();
    table.rows.retain(|row| {
        let year = row.first().map(String::as_str).unwrap_or_default();
        let keep = is_year(year);
        if !keep {
            debug!(year, "dropping row");
        }
        keep
    });
    let dropped = before - table.rows.len();
    info!(kept = table.rows.len(), dropped, "filtered rows on yearID");
    (table, dropped)
}

pub fn is_year(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Turns `(yearID, player, HR)` rows into records, parsing HR.
/// Unparseable HR becomes `None`; no row is dropped.
pub fn coerce_numeric(table: Table) -> LeaderTable {
    let mut hr_missing = 0;
    let rows: Vec<RecordRow> = table
        .rows
        .into_iter()
        .map(|row| {
            let mut cells = row.into_iter();
            let year_id = cells.next().unwrap_or_default();
            let player = cells.next().unwrap_or_default();
            let raw_hr = cells.next().unwrap_or_default();
            let hr = parse_number(&raw_hr);
            if hr.is_none() {
                debug!(year = %year_id, value = %raw_hr, "HR is not numeric");
                hr_missing += 1;
            }
            RecordRow {
                year_id,
                player,
                hr,
            }
        })
        .collect();
    if hr_missing > 0 {
        info!(hr_missing, "coerced non-numeric HR values to missing");
    }
    LeaderTable {
        rows,
        dropped: 0,
        hr_missing,
    }
}

/// Parses a number, treating NaN the same as garbage.
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}
