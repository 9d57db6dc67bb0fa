use std::path::Path;

use anyhow::{Context, Result, anyhow};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row, params};

use crate::app::progress::RawRecord;

pub(crate) const SERIES_TABLE: &str = "tbl_Trakt";

// Order matches `record_from_row`.
const RECORD_COLUMNS: &[&str] = &[
    "NAAM",
    "YEAR",
    "PLOT",
    "GENRE",
    "IMDB_ID",
    "PROGRESS",
    "SEASONSEPISODES",
    "VIEWSTATUS",
    "RATING",
    "UPDATED",
];
const REQUIRED_COLUMNS: &[&str] = &["NAAM", "PROGRESS", "SEASONSEPISODES"];

pub struct Snapshot {
    conn: Connection,
}

impl Snapshot {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("failed to open snapshot at {}", path.display()))?;
        Ok(Self { conn })
    }

    pub(crate) fn search_by_name(&self, term: &str) -> Result<Vec<RawRecord>> {
        let available = self.table_columns()?;
        if available.is_empty() {
            return Err(anyhow!("snapshot has no {SERIES_TABLE} table"));
        }
        if let Some(missing) = REQUIRED_COLUMNS
            .iter()
            .find(|column| !available.iter().any(|have| have.eq_ignore_ascii_case(column)))
        {
            return Err(anyhow!("snapshot table {SERIES_TABLE} has no {missing} column"));
        }

        let select_list = RECORD_COLUMNS
            .iter()
            .map(|column| {
                if available.iter().any(|have| have.eq_ignore_ascii_case(column)) {
                    (*column).to_string()
                } else {
                    format!("NULL AS {column}")
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            r#"
            SELECT {select_list}
            FROM {SERIES_TABLE}
            WHERE NAAM LIKE ?1 ESCAPE '\'
            ORDER BY NAAM
            "#
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let pattern = format!("%{}%", escape_like(term.trim()));
        let rows = stmt.query_map(params![pattern], record_from_row)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn table_columns(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({SERIES_TABLE})"))
            .context("failed to inspect snapshot schema")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<RawRecord> {
    Ok(RawRecord {
        name: text_value(row.get_ref(0)?).unwrap_or_default(),
        year: year_value(row.get_ref(1)?),
        plot: text_value(row.get_ref(2)?),
        genre: text_value(row.get_ref(3)?),
        external_id: text_value(row.get_ref(4)?).filter(|id| !id.trim().is_empty()),
        progress_code: text_value(row.get_ref(5)?).unwrap_or_default(),
        tally_code: text_value(row.get_ref(6)?).unwrap_or_default(),
        stored_view_status: text_value(row.get_ref(7)?),
        rating: text_value(row.get_ref(8)?),
        updated: text_value(row.get_ref(9)?),
    })
}

pub(crate) fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

// Columns in the shared snapshot are loosely typed; any scalar is accepted as display text.
fn text_value(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(number) => Some(number.to_string()),
        ValueRef::Real(number) => Some(number.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

fn year_value(value: ValueRef<'_>) -> Option<i32> {
    match value {
        ValueRef::Integer(number) => i32::try_from(number).ok(),
        ValueRef::Real(number) if number.is_finite() && number.fract() == 0.0 => {
            Some(number as i32)
        }
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes).ok()?.trim();
            text.parse::<i32>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().filter(|n| n.fract() == 0.0).map(|n| n as i32))
        }
        _ => None,
    }
}
