use chrono::{DateTime, NaiveDateTime};

use crate::models::Event;

use super::MiningError;

pub const START_COLUMN: &str = "Start";
pub const END_COLUMN: &str = "End";

/// A single value in a timestamp column.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Timestamp(NaiveDateTime),
    Text(String),
    Null,
}

impl Cell {
    /// Coerce to a timestamp. Values that already are one pass through.
    pub fn coerce(self) -> Result<Cell, String> {
        match self {
            Cell::Text(text) => parse_timestamp(&text)
                .map(Cell::Timestamp)
                .ok_or_else(|| format!("'{text}' is not a recognizable timestamp")),
            other => Ok(other),
        }
    }
}

impl From<Option<NaiveDateTime>> for Cell {
    fn from(value: Option<NaiveDateTime>) -> Self {
        value.map(Cell::Timestamp).unwrap_or(Cell::Null)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogRow {
    pub case: i64,
    pub activity: String,
    pub start: Cell,
    pub end: Cell,
}

/// Tabular reshaping of stored events into `{Case, ActivityCode, Start, End}`.
/// Lives for a single mining run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLogView {
    rows: Vec<LogRow>,
}

impl EventLogView {
    pub fn from_events(events: &[Event]) -> Self {
        let rows = events
            .iter()
            .map(|e| LogRow {
                case: e.case_id,
                activity: e.activity_code.clone(),
                start: e.start_time.into(),
                end: e.end_time.into(),
            })
            .collect();
        Self { rows }
    }

    pub fn from_rows(rows: Vec<LogRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[LogRow] {
        &self.rows
    }

    /// Coerce the `Start` and `End` columns to timestamps. Running it twice
    /// yields the same view.
    pub fn coerce_timestamps(self) -> Result<Self, MiningError> {
        let rows = self
            .rows
            .into_iter()
            .enumerate()
            .map(|(idx, LogRow { case, activity, start, end })| {
                let start = start
                    .coerce()
                    .map_err(|e| column_error(START_COLUMN, idx, e))?;
                let end = end
                    .coerce()
                    .map_err(|e| column_error(END_COLUMN, idx, e))?;
                Ok(LogRow { case, activity, start, end })
            })
            .collect::<Result<Vec<_>, MiningError>>()?;
        Ok(Self { rows })
    }
}

fn column_error(column: &str, row: usize, reason: String) -> MiningError {
    MiningError::Conversion(format!("column {column}, row {row}: {reason}"))
}

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}
