use chrono::NaiveDateTime;
use serde::Serialize;

pub type EventId = i64;

/// A persisted process event. Timestamps are naive UTC.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Event {
    pub id: EventId,
    pub case_id: i64,
    pub activity_code: String,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
}

/// A validated event ready to be written. Only built by the ingest parser.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub case_id: i64,
    pub activity_code: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

/// Wire shape of an event returned by `GET /api/data`.
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    pub case_id: i64,
    pub activity_code: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub created_at: Option<String>,
}

impl From<&Event> for EventRecord {
    fn from(event: &Event) -> Self {
        EventRecord {
            case_id: event.case_id,
            activity_code: event.activity_code.clone(),
            start_time: event.start_time.as_ref().map(isoformat),
            end_time: event.end_time.as_ref().map(isoformat),
            created_at: event.created_at.as_ref().map(isoformat),
        }
    }
}

/// ISO-8601 without offset; fractional seconds only when present, always
/// at microsecond width.
pub fn isoformat(ts: &NaiveDateTime) -> String {
    use chrono::Timelike;

    if ts.nanosecond() / 1_000 == 0 {
        ts.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        ts.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}
