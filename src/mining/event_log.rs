use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use process_mining::core::event_data::case_centric::constants::TRACE_ID_NAME;
use process_mining::core::event_data::case_centric::{
    AttributeValue, Event as XesEvent, EventLog, Trace as XesTrace, XESEditableAttribute,
};

use super::log_view::{Cell, EventLogView, END_COLUMN, START_COLUMN};
use super::{LogConverter, MiningError};

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessEvent {
    pub activity: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// All events of one case, ordered by completion time.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub case: i64,
    pub events: Vec<ProcessEvent>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessEventLog {
    pub traces: Vec<Trace>,
}

impl ProcessEventLog {
    pub fn case_count(&self) -> usize {
        self.traces.len()
    }

    pub fn event_count(&self) -> usize {
        self.traces.iter().map(|t| t.events.len()).sum()
    }

    /// The same log as a `process_mining` event log, one trace per case
    /// named after its case id. Events carry `concept:name` and their
    /// completion time as `time:timestamp` (UTC).
    pub fn to_xes(&self) -> EventLog {
        let mut log = EventLog::new();
        for trace in &self.traces {
            let mut xes_trace = XesTrace::new();
            xes_trace.attributes.add_to_attributes(
                TRACE_ID_NAME.to_string(),
                AttributeValue::String(trace.case.to_string()),
            );
            for event in &trace.events {
                let mut xes_event = XesEvent::new(event.activity.clone());
                xes_event
                    .attributes
                    .add_to_attributes(TIMESTAMP_KEY.to_string(), event.end.and_utc().into());
                xes_trace.events.push(xes_event);
            }
            log.traces.push(xes_trace);
        }
        log
    }
}

const TIMESTAMP_KEY: &str = "time:timestamp";

/// Groups rows by `Case` (ascending) and orders each trace by `End`, then
/// `Start`, then original row position.
///
/// Rows without an `End` cannot be placed and are dropped. Rows without a
/// `Start` use their `End` in its place.
pub struct TabularLogConverter;

impl LogConverter for TabularLogConverter {
    fn convert(&self, view: &EventLogView) -> Result<ProcessEventLog, MiningError> {
        let mut cases: BTreeMap<i64, Vec<(usize, ProcessEvent)>> = BTreeMap::new();
        let mut dropped = 0usize;

        for (idx, row) in view.rows().iter().enumerate() {
            let end = match &row.end {
                Cell::Timestamp(ts) => *ts,
                Cell::Null => {
                    dropped += 1;
                    continue;
                }
                Cell::Text(_) => return Err(uncoerced(END_COLUMN, idx)),
            };
            let start = match &row.start {
                Cell::Timestamp(ts) => *ts,
                Cell::Null => end,
                Cell::Text(_) => return Err(uncoerced(START_COLUMN, idx)),
            };

            cases.entry(row.case).or_default().push((
                idx,
                ProcessEvent {
                    activity: row.activity.clone(),
                    start,
                    end,
                },
            ));
        }

        if dropped > 0 {
            tracing::debug!("Dropped {dropped} rows without an {END_COLUMN} timestamp");
        }

        if cases.is_empty() {
            return Err(MiningError::Conversion(format!(
                "no rows with a usable {END_COLUMN} timestamp"
            )));
        }

        let traces = cases
            .into_iter()
            .map(|(case, mut events)| {
                events.sort_by(|(ia, a), (ib, b)| {
                    a.end.cmp(&b.end).then(a.start.cmp(&b.start)).then(ia.cmp(ib))
                });
                Trace {
                    case,
                    events: events.into_iter().map(|(_, e)| e).collect(),
                }
            })
            .collect();

        Ok(ProcessEventLog { traces })
    }
}

fn uncoerced(column: &str, row: usize) -> MiningError {
    MiningError::Conversion(format!("column {column}, row {row}: value was not coerced to a timestamp"))
}
