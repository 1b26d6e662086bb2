use serde_json::{Map, Value};

use crate::models::NewEvent;

use super::timestamp::from_epoch_millis;
use super::PayloadError;

pub const CASE_ID: &str = "CaseID";
pub const ACTIVITY_CODE: &str = "ActivityCode";
pub const START_TIME: &str = "StartTime";
pub const END_TIME: &str = "EndTime";

/// Parse an ingestion body into the echoed JSON value and the event to store.
///
/// Only key presence and basic types are checked. Extra keys are kept in the
/// echo and otherwise ignored.
pub fn parse_event(body: &[u8]) -> Result<(Value, NewEvent), PayloadError> {
    let raw: Value =
        serde_json::from_slice(body).map_err(|e| PayloadError::InvalidJson(e.to_string()))?;

    let fields = raw.as_object().ok_or(PayloadError::NotAnObject)?;

    let case_id = required(fields, CASE_ID)?
        .as_i64()
        .ok_or(PayloadError::InvalidField {
            field: CASE_ID,
            expected: "an integer",
        })?;

    let activity_code = required(fields, ACTIVITY_CODE)?
        .as_str()
        .ok_or(PayloadError::InvalidField {
            field: ACTIVITY_CODE,
            expected: "a string",
        })?
        .to_string();

    let start_time = from_epoch_millis(START_TIME, required(fields, START_TIME)?)?;
    let end_time = from_epoch_millis(END_TIME, required(fields, END_TIME)?)?;

    let event = NewEvent {
        case_id,
        activity_code,
        start_time,
        end_time,
    };

    Ok((raw, event))
}

fn required<'a>(fields: &'a Map<String, Value>, key: &'static str) -> Result<&'a Value, PayloadError> {
    fields.get(key).ok_or(PayloadError::MissingField(key))
}
