use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

use super::PayloadError;

/// Convert an epoch-milliseconds JSON number to a naive UTC timestamp.
///
/// Integer input is exact. Float input is rounded to the nearest microsecond,
/// ties to even. Negative values are accepted; only values chrono cannot
/// represent are rejected.
pub fn from_epoch_millis(field: &'static str, value: &Value) -> Result<NaiveDateTime, PayloadError> {
    let micros = if let Some(ms) = value.as_i64() {
        ms.checked_mul(1_000)
    } else if let Some(ms) = value.as_f64() {
        float_millis_to_micros(ms)
    } else {
        return Err(PayloadError::InvalidField {
            field,
            expected: "a number of epoch milliseconds",
        });
    };

    micros
        .and_then(DateTime::from_timestamp_micros)
        .map(|dt| dt.naive_utc())
        .ok_or(PayloadError::TimestampOutOfRange { field })
}

fn float_millis_to_micros(ms: f64) -> Option<i64> {
    let micros = (ms * 1_000.0).round_ties_even();
    if micros.is_finite() && micros.abs() < i64::MAX as f64 {
        Some(micros as i64)
    } else {
        None
    }
}
