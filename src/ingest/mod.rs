pub mod parser;
pub mod timestamp;

pub use parser::parse_event;

/// Why an inbound event payload was rejected. Nothing is written when one of
/// these is returned.
#[derive(Debug, PartialEq)]
pub enum PayloadError {
    InvalidJson(String),
    NotAnObject,
    MissingField(&'static str),
    InvalidField { field: &'static str, expected: &'static str },
    TimestampOutOfRange { field: &'static str },
}

impl std::fmt::Display for PayloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadError::InvalidJson(msg) => write!(f, "Invalid JSON: {msg}"),
            PayloadError::NotAnObject => write!(f, "Request body must be a JSON object"),
            PayloadError::MissingField(field) => write!(f, "Missing required field: {field}"),
            PayloadError::InvalidField { field, expected } => {
                write!(f, "Field {field} must be {expected}")
            }
            PayloadError::TimestampOutOfRange { field } => {
                write!(f, "Field {field} is outside the representable time range")
            }
        }
    }
}
