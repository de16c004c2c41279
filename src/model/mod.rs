pub mod user;
pub mod appointment;

use chrono::{SecondsFormat, Utc};

/// RFC 3339 UTC timestamp with fixed microsecond precision, so stored
/// timestamps order correctly as plain strings.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
