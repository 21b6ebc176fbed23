//! Event timestamp provider.

use chrono::{SecondsFormat, Utc};

/// Current UTC instant as an ISO-8601 string with millisecond precision,
/// `Z`-suffixed.
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
