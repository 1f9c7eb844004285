pub mod error;
pub mod moderation;
pub mod services;
pub mod stats;
pub mod traits;
pub mod validation;

use chrono::{SecondsFormat, Utc};

/// Current UTC time as a fixed-width RFC 3339 string.
///
/// Fixed width keeps lexical order of stored timestamps chronological.
pub fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
