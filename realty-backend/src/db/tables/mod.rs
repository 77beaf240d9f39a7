//! Database table modules - extends Database with domain-specific methods
//!
//! Each module adds `impl Database` blocks with methods for a specific table
//! group.

mod blog;
mod comments;
mod contacts;
mod exclusive_properties;
mod inquiries;
mod newsletter;
mod properties;

pub use properties::SyncedProperty;

use chrono::{DateTime, Utc};
use rusqlite::Connection;

/// Parse a stored RFC 3339 timestamp. All timestamps are written by this
/// crate, so a parse failure means the row was edited by hand.
pub(crate) fn ts(value: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&value)
        .unwrap()
        .with_timezone(&Utc)
}

pub(crate) fn opt_ts(value: Option<String>) -> Option<DateTime<Utc>> {
    value.map(ts)
}

/// Decode a JSON string-array column, tolerating legacy plain text.
pub(crate) fn json_list(value: String) -> Vec<String> {
    serde_json::from_str(&value).unwrap_or_default()
}

/// Find a slug not yet used in `table`, appending `-2`, `-3`, ... on
/// collision.
pub(crate) fn unique_slug(conn: &Connection, table: &str, base: &str) -> String {
    let base = if base.is_empty() { "item" } else { base };
    let mut candidate = base.to_string();
    let mut suffix = 2;

    loop {
        let taken: i64 = conn
            .query_row(
                &format!("SELECT COUNT(*) FROM {} WHERE slug = ?1", table),
                [&candidate],
                |row| row.get(0),
            )
            .unwrap_or(0);
        if taken == 0 {
            return candidate;
        }
        candidate = format!("{}-{}", base, suffix);
        suffix += 1;
    }
}
