//! Repository layer — entity-scoped database operations.

mod audit;
mod document;
mod patient;

pub use audit::*;
pub use document::*;
pub use patient::*;

use chrono::{NaiveDateTime, Utc};

use super::DatabaseError;

pub(crate) fn now_text() -> String {
    Utc::now().naive_utc().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Parse a stored timestamp. Accepts the canonical space-separated form
/// and the ISO-8601 `T` separator; anything else is corrupt data.
pub(crate) fn parse_datetime(
    value: &str,
    entity_type: &str,
    id: &str,
) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| DatabaseError::CorruptPayload {
            entity_type: entity_type.into(),
            id: id.into(),
            reason: format!("bad timestamp '{value}': {e}"),
        })
}
