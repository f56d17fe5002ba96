//! Row-to-entity parsing helpers.
//!
//! Every repo converts column-indexed `libsql::Row` values into typed entity
//! structs. These helpers isolate the parsing and accept both timestamp forms
//! found in the database: RFC 3339 written by this crate and
//! `YYYY-MM-DD HH:MM:SS` written by SQL defaults or other tools.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string matches neither format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse an optional TEXT column as `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Parse an optional `YYYY-MM-DD` column.
///
/// A full timestamp is accepted too; only its date part is kept.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string is not a date.
pub fn parse_optional_date(s: Option<&str>) -> Result<Option<NaiveDate>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => {
            let date_part = s.get(..10).unwrap_or(s);
            NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
                .map(Some)
                .map_err(|e| DatabaseError::Query(format!("Failed to parse date '{s}': {e}")))
        }
        _ => Ok(None),
    }
}

/// Format an optional date for storage.
#[must_use]
pub fn date_to_sql(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// Works with every eco-core enum (`#[serde(rename_all = "snake_case")]`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column is an error, not `""`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Read a non-negative INTEGER count column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the value is negative or too large.
pub fn get_count(row: &libsql::Row, idx: i32) -> Result<u32, DatabaseError> {
    let raw = row.get::<i64>(idx)?;
    u32::try_from(raw).map_err(|_| DatabaseError::Query(format!("count out of range: {raw}")))
}

/// Extract an optional JSON value from a TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string contains invalid JSON.
pub fn parse_optional_json(s: Option<&str>) -> Result<Option<serde_json::Value>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => {
            let val = serde_json::from_str(s)
                .map_err(|e| DatabaseError::Query(format!("Invalid JSON in column: {e}")))?;
            Ok(Some(val))
        }
        _ => Ok(None),
    }
}

/// Serialize a value for the `detail` column of an audit entry.
///
/// # Errors
///
/// Returns `DatabaseError::Other` if serialization fails.
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, DatabaseError> {
    serde_json::to_value(value).map_err(|e| DatabaseError::Other(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use eco_core::enums::DecisionStatus;

    #[test]
    fn datetime_accepts_both_formats() {
        let a = parse_datetime("2026-02-09T14:30:00+00:00").unwrap();
        let b = parse_datetime("2026-02-09 14:30:00").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn datetime_rejects_garbage() {
        assert!(matches!(parse_datetime("yesterday"), Err(DatabaseError::Query(_))));
    }

    #[test]
    fn optional_date_handles_empty_and_timestamps() {
        assert_eq!(parse_optional_date(None).unwrap(), None);
        assert_eq!(parse_optional_date(Some("")).unwrap(), None);
        let expected = NaiveDate::from_ymd_opt(2026, 5, 1);
        assert_eq!(parse_optional_date(Some("2026-05-01")).unwrap(), expected);
        assert_eq!(
            parse_optional_date(Some("2026-05-01T09:00:00+00:00")).unwrap(),
            expected
        );
        assert!(parse_optional_date(Some("05/01/2026")).is_err());
    }

    #[test]
    fn date_roundtrips_through_sql_text() {
        let date = NaiveDate::from_ymd_opt(2026, 12, 24);
        let text = date_to_sql(date);
        assert_eq!(text.as_deref(), Some("2026-12-24"));
        assert_eq!(parse_optional_date(text.as_deref()).unwrap(), date);
    }

    #[test]
    fn enum_parsing() {
        let status: DecisionStatus = parse_enum("under_review").unwrap();
        assert_eq!(status, DecisionStatus::UnderReview);
        assert!(parse_enum::<DecisionStatus>("pending").is_err());
    }
}
