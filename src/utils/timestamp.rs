//! Timestamp helpers.
//!
//! Every log entry is keyed by an ISO-8601 timestamp string with millisecond
//! precision. Wall-clock-derived keys can collide under rapid writes, so the
//! migration paths perturb colliding timestamps by +1 ms before insertion.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use std::collections::HashSet;

/// Current instant as an RFC 3339 string with millisecond precision,
/// e.g. `2026-08-30T14:03:21.417Z`.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an entry timestamp. Accepts any RFC 3339 offset.
pub fn parse_rfc3339(ts: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(ts)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::InvalidTimestamp(ts.to_string()))
}

/// Return the same instant shifted forward by one millisecond.
pub fn bump_millis(ts: &str) -> AppResult<String> {
    let dt = parse_rfc3339(ts)?;
    Ok((dt + Duration::milliseconds(1)).to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Resolve `ts` against the set of timestamps already taken: bump by +1 ms
/// until it is free, record the winner in `taken`, and return it.
pub fn dedupe_timestamp(ts: &str, taken: &mut HashSet<String>) -> AppResult<String> {
    let mut candidate = ts.to_string();
    while taken.contains(&candidate) {
        candidate = bump_millis(&candidate)?;
    }
    taken.insert(candidate.clone());
    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_adds_one_millisecond() {
        let bumped = bump_millis("2025-01-01T10:00:00.000Z").unwrap();
        assert_eq!(bumped, "2025-01-01T10:00:00.001Z");
    }

    #[test]
    fn bump_rolls_over_seconds() {
        let bumped = bump_millis("2025-01-01T10:00:00.999Z").unwrap();
        assert_eq!(bumped, "2025-01-01T10:00:01.000Z");
    }

    #[test]
    fn bump_rejects_garbage() {
        assert!(bump_millis("not-a-timestamp").is_err());
    }

    #[test]
    fn dedupe_keeps_first_and_perturbs_later() {
        let mut taken = HashSet::new();
        let a = dedupe_timestamp("2025-01-01T10:00:00.000Z", &mut taken).unwrap();
        let b = dedupe_timestamp("2025-01-01T10:00:00.000Z", &mut taken).unwrap();
        let c = dedupe_timestamp("2025-01-01T10:00:00.000Z", &mut taken).unwrap();
        assert_eq!(a, "2025-01-01T10:00:00.000Z");
        assert_eq!(b, "2025-01-01T10:00:00.001Z");
        assert_eq!(c, "2025-01-01T10:00:00.002Z");
    }
}
