use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::error::{Error, Result};

/// Parse a request-body calendar date (YYYY-MM-DD).
pub fn parse_request_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| Error::DateParse(s.to_string()))
}

/// Parse a Jira ISO-8601 timestamp with an explicit UTC offset,
/// e.g. `2024-11-01T09:30:00.000+0000`. Returns None when unparsable.
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok())
}

/// Whole days elapsed between two timestamps. Null endpoints are the
/// caller's problem; this only does the subtraction.
pub fn days_between(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> i64 {
    (end - start).num_days()
}

/// Strip markdown code fences from LLM responses.
pub fn strip_code_fences(s: &str) -> &str {
    let s = s.trim();
    if let Some(rest) = s.strip_prefix("```json") {
        rest.strip_suffix("```").unwrap_or(rest).trim()
    } else if let Some(rest) = s.strip_prefix("```") {
        rest.strip_suffix("```").unwrap_or(rest).trim()
    } else {
        s
    }
}
