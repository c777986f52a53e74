//! Shared helpers for command handlers.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::CliError;

/// Parse a timestamp given as Unix seconds or RFC3339.
pub fn parse_time(value: &str, field: &str) -> Result<DateTime<Utc>, CliError> {
    let invalid =
        || CliError::validation(field, format!("invalid timestamp '{value}' (use Unix seconds or RFC3339)"));

    if let Ok(secs) = value.trim().parse::<i64>() {
        return DateTime::from_timestamp(secs, 0).ok_or_else(invalid);
    }
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| invalid())
}

/// Parse a humantime duration such as `90m` or `2days`.
pub fn parse_span(value: &str, field: &str) -> Result<TimeDelta, CliError> {
    let duration: Duration = humantime::parse_duration(value)
        .map_err(|e| CliError::validation(field, format!("invalid duration '{value}': {e}")))?;
    if duration.is_zero() {
        return Err(CliError::validation(field, "duration must be greater than zero"));
    }
    TimeDelta::from_std(duration)
        .map_err(|_| CliError::validation(field, format!("duration '{value}' is too large")))
}

/// Resolve `--start/--end/--last` into a closed window.
///
/// `end` defaults to `now`; the start comes from `--start` or from
/// `end - last`. Giving neither is an error, as is a start after the end.
pub fn resolve_window(
    start: Option<&str>,
    end: Option<&str>,
    last: Option<&str>,
    now: DateTime<Utc>,
) -> Result<(DateTime<Utc>, DateTime<Utc>), CliError> {
    let end = end.map(|e| parse_time(e, "end")).transpose()?.unwrap_or(now);

    let start = match (start, last) {
        (Some(s), _) => parse_time(s, "start")?,
        (None, Some(span)) => end
            .checked_sub_signed(parse_span(span, "last")?)
            .ok_or_else(|| {
                CliError::validation("last", format!("'{span}' reaches before the earliest supported date"))
            })?,
        (None, None) => {
            return Err(CliError::validation(
                "time range",
                "pass --start or --last to choose a window",
            ));
        }
    };

    if start > end {
        return Err(CliError::validation("start", "start must be <= end"));
    }
    Ok((start, end))
}
