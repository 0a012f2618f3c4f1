//! Search window resolution
//!
//! Turns the `--start` / `--stop` strings into epoch milliseconds. Accepted forms:
//! RFC 3339 (`2024-01-15T12:00:00+09:00`), or `YYYY-MM-DD`, `YYYY-MM-DD HH:MM`,
//! `YYYY-MM-DD HH:MM:SS` (a `T` separator is also accepted) interpreted in the
//! report time zone.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use acclog_log_pipeline::ReportTimeZone;

use crate::error::CliError;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Default window length when `--start` is omitted.
pub const DEFAULT_WINDOW_HOURS: i64 = 24;

/// Resolve the `[start, stop]` window in epoch milliseconds.
///
/// `stop` defaults to `now`; `start` defaults to 24 hours before `stop`.
pub fn resolve(
    start: Option<&str>,
    stop: Option<&str>,
    zone: ReportTimeZone,
    now: DateTime<Utc>,
) -> Result<(i64, i64), CliError> {
    let stop = match stop {
        Some(value) => parse_time(value, zone)?,
        None => now,
    };
    let start = match start {
        Some(value) => parse_time(value, zone)?,
        None => stop - Duration::hours(DEFAULT_WINDOW_HOURS),
    };

    if start > stop {
        return Err(CliError::Argument(format!(
            "start {} is after stop {}",
            start.to_rfc3339(),
            stop.to_rfc3339()
        )));
    }
    Ok((start.timestamp_millis(), stop.timestamp_millis()))
}

/// Parse one time argument.
pub fn parse_time(value: &str, zone: ReportTimeZone) -> Result<DateTime<Utc>, CliError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| {
            CliError::Argument(format!(
                "cannot parse time '{value}' (expected RFC 3339 or YYYY-MM-DD[ HH:MM[:SS]])"
            ))
        })?;

    match zone {
        ReportTimeZone::Utc => Ok(Utc.from_utc_datetime(&naive)),
        ReportTimeZone::Local => Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| {
                CliError::Argument(format!("'{value}' does not exist in the local time zone"))
            }),
    }
}
