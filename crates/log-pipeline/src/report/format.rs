//! 리포트 공통 포맷 도구

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::error::LogPipelineError;

/// Apache 로그 타임스탬프 형식
pub const APACHE_TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

const BYTE_UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "XB"];

/// 단위를 올리는 기준값
const UNIT_SWITCH: f64 = 5120.0;

/// 리포트 시각 표시 기준
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportTimeZone {
    #[default]
    Local,
    Utc,
}

impl FromStr for ReportTimeZone {
    type Err = LogPipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "utc" => Ok(Self::Utc),
            other => Err(LogPipelineError::Config {
                field: "time_zone".to_owned(),
                reason: format!("expected local or utc, got '{other}'"),
            }),
        }
    }
}

impl fmt::Display for ReportTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Utc => f.write_str("utc"),
        }
    }
}

/// 왼쪽을 `0`으로 채웁니다.
pub fn zero_pad(value: impl fmt::Display, width: usize) -> String {
    format!("{value:0>width$}")
}

/// 오른쪽 정렬
pub fn rjust(value: impl fmt::Display, width: usize) -> String {
    format!("{value:>width$}")
}

/// 왼쪽 정렬
pub fn ljust(value: impl fmt::Display, width: usize) -> String {
    format!("{value:<width$}")
}

/// 바이트 수를 고정 폭 10자 문자열로 변환합니다.
///
/// 1024 단위로 나누며, 값이 5120을 넘을 때만 다음 단위로 올립니다.
///
/// ```text
/// 0        -> "   0     B"
/// 6144     -> "   6.00 kB"
/// ```
pub fn bytes_string(bytes: u64) -> String {
    if bytes as f64 <= UNIT_SWITCH {
        return format!("{}   {}", rjust(bytes, 4), rjust(BYTE_UNITS[0], 3));
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value > UNIT_SWITCH && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:7.2}{}", rjust(BYTE_UNITS[unit], 3))
}

/// epoch 밀리초를 Apache 형식 시각으로 변환합니다.
///
/// 표현할 수 없는 시각이면 밀리초 값을 그대로 출력합니다.
pub fn apache_time(millis: i64, zone: ReportTimeZone) -> String {
    match zone {
        ReportTimeZone::Utc => format_in(Utc, millis),
        ReportTimeZone::Local => format_in(Local, millis),
    }
}

fn format_in<Tz>(zone: Tz, millis: i64) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match zone.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format(APACHE_TIME_FORMAT).to_string(),
        None => millis.to_string(),
    }
}

/// epoch 밀리초를 초 단위로 내림합니다.
pub fn epoch_secs(millis: i64) -> i64 {
    millis.div_euclid(1000)
}

/// RFC 3339 형식의 UTC 시각. 로그 메시지용입니다.
pub fn rfc3339(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| millis.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_string_zero() {
        let s = bytes_string(0);
        assert_eq!(s, "   0     B");
        assert_eq!(s.len(), 10);
    }

    #[test]
    fn bytes_string_stays_in_bytes_up_to_threshold() {
        assert_eq!(bytes_string(5120), "5120     B");
        assert_eq!(bytes_string(42), "  42     B");
    }

    #[test]
    fn bytes_string_switches_units() {
        assert_eq!(bytes_string(6144), "   6.00 kB");
        assert_eq!(bytes_string(10 * 1024 * 1024), "  10.00 MB");
        assert_eq!(bytes_string(5121 * 1024), "   5.00 MB");
        assert_eq!(bytes_string(6 * 1024 * 1024 * 1024), "   6.00 GB");
    }

    #[test]
    fn bytes_string_is_fixed_width() {
        for bytes in [0, 1, 999, 5120, 5121, 1 << 20, 1 << 40, u64::MAX] {
            assert_eq!(bytes_string(bytes).len(), 10, "width for {bytes}");
        }
    }

    #[test]
    fn padding_helpers() {
        assert_eq!(zero_pad(7, 3), "007");
        assert_eq!(zero_pad(1234, 2), "1234");
        assert_eq!(rjust("ab", 4), "  ab");
        assert_eq!(ljust("ab", 4), "ab  ");
    }

    #[test]
    fn apache_time_utc() {
        assert_eq!(
            apache_time(971_211_336_000, ReportTimeZone::Utc),
            "10/Oct/2000:20:55:36 +0000"
        );
    }

    #[test]
    fn epoch_secs_floors() {
        assert_eq!(epoch_secs(1999), 1);
        assert_eq!(epoch_secs(-1), -1);
    }

    #[test]
    fn time_zone_parse() {
        assert_eq!("utc".parse::<ReportTimeZone>().unwrap(), ReportTimeZone::Utc);
        assert!("mars".parse::<ReportTimeZone>().is_err());
    }
}
