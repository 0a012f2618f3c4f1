//! access log 타임스탬프 파서
//!
//! 두 가지 형식을 순서대로 시도합니다.
//!
//! ```text
//! 10/Oct/2023:13:55:36 -0700   (Apache 표준, 영문 월)
//! 10/24/2023:13:55:36 -0700    (cPanel 변형, mm/dd/yyyy)
//! ```
//!
//! 결과는 로그에 기록된 시간대와 무관하게 UTC epoch 밀리초입니다.

use std::sync::LazyLock;

use acclog_core::error::ParseError;
use chrono::NaiveDate;
use regex::{Captures, Regex};

static TEXTUAL_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})/([A-Za-z]{3})/(\d{4}):(\d{2}):(\d{2}):(\d{2}) ([+-])(\d{2})(\d{2})$")
        .expect("textual-month timestamp pattern is valid")
});

static NUMERIC_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4}):(\d{2}):(\d{2}):(\d{2}) ([+-])(\d{2})(\d{2})$")
        .expect("numeric-month timestamp pattern is valid")
});

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// 영문 월 약어를 1부터 시작하는 월 번호로 변환합니다.
pub fn month_number(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|m| *m == name)
        .map(|idx| idx as u32 + 1)
}

/// 월 번호(1-12)를 영문 약어로 변환합니다.
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTHS.get(month.checked_sub(1)? as usize).copied()
}

/// 타임스탬프 문자열을 UTC epoch 밀리초로 변환합니다.
///
/// `UTC(year, month, day, H, M, S) - offset` 으로 계산하므로
/// `-0700` 처럼 음수 오프셋은 결과 시각을 뒤로 밀어냅니다.
pub fn parse_timestamp(value: &str) -> Result<i64, ParseError> {
    if let Some(caps) = TEXTUAL_MONTH.captures(value) {
        let month = month_number(&caps[2]).ok_or_else(|| ParseError::InvalidMonth {
            month: caps[2].to_owned(),
        })?;
        return to_epoch_millis(value, &caps, month, number(&caps, 1));
    }

    if let Some(caps) = NUMERIC_MONTH.captures(value) {
        return to_epoch_millis(value, &caps, number(&caps, 1), number(&caps, 2));
    }

    Err(ParseError::InvalidTimestamp {
        value: value.to_owned(),
    })
}

/// 캡처 그룹 3..=9 (연, 시, 분, 초, 부호, 오프셋 시, 오프셋 분)를 해석합니다.
fn to_epoch_millis(value: &str, caps: &Captures<'_>, month: u32, day: u32) -> Result<i64, ParseError> {
    let invalid = || ParseError::InvalidTimestamp {
        value: value.to_owned(),
    };

    let year = caps[3].parse::<i32>().map_err(|_| invalid())?;
    let wall = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(number(caps, 4), number(caps, 5), number(caps, 6)))
        .ok_or_else(invalid)?;

    let offset_secs = i64::from(number(caps, 8) * 3600 + number(caps, 9) * 60);
    let offset_millis = if &caps[7] == "-" {
        -offset_secs * 1000
    } else {
        offset_secs * 1000
    };

    Ok(wall.and_utc().timestamp_millis() - offset_millis)
}

/// 숫자 전용 캡처 그룹을 u32로 변환합니다. 패턴이 자릿수를 보장합니다.
fn number(caps: &Captures<'_>, idx: usize) -> u32 {
    caps[idx].parse().unwrap_or(0)
}
