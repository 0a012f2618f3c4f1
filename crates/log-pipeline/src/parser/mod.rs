//! 로그 파싱 모듈 -- Apache combined / common access log 파서
//!
//! [`AccessLogParser`]는 한 줄을 받아 새로운 [`LogEntry`]를 반환합니다.
//! combined 형식을 먼저 시도하고, 실패하면 common 형식을 시도합니다.
//! 둘 다 맞지 않으면 해당 라인은 [`ParseError::NoFormatMatched`]로 실패합니다.
//!
//! # 지원 형식
//! ```text
//! combined: host ident user [timestamp] "request" status size "referer" "agent"
//! common:   host ident user [timestamp] "request" status size
//! ```
//!
//! # 사용 예시
//! ```ignore
//! use acclog_log_pipeline::parser::AccessLogParser;
//!
//! let parser = AccessLogParser::new();
//! let entry = parser.parse_line(r#"127.0.0.1 - - [10/Oct/2000:13:55:36 -0700] "GET / HTTP/1.0" 200 2326"#)?;
//! ```

pub mod timestamp;

pub use timestamp::parse_timestamp;

use std::sync::LazyLock;

use acclog_core::error::ParseError;
use acclog_core::pipeline::LogParser;
use acclog_core::types::LogEntry;
use regex::{Captures, Regex};

static COMBINED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(\S+) (\S+) (\S+) \[([^\]]+)\] "((?:[^"\\]|\\.)*)" (\d{3}) (\d+|-) "((?:[^"\\]|\\.)*)" "((?:[^"\\]|\\.)*)"\s*$"#,
    )
    .expect("combined log pattern is valid")
});

static COMMON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\S+) (\S+) (\S+) \[([^\]]+)\] "((?:[^"\\]|\\.)*)" (\d{3}) (\d+|-)\s*$"#)
        .expect("common log pattern is valid")
});

static REQUEST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S+)\s+(\S+)\s+(\S+)$").expect("request line pattern is valid")
});

/// 라인이 매칭된 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// referer, agent 포함
    Combined,
    /// referer, agent 없음
    Common,
}

impl LogFormat {
    /// 형식 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Combined => "combined",
            Self::Common => "common",
        }
    }
}

/// Apache access log 파서
///
/// 상태를 갖지 않으므로 여러 파일 스캔에서 하나를 공유해도 됩니다.
#[derive(Debug, Clone, Default)]
pub struct AccessLogParser;

impl AccessLogParser {
    /// 새 파서를 생성합니다.
    pub fn new() -> Self {
        Self
    }

    /// 라인을 파싱하고 매칭된 형식도 함께 반환합니다.
    pub fn parse_with_format(&self, line: &str) -> Result<(LogEntry, LogFormat), ParseError> {
        let line = line.trim_end_matches(['\r', '\n']);

        if let Some(caps) = COMBINED.captures(line) {
            let mut entry = build_entry(&caps)?;
            entry.referer = Some(caps[8].to_owned());
            entry.agent = Some(caps[9].to_owned());
            return Ok((entry, LogFormat::Combined));
        }

        if let Some(caps) = COMMON.captures(line) {
            return Ok((build_entry(&caps)?, LogFormat::Common));
        }

        Err(ParseError::NoFormatMatched {
            line: line.to_owned(),
        })
    }

    /// 라인을 파싱합니다.
    pub fn parse_line(&self, line: &str) -> Result<LogEntry, ParseError> {
        self.parse_with_format(line).map(|(entry, _)| entry)
    }
}

impl LogParser for AccessLogParser {
    fn format_name(&self) -> &str {
        "apache"
    }

    fn parse(&self, line: &str) -> Result<LogEntry, ParseError> {
        self.parse_line(line)
    }
}

/// 두 형식이 공유하는 캡처 그룹 1..=7에서 엔트리를 만듭니다.
fn build_entry(caps: &Captures<'_>) -> Result<LogEntry, ParseError> {
    let timestamp = &caps[4];
    let time = parse_timestamp(timestamp)?;
    let size = parse_size(&caps[7])?;

    let request = caps[5].to_owned();
    let (method, uri, protocol) = match REQUEST.captures(&request) {
        Some(parts) => (
            Some(parts[1].to_owned()),
            Some(parts[2].to_owned()),
            Some(parts[3].to_owned()),
        ),
        None => (None, None, None),
    };

    Ok(LogEntry {
        host: caps[1].to_owned(),
        ident: caps[2].to_owned(),
        user: caps[3].to_owned(),
        timestamp: timestamp.to_owned(),
        time,
        request,
        method,
        uri,
        protocol,
        status: caps[6].to_owned(),
        size,
        referer: None,
        agent: None,
    })
}

fn parse_size(raw: &str) -> Result<u64, ParseError> {
    if raw == "-" {
        return Ok(0);
    }
    raw.parse::<u64>().map_err(|_| ParseError::InvalidSize {
        value: raw.to_owned(),
    })
}
