//! 도메인 타입 — 시스템 전역에서 사용되는 공통 타입
//!
//! 파서가 만들어내는 [`LogEntry`], 필터가 참조하는 [`Field`],
//! 그리고 스캔과 리포트 사이의 교환 형식인 [`Tick`]을 정의합니다.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 파싱된 access log 엔트리
///
/// 파싱이 성공한 경우에만 생성되므로 host, timestamp, request, status, size는
/// 항상 채워져 있습니다. 부분적으로 채워진 엔트리는 존재하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// 클라이언트 호스트 (IP 또는 호스트명)
    pub host: String,
    /// identd 값 (대부분 `-`)
    pub ident: String,
    /// 인증 사용자 (대부분 `-`)
    pub user: String,
    /// 원본 타임스탬프 문자열 (대괄호 제외)
    pub timestamp: String,
    /// UTC 기준 epoch 밀리초
    pub time: i64,
    /// 요청 라인 전체
    pub request: String,
    /// HTTP 메서드 (요청 라인이 3토큰 형식이 아니면 없음)
    pub method: Option<String>,
    /// 요청 URI
    pub uri: Option<String>,
    /// 프로토콜 (예: `HTTP/1.1`)
    pub protocol: Option<String>,
    /// 3자리 상태 코드 문자열
    pub status: String,
    /// 응답 크기 (바이트, `-`는 0)
    pub size: u64,
    /// Referer (combined 형식에서만)
    pub referer: Option<String>,
    /// User-Agent (combined 형식에서만)
    pub agent: Option<String>,
}

impl LogEntry {
    /// 필드 값을 문자열 형태로 반환합니다.
    ///
    /// 값이 없는 선택 필드는 `None`을 반환합니다.
    pub fn field(&self, field: Field) -> Option<Cow<'_, str>> {
        match field {
            Field::Host => Some(Cow::Borrowed(&self.host)),
            Field::Ident => Some(Cow::Borrowed(&self.ident)),
            Field::User => Some(Cow::Borrowed(&self.user)),
            Field::Timestamp => Some(Cow::Borrowed(&self.timestamp)),
            Field::Time => Some(Cow::Owned(self.time.to_string())),
            Field::Request => Some(Cow::Borrowed(&self.request)),
            Field::Method => self.method.as_deref().map(Cow::Borrowed),
            Field::Uri => self.uri.as_deref().map(Cow::Borrowed),
            Field::Protocol => self.protocol.as_deref().map(Cow::Borrowed),
            Field::Status => Some(Cow::Borrowed(&self.status)),
            Field::Size => Some(Cow::Owned(self.size.to_string())),
            Field::Referer => self.referer.as_deref().map(Cow::Borrowed),
            Field::Agent => self.agent.as_deref().map(Cow::Borrowed),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] \"{}\" {} {}",
            self.host, self.timestamp, self.request, self.status, self.size,
        )
    }
}

/// [`LogEntry`]의 필드 이름
///
/// 필터는 자유 문자열 대신 이 열거형으로 필드를 지정합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Host,
    Ident,
    User,
    Timestamp,
    Time,
    Request,
    Method,
    Uri,
    Protocol,
    Status,
    Size,
    Referer,
    Agent,
}

impl Field {
    /// 필드 이름 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Ident => "ident",
            Self::User => "user",
            Self::Timestamp => "timestamp",
            Self::Time => "time",
            Self::Request => "request",
            Self::Method => "method",
            Self::Uri => "uri",
            Self::Protocol => "protocol",
            Self::Status => "status",
            Self::Size => "size",
            Self::Referer => "referer",
            Self::Agent => "agent",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = crate::error::RecognizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "host" => Ok(Self::Host),
            "ident" => Ok(Self::Ident),
            "user" => Ok(Self::User),
            "timestamp" => Ok(Self::Timestamp),
            "time" => Ok(Self::Time),
            "request" => Ok(Self::Request),
            "method" => Ok(Self::Method),
            "uri" => Ok(Self::Uri),
            "protocol" => Ok(Self::Protocol),
            "status" | "code" => Ok(Self::Status),
            "size" => Ok(Self::Size),
            "referer" => Ok(Self::Referer),
            "agent" => Ok(Self::Agent),
            other => Err(crate::error::RecognizerError::UnknownField(other.to_owned())),
        }
    }
}

/// 매칭된 엔트리 하나가 집계에 기여하는 최소 레코드
///
/// 전체 tick 목록은 `time` 오름차순으로 정렬된 상태로 리포트에 전달됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    /// UTC epoch 밀리초 (정렬 키)
    pub time: i64,
    /// 바이트 수
    pub size: u64,
    /// 집계 대상 레이블 (IP, URI 등). downtime 리포트에서는 없음
    pub item: Option<String>,
}

impl Tick {
    /// 새 tick을 생성합니다.
    pub fn new(time: i64, size: u64, item: Option<String>) -> Self {
        Self { time, size, item }
    }

    /// 문자열 형태의 크기 값으로 tick을 생성합니다.
    ///
    /// 크기는 [`Tick::coerce_size`] 규칙으로 음이 아닌 정수로 변환됩니다.
    pub fn with_raw_size(time: i64, size: Option<&str>, item: Option<String>) -> Self {
        Self::new(time, Self::coerce_size(size), item)
    }

    /// 임의의 크기 표현을 음이 아닌 정수로 변환합니다.
    ///
    /// 값이 없거나, 숫자가 아니거나, 음수이면 0입니다.
    pub fn coerce_size(raw: Option<&str>) -> u64 {
        raw.and_then(|s| s.trim().parse::<i64>().ok())
            .map(|n| n.max(0) as u64)
            .unwrap_or(0)
    }
}
