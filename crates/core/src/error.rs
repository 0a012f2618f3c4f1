//! 에러 타입 — 도메인별 에러 정의

/// acclog 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum AccessLogError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 로그 라인 파싱 에러
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// 타임 슬롯 인덱스 범위 위반
    #[error("range error: {0}")]
    Range(#[from] RangeError),

    /// 필터(recognizer) 구성 에러
    #[error("recognizer error: {0}")]
    Recognizer(#[from] RecognizerError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 로그 라인 파싱 에러
///
/// 지원하는 두 형식(combined, common) 중 어느 것에도 맞지 않거나
/// 타임스탬프를 해석할 수 없으면 해당 라인 전체가 실패합니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// combined / common 형식 모두 불일치
    #[error("line matches neither combined nor common format: {line}")]
    NoFormatMatched { line: String },

    /// 타임스탬프 형식 불일치 또는 존재하지 않는 날짜
    #[error("invalid timestamp: {value}")]
    InvalidTimestamp { value: String },

    /// 알 수 없는 월 이름
    #[error("invalid month name: {month}")]
    InvalidMonth { month: String },

    /// 응답 크기 필드 해석 실패
    #[error("invalid response size: {value}")]
    InvalidSize { value: String },
}

/// 타임 슬롯 범위 에러
///
/// 호출자 계약 위반이므로 복구 대상이 아닙니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// 슬롯 구간이 tick 배열을 벗어남
    #[error("slot range [{first}, {last}] out of bounds for {len} ticks")]
    SlotBounds {
        first: usize,
        last: usize,
        len: usize,
    },

    /// 슬롯 아이템 인덱스가 범위를 벗어남
    #[error("item index {index} out of bounds for {len} items")]
    ItemIndex { index: usize, len: usize },
}

/// Recognizer 구성 에러
#[derive(Debug, thiserror::Error)]
pub enum RecognizerError {
    /// predicate와 combinator가 모두 없음
    #[error("node '{field}' has neither predicate nor combinator")]
    MissingPredicateOrCombinator { field: String },

    /// predicate와 combinator가 모두 지정됨
    #[error("node '{field}' has both predicate and combinator")]
    BothPredicateAndCombinator { field: String },

    /// 알 수 없는 필드명
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// 정규식 컴파일 실패
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}
