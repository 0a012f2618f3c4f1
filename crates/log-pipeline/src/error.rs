//! 로그 파이프라인 에러 타입
//!
//! [`LogPipelineError`]는 스캔과 리포트 과정에서 발생하는 모든 에러를 표현합니다.
//! `From<LogPipelineError> for AccessLogError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use acclog_core::error::{AccessLogError, ConfigError, ParseError, RangeError, RecognizerError};

/// 로그 파이프라인 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum LogPipelineError {
    /// 로그 라인 파싱 실패
    #[error("parse error: {path}:{line_no}: {reason}")]
    Parse {
        /// 파일 경로
        path: String,
        /// 1부터 시작하는 라인 번호
        line_no: usize,
        /// 실패 사유
        #[source]
        reason: ParseError,
    },

    /// 수집기 에러 (파일 열기, 압축 해제 등)
    #[error("collector error: {path}: {reason}")]
    Collector {
        /// 파일 경로
        path: String,
        /// 에러 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 리포트 생성 실패
    #[error("report error: {0}")]
    Report(#[from] AccessLogError),

    /// 타임 슬롯 범위 위반
    #[error("range error: {0}")]
    Range(#[from] RangeError),

    /// 필터 구성 실패
    #[error("recognizer error: {0}")]
    Recognizer(#[from] RecognizerError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LogPipelineError> for AccessLogError {
    fn from(err: LogPipelineError) -> Self {
        match err {
            LogPipelineError::Parse { reason, .. } => AccessLogError::Parse(reason),
            LogPipelineError::Collector { path, reason } => {
                AccessLogError::Io(std::io::Error::other(format!("{path}: {reason}")))
            }
            LogPipelineError::Config { field, reason } => {
                AccessLogError::Config(ConfigError::InvalidValue { field, reason })
            }
            LogPipelineError::Report(inner) => inner,
            LogPipelineError::Range(e) => AccessLogError::Range(e),
            LogPipelineError::Recognizer(e) => AccessLogError::Recognizer(e),
            LogPipelineError::Io(e) => AccessLogError::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display_has_location() {
        let err = LogPipelineError::Parse {
            path: "/var/log/apache2/access.log".to_owned(),
            line_no: 42,
            reason: ParseError::InvalidMonth {
                month: "Foo".to_owned(),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("access.log:42"));
        assert!(msg.contains("Foo"));
    }

    #[test]
    fn parse_error_converts_to_core_parse() {
        let err = LogPipelineError::Parse {
            path: "a.log".to_owned(),
            line_no: 1,
            reason: ParseError::NoFormatMatched {
                line: "x".to_owned(),
            },
        };
        let core: AccessLogError = err.into();
        assert!(matches!(core, AccessLogError::Parse(_)));
    }

    #[test]
    fn collector_error_converts_to_io() {
        let err = LogPipelineError::Collector {
            path: "/nope".to_owned(),
            reason: "permission denied".to_owned(),
        };
        let core: AccessLogError = err.into();
        assert!(matches!(core, AccessLogError::Io(_)));
        assert!(core.to_string().contains("/nope"));
    }

    #[test]
    fn report_error_unwraps_inner() {
        let inner = AccessLogError::Range(RangeError::ItemIndex { index: 3, len: 1 });
        let err = LogPipelineError::Report(inner);
        let core: AccessLogError = err.into();
        assert!(matches!(core, AccessLogError::Range(_)));
    }

    #[test]
    fn config_error_display() {
        let err = LogPipelineError::Config {
            field: "category".to_owned(),
            reason: "unknown category 'planets'".to_owned(),
        };
        assert!(err.to_string().contains("planets"));
    }
}
