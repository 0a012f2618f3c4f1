//! 로그 수집 모듈 -- access log 파일을 라인 단위로 읽습니다.
//!
//! # 수집 소스
//! - [`FileSource`]: 경로, 도메인 레이블, 압축 여부
//! - [`open_lines`]: 일반 / gzip 파일을 투명하게 라인 iterator로 변환
//!
//! # 아키텍처
//! 파일은 순서대로 하나씩 끝까지 읽습니다. 압축 해제는 라인 분리 앞단의
//! 필터일 뿐이며 스캔 결과에는 영향을 주지 않습니다.

pub mod file;

pub use file::{Lines, domain_label, is_gzip, lines, open_lines};

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::LogPipelineError;

/// 스캔 대상 파일 기술자
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    /// 파일 경로
    pub path: PathBuf,
    /// `domains` 카테고리에 쓰이는 레이블
    pub domain: String,
    /// gzip 압축 여부
    pub compressed: bool,
}

impl FileSource {
    /// 모든 속성을 직접 지정하여 생성합니다.
    pub fn new(path: impl Into<PathBuf>, domain: impl Into<String>, compressed: bool) -> Self {
        Self {
            path: path.into(),
            domain: domain.into(),
            compressed,
        }
    }

    /// 경로에서 도메인 레이블과 압축 여부를 추론합니다.
    ///
    /// 압축 여부는 `.gz` 확장자 또는 파일 앞 2바이트(gzip magic)로 판단합니다.
    pub fn detect(path: impl AsRef<Path>) -> Result<Self, LogPipelineError> {
        let path = path.as_ref();
        let compressed = is_gzip(path).map_err(|e| LogPipelineError::Collector {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(path, domain_label(path), compressed))
    }
}

impl fmt::Display for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())?;
        if self.compressed {
            f.write_str(" (gzip)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_keeps_fields() {
        let src = FileSource::new("/logs/example.com", "example.com", false);
        assert_eq!(src.domain, "example.com");
        assert!(!src.compressed);
        assert_eq!(src.to_string(), "/logs/example.com");
    }

    #[test]
    fn display_marks_gzip() {
        let src = FileSource::new("/logs/a.gz", "a", true);
        assert_eq!(src.to_string(), "/logs/a.gz (gzip)");
    }

    #[test]
    fn detect_missing_file_is_collector_error() {
        let err = FileSource::detect("/definitely/not/here.log").unwrap_err();
        assert!(matches!(err, LogPipelineError::Collector { .. }));
    }
}
