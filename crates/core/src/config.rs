//! 설정 관리 — acclog.toml 파싱 및 런타임 설정
//!
//! [`AcclogConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`ACCLOG_REPORT_LIMIT=20` 형식)
//! 3. 설정 파일 (`acclog.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), acclog_core::error::AccessLogError> {
//! use acclog_core::config::AcclogConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = AcclogConfig::load("acclog.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = AcclogConfig::parse("[report]\nlimit = 20")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AccessLogError, ConfigError};

/// acclog 통합 설정
///
/// `acclog.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AcclogConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 리포트 설정
    #[serde(default)]
    pub report: ReportConfig,
    /// 스캔 설정
    #[serde(default)]
    pub scan: ScanConfig,
}

impl AcclogConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, AccessLogError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일이 없으면 기본값을 사용합니다.
    ///
    /// 파일이 존재하지만 형식이 잘못된 경우에는 에러를 반환합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, AccessLogError> {
        let path = path.as_ref();
        match Self::load(path).await {
            Err(AccessLogError::Config(ConfigError::FileNotFound { .. })) => {
                debug!(path = %path.display(), "config file not found, using defaults");
                let mut config = Self::default();
                config.apply_env_overrides();
                config.validate()?;
                Ok(config)
            }
            other => other,
        }
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, AccessLogError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AccessLogError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                AccessLogError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, AccessLogError> {
        toml::from_str(toml_str).map_err(|e| {
            AccessLogError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `ACCLOG_{SECTION}_{FIELD}`
    /// 예: `ACCLOG_REPORT_TIME_ZONE=utc`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "ACCLOG_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "ACCLOG_GENERAL_LOG_FORMAT");

        // Report
        override_u64(
            &mut self.report.slot_width_secs,
            "ACCLOG_REPORT_SLOT_WIDTH_SECS",
        );
        override_u64(
            &mut self.report.downtime_slot_secs,
            "ACCLOG_REPORT_DOWNTIME_SLOT_SECS",
        );
        override_usize(&mut self.report.limit, "ACCLOG_REPORT_LIMIT");
        override_string(&mut self.report.order, "ACCLOG_REPORT_ORDER");
        override_string(&mut self.report.field_sep, "ACCLOG_REPORT_FIELD_SEP");
        override_string(&mut self.report.time_zone, "ACCLOG_REPORT_TIME_ZONE");

        // Scan
        override_string(&mut self.scan.on_parse_error, "ACCLOG_SCAN_ON_PARSE_ERROR");
        override_string(&mut self.scan.on_io_error, "ACCLOG_SCAN_ON_IO_ERROR");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), AccessLogError> {
        check_one_of(
            "general.log_level",
            &self.general.log_level,
            &["trace", "debug", "info", "warn", "error"],
        )?;
        check_one_of(
            "general.log_format",
            &self.general.log_format,
            &["json", "pretty"],
        )?;
        check_one_of(
            "report.order",
            &self.report.order,
            &[
                "title",
                "item",
                "count",
                "bandwidth",
                "peak",
                "peak-bandwidth",
            ],
        )?;
        check_one_of("report.time_zone", &self.report.time_zone, &["local", "utc"])?;
        check_one_of(
            "scan.on_parse_error",
            &self.scan.on_parse_error,
            &["abort", "skip"],
        )?;
        check_one_of("scan.on_io_error", &self.scan.on_io_error, &["abort", "skip"])?;

        if self.report.downtime_slot_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "report.downtime_slot_secs".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        if self.report.field_sep.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "report.field_sep".to_owned(),
                reason: "separator must not be empty".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 리포트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// 타임 슬롯 폭 (초, 0이면 무한대 = 단일 슬롯)
    pub slot_width_secs: u64,
    /// downtime 리포트의 슬롯 폭 (초)
    pub downtime_slot_secs: u64,
    /// 슬롯당 출력할 최대 아이템 수 (0이면 제한 없음)
    pub limit: usize,
    /// 정렬 기준 (title, item, count, bandwidth, peak, peak-bandwidth)
    pub order: String,
    /// terse 모드 필드 구분자
    pub field_sep: String,
    /// 타임스탬프 출력 시간대 (local, utc)
    pub time_zone: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            slot_width_secs: 0,
            downtime_slot_secs: 60,
            limit: 0,
            order: "count".to_owned(),
            field_sep: "\t".to_owned(),
            time_zone: "local".to_owned(),
        }
    }
}

/// 스캔 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// 파싱 실패 시 정책 (abort, skip)
    pub on_parse_error: String,
    /// 파일 읽기 실패 시 정책 (abort, skip)
    pub on_io_error: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            on_parse_error: "abort".to_owned(),
            on_io_error: "abort".to_owned(),
        }
    }
}

fn check_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), AccessLogError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: format!("must be one of: {}", allowed.join(", ")),
    }
    .into())
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
