//! 로그 파이프라인 설정
//!
//! [`PipelineConfig`]는 core의 [`AcclogConfig`]에서 문자열로 표현된
//! 리포트 / 스캔 설정을 타입이 있는 값으로 변환합니다.
//!
//! # 사용 예시
//! ```ignore
//! use acclog_core::config::AcclogConfig;
//! use acclog_log_pipeline::config::PipelineConfig;
//!
//! let core_config = AcclogConfig::default();
//! let config = PipelineConfig::from_core(&core_config)?;
//! ```

use std::fmt;
use std::str::FromStr;

use acclog_core::config::AcclogConfig;

use crate::category::{Category, ReportKind};
use crate::error::LogPipelineError;
use crate::report::{DEFAULT_DOWNTIME_SLOT_SECS, ReportOptions, ReportTimeZone};
use crate::timeslot::SortOrder;

/// 파싱 / 읽기 실패 시 동작
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// 스캔 전체를 중단 (기본값)
    #[default]
    Abort,
    /// 경고를 남기고 해당 라인 / 파일을 건너뜀
    Skip,
}

impl FromStr for ErrorPolicy {
    type Err = LogPipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            other => Err(LogPipelineError::Config {
                field: "policy".to_owned(),
                reason: format!("expected abort or skip, got '{other}'"),
            }),
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abort => f.write_str("abort"),
            Self::Skip => f.write_str("skip"),
        }
    }
}

/// 로그 파이프라인 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// 라인 파싱 실패 시 동작
    pub on_parse_error: ErrorPolicy,
    /// 파일 읽기 실패 시 동작
    pub on_io_error: ErrorPolicy,
    /// 요약 리포트 슬롯 폭 (초, 0 = 무한대)
    pub slot_width_secs: u64,
    /// downtime 리포트 슬롯 폭 (초)
    pub downtime_slot_secs: u64,
    /// verbose 출력 아이템 수 제한 (0 = 제한 없음)
    pub limit: usize,
    /// 슬롯 아이템 정렬 순서
    pub order: SortOrder,
    /// terse 출력 필드 구분자
    pub field_sep: String,
    /// 시각 표시 기준
    pub time_zone: ReportTimeZone,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            on_parse_error: ErrorPolicy::Abort,
            on_io_error: ErrorPolicy::Abort,
            slot_width_secs: 0,
            downtime_slot_secs: DEFAULT_DOWNTIME_SLOT_SECS,
            limit: 0,
            order: SortOrder::Count,
            field_sep: "\t".to_owned(),
            time_zone: ReportTimeZone::Local,
        }
    }
}

impl PipelineConfig {
    /// core 설정에서 파이프라인 설정을 생성합니다.
    pub fn from_core(core: &AcclogConfig) -> Result<Self, LogPipelineError> {
        let config = Self {
            on_parse_error: parse_field("scan.on_parse_error", &core.scan.on_parse_error)?,
            on_io_error: parse_field("scan.on_io_error", &core.scan.on_io_error)?,
            slot_width_secs: core.report.slot_width_secs,
            downtime_slot_secs: core.report.downtime_slot_secs,
            limit: core.report.limit,
            order: SortOrder::from_name(&core.report.order),
            field_sep: core.report.field_sep.clone(),
            time_zone: parse_field("report.time_zone", &core.report.time_zone)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogPipelineError> {
        if self.downtime_slot_secs == 0 {
            return Err(LogPipelineError::Config {
                field: "downtime_slot_secs".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        if self.field_sep.is_empty() {
            return Err(LogPipelineError::Config {
                field: "field_sep".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        Ok(())
    }

    /// 리포트 종류에 맞는 기본 리포트 옵션을 만듭니다.
    ///
    /// downtime 리포트는 `downtime_slot_secs`를 슬롯 폭으로 사용합니다.
    /// 검색 구간과 출력 모드는 호출자가 채웁니다.
    pub fn report_options(&self, kind: ReportKind, category: Category) -> ReportOptions {
        let slot_secs = match kind {
            ReportKind::Downtime => self.downtime_slot_secs,
            _ => self.slot_width_secs,
        };

        ReportOptions {
            category,
            limit: (self.limit > 0).then_some(self.limit),
            order: Some(self.order),
            slot_width: (slot_secs > 0).then_some(slot_secs),
            field_sep: self.field_sep.clone(),
            time_zone: self.time_zone,
            ..ReportOptions::default()
        }
    }
}

fn parse_field<T>(field: &str, value: &str) -> Result<T, LogPipelineError>
where
    T: FromStr<Err = LogPipelineError>,
{
    value.parse().map_err(|e| match e {
        LogPipelineError::Config { reason, .. } => LogPipelineError::Config {
            field: field.to_owned(),
            reason,
        },
        other => other,
    })
}

/// 파이프라인 설정 빌더
#[derive(Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 기존 설정에서 시작합니다.
    pub fn from_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn on_parse_error(mut self, policy: ErrorPolicy) -> Self {
        self.config.on_parse_error = policy;
        self
    }

    pub fn on_io_error(mut self, policy: ErrorPolicy) -> Self {
        self.config.on_io_error = policy;
        self
    }

    /// 요약 리포트 슬롯 폭(초)을 설정합니다. 0은 무한대입니다.
    pub fn slot_width_secs(mut self, secs: u64) -> Self {
        self.config.slot_width_secs = secs;
        self
    }

    pub fn downtime_slot_secs(mut self, secs: u64) -> Self {
        self.config.downtime_slot_secs = secs;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.config.limit = limit;
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.config.order = order;
        self
    }

    pub fn field_sep(mut self, sep: impl Into<String>) -> Self {
        self.config.field_sep = sep.into();
        self
    }

    pub fn time_zone(mut self, zone: ReportTimeZone) -> Self {
        self.config.time_zone = zone;
        self
    }

    /// 설정을 검증하고 `PipelineConfig`를 생성합니다.
    pub fn build(self) -> Result<PipelineConfig, LogPipelineError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        PipelineConfig::default().validate().unwrap();
    }

    #[test]
    fn from_core_default_matches_default() {
        let config = PipelineConfig::from_core(&AcclogConfig::default()).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn from_core_converts_strings() {
        let mut core = AcclogConfig::default();
        core.scan.on_parse_error = "skip".to_owned();
        core.report.order = "peak-bandwidth".to_owned();
        core.report.time_zone = "utc".to_owned();
        core.report.limit = 25;

        let config = PipelineConfig::from_core(&core).unwrap();
        assert_eq!(config.on_parse_error, ErrorPolicy::Skip);
        assert_eq!(config.on_io_error, ErrorPolicy::Abort);
        assert_eq!(config.order, SortOrder::PeakBandwidth);
        assert_eq!(config.time_zone, ReportTimeZone::Utc);
        assert_eq!(config.limit, 25);
    }

    #[test]
    fn from_core_names_bad_field() {
        let mut core = AcclogConfig::default();
        core.scan.on_io_error = "retry".to_owned();
        match PipelineConfig::from_core(&core).unwrap_err() {
            LogPipelineError::Config { field, .. } => assert_eq!(field, "scan.on_io_error"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn report_options_for_summary_and_downtime() {
        let config = PipelineConfigBuilder::new()
            .slot_width_secs(0)
            .downtime_slot_secs(300)
            .limit(10)
            .build()
            .unwrap();

        let summary = config.report_options(ReportKind::Summary, Category::Uris);
        assert_eq!(summary.slot_width, None);
        assert_eq!(summary.limit, Some(10));
        assert_eq!(summary.category, Category::Uris);
        assert_eq!(summary.order, Some(SortOrder::Count));

        let downtime = config.report_options(ReportKind::Downtime, Category::Ips);
        assert_eq!(downtime.slot_width, Some(300));
    }

    #[test]
    fn builder_rejects_invalid_config() {
        assert!(PipelineConfigBuilder::new().downtime_slot_secs(0).build().is_err());
        assert!(PipelineConfigBuilder::new().field_sep("").build().is_err());
    }

    #[test]
    fn error_policy_default_is_abort() {
        assert_eq!(ErrorPolicy::default(), ErrorPolicy::Abort);
        assert_eq!("skip".parse::<ErrorPolicy>().unwrap(), ErrorPolicy::Skip);
        assert_eq!(ErrorPolicy::Skip.to_string(), "skip");
    }
}
