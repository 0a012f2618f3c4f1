#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`collector`]: 로그 파일 열기 (일반 / gzip) 및 라인 분리
//! - [`parser`]: Apache combined / common 형식 파서
//! - [`recognizer`]: 엔트리 필터 조건 트리
//! - [`category`]: 집계 레이블 추출
//! - [`timeslot`]: 타임 슬롯 집계 엔진
//! - [`report`]: summary / deny / downtime / request 리포트
//! - [`pipeline`]: 스캔 오케스트레이션
//! - [`config`]: 파이프라인 설정 (core 설정 변환)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! FileSource -> Lines -> AccessLogParser -> Recognizer -> Tick* -> sort -> Reporter -> LineSink
//!     |                                                                       |
//!  plain/gzip                                                     TimeSlot (summary)
//! ```

pub mod category;
pub mod config;
pub mod error;
pub mod pipeline;

pub mod collector;
pub mod parser;
pub mod recognizer;
pub mod report;
pub mod timeslot;

// --- 주요 타입 re-export ---

// 파이프라인
pub use pipeline::{ScanPipeline, ScanPipelineBuilder, ScanStats};

// 설정
pub use config::{ErrorPolicy, PipelineConfig, PipelineConfigBuilder};

// 에러
pub use error::LogPipelineError;

// 파서
pub use parser::{AccessLogParser, LogFormat};

// 필터
pub use recognizer::Recognizer;

// 집계
pub use category::{Category, ReportKind};
pub use timeslot::{SlotItem, SortOrder, TimeSlot};

// 리포트
pub use report::{ReportOptions, ReportTimeZone};

// 수집기
pub use collector::FileSource;
