//! 메트릭 상수
//!
//! 모든 메트릭의 이름을 중앙에서 정의합니다.
//! 스캐너는 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//! 레코더가 설치되지 않으면 모든 호출은 no-op입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `acclog_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(acclog_core::metrics::LINES_SCANNED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 파서 형식 레이블 키 (combined, common)
pub const LABEL_PARSER_FORMAT: &str = "format";

/// 리포트 종류 레이블 키 (summary, deny, downtime, request)
pub const LABEL_REPORT: &str = "report";

// ─── 스캔 메트릭 ───────────────────────────────────────────────────

/// 읽은 전체 라인 수 (counter)
pub const LINES_SCANNED_TOTAL: &str = "acclog_lines_scanned_total";

/// 필터에 매칭된 라인 수 (counter)
pub const LINES_MATCHED_TOTAL: &str = "acclog_lines_matched_total";

/// 파싱 에러 수 (counter)
pub const PARSE_ERRORS_TOTAL: &str = "acclog_parse_errors_total";

/// 스캔을 마친 파일 수 (counter)
pub const FILES_SCANNED_TOTAL: &str = "acclog_files_scanned_total";

/// 읽기에 실패한 파일 수 (counter)
pub const FILES_FAILED_TOTAL: &str = "acclog_files_failed_total";

// ─── 리포트 메트릭 ─────────────────────────────────────────────────

/// 출력된 리포트 라인 수 (counter, label: report)
pub const REPORT_LINES_TOTAL: &str = "acclog_report_lines_total";
