//! 리포트 엔진 -- 정렬된 tick 목록을 텍스트 라인으로 변환
//!
//! 네 가지 리포트가 [`Reporter`] trait을 구현합니다.
//!
//! | 리포트 | 빈 입력 |
//! |--------|---------|
//! | [`SummaryReport`] | verbose: 안내 문구 1줄, terse: 출력 없음 |
//! | [`DenyReport`] | 출력 없음 |
//! | [`DowntimeReport`] | 안내 문구 1줄 |
//! | [`RequestReport`] | 출력 없음 |

pub mod deny;
pub mod downtime;
pub mod format;
pub mod request;
pub mod summary;

pub use deny::DenyReport;
pub use downtime::DowntimeReport;
pub use format::ReportTimeZone;
pub use request::RequestReport;
pub use summary::SummaryReport;

use std::io;

use acclog_core::metrics as m;
use acclog_core::pipeline::{LineSink, Reporter};
use acclog_core::types::Tick;
use metrics::counter;
use tracing::debug;

use crate::category::{Category, ReportKind};
use crate::error::LogPipelineError;
use crate::timeslot::SortOrder;

/// 매칭 결과가 없을 때 출력하는 문구
pub const NO_ENTRIES: &str = "No entries match search criteria.";

/// downtime 리포트의 기본 슬롯 폭 (초)
pub const DEFAULT_DOWNTIME_SLOT_SECS: u64 = 60;

/// 리포트 공통 옵션
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// 집계 카테고리 (헤더 제목에 사용)
    pub category: Category,
    /// verbose 출력의 최대 아이템 수. `None`이면 제한 없음
    pub limit: Option<usize>,
    /// 슬롯 아이템 정렬 순서
    pub order: Option<SortOrder>,
    /// 슬롯 폭 (초). `None`이면 무한대
    pub slot_width: Option<u64>,
    /// 검색 구간 시작 (epoch ms)
    pub start: i64,
    /// 검색 구간 끝 (epoch ms)
    pub stop: i64,
    /// 기계 판독용 출력
    pub terse: bool,
    /// terse 출력의 필드 구분자
    pub field_sep: String,
    /// 검색 구간 밖의 tick을 before/after 합계로 출력
    pub keep_outside: bool,
    /// 시각 표시 기준
    pub time_zone: ReportTimeZone,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            category: Category::default(),
            limit: None,
            order: None,
            slot_width: None,
            start: 0,
            stop: 0,
            terse: false,
            field_sep: "\t".to_owned(),
            keep_outside: false,
            time_zone: ReportTimeZone::default(),
        }
    }
}

impl ReportOptions {
    /// `limit`을 적용한 개수
    pub fn limited(&self, len: usize) -> usize {
        self.limit.map_or(len, |limit| len.min(limit))
    }
}

/// 리포트 종류에 맞는 생성기를 만듭니다.
pub fn build(kind: ReportKind, options: ReportOptions) -> Box<dyn Reporter> {
    match kind {
        ReportKind::Summary => Box::new(SummaryReport::new(options)),
        ReportKind::Deny => Box::new(DenyReport::new(options)),
        ReportKind::Downtime => Box::new(DowntimeReport::new(options)),
        ReportKind::Request => Box::new(RequestReport::new()),
    }
}

/// 리포트를 실행하고 출력한 라인 수를 반환합니다.
pub fn run(
    kind: ReportKind,
    options: ReportOptions,
    ticks: &[Tick],
    sink: &mut dyn LineSink,
) -> Result<usize, LogPipelineError> {
    let reporter = build(kind, options);
    let mut counting = CountingSink::new(sink);
    reporter.report(ticks, &mut counting)?;

    let lines = counting.lines();
    counter!(m::REPORT_LINES_TOTAL, m::LABEL_REPORT => kind.as_str()).increment(lines as u64);
    debug!(report = reporter.name(), ticks = ticks.len(), lines, "report written");
    Ok(lines)
}

/// 기록한 라인 수를 세는 sink 래퍼
pub struct CountingSink<'a> {
    inner: &'a mut dyn LineSink,
    lines: usize,
}

impl<'a> CountingSink<'a> {
    pub fn new(inner: &'a mut dyn LineSink) -> Self {
        Self { inner, lines: 0 }
    }

    pub fn lines(&self) -> usize {
        self.lines
    }
}

impl LineSink for CountingSink<'_> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.inner.write_line(line)?;
        self.lines += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limited_respects_option() {
        let mut options = ReportOptions::default();
        assert_eq!(options.limited(10), 10);
        options.limit = Some(3);
        assert_eq!(options.limited(10), 3);
        assert_eq!(options.limited(2), 2);
    }

    #[test]
    fn run_counts_lines() {
        let ticks = vec![
            Tick::new(1000, 1, Some("a".to_owned())),
            Tick::new(2000, 1, Some("b".to_owned())),
        ];
        let mut out: Vec<String> = Vec::new();
        let lines = run(ReportKind::Request, ReportOptions::default(), &ticks, &mut out).unwrap();
        assert_eq!(lines, 2);
        assert_eq!(out, vec!["a", "b"]);
    }

    #[test]
    fn build_selects_reporter() {
        for (kind, name) in [
            (ReportKind::Summary, "summary"),
            (ReportKind::Deny, "deny"),
            (ReportKind::Downtime, "downtime"),
            (ReportKind::Request, "request"),
        ] {
            assert_eq!(build(kind, ReportOptions::default()).name(), name);
        }
    }
}
