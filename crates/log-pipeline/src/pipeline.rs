//! 스캔 오케스트레이션 -- 파일 읽기, 파싱, 필터링, tick 생성의 전체 흐름을 관리합니다.
//!
//! # 내부 아키텍처
//! ```text
//! FileSource -> open_lines -> LogParser -> Recognizer -> 시간 구간 -> Tick
//!                                                                     |
//!                              파일별 tick 목록 이어붙이기 -> 시간순 안정 정렬
//! ```
//!
//! 파일은 순서대로 하나씩 끝까지 읽습니다. 모든 파일을 읽은 뒤 한 번만 정렬하므로
//! 리포트는 항상 시간순으로 정렬된 tick 목록을 받습니다.

use std::io;

use metrics::counter;
use tracing::{debug, info, warn};

use acclog_core::metrics as m;
use acclog_core::pipeline::LogParser;
use acclog_core::types::Tick;

use crate::category::{Category, ReportKind};
use crate::collector::{FileSource, open_lines};
use crate::config::{ErrorPolicy, PipelineConfig};
use crate::error::LogPipelineError;
use crate::parser::AccessLogParser;
use crate::recognizer::Recognizer;

/// 스캔 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// 끝까지 읽은 파일 수
    pub files_scanned: u64,
    /// 읽기에 실패해 건너뛴 파일 수
    pub files_failed: u64,
    /// 읽은 라인 수
    pub lines_scanned: u64,
    /// 필터와 시간 구간을 통과한 라인 수
    pub lines_matched: u64,
    /// 파싱에 실패한 라인 수
    pub parse_errors: u64,
}

/// 스캔 파이프라인
///
/// 필터는 빌드 시점에 완성되며 스캔 중에는 읽기 전용입니다.
///
/// # 사용 예시
/// ```ignore
/// use acclog_log_pipeline::{ScanPipelineBuilder, collector::FileSource};
///
/// let mut scanner = ScanPipelineBuilder::new()
///     .recognizer(recognizer)
///     .window(start_ms, stop_ms)
///     .build()?;
///
/// let ticks = scanner.scan_files(&[FileSource::detect("/var/log/apache2/access.log")?])?;
/// ```
pub struct ScanPipeline {
    parser: Box<dyn LogParser>,
    recognizer: Recognizer,
    kind: ReportKind,
    category: Category,
    start: i64,
    stop: i64,
    keep_outside: bool,
    on_parse_error: ErrorPolicy,
    on_io_error: ErrorPolicy,
    stats: ScanStats,
}

impl ScanPipeline {
    /// 누적 스캔 통계
    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    pub fn recognizer(&self) -> &Recognizer {
        &self.recognizer
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    /// 메모리상의 라인 목록을 스캔합니다.
    ///
    /// `path`는 에러 메시지에만 사용됩니다.
    pub fn scan_lines<I, S>(
        &mut self,
        lines: I,
        path: &str,
        domain: &str,
    ) -> Result<Vec<Tick>, LogPipelineError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scan_iter(lines.into_iter().map(|l| Ok(l.into())), path, domain)
    }

    /// 파일 하나를 끝까지 스캔합니다. 결과는 파일 내 순서 그대로입니다.
    pub fn scan_source(&mut self, source: &FileSource) -> Result<Vec<Tick>, LogPipelineError> {
        let lines = open_lines(source)?;
        let path = source.path.display().to_string();
        self.scan_iter(lines, &path, &source.domain)
    }

    /// 파일 목록을 순서대로 스캔하고 전체 tick을 시간순으로 정렬해 반환합니다.
    ///
    /// 같은 시각의 tick은 파일 순서, 라인 순서를 유지합니다.
    pub fn scan_files(&mut self, sources: &[FileSource]) -> Result<Vec<Tick>, LogPipelineError> {
        let mut ticks = Vec::new();

        for source in sources {
            match self.scan_source(source) {
                Ok(mut file_ticks) => {
                    self.stats.files_scanned += 1;
                    counter!(m::FILES_SCANNED_TOTAL).increment(1);
                    debug!(source = %source, ticks = file_ticks.len(), "file scanned");
                    ticks.append(&mut file_ticks);
                }
                Err(e) if is_io_failure(&e) && self.on_io_error == ErrorPolicy::Skip => {
                    self.stats.files_failed += 1;
                    counter!(m::FILES_FAILED_TOTAL).increment(1);
                    warn!(source = %source, error = %e, "skipping unreadable file");
                }
                Err(e) => {
                    counter!(m::FILES_FAILED_TOTAL).increment(1);
                    return Err(e);
                }
            }
        }

        ticks.sort_by_key(|t| t.time);

        info!(
            files = self.stats.files_scanned,
            failed = self.stats.files_failed,
            lines = self.stats.lines_scanned,
            matched = self.stats.lines_matched,
            parse_errors = self.stats.parse_errors,
            "scan complete"
        );
        Ok(ticks)
    }

    fn scan_iter<I>(
        &mut self,
        lines: I,
        path: &str,
        domain: &str,
    ) -> Result<Vec<Tick>, LogPipelineError>
    where
        I: Iterator<Item = io::Result<String>>,
    {
        let mut ticks = Vec::new();
        let mut scanned = 0u64;
        let mut matched = 0u64;

        for (idx, line) in lines.enumerate() {
            let line = line.map_err(|e| LogPipelineError::Collector {
                path: path.to_owned(),
                reason: format!("read failed at line {}: {e}", idx + 1),
            })?;
            scanned += 1;

            let entry = match self.parser.parse(&line) {
                Ok(entry) => entry,
                Err(reason) => {
                    self.stats.parse_errors += 1;
                    counter!(
                        m::PARSE_ERRORS_TOTAL,
                        m::LABEL_PARSER_FORMAT => self.parser.format_name().to_owned()
                    )
                    .increment(1);

                    if self.on_parse_error == ErrorPolicy::Skip {
                        warn!(path, line_no = idx + 1, error = %reason, "skipping invalid line");
                        continue;
                    }
                    self.flush_line_counts(scanned, matched);
                    return Err(LogPipelineError::Parse {
                        path: path.to_owned(),
                        line_no: idx + 1,
                        reason,
                    });
                }
            };

            if !self.recognizer.matches(&entry) {
                continue;
            }
            if !self.keep_outside && (entry.time < self.start || entry.time > self.stop) {
                continue;
            }

            matched += 1;
            let label = self.kind.label(self.category, &entry, domain, &line);
            ticks.push(Tick::new(entry.time, entry.size, label));
        }

        self.flush_line_counts(scanned, matched);
        Ok(ticks)
    }

    fn flush_line_counts(&mut self, scanned: u64, matched: u64) {
        self.stats.lines_scanned += scanned;
        self.stats.lines_matched += matched;
        counter!(m::LINES_SCANNED_TOTAL).increment(scanned);
        counter!(m::LINES_MATCHED_TOTAL).increment(matched);
    }
}

fn is_io_failure(err: &LogPipelineError) -> bool {
    matches!(
        err,
        LogPipelineError::Collector { .. } | LogPipelineError::Io(_)
    )
}

/// 스캔 파이프라인 빌더
pub struct ScanPipelineBuilder {
    parser: Box<dyn LogParser>,
    recognizer: Recognizer,
    kind: ReportKind,
    category: Category,
    start: i64,
    stop: i64,
    keep_outside: bool,
    on_parse_error: ErrorPolicy,
    on_io_error: ErrorPolicy,
}

impl ScanPipelineBuilder {
    /// 새 빌더를 생성합니다. 기본 검색 구간은 제한이 없습니다.
    pub fn new() -> Self {
        Self {
            parser: Box::new(AccessLogParser::new()),
            recognizer: Recognizer::new(),
            kind: ReportKind::default(),
            category: Category::default(),
            start: i64::MIN,
            stop: i64::MAX,
            keep_outside: false,
            on_parse_error: ErrorPolicy::Abort,
            on_io_error: ErrorPolicy::Abort,
        }
    }

    /// 파이프라인 설정에서 에러 정책을 가져옵니다.
    pub fn config(mut self, config: &PipelineConfig) -> Self {
        self.on_parse_error = config.on_parse_error;
        self.on_io_error = config.on_io_error;
        self
    }

    /// 로그 파서를 교체합니다.
    pub fn parser(mut self, parser: Box<dyn LogParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn recognizer(mut self, recognizer: Recognizer) -> Self {
        self.recognizer = recognizer;
        self
    }

    pub fn report_kind(mut self, kind: ReportKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// 검색 구간 `[start, stop]` (epoch ms, 양끝 포함)
    pub fn window(mut self, start: i64, stop: i64) -> Self {
        self.start = start;
        self.stop = stop;
        self
    }

    /// 구간 밖의 엔트리도 tick으로 남깁니다.
    pub fn keep_outside(mut self, keep: bool) -> Self {
        self.keep_outside = keep;
        self
    }

    pub fn on_parse_error(mut self, policy: ErrorPolicy) -> Self {
        self.on_parse_error = policy;
        self
    }

    pub fn on_io_error(mut self, policy: ErrorPolicy) -> Self {
        self.on_io_error = policy;
        self
    }

    /// 스캔 파이프라인을 빌드합니다.
    pub fn build(self) -> Result<ScanPipeline, LogPipelineError> {
        if self.start > self.stop {
            return Err(LogPipelineError::Config {
                field: "window".to_owned(),
                reason: format!("start {} is after stop {}", self.start, self.stop),
            });
        }

        Ok(ScanPipeline {
            parser: self.parser,
            recognizer: self.recognizer,
            kind: self.kind,
            category: self.category,
            start: self.start,
            stop: self.stop,
            keep_outside: self.keep_outside,
            on_parse_error: self.on_parse_error,
            on_io_error: self.on_io_error,
            stats: ScanStats::default(),
        })
    }
}

impl Default for ScanPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
