//! 매칭된 원본 라인 출력

use acclog_core::error::AccessLogError;
use acclog_core::pipeline::{LineSink, Reporter};
use acclog_core::types::Tick;

/// 레이블이 있는 tick을 순서대로 그대로 출력합니다.
#[derive(Debug, Clone, Default)]
pub struct RequestReport;

impl RequestReport {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for RequestReport {
    fn name(&self) -> &str {
        "request"
    }

    fn report(&self, ticks: &[Tick], sink: &mut dyn LineSink) -> Result<(), AccessLogError> {
        for line in ticks.iter().filter_map(|t| t.item.as_deref()) {
            sink.write_line(line)?;
        }
        Ok(())
    }
}
