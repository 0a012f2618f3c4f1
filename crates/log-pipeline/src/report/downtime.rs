//! 다운타임 리포트
//!
//! 첫 tick이 속한 슬롯부터 검색 구간 끝까지 고정 폭 슬롯을 빠짐없이 출력합니다.
//! 요청이 없던 슬롯은 바이트 열에 `-`를 표시합니다.

use acclog_core::error::AccessLogError;
use acclog_core::pipeline::{LineSink, Reporter};
use acclog_core::types::Tick;

use super::format::{apache_time, bytes_string, rjust};
use super::{DEFAULT_DOWNTIME_SLOT_SECS, NO_ENTRIES, ReportOptions};

#[derive(Debug, Clone)]
pub struct DowntimeReport {
    options: ReportOptions,
}

impl DowntimeReport {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    fn width_ms(&self) -> i64 {
        let secs = self
            .options
            .slot_width
            .filter(|w| *w > 0)
            .unwrap_or(DEFAULT_DOWNTIME_SLOT_SECS);
        i64::try_from(secs.saturating_mul(1000)).unwrap_or(i64::MAX)
    }

    fn row(&self, slot_start: i64, count: usize, bandwidth: u64) -> String {
        let bytes = if count == 0 {
            "-".to_owned()
        } else {
            bytes_string(bandwidth)
        };
        let fields = [
            apache_time(slot_start, self.options.time_zone),
            rjust(count, 7),
            bytes,
        ];
        if self.options.terse {
            fields.join(&self.options.field_sep)
        } else {
            fields.join("  ")
        }
    }
}

impl Reporter for DowntimeReport {
    fn name(&self) -> &str {
        "downtime"
    }

    fn report(&self, ticks: &[Tick], sink: &mut dyn LineSink) -> Result<(), AccessLogError> {
        let Some(first) = ticks.first() else {
            sink.write_line(NO_ENTRIES)?;
            return Ok(());
        };

        let width = self.width_ms();
        let mut slot_start = first.time.div_euclid(width) * width;
        let mut idx = 0;

        while slot_start <= self.options.stop {
            let slot_stop = slot_start.saturating_add(width);
            let in_slot = ticks[idx..].partition_point(|t| t.time < slot_stop);
            let bandwidth = ticks[idx..idx + in_slot]
                .iter()
                .fold(0u64, |acc, t| acc.saturating_add(t.size));

            sink.write_line(&self.row(slot_start, in_slot, bandwidth))?;

            idx += in_slot;
            if slot_stop == i64::MAX {
                break;
            }
            slot_start = slot_stop;
        }
        Ok(())
    }
}
