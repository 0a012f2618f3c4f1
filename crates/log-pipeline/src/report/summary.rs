//! 요약 리포트
//!
//! tick 목록을 슬롯 폭 단위로 나누고 슬롯마다 레이블별 통계를 출력합니다.
//!
//! ```text
//! 입력 없음 ──> 안내 문구 (verbose) / 출력 없음 (terse)
//! 입력 있음 ──> before? ─> slot* ─> after? ─> grand totals?
//! ```
//!
//! 슬롯 경계는 첫 tick이 아니라 epoch 기준 슬롯 폭의 배수에 맞춥니다.
//! tick이 하나도 없는 경계 구간은 건너뜁니다.

use acclog_core::error::{AccessLogError, RangeError};
use acclog_core::pipeline::{LineSink, Reporter};
use acclog_core::types::Tick;

use super::format::{apache_time, bytes_string, epoch_secs, rjust};
use super::{NO_ENTRIES, ReportOptions};
use crate::timeslot::{SlotItem, TimeSlot};

const TOTALS: &str = "Totals";
const BEFORE: &str = "Before";
const AFTER: &str = "After";
const GRAND_TOTALS: &str = "Grand Totals";

/// 요약 리포트 생성기
#[derive(Debug, Clone)]
pub struct SummaryReport {
    options: ReportOptions,
}

/// 슬롯으로 나누기 전의 tick 배열 구간
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    /// 검색 시작 이전 tick 구간
    pub before: Option<(usize, usize)>,
    /// 검색 구간 안의 tick 구간
    pub core: Option<(usize, usize)>,
    /// 검색 끝 이후 tick 구간
    pub after: Option<(usize, usize)>,
}

impl SummaryReport {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// 검색 구간 기준으로 tick 배열을 before / core / after로 나눕니다.
    ///
    /// `keep_outside`가 꺼져 있으면 전체 배열이 core입니다.
    pub fn partition(&self, ticks: &[Tick]) -> Partition {
        let len = ticks.len();
        if len == 0 {
            return Partition {
                before: None,
                core: None,
                after: None,
            };
        }
        if !self.options.keep_outside {
            return Partition {
                before: None,
                core: Some((0, len - 1)),
                after: None,
            };
        }

        let first = ticks.partition_point(|t| t.time < self.options.start);
        let end = ticks.partition_point(|t| t.time <= self.options.stop);

        Partition {
            before: (first > 0).then(|| (0, first - 1)),
            core: (first < end).then(|| (first, end - 1)),
            after: (end < len).then(|| (end, len - 1)),
        }
    }

    /// core 구간이 차지할 슬롯 수
    ///
    /// 슬롯 폭이 무한대이면 1, core가 비어 있으면 0입니다. 그 외에는
    /// `ceil(구간 길이(초) / 슬롯 폭)`이며 최소 1입니다.
    pub fn slot_count(&self, ticks: &[Tick], core: Option<(usize, usize)>) -> u64 {
        let Some((first, last)) = core else {
            return 0;
        };
        let Some(width) = self.options.slot_width.filter(|w| *w > 0) else {
            return 1;
        };
        if first == last {
            return 1;
        }

        let duration_ms = u64::try_from(ticks[last].time - ticks[first].time).unwrap_or(0);
        duration_ms.div_ceil(1000).div_ceil(width).max(1)
    }

    /// core 구간을 epoch 정렬된 슬롯 경계로 나눕니다. 빈 경계 구간은 만들지 않습니다.
    fn slots<'a>(
        &self,
        ticks: &'a [Tick],
        (first, last): (usize, usize),
        width_secs: u64,
    ) -> Result<Vec<TimeSlot<'a>>, RangeError> {
        let width_ms = i64::try_from(width_secs.saturating_mul(1000)).unwrap_or(i64::MAX);
        let mut slots = Vec::new();
        let mut idx = first;

        while idx <= last {
            let slot_start = ticks[idx].time.div_euclid(width_ms) * width_ms;
            let slot_stop = slot_start.saturating_add(width_ms);
            let in_slot = ticks[idx..=last].partition_point(|t| t.time < slot_stop);
            let end = idx + in_slot - 1;

            let mut slot =
                TimeSlot::new(ticks, idx, end, slot_start, slot_stop)?.with_order(self.options.order);
            slot.scan();
            slots.push(slot);
            idx = end + 1;
        }

        Ok(slots)
    }

    fn totals_only<'a>(
        &self,
        ticks: &'a [Tick],
        (first, last): (usize, usize),
        start: i64,
        stop: i64,
    ) -> Result<TimeSlot<'a>, RangeError> {
        let mut slot = TimeSlot::new(ticks, first, last, start, stop)?;
        slot.total_scan();
        Ok(slot)
    }

    fn write_slot(&self, slot: &TimeSlot<'_>, sink: &mut dyn LineSink) -> Result<(), AccessLogError> {
        let Some(totals) = slot.totals() else {
            return Ok(());
        };

        if self.options.terse {
            for item in slot.items() {
                sink.write_line(&self.terse_row(slot, item, &item.title))?;
            }
            sink.write_line(&self.terse_row(slot, totals, TOTALS))?;
            return Ok(());
        }

        sink.write_line("")?;
        sink.write_line(&format!(
            "{} from {} to {}",
            self.options.category.title(),
            apache_time(slot.start(), self.options.time_zone),
            apache_time(slot.stop(), self.options.time_zone),
        ))?;
        sink.write_line(&column_header())?;

        let shown = self.options.limited(slot.items().len());
        for item in &slot.items()[..shown] {
            sink.write_line(&verbose_row(item, &item.title))?;
        }
        if slot.items().len() != 1 {
            sink.write_line(&verbose_row(totals, TOTALS))?;
        }
        Ok(())
    }

    fn write_totals(
        &self,
        slot: &TimeSlot<'_>,
        title: &str,
        header: String,
        sink: &mut dyn LineSink,
    ) -> Result<(), AccessLogError> {
        let Some(totals) = slot.totals() else {
            return Ok(());
        };

        if self.options.terse {
            sink.write_line(&self.terse_row(slot, totals, title))?;
        } else {
            sink.write_line(&header)?;
            sink.write_line(&verbose_row(totals, TOTALS))?;
        }
        Ok(())
    }

    fn terse_row(&self, slot: &TimeSlot<'_>, item: &SlotItem, title: &str) -> String {
        [
            epoch_secs(slot.start()).to_string(),
            epoch_secs(slot.stop()).to_string(),
            title.to_owned(),
            item.count.to_string(),
            item.bandwidth.to_string(),
            item.peak_count.to_string(),
            item.peak_bandwidth.to_string(),
            epoch_secs(item.first).to_string(),
            epoch_secs(item.last).to_string(),
        ]
        .join(&self.options.field_sep)
    }

    fn time(&self, millis: i64) -> String {
        apache_time(millis, self.options.time_zone)
    }
}

fn column_header() -> String {
    format!(
        "{} {} {} {} Item",
        rjust("Count", 7),
        rjust("Peak", 5),
        rjust("Bandwidth", 10),
        rjust("PeakBW", 10),
    )
}

fn verbose_row(item: &SlotItem, title: &str) -> String {
    format!(
        "{} {} {} {} {}",
        rjust(item.count, 7),
        rjust(item.peak_count, 5),
        bytes_string(item.bandwidth),
        bytes_string(item.peak_bandwidth),
        title,
    )
}

impl Reporter for SummaryReport {
    fn name(&self) -> &str {
        "summary"
    }

    fn report(&self, ticks: &[Tick], sink: &mut dyn LineSink) -> Result<(), AccessLogError> {
        if ticks.is_empty() {
            if !self.options.terse {
                sink.write_line(NO_ENTRIES)?;
            }
            return Ok(());
        }

        let opts = &self.options;
        let partition = self.partition(ticks);
        let slot_count = self.slot_count(ticks, partition.core);

        if let Some(range) = partition.before {
            let slot = self.totals_only(ticks, range, ticks[range.0].time, opts.start)?;
            let header = format!("{BEFORE} {}", self.time(opts.start));
            self.write_totals(&slot, BEFORE, header, sink)?;
        }

        if let Some(core) = partition.core {
            match opts.slot_width.filter(|w| *w > 0) {
                Some(width) if slot_count > 1 => {
                    for slot in self.slots(ticks, core, width)? {
                        self.write_slot(&slot, sink)?;
                    }
                }
                _ => {
                    let mut slot = TimeSlot::new(ticks, core.0, core.1, opts.start, opts.stop)?
                        .with_order(opts.order);
                    slot.scan();
                    self.write_slot(&slot, sink)?;
                }
            }
        }

        if let Some(range) = partition.after {
            let slot = self.totals_only(ticks, range, opts.stop, ticks[range.1].time)?;
            let header = format!("{AFTER} {}", self.time(opts.stop));
            self.write_totals(&slot, AFTER, header, sink)?;
        }

        if let Some(core) = partition.core.filter(|_| slot_count > 1) {
            let slot = self.totals_only(ticks, core, opts.start, opts.stop)?;
            let header = format!(
                "{GRAND_TOTALS} from {} to {}",
                self.time(opts.start),
                self.time(opts.stop)
            );
            self.write_totals(&slot, GRAND_TOTALS, header, sink)?;
        }

        Ok(())
    }
}
