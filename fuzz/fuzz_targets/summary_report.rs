#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use acclog_core::pipeline::Reporter;
use acclog_core::types::Tick;
use acclog_log_pipeline::report::SummaryReport;
use acclog_log_pipeline::{ReportOptions, ReportTimeZone};

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// (초 오프셋, 바이트 수, 레이블 번호)
    ticks: Vec<(u16, u32, u8)>,
    start: u16,
    len: u16,
    slot_width: Option<u16>,
    terse: bool,
    keep_outside: bool,
}

fuzz_target!(|input: FuzzInput| {
    let mut ticks: Vec<Tick> = input
        .ticks
        .iter()
        .take(512)
        .map(|&(secs, size, label)| {
            Tick::new(i64::from(secs) * 1000, u64::from(size), Some(format!("l{label}")))
        })
        .collect();
    ticks.sort_by_key(|t| t.time);

    let start = i64::from(input.start) * 1000;
    let report = SummaryReport::new(ReportOptions {
        start,
        stop: start + i64::from(input.len) * 1000,
        slot_width: input.slot_width.map(u64::from),
        terse: input.terse,
        keep_outside: input.keep_outside,
        time_zone: ReportTimeZone::Utc,
        ..ReportOptions::default()
    });

    let mut out: Vec<String> = Vec::new();
    report
        .report(&ticks, &mut out)
        .expect("in-range slots never fail");
});
