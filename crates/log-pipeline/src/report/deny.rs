//! `deny from` 목록 리포트

use std::collections::BTreeSet;

use acclog_core::error::AccessLogError;
use acclog_core::pipeline::{LineSink, Reporter};
use acclog_core::types::Tick;

use super::ReportOptions;

/// 서로 다른 레이블마다 Apache `deny from` 지시문을 출력합니다.
///
/// 레이블은 사전순으로 정렬되며, 빈 입력은 아무것도 출력하지 않습니다.
#[derive(Debug, Clone)]
pub struct DenyReport {
    options: ReportOptions,
}

impl DenyReport {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }
}

impl Reporter for DenyReport {
    fn name(&self) -> &str {
        "deny"
    }

    fn report(&self, ticks: &[Tick], sink: &mut dyn LineSink) -> Result<(), AccessLogError> {
        let labels: BTreeSet<&str> = ticks.iter().filter_map(|t| t.item.as_deref()).collect();
        let shown = self.options.limited(labels.len());

        for label in labels.into_iter().take(shown) {
            sink.write_line(&format!("deny from {label}"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(time: i64, item: &str) -> Tick {
        Tick::new(time, 0, Some(item.to_owned()))
    }

    fn run(options: ReportOptions, ticks: &[Tick]) -> Vec<String> {
        let mut out = Vec::new();
        DenyReport::new(options).report(ticks, &mut out).unwrap();
        out
    }

    #[test]
    fn empty_input_prints_nothing() {
        assert!(run(ReportOptions::default(), &[]).is_empty());
    }

    #[test]
    fn duplicate_labels_collapse() {
        let out = run(
            ReportOptions::default(),
            &[t(1, "10.0.0.5"), t(2, "10.0.0.5")],
        );
        assert_eq!(out, vec!["deny from 10.0.0.5"]);
    }

    #[test]
    fn labels_sorted_and_limited() {
        let options = ReportOptions {
            limit: Some(2),
            ..ReportOptions::default()
        };
        let out = run(options, &[t(1, "c.example"), t(2, "a.example"), t(3, "b.example")]);
        assert_eq!(out, vec!["deny from a.example", "deny from b.example"]);
    }
}
