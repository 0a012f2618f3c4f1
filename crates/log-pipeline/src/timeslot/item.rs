//! 슬롯 내 레이블별 누적기

use acclog_core::types::Tick;

/// 레이블이 없는 tick에 붙는 제목
pub const UNLABELED: &str = "-";

/// 한 타임 슬롯 안에서 레이블 하나의 통계
///
/// 같은 밀리초 타임스탬프를 가진 연속 tick을 하나의 burst로 보고,
/// burst 크기의 최댓값을 peak 값으로 기록합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotItem {
    /// 레이블
    pub title: String,
    /// 누적 요청 수
    pub count: u64,
    /// 누적 바이트 수
    pub bandwidth: u64,
    /// 현재 burst의 요청 수
    pub current_count: u64,
    /// 현재 burst의 바이트 수
    pub current_bandwidth: u64,
    /// burst 요청 수의 최댓값
    pub peak_count: u64,
    /// burst 바이트 수의 최댓값
    pub peak_bandwidth: u64,
    /// 가장 이른 tick 시각 (ms)
    pub first: i64,
    /// 가장 늦은 tick 시각 (ms)
    pub last: i64,
    /// 마지막으로 방문한 tick 시각 (ms)
    pub last_time: i64,
}

impl SlotItem {
    /// 첫 tick으로 누적기를 생성합니다.
    pub fn new(title: impl Into<String>, tick: &Tick) -> Self {
        Self {
            title: title.into(),
            count: 1,
            bandwidth: tick.size,
            current_count: 1,
            current_bandwidth: tick.size,
            peak_count: 1,
            peak_bandwidth: tick.size,
            first: tick.time,
            last: tick.time,
            last_time: tick.time,
        }
    }

    /// tick 하나를 반영합니다.
    pub fn inc(&mut self, tick: &Tick) {
        self.count += 1;
        self.bandwidth = self.bandwidth.saturating_add(tick.size);

        if tick.time == self.last_time {
            self.current_count += 1;
            self.current_bandwidth = self.current_bandwidth.saturating_add(tick.size);
        } else {
            self.current_count = 1;
            self.current_bandwidth = tick.size;
            self.last_time = tick.time;
        }

        self.peak_count = self.peak_count.max(self.current_count);
        self.peak_bandwidth = self.peak_bandwidth.max(self.current_bandwidth);
        self.first = self.first.min(tick.time);
        self.last = self.last.max(tick.time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(time: i64, size: u64) -> Tick {
        Tick::new(time, size, Some("10.0.0.1".to_owned()))
    }

    #[test]
    fn new_item_seeds_from_tick() {
        let item = SlotItem::new("10.0.0.1", &tick(1000, 300));
        assert_eq!(item.count, 1);
        assert_eq!(item.bandwidth, 300);
        assert_eq!(item.peak_count, 1);
        assert_eq!(item.peak_bandwidth, 300);
        assert_eq!(item.first, 1000);
        assert_eq!(item.last, 1000);
    }

    #[test]
    fn same_time_extends_burst() {
        let mut item = SlotItem::new("10.0.0.1", &tick(1000, 100));
        item.inc(&tick(1000, 50));
        item.inc(&tick(1000, 25));
        assert_eq!(item.count, 3);
        assert_eq!(item.bandwidth, 175);
        assert_eq!(item.current_count, 3);
        assert_eq!(item.peak_count, 3);
        assert_eq!(item.peak_bandwidth, 175);
    }

    #[test]
    fn new_time_resets_burst_but_not_peak() {
        let mut item = SlotItem::new("10.0.0.1", &tick(1000, 100));
        item.inc(&tick(1000, 100));
        item.inc(&tick(2000, 10));
        assert_eq!(item.current_count, 1);
        assert_eq!(item.current_bandwidth, 10);
        assert_eq!(item.peak_count, 2);
        assert_eq!(item.peak_bandwidth, 200);
        assert_eq!(item.last_time, 2000);
        assert_eq!(item.last, 2000);
    }

    #[test]
    fn larger_single_tick_raises_peak_bandwidth() {
        let mut item = SlotItem::new("10.0.0.1", &tick(1000, 10));
        item.inc(&tick(2000, 5000));
        assert_eq!(item.peak_count, 1);
        assert_eq!(item.peak_bandwidth, 5000);
    }
}
