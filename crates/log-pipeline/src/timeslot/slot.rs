//! 타임 슬롯 -- 정렬된 tick 배열의 연속 구간에 대한 집계

use std::collections::HashMap;

use acclog_core::error::RangeError;
use acclog_core::types::Tick;

use super::item::{SlotItem, UNLABELED};
use super::SortOrder;

/// tick 배열의 `[first, last]` 구간과 그 경계 시각
///
/// `start`/`stop`은 슬롯 경계이며 실제 tick 시각과 다를 수 있습니다.
#[derive(Debug, Clone)]
pub struct TimeSlot<'a> {
    ticks: &'a [Tick],
    first: usize,
    last: usize,
    start: i64,
    stop: i64,
    order: Option<SortOrder>,
    items: Vec<SlotItem>,
    index: HashMap<String, usize>,
    totals: Option<SlotItem>,
}

impl<'a> TimeSlot<'a> {
    /// 빈 슬롯을 생성합니다.
    ///
    /// `first > last` 이거나 `last`가 배열 밖이면 [`RangeError::SlotBounds`]입니다.
    pub fn new(
        ticks: &'a [Tick],
        first: usize,
        last: usize,
        start: i64,
        stop: i64,
    ) -> Result<Self, RangeError> {
        if first > last || last >= ticks.len() {
            return Err(RangeError::SlotBounds {
                first,
                last,
                len: ticks.len(),
            });
        }

        Ok(Self {
            ticks,
            first,
            last,
            start,
            stop,
            order: None,
            items: Vec::new(),
            index: HashMap::new(),
            totals: None,
        })
    }

    /// 스캔 후 적용할 정렬 순서를 지정합니다.
    pub fn with_order(mut self, order: Option<SortOrder>) -> Self {
        self.order = order;
        self
    }

    /// 구간 전체를 레이블별 누적기와 totals로 집계합니다.
    ///
    /// 이전 스캔 결과는 버립니다.
    pub fn scan(&mut self) {
        self.reset();
        let ticks = self.ticks;
        for tick in &ticks[self.first..=self.last] {
            self.add_total(tick);

            let title = tick.item.as_deref().unwrap_or(UNLABELED);
            match self.index.get(title).copied() {
                Some(idx) => self.items[idx].inc(tick),
                None => {
                    self.index.insert(title.to_owned(), self.items.len());
                    self.items.push(SlotItem::new(title, tick));
                }
            }
        }

        if let Some(order) = self.order {
            order.sort(&mut self.items);
            self.reindex();
        }
    }

    /// totals만 집계합니다. 레이블별 누적기는 만들지 않습니다.
    pub fn total_scan(&mut self) {
        self.reset();
        let ticks = self.ticks;
        for tick in &ticks[self.first..=self.last] {
            self.add_total(tick);
        }
    }

    /// `index`번째 누적기에 tick을 반영합니다.
    pub fn inc(&mut self, index: usize, tick: &Tick) -> Result<(), RangeError> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(RangeError::ItemIndex { index, len })?;
        item.inc(tick);
        Ok(())
    }

    /// `n`번째 누적기를 반환합니다.
    pub fn get_item(&self, n: usize) -> Result<&SlotItem, RangeError> {
        self.items.get(n).ok_or(RangeError::ItemIndex {
            index: n,
            len: self.items.len(),
        })
    }

    /// 레이블로 누적기를 찾습니다.
    pub fn find(&self, title: &str) -> Option<&SlotItem> {
        self.index.get(title).map(|&idx| &self.items[idx])
    }

    pub fn items(&self) -> &[SlotItem] {
        &self.items
    }

    /// 구간 전체 집계. 스캔 전에는 `None`입니다.
    pub fn totals(&self) -> Option<&SlotItem> {
        self.totals.as_ref()
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn stop(&self) -> i64 {
        self.stop
    }

    pub fn first_index(&self) -> usize {
        self.first
    }

    pub fn last_index(&self) -> usize {
        self.last
    }

    /// 구간에 포함된 tick 수
    pub fn tick_count(&self) -> usize {
        self.last - self.first + 1
    }

    fn add_total(&mut self, tick: &Tick) {
        match &mut self.totals {
            Some(totals) => totals.inc(tick),
            None => self.totals = Some(SlotItem::new("Totals", tick)),
        }
    }

    fn reset(&mut self) {
        self.items.clear();
        self.index.clear();
        self.totals = None;
    }

    fn reindex(&mut self) {
        self.index = self
            .items
            .iter()
            .enumerate()
            .map(|(idx, item)| (item.title.clone(), idx))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(time: i64, size: u64, item: &str) -> Tick {
        Tick::new(time, size, Some(item.to_owned()))
    }

    #[test]
    fn construction_range_checks() {
        let ticks = vec![t(0, 1, "a"), t(1, 1, "b")];
        assert!(TimeSlot::new(&ticks, 0, 1, 0, 10).is_ok());
        assert_eq!(
            TimeSlot::new(&ticks, 0, 2, 0, 10).unwrap_err(),
            RangeError::SlotBounds {
                first: 0,
                last: 2,
                len: 2
            }
        );
        assert!(TimeSlot::new(&ticks, 1, 0, 0, 10).is_err());
        assert!(TimeSlot::new(&[], 0, 0, 0, 10).is_err());
    }

    #[test]
    fn scan_groups_by_label_and_totals_everything() {
        let ticks = vec![
            t(1000, 10, "a"),
            t(1000, 20, "a"),
            t(2000, 5, "b"),
            t(3000, 1, "a"),
        ];
        let mut slot = TimeSlot::new(&ticks, 0, 3, 0, 60_000).unwrap();
        slot.scan();

        assert_eq!(slot.items().len(), 2);
        let a = slot.find("a").unwrap();
        assert_eq!(a.count, 3);
        assert_eq!(a.bandwidth, 31);
        assert_eq!(a.peak_count, 2);
        assert_eq!(a.peak_bandwidth, 30);

        let totals = slot.totals().unwrap();
        assert_eq!(totals.count, 4);
        assert_eq!(totals.bandwidth, 36);
        assert_eq!(totals.first, 1000);
        assert_eq!(totals.last, 3000);
    }

    #[test]
    fn scan_respects_sub_range() {
        let ticks = vec![t(1, 1, "a"), t(2, 1, "b"), t(3, 1, "c"), t(4, 1, "d")];
        let mut slot = TimeSlot::new(&ticks, 1, 2, 0, 10).unwrap();
        slot.scan();
        let titles: Vec<_> = slot.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "c"]);
        assert_eq!(slot.tick_count(), 2);
    }

    #[test]
    fn total_scan_skips_items() {
        let ticks = vec![t(1, 1, "a"), t(2, 2, "b")];
        let mut slot = TimeSlot::new(&ticks, 0, 1, 0, 10).unwrap();
        slot.total_scan();
        assert!(slot.items().is_empty());
        assert_eq!(slot.totals().unwrap().bandwidth, 3);
    }

    #[test]
    fn unlabeled_ticks_share_one_item() {
        let ticks = vec![Tick::new(1, 1, None), Tick::new(2, 1, None)];
        let mut slot = TimeSlot::new(&ticks, 0, 1, 0, 10).unwrap();
        slot.scan();
        assert_eq!(slot.items().len(), 1);
        assert_eq!(slot.items()[0].title, UNLABELED);
    }

    #[test]
    fn sort_order_applied_after_scan() {
        let ticks = vec![t(1, 1, "z"), t(2, 1, "a"), t(3, 1, "a")];
        let mut slot = TimeSlot::new(&ticks, 0, 2, 0, 10)
            .unwrap()
            .with_order(Some(SortOrder::Title));
        slot.scan();
        assert_eq!(slot.get_item(0).unwrap().title, "a");
        assert_eq!(slot.find("z").unwrap().count, 1);
    }

    #[test]
    fn inc_and_get_item_range_check() {
        let ticks = vec![t(1, 1, "a")];
        let mut slot = TimeSlot::new(&ticks, 0, 0, 0, 10).unwrap();
        slot.scan();
        assert!(slot.inc(0, &t(1, 4, "a")).is_ok());
        assert_eq!(slot.get_item(0).unwrap().count, 2);
        assert_eq!(
            slot.inc(1, &t(1, 1, "a")).unwrap_err(),
            RangeError::ItemIndex { index: 1, len: 1 }
        );
        assert!(slot.get_item(5).is_err());
    }

    #[test]
    fn rescan_does_not_double_count() {
        let ticks = vec![t(1, 1, "a"), t(2, 1, "a")];
        let mut slot = TimeSlot::new(&ticks, 0, 1, 0, 10).unwrap();
        slot.scan();
        slot.scan();
        assert_eq!(slot.find("a").unwrap().count, 2);
        assert_eq!(slot.totals().unwrap().count, 2);
    }

    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn sorted_ticks() -> impl Strategy<Value = Vec<Tick>> {
            prop::collection::vec((0i64..50, 0u64..5000, 0u8..4), 1..200).prop_map(|raw| {
                let mut ticks: Vec<Tick> = raw
                    .into_iter()
                    .map(|(t, size, label)| Tick::new(t * 1000, size, Some(format!("ip{label}"))))
                    .collect();
                ticks.sort_by_key(|t| t.time);
                ticks
            })
        }

        proptest! {
            #[test]
            fn item_sums_equal_totals(ticks in sorted_ticks()) {
                let mut slot = TimeSlot::new(&ticks, 0, ticks.len() - 1, 0, 50_000).unwrap();
                slot.scan();
                let totals = slot.totals().unwrap();
                let count: u64 = slot.items().iter().map(|i| i.count).sum();
                let bandwidth: u64 = slot.items().iter().map(|i| i.bandwidth).sum();
                prop_assert_eq!(count, totals.count);
                prop_assert_eq!(bandwidth, totals.bandwidth);
                prop_assert_eq!(totals.count as usize, ticks.len());
            }

            #[test]
            fn peaks_bounded_by_totals(ticks in sorted_ticks()) {
                let mut slot = TimeSlot::new(&ticks, 0, ticks.len() - 1, 0, 50_000).unwrap();
                slot.scan();
                for item in slot.items() {
                    prop_assert!(item.peak_count >= 1);
                    prop_assert!(item.peak_count <= item.count);
                    prop_assert!(item.peak_bandwidth <= item.bandwidth);
                    prop_assert!(item.first <= item.last);
                }
            }
        }
    }
}
