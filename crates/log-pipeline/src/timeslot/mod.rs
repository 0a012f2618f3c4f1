//! 타임 슬롯 집계 엔진
//!
//! 시간순으로 정렬된 tick 배열을 구간 단위로 나누어 레이블별 요청 수,
//! 바이트 수, burst peak 값을 계산합니다.

pub mod item;
pub mod slot;

pub use item::SlotItem;
pub use slot::TimeSlot;

use std::fmt;
use std::str::FromStr;

/// 슬롯 아이템 정렬 순서
///
/// `Title`만 오름차순이고 나머지는 모두 내림차순입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// 레이블 오름차순 (`title`, `item`)
    Title,
    /// 요청 수 내림차순
    #[default]
    Count,
    /// 바이트 수 내림차순
    Bandwidth,
    /// burst 요청 수 내림차순 (`peak`)
    Peak,
    /// burst 바이트 수 내림차순 (`peak-bandwidth`)
    PeakBandwidth,
}

impl SortOrder {
    /// 이름을 정렬 순서로 변환합니다. 알 수 없는 이름은 `Count`입니다.
    pub fn from_name(name: &str) -> Self {
        match name {
            "title" | "item" => Self::Title,
            "count" => Self::Count,
            "bandwidth" => Self::Bandwidth,
            "peak" => Self::Peak,
            "peak-bandwidth" => Self::PeakBandwidth,
            _ => Self::Count,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Count => "count",
            Self::Bandwidth => "bandwidth",
            Self::Peak => "peak",
            Self::PeakBandwidth => "peak-bandwidth",
        }
    }

    /// 아이템 목록을 안정 정렬합니다.
    pub fn sort(&self, items: &mut [SlotItem]) {
        match self {
            Self::Title => items.sort_by(|a, b| a.title.cmp(&b.title)),
            Self::Count => items.sort_by(|a, b| b.count.cmp(&a.count)),
            Self::Bandwidth => items.sort_by(|a, b| b.bandwidth.cmp(&a.bandwidth)),
            Self::Peak => items.sort_by(|a, b| b.peak_count.cmp(&a.peak_count)),
            Self::PeakBandwidth => items.sort_by(|a, b| b.peak_bandwidth.cmp(&a.peak_bandwidth)),
        }
    }
}

impl FromStr for SortOrder {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
