//! 리프 노드의 비교 조건
//!
//! 자유 형식 클로저 대신 네 가지 조건 종류를 열거형으로 표현합니다.

use std::fmt;
use std::net::Ipv4Addr;

use acclog_core::error::RecognizerError;
use ipnet::Ipv4Net;
use regex::Regex;

/// 필드 값 하나에 대한 비교 조건
#[derive(Clone)]
pub enum Predicate {
    /// 대소문자를 구분하는 완전 일치
    Equals(String),
    /// 대소문자를 무시하는 완전 일치 (소문자로 저장)
    EqualsIgnoreCase(String),
    /// 정규식 검색 (부분 일치)
    Pattern(Regex),
    /// IPv4 주소 / CIDR 매칭
    Ip(IpMatcher),
}

impl Predicate {
    /// 대소문자 무시 조건을 생성합니다.
    pub fn equals_ignore_case(value: &str) -> Self {
        Self::EqualsIgnoreCase(value.to_lowercase())
    }

    /// 정규식 문자열을 컴파일하여 조건을 생성합니다.
    pub fn pattern(pattern: &str) -> Result<Self, RecognizerError> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|e| RecognizerError::InvalidPattern {
                pattern: pattern.to_owned(),
                reason: e.to_string(),
            })
    }

    /// 필드 값에 조건을 적용합니다.
    pub fn test(&self, value: &str) -> bool {
        match self {
            Self::Equals(expected) => value == expected,
            Self::EqualsIgnoreCase(expected) => value.to_lowercase() == *expected,
            Self::Pattern(regex) => regex.is_match(value),
            Self::Ip(matcher) => matcher.matches(value),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals(v) => f.debug_tuple("Equals").field(v).finish(),
            Self::EqualsIgnoreCase(v) => f.debug_tuple("EqualsIgnoreCase").field(v).finish(),
            Self::Pattern(r) => f.debug_tuple("Pattern").field(&r.as_str()).finish(),
            Self::Ip(m) => f.debug_tuple("Ip").field(&m.raw).finish(),
        }
    }
}

/// IPv4 호스트 매처
///
/// 마스크 인자는 `a.b.c.d` 또는 `a.b.c.d/n` 형식입니다.
///
/// - 후보 호스트가 IPv4 리터럴이 아니면 마스크 인자 전체와 문자열 비교
/// - `0 < n < 32` 이면 네트워크 포함 여부로 비교
/// - 접미어가 없거나 `/0`, `/32` 이상이면 주소 부분과 문자열 비교
#[derive(Debug, Clone)]
pub struct IpMatcher {
    raw: String,
    address: String,
    network: Option<Ipv4Net>,
}

impl IpMatcher {
    /// 마스크 인자로 매처를 생성합니다. 잘못된 인자도 문자열 비교로 동작합니다.
    pub fn new(mask: &str) -> Self {
        let (addr_part, prefix) = match mask.split_once('/') {
            Some((addr, bits)) => (addr, bits.parse::<u8>().ok()),
            None => (mask, None),
        };

        let Ok(addr) = addr_part.parse::<Ipv4Addr>() else {
            return Self {
                raw: mask.to_owned(),
                address: mask.to_owned(),
                network: None,
            };
        };

        let network = prefix
            .filter(|bits| (1..32).contains(bits))
            .and_then(|bits| Ipv4Net::new(addr, bits).ok());

        Self {
            raw: mask.to_owned(),
            address: addr_part.to_owned(),
            network,
        }
    }

    /// 원래의 마스크 인자
    pub fn mask(&self) -> &str {
        &self.raw
    }

    /// 호스트가 마스크에 포함되는지 확인합니다.
    pub fn matches(&self, host: &str) -> bool {
        let Ok(candidate) = host.parse::<Ipv4Addr>() else {
            return host == self.raw;
        };
        match &self.network {
            Some(net) => net.contains(&candidate),
            None => host == self.address,
        }
    }
}
