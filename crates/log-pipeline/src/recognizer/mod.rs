//! Recognizer -- 로그 엔트리 필터 조건 트리
//!
//! CLI 필터 옵션으로 한 번 구성한 뒤, 스캔 중에는 읽기 전용으로 사용합니다.
//! 같은 필드에 대한 여러 조건은 OR, 서로 다른 필드는 루트에서 AND로 결합됩니다.
//!
//! # 사용 예시
//! ```ignore
//! use acclog_core::types::Field;
//! use acclog_log_pipeline::recognizer::Recognizer;
//!
//! let mut recognizer = Recognizer::new();
//! recognizer.add_ip("174.202.255.0/24");
//! recognizer.add_value_nc(Field::Method, "post");
//! recognizer.add_value_nc(Field::Method, "put");
//!
//! if recognizer.matches(&entry) { /* ... */ }
//! ```

pub mod node;
pub mod predicate;

pub use node::{Combinator, Node};
pub use predicate::{IpMatcher, Predicate};

use acclog_core::error::RecognizerError;
use acclog_core::types::{Field, LogEntry};
use regex::Regex;

/// 엔트리 필터
///
/// 최상위 조건들은 암묵적인 AND로 결합됩니다.
#[derive(Debug, Clone, Default)]
pub struct Recognizer {
    conditions: Vec<Node>,
}

impl Recognizer {
    /// 빈 필터를 생성합니다. 빈 필터는 모든 엔트리에 매칭됩니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 대소문자를 구분하는 완전 일치 조건을 추가합니다.
    pub fn add_value(&mut self, field: Field, value: &str) {
        self.add(field, Predicate::Equals(value.to_owned()));
    }

    /// 대소문자를 무시하는 완전 일치 조건을 추가합니다. 빈 값은 무시합니다.
    pub fn add_value_nc(&mut self, field: Field, value: &str) {
        if value.is_empty() {
            return;
        }
        self.add(field, Predicate::equals_ignore_case(value));
    }

    /// 정규식 검색 조건을 추가합니다.
    pub fn add_pattern(&mut self, field: Field, pattern: &str) -> Result<(), RecognizerError> {
        let predicate = Predicate::pattern(pattern)?;
        self.add(field, predicate);
        Ok(())
    }

    /// 이미 컴파일된 정규식으로 조건을 추가합니다.
    pub fn add_regex(&mut self, field: Field, regex: Regex) {
        self.add(field, Predicate::Pattern(regex));
    }

    /// `host` 필드에 IPv4 주소 / CIDR 조건을 추가합니다.
    pub fn add_ip(&mut self, mask: &str) {
        self.add(Field::Host, Predicate::Ip(IpMatcher::new(mask)));
    }

    /// 필드 조건을 추가합니다.
    ///
    /// 같은 필드의 리프가 이미 있으면 그 리프를 OR 컬렉션으로 승격한 뒤
    /// 새 리프를 덧붙입니다.
    pub fn add(&mut self, field: Field, predicate: Predicate) {
        let leaf = Node::Leaf { field, predicate };
        let Some(existing) = self.conditions.iter_mut().find(|c| c.field() == field) else {
            self.conditions.push(leaf);
            return;
        };

        match existing {
            Node::Collection {
                combinator: Combinator::Or,
                children,
                ..
            } => children.push(leaf),
            _ => {
                let placeholder = Node::Collection {
                    field,
                    combinator: Combinator::Or,
                    children: Vec::new(),
                };
                let prior = std::mem::replace(existing, placeholder);
                *existing = Node::Collection {
                    field,
                    combinator: Combinator::Or,
                    children: vec![prior, leaf],
                };
            }
        }
    }

    /// 엔트리가 모든 최상위 조건을 만족하는지 평가합니다.
    pub fn matches(&self, entry: &LogEntry) -> bool {
        self.conditions.iter().all(|node| node.matches(entry))
    }

    /// 모든 조건을 제거합니다.
    pub fn clear(&mut self) {
        self.conditions.clear();
    }

    /// 조건이 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// 최상위 조건 목록 (AND)
    pub fn conditions(&self) -> &[Node] {
        &self.conditions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(host: &str, method: &str, status: &str) -> LogEntry {
        LogEntry {
            host: host.to_owned(),
            ident: "-".to_owned(),
            user: "-".to_owned(),
            timestamp: "01/Jan/2024:00:00:00 +0000".to_owned(),
            time: 1_704_067_200_000,
            request: format!("{method} /index.php HTTP/1.1"),
            method: Some(method.to_owned()),
            uri: Some("/index.php".to_owned()),
            protocol: Some("HTTP/1.1".to_owned()),
            status: status.to_owned(),
            size: 512,
            referer: Some("-".to_owned()),
            agent: Some("curl/8.0".to_owned()),
        }
    }

    #[test]
    fn empty_recognizer_matches_everything() {
        let r = Recognizer::new();
        assert!(r.is_empty());
        assert!(r.matches(&entry("10.0.0.1", "GET", "200")));
    }

    #[test]
    fn same_field_is_or() {
        let mut r = Recognizer::new();
        r.add_value_nc(Field::Method, "post");
        r.add_value_nc(Field::Method, "PUT");
        assert!(r.matches(&entry("10.0.0.1", "POST", "200")));
        assert!(r.matches(&entry("10.0.0.1", "put", "200")));
        assert!(!r.matches(&entry("10.0.0.1", "GET", "200")));
    }

    #[test]
    fn second_value_promotes_leaf_to_or_collection() {
        let mut r = Recognizer::new();
        r.add_value(Field::Status, "404");
        assert!(matches!(r.conditions()[0], Node::Leaf { .. }));

        r.add_value(Field::Status, "500");
        r.add_value(Field::Status, "503");
        let children = r.conditions();
        assert_eq!(children.len(), 1);
        match &children[0] {
            Node::Collection {
                field,
                combinator,
                children,
            } => {
                assert_eq!(*field, Field::Status);
                assert_eq!(*combinator, Combinator::Or);
                assert_eq!(children.len(), 3);
            }
            Node::Leaf { .. } => panic!("expected promotion to OR collection"),
        }
    }

    #[test]
    fn distinct_fields_are_and() {
        let mut r = Recognizer::new();
        r.add_ip("174.202.255.0/24");
        r.add_value(Field::Status, "200");
        assert!(r.matches(&entry("174.202.255.23", "GET", "200")));
        assert!(!r.matches(&entry("174.202.255.23", "GET", "404")));
        assert!(!r.matches(&entry("10.0.0.1", "GET", "200")));
    }

    #[test]
    fn every_condition_lands_at_top_level() {
        let mut r = Recognizer::new();
        r.add_ip("10.0.0.0/8");
        r.add_value_nc(Field::Method, "get");
        r.add_value(Field::Status, "200");

        let fields: Vec<Field> = r.conditions().iter().map(Node::field).collect();
        assert_eq!(fields, vec![Field::Host, Field::Method, Field::Status]);
        assert!(r.matches(&entry("10.1.2.3", "GET", "200")));
        assert!(!r.matches(&entry("10.1.2.3", "GET", "500")));
    }

    #[test]
    fn empty_nc_value_is_ignored() {
        let mut r = Recognizer::new();
        r.add_value_nc(Field::Method, "");
        assert!(r.is_empty());
    }

    #[test]
    fn pattern_uses_search_semantics() {
        let mut r = Recognizer::new();
        r.add_pattern(Field::Uri, r"\.php$").unwrap();
        assert!(r.matches(&entry("10.0.0.1", "GET", "200")));
        r.add_pattern(Field::Agent, "bot").unwrap();
        assert!(!r.matches(&entry("10.0.0.1", "GET", "200")));
    }

    #[test]
    fn invalid_pattern_leaves_tree_unchanged() {
        let mut r = Recognizer::new();
        assert!(r.add_pattern(Field::Uri, "(").is_err());
        assert!(r.is_empty());
    }

    #[test]
    fn clear_resets_to_empty_and() {
        let mut r = Recognizer::new();
        r.add_value(Field::Host, "10.0.0.9");
        assert!(!r.matches(&entry("10.0.0.1", "GET", "200")));
        r.clear();
        assert!(r.is_empty());
        assert!(r.matches(&entry("10.0.0.1", "GET", "200")));
    }

    #[test]
    fn ip_and_value_mix_on_host_is_or() {
        let mut r = Recognizer::new();
        r.add_ip("192.168.0.0/16");
        r.add_value(Field::Host, "crawler.example.com");
        assert!(r.matches(&entry("192.168.4.4", "GET", "200")));
        assert!(r.matches(&entry("crawler.example.com", "GET", "200")));
        assert!(!r.matches(&entry("10.1.1.1", "GET", "200")));
    }

    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn empty_recognizer_matches_any_host(host in "[a-z0-9.:-]{1,40}") {
                prop_assert!(Recognizer::new().matches(&entry(&host, "GET", "200")));
            }

            #[test]
            fn slash_24_matches_whole_network(a: u8, b: u8, c: u8, d: u8, e: u8) {
                let mut r = Recognizer::new();
                r.add_ip(&format!("{a}.{b}.{c}.0/24"));
                let inside = format!("{a}.{b}.{c}.{d}");
                prop_assert!(r.matches(&entry(&inside, "GET", "200")));
                let other = c.wrapping_add(1);
                let outside = format!("{a}.{b}.{other}.{e}");
                prop_assert!(!r.matches(&entry(&outside, "GET", "200")));
            }

            #[test]
            fn nc_values_are_or(x in "[a-z]{1,8}", y in "[a-z]{1,8}") {
                let mut r = Recognizer::new();
                r.add_value_nc(Field::Method, &x.to_uppercase());
                r.add_value_nc(Field::Method, &y);
                prop_assert!(r.matches(&entry("h", &x, "200")));
                prop_assert!(r.matches(&entry("h", &y.to_uppercase(), "200")));
            }
        }
    }
}
