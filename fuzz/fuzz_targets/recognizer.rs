#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use acclog_core::types::{Field, LogEntry};
use acclog_log_pipeline::recognizer::Recognizer;

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// 필터 조건 목록 (최대 8개로 제한)
    conditions: Vec<FuzzCondition>,
    host: String,
    method: String,
    uri: String,
    status: String,
    agent: String,
}

#[derive(Arbitrary, Debug)]
struct FuzzCondition {
    field: FuzzField,
    kind: FuzzKind,
    value: String,
}

#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzField {
    Host,
    Method,
    Uri,
    Status,
    Agent,
}

#[derive(Arbitrary, Debug)]
enum FuzzKind {
    Value,
    ValueNc,
    Pattern,
    Ip,
}

impl FuzzField {
    fn to_field(self) -> Field {
        match self {
            FuzzField::Host => Field::Host,
            FuzzField::Method => Field::Method,
            FuzzField::Uri => Field::Uri,
            FuzzField::Status => Field::Status,
            FuzzField::Agent => Field::Agent,
        }
    }
}

fuzz_target!(|input: FuzzInput| {
    let mut recognizer = Recognizer::new();

    // 조건 수 제한 (성능)
    for c in input.conditions.iter().take(8) {
        let field = c.field.to_field();
        match c.kind {
            FuzzKind::Value => recognizer.add_value(field, &c.value),
            FuzzKind::ValueNc => recognizer.add_value_nc(field, &c.value),
            // 잘못된 정규식은 에러로 끝나야 하며 트리를 바꾸지 않음
            FuzzKind::Pattern => {
                let _ = recognizer.add_pattern(field, &c.value);
            }
            FuzzKind::Ip => recognizer.add_ip(&c.value),
        }
    }

    let entry = LogEntry {
        host: input.host,
        ident: "-".to_owned(),
        user: "-".to_owned(),
        timestamp: "01/Jan/2024:00:00:00 +0000".to_owned(),
        time: 1_704_067_200_000,
        request: format!("{} {} HTTP/1.1", input.method, input.uri),
        method: Some(input.method),
        uri: Some(input.uri),
        protocol: Some("HTTP/1.1".to_owned()),
        status: input.status,
        size: 0,
        referer: None,
        agent: Some(input.agent),
    };

    let matched = recognizer.matches(&entry);
    if recognizer.is_empty() {
        assert!(matched, "empty recognizer must match everything");
    }
});
