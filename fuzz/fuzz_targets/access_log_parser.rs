#![no_main]

use libfuzzer_sys::fuzz_target;
use acclog_core::pipeline::LogParser;
use acclog_log_pipeline::parser::AccessLogParser;

fuzz_target!(|data: &[u8]| {
    let line = String::from_utf8_lossy(data);
    let parser = AccessLogParser::new();
    if let Ok(entry) = parser.parse(&line) {
        // 성공한 파싱은 항상 숫자 status를 가짐
        assert!(entry.status.bytes().all(|b| b.is_ascii_digit()));
    }
});
