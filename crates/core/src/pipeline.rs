//! 파이프라인 trait — 모듈 확장 포인트 정의

use std::io::{self, Write};

use crate::error::{AccessLogError, ParseError};
use crate::types::{LogEntry, Tick};

/// 로그 파서 trait
///
/// 새로운 로그 형식을 지원하려면 이 trait을 구현합니다.
pub trait LogParser: Send + Sync {
    /// 지원하는 로그 형식 이름
    fn format_name(&self) -> &str;

    /// 원시 라인 하나를 로그 엔트리로 파싱
    fn parse(&self, line: &str) -> Result<LogEntry, ParseError>;
}

/// 리포트 출력 대상
///
/// 리포트는 한 번에 한 줄씩 텍스트를 기록합니다. 줄바꿈은 구현체가 붙입니다.
pub trait LineSink {
    /// 한 줄을 기록합니다.
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

impl LineSink for Vec<String> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_owned());
        Ok(())
    }
}

/// `Write` 구현체(stdout, 파일 등)를 감싸는 [`LineSink`]
pub struct WriterSink<W: Write> {
    inner: W,
}

impl<W: Write> WriterSink<W> {
    /// 새 sink를 생성합니다.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// 버퍼를 비우고 내부 writer를 돌려줍니다.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> LineSink for WriterSink<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.inner, "{line}")
    }
}

/// 리포트 생성기 trait
///
/// 시간순으로 정렬된 tick 목록을 받아 텍스트 라인을 출력합니다.
pub trait Reporter {
    /// 리포트 이름
    fn name(&self) -> &str;

    /// tick 목록으로 리포트를 생성합니다.
    fn report(&self, ticks: &[Tick], sink: &mut dyn LineSink) -> Result<(), AccessLogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_collects_lines() {
        let mut sink: Vec<String> = Vec::new();
        sink.write_line("first").unwrap();
        sink.write_line("second").unwrap();
        assert_eq!(sink, vec!["first", "second"]);
    }

    #[test]
    fn writer_sink_appends_newlines() {
        let mut sink = WriterSink::new(Vec::new());
        sink.write_line("deny from 10.0.0.1").unwrap();
        sink.write_line("deny from 10.0.0.2").unwrap();
        let bytes = sink.into_inner().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "deny from 10.0.0.1\ndeny from 10.0.0.2\n"
        );
    }
}
