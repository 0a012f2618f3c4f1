//! 파일 기반 라인 리더
//!
//! 일반 파일은 `BufReader<File>`, gzip 파일은 `BufReader<GzDecoder<File>>`로 열고
//! 둘 다 같은 [`Lines`] iterator로 감쌉니다.
//!
//! 라인 끝의 `\n`, `\r\n`은 제거되며, 마지막 줄바꿈 없는 라인도 전달됩니다.
//! UTF-8이 아닌 바이트는 대체 문자로 바뀝니다.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::debug;

use super::FileSource;
use crate::error::LogPipelineError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// 파일이 gzip인지 확인합니다.
///
/// `.gz` 확장자이거나 첫 2바이트가 gzip magic이면 true입니다.
pub fn is_gzip(path: &Path) -> io::Result<bool> {
    let mut file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        return Ok(true);
    }

    let mut magic = [0u8; 2];
    let mut read = 0;
    while read < magic.len() {
        match file.read(&mut magic[read..])? {
            0 => return Ok(false),
            n => read += n,
        }
    }
    Ok(magic == GZIP_MAGIC)
}

/// 파일 이름에서 도메인 레이블을 추출합니다.
///
/// ```text
/// /usr/local/apache/domlogs/example.com-ssl_log.gz -> example.com
/// /var/log/httpd/shop.example.org.log              -> shop.example.org
/// /var/log/httpd/access_log                        -> access
/// ```
pub fn domain_label(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name = name.strip_suffix(".gz").unwrap_or(&name);
    let name = ["-ssl_log", ".log", "_log"]
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .unwrap_or(name);
    name.to_owned()
}

/// 파일을 열어 라인 iterator를 반환합니다.
pub fn open_lines(source: &FileSource) -> Result<Lines<Box<dyn BufRead>>, LogPipelineError> {
    let file = File::open(&source.path).map_err(|e| LogPipelineError::Collector {
        path: source.path.display().to_string(),
        reason: e.to_string(),
    })?;

    debug!(path = %source.path.display(), compressed = source.compressed, "opening log file");

    let reader: Box<dyn BufRead> = if source.compressed {
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(lines(reader))
}

/// 임의의 `BufRead`를 라인 iterator로 감쌉니다.
pub fn lines<R: BufRead>(reader: R) -> Lines<R> {
    Lines {
        reader,
        buf: Vec::with_capacity(512),
    }
}

/// 줄바꿈을 제거한 라인 iterator
pub struct Lines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> Iterator for Lines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.ends_with(b"\n") {
                    self.buf.pop();
                    if self.buf.ends_with(b"\r") {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
