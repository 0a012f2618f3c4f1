//! 집계 레이블 추출
//!
//! [`Category`]는 파싱된 엔트리에서 어떤 값을 집계 레이블로 사용할지 정하고,
//! [`ReportKind`]는 리포트 종류에 따라 tick에 붙일 레이블을 결정합니다.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use acclog_core::types::LogEntry;
use ipnet::Ipv4Net;

use crate::error::LogPipelineError;

/// 집계 카테고리
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    /// 호스트의 `/24` 네트워크
    Groups,
    /// referer URL의 호스트
    Sources,
    Agents,
    Uris,
    Codes,
    Referers,
    /// 로그 파일의 도메인 레이블
    Domains,
    Methods,
    Requests,
    Protocols,
    Users,
    #[default]
    Ips,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Self::Groups,
        Self::Sources,
        Self::Agents,
        Self::Uris,
        Self::Codes,
        Self::Referers,
        Self::Domains,
        Self::Methods,
        Self::Requests,
        Self::Protocols,
        Self::Users,
        Self::Ips,
    ];

    /// 옵션 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groups => "groups",
            Self::Sources => "sources",
            Self::Agents => "agents",
            Self::Uris => "uris",
            Self::Codes => "codes",
            Self::Referers => "referers",
            Self::Domains => "domains",
            Self::Methods => "methods",
            Self::Requests => "requests",
            Self::Protocols => "protocols",
            Self::Users => "users",
            Self::Ips => "ips",
        }
    }

    /// 리포트 헤더에 쓰는 제목
    pub fn title(&self) -> &'static str {
        match self {
            Self::Groups => "Groups",
            Self::Sources => "Sources",
            Self::Agents => "Agents",
            Self::Uris => "URIs",
            Self::Codes => "Codes",
            Self::Referers => "Referers",
            Self::Domains => "Domains",
            Self::Methods => "Methods",
            Self::Requests => "Requests",
            Self::Protocols => "Protocols",
            Self::Users => "Users",
            Self::Ips => "IPs",
        }
    }

    /// 엔트리에서 레이블을 추출합니다.
    pub fn item(&self, entry: &LogEntry, domain: &str) -> Option<String> {
        match self {
            Self::Ips => Some(entry.host.clone()),
            Self::Groups => Some(network_group(&entry.host)),
            Self::Sources => entry.referer.as_deref().map(referer_source),
            Self::Agents => entry.agent.clone(),
            Self::Uris => entry.uri.clone(),
            Self::Codes => Some(entry.status.clone()),
            Self::Referers => entry.referer.clone(),
            Self::Domains => Some(domain.to_owned()),
            Self::Methods => entry.method.clone(),
            Self::Requests => Some(entry.request.clone()),
            Self::Protocols => entry.protocol.clone(),
            Self::Users => Some(entry.user.clone()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = LogPipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| LogPipelineError::Config {
                field: "category".to_owned(),
                reason: format!("unknown category '{s}'"),
            })
    }
}

/// IPv4 호스트를 `a.b.c.0/24`로 묶습니다. IPv4가 아니면 그대로 반환합니다.
fn network_group(host: &str) -> String {
    host.parse::<Ipv4Addr>()
        .ok()
        .and_then(|addr| Ipv4Net::new(addr, 24).ok())
        .map(|net| net.trunc().to_string())
        .unwrap_or_else(|| host.to_owned())
}

/// referer URL에서 호스트 부분을 꺼냅니다. URL 형태가 아니면 그대로 반환합니다.
fn referer_source(referer: &str) -> String {
    let Some((_, rest)) = referer.split_once("://") else {
        return referer.to_owned();
    };
    let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    let host = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    if host.is_empty() {
        referer.to_owned()
    } else {
        host.to_owned()
    }
}

/// 리포트 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportKind {
    /// 슬롯별 요약 통계
    #[default]
    Summary,
    /// `deny from` 목록
    Deny,
    /// 고정 폭 슬롯별 요청 유무
    Downtime,
    /// 매칭된 원본 라인
    Request,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Deny => "deny",
            Self::Downtime => "downtime",
            Self::Request => "request",
        }
    }

    /// tick에 붙일 레이블을 결정합니다.
    ///
    /// downtime은 레이블이 없고, request는 원본 라인 전체를 사용합니다.
    pub fn label(
        &self,
        category: Category,
        entry: &LogEntry,
        domain: &str,
        line: &str,
    ) -> Option<String> {
        match self {
            Self::Summary | Self::Deny => category.item(entry, domain),
            Self::Downtime => None,
            Self::Request => Some(line.to_owned()),
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = LogPipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summary" => Ok(Self::Summary),
            "deny" => Ok(Self::Deny),
            "downtime" => Ok(Self::Downtime),
            "request" => Ok(Self::Request),
            other => Err(LogPipelineError::Config {
                field: "report".to_owned(),
                reason: format!("unknown report '{other}'"),
            }),
        }
    }
}
