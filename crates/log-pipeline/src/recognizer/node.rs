//! 조건 트리 노드

use std::fmt;

use acclog_core::error::RecognizerError;
use acclog_core::types::{Field, LogEntry};

use super::predicate::Predicate;

/// 컬렉션 노드의 결합자
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Combinator {
    /// 모든 자식이 매칭되어야 함 (빈 목록은 true)
    And,
    /// 하나 이상의 자식이 매칭되어야 함 (빈 목록은 false)
    Or,
    /// 알 수 없는 결합자. 항상 false로 평가됩니다.
    Unknown(String),
}

impl From<&str> for Combinator {
    fn from(token: &str) -> Self {
        match token {
            "and" | "AND" | "&&" => Self::And,
            "or" | "OR" | "||" => Self::Or,
            other => Self::Unknown(other.to_owned()),
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => f.write_str("and"),
            Self::Or => f.write_str("or"),
            Self::Unknown(token) => f.write_str(token),
        }
    }
}

/// 조건 트리 노드
///
/// 리프는 조건을, 컬렉션은 결합자를 가집니다. 둘 다 갖거나 둘 다 없는 노드는
/// [`Node::new`]에서 거부됩니다.
#[derive(Debug, Clone)]
pub enum Node {
    Leaf {
        field: Field,
        predicate: Predicate,
    },
    Collection {
        field: Field,
        combinator: Combinator,
        children: Vec<Node>,
    },
}

impl Node {
    /// predicate 또는 combinator 중 정확히 하나로 노드를 생성합니다.
    pub fn new(
        field: Field,
        predicate: Option<Predicate>,
        combinator: Option<Combinator>,
    ) -> Result<Self, RecognizerError> {
        match (predicate, combinator) {
            (Some(predicate), None) => Ok(Self::Leaf { field, predicate }),
            (None, Some(combinator)) => Ok(Self::Collection {
                field,
                combinator,
                children: Vec::new(),
            }),
            (None, None) => Err(RecognizerError::MissingPredicateOrCombinator {
                field: field.to_string(),
            }),
            (Some(_), Some(_)) => Err(RecognizerError::BothPredicateAndCombinator {
                field: field.to_string(),
            }),
        }
    }

    /// 노드가 대상으로 하는 필드
    pub fn field(&self) -> Field {
        match self {
            Self::Leaf { field, .. } | Self::Collection { field, .. } => *field,
        }
    }

    /// 컬렉션에 자식을 추가합니다. 리프에는 추가할 수 없습니다.
    pub fn push(&mut self, child: Node) -> Result<(), RecognizerError> {
        match self {
            Self::Collection { children, .. } => {
                children.push(child);
                Ok(())
            }
            Self::Leaf { field, .. } => Err(RecognizerError::MissingPredicateOrCombinator {
                field: field.to_string(),
            }),
        }
    }

    /// 엔트리에 대해 노드를 평가합니다.
    ///
    /// 리프의 필드 값이 없으면 false입니다.
    pub fn matches(&self, entry: &LogEntry) -> bool {
        match self {
            Self::Leaf { field, predicate } => entry
                .field(*field)
                .is_some_and(|value| predicate.test(&value)),
            Self::Collection {
                combinator,
                children,
                ..
            } => match combinator {
                Combinator::And => children.iter().all(|child| child.matches(entry)),
                Combinator::Or => children.iter().any(|child| child.matches(entry)),
                Combinator::Unknown(_) => false,
            },
        }
    }
}
