//! 조건 트리 타입
//!
//! 컴파일 결과를 싱크와 무관한 형태로 표현합니다.
//! 컴파일 호출 안에서만 만들어지고 소비됩니다.

use std::fmt;

use super::document::Scalar;

/// 앞 항과의 결합 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Join {
    And,
    Or,
}

/// 단일 조건
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// 필드 일치 (`field == value`)
    FieldMatch { field: String, value: Scalar },

    /// 관계 체인을 따라 `inner`를 만족하는 레코드가 하나 이상 존재
    RelationshipScoped {
        chain: Vec<String>,
        inner: PredicateGroup,
    },
}

impl Predicate {
    /// 필드 일치 조건 생성
    pub fn field(field: impl Into<String>, value: Scalar) -> Self {
        Predicate::FieldMatch {
            field: field.into(),
            value,
        }
    }

    /// 관계 존재 조건 생성
    pub fn relationship(chain: Vec<String>, inner: PredicateGroup) -> Self {
        Predicate::RelationshipScoped { chain, inner }
    }
}

/// 조건 그룹
///
/// `(조건, 결합)` 목록이며 첫 항의 결합은 항상 `And`입니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredicateGroup {
    entries: Vec<(Predicate, Join)>,
}

impl PredicateGroup {
    /// 단일 조건 그룹
    pub fn single(predicate: Predicate) -> Self {
        Self {
            entries: vec![(predicate, Join::And)],
        }
    }

    /// OR 그룹 (첫 항 AND, 나머지 OR)
    pub fn any<I>(predicates: I) -> Self
    where
        I: IntoIterator<Item = Predicate>,
    {
        let entries = predicates
            .into_iter()
            .enumerate()
            .map(|(i, p)| (p, if i == 0 { Join::And } else { Join::Or }))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[(Predicate, Join)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 컴파일된 필터
///
/// 필터 키 하나당 그룹 하나이며, 그룹들은 AND로 결합됩니다.
/// 그룹이 없으면 모든 레코드와 일치합니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledFilter {
    pub groups: Vec<PredicateGroup>,
}

impl CompiledFilter {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::FieldMatch { field, value } => write!(f, "{} == {}", field, value),
            Predicate::RelationshipScoped { chain, inner } => {
                write!(f, "EXISTS {} {}", chain.join("."), inner)
            }
        }
    }
}

impl fmt::Display for PredicateGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, (predicate, join)) in self.entries.iter().enumerate() {
            if i > 0 {
                match join {
                    Join::And => write!(f, " AND ")?,
                    Join::Or => write!(f, " OR ")?,
                }
            }
            write!(f, "{}", predicate)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for CompiledFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.groups.is_empty() {
            return write!(f, "TRUE");
        }
        let parts: Vec<String> = self.groups.iter().map(|g| g.to_string()).collect();
        write!(f, "{}", parts.join(" AND "))
    }
}
