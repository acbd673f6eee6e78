//! 엔티티 정의
//!
//! 필터 대상이 되는 엔티티(테이블)의 메타데이터를 정의합니다.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::relation::Relation;

/// 엔티티 정의
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// 엔티티 태그 (소문자 단수형, 예: `appointment`)
    pub tag: String,

    /// 테이블 이름
    pub table: String,

    /// PK 컬럼 이름
    pub primary_key: String,

    /// 필터 가능한 컬럼 목록 (비어 있으면 컬럼 검증 생략)
    #[serde(default)]
    pub columns: Vec<String>,

    /// 관계 맵 (관계 이름 -> 관계 정의)
    #[serde(default)]
    pub relations: HashMap<String, Relation>,
}

impl Entity {
    /// 새 엔티티 생성 (관계/컬럼 없음)
    pub fn new(tag: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_lowercase(),
            table: table.into(),
            primary_key: "id".to_string(),
            columns: Vec::new(),
            relations: HashMap::new(),
        }
    }

    /// 컬럼 목록 설정
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// 관계 추가
    pub fn with_relation(mut self, name: impl Into<String>, relation: Relation) -> Self {
        self.relations.insert(name.into(), relation);
        self
    }

    /// 필터 가능한 컬럼인지
    ///
    /// 컬럼 목록이 선언되지 않은 엔티티는 모든 필드를 허용합니다.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.is_empty() || self.columns.iter().any(|c| c == name)
    }

    /// 관계 조회
    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.get(name)
    }
}
