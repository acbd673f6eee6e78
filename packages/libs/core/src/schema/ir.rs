//! Schema IR (Intermediate Representation)
//!
//! SchemaParser가 생성하고 필터 싱크가 사용하는 스키마의 최종 형태입니다.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::relation::Relation;
use crate::error::{Error, Result};

/// Schema IR
///
/// 엔티티 태그를 키로 하는 관계 그래프입니다.
/// SQL 싱크는 이 IR을 기반으로 관계 체인을 조인 조건으로 풉니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaIr {
    /// 스키마 버전
    pub version: u32,

    /// 엔티티 맵 (태그 -> 엔티티 정의)
    pub entities: HashMap<String, Entity>,
}

impl SchemaIr {
    /// 빈 IR 생성
    pub fn new() -> Self {
        Self {
            version: 1,
            entities: HashMap::new(),
        }
    }

    /// 엔티티 추가
    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.insert(entity.tag.clone(), entity);
    }

    /// 엔티티 조회 (태그는 대소문자 무시)
    pub fn get_entity(&self, tag: &str) -> Option<&Entity> {
        self.entities
            .get(tag)
            .or_else(|| self.entities.get(&tag.to_lowercase()))
    }

    /// 엔티티 존재 여부
    pub fn has_entity(&self, tag: &str) -> bool {
        self.get_entity(tag).is_some()
    }

    /// 모든 엔티티 태그 (정렬됨)
    pub fn entity_tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.entities.keys().map(|s| s.as_str()).collect();
        tags.sort_unstable();
        tags
    }

    /// 관계 한 단계 해석
    ///
    /// `entity`의 `relation` 관계와 그 대상 엔티티를 반환합니다.
    pub fn resolve_relation(&self, entity: &str, relation: &str) -> Result<(&Relation, &Entity)> {
        let source = self.get_entity(entity).ok_or_else(|| Error::InvalidTarget {
            target: entity.to_string(),
        })?;

        let rel = source
            .relation(relation)
            .ok_or_else(|| Error::UnknownRelationship {
                entity: source.tag.clone(),
                relationship: relation.to_string(),
            })?;

        let target = self
            .get_entity(rel.target())
            .ok_or_else(|| Error::InvalidReference {
                entity: source.tag.clone(),
                relation: relation.to_string(),
                target: rel.target().to_string(),
            })?;

        Ok((rel, target))
    }
}
