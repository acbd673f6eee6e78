//! 관계 정의
//!
//! 엔티티 간 관계와 조인 키를 정의합니다.

use serde::{Deserialize, Serialize};

/// 엔티티 관계
///
/// 모든 키 이름은 파싱 시점에 기본값이 채워진 상태입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Relation {
    /// 부모 쪽 외래키가 대상의 키를 가리킴 (`appointment.patient_id → patient.id`)
    BelongsTo {
        entity: String,
        foreign_key: String,
        owner_key: String,
    },

    /// 대상 쪽 외래키가 부모의 키를 가리킴 (`patient.id ← appointment.patient_id`)
    HasMany {
        entity: String,
        foreign_key: String,
        local_key: String,
    },

    /// 피벗 테이블을 통한 다대다
    BelongsToMany {
        entity: String,
        pivot: String,
        foreign_pivot_key: String,
        related_pivot_key: String,
        parent_key: String,
        related_key: String,
    },
}

impl Relation {
    /// 관계 대상 엔티티 태그
    pub fn target(&self) -> &str {
        match self {
            Relation::BelongsTo { entity, .. }
            | Relation::HasMany { entity, .. }
            | Relation::BelongsToMany { entity, .. } => entity,
        }
    }

    /// 관계 종류 이름
    pub fn kind(&self) -> &'static str {
        match self {
            Relation::BelongsTo { .. } => "belongs_to",
            Relation::HasMany { .. } => "has_many",
            Relation::BelongsToMany { .. } => "belongs_to_many",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_target() {
        let rel = Relation::BelongsTo {
            entity: "patient".to_string(),
            foreign_key: "patient_id".to_string(),
            owner_key: "id".to_string(),
        };
        assert_eq!(rel.target(), "patient");
        assert_eq!(rel.kind(), "belongs_to");
    }

    #[test]
    fn test_relation_serialization_is_tagged() {
        let rel = Relation::HasMany {
            entity: "appointment".to_string(),
            foreign_key: "location_id".to_string(),
            local_key: "id".to_string(),
        };
        let json = serde_json::to_value(&rel).unwrap();
        assert_eq!(json["kind"], "has_many");
        assert_eq!(json["entity"], "appointment");
    }
}
