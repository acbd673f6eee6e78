//! 스키마 YAML 파서
//!
//! `schema.yaml` 파일을 파싱하여 Schema IR로 변환합니다.
//! 생략된 조인 키는 명명 규칙(`<entity>_id`, `id`)으로 채웁니다.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use super::entity::Entity;
use super::ir::SchemaIr;
use super::relation::Relation;
use crate::error::{Error, Result};

/// 스키마 파서
pub struct SchemaParser;

impl SchemaParser {
    /// 단일 YAML 문자열 파싱
    pub fn parse_yaml(yaml: &str) -> Result<SchemaIr> {
        let raw: RawSchema = serde_yaml::from_str(yaml).map_err(|e| Error::SchemaParse {
            message: e.to_string(),
        })?;
        Self::convert_raw_schema(raw)
    }

    /// YAML 파일 파싱
    pub fn parse_file(path: impl AsRef<std::path::Path>) -> Result<SchemaIr> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_yaml(&content)
    }

    /// Raw 스키마를 IR로 변환
    ///
    /// 관계 기본값이 대상 엔티티의 PK에 의존하므로 두 단계로 변환합니다.
    fn convert_raw_schema(raw: RawSchema) -> Result<SchemaIr> {
        let mut ir = SchemaIr::new();
        ir.version = raw.version;

        // 1단계: 엔티티 골격 (관계 제외)
        let mut seen = HashSet::new();
        let mut pending = Vec::new();
        for (name, raw_entity) in raw.entities {
            let tag = name.to_lowercase();
            if !seen.insert(tag.clone()) {
                return Err(Error::DuplicateEntity { tag });
            }

            let mut entity = Entity::new(
                tag.clone(),
                raw_entity.table.unwrap_or_else(|| format!("{}s", tag)),
            );
            if let Some(pk) = raw_entity.primary_key {
                entity.primary_key = pk;
            }
            entity.columns = raw_entity.columns.unwrap_or_default();

            pending.push((tag, raw_entity.relations.unwrap_or_default()));
            ir.add_entity(entity);
        }

        // 2단계: 관계 변환
        for (tag, raw_relations) in pending {
            let mut relations = HashMap::new();
            for (name, raw_rel) in raw_relations {
                let relation = Self::convert_raw_relation(&ir, &tag, &name, raw_rel)?;
                relations.insert(name, relation);
            }
            if let Some(entity) = ir.entities.get_mut(&tag) {
                entity.relations = relations;
            }
        }

        Ok(ir)
    }

    /// Raw 관계 변환 (기본 키 이름 채우기)
    fn convert_raw_relation(
        ir: &SchemaIr,
        parent_tag: &str,
        name: &str,
        raw: RawRelation,
    ) -> Result<Relation> {
        let target_tag = raw.entity.unwrap_or_else(|| name.to_string()).to_lowercase();

        let target = ir
            .get_entity(&target_tag)
            .ok_or_else(|| Error::InvalidReference {
                entity: parent_tag.to_string(),
                relation: name.to_string(),
                target: target_tag.clone(),
            })?;
        let parent_pk = ir
            .get_entity(parent_tag)
            .map(|e| e.primary_key.clone())
            .unwrap_or_else(|| "id".to_string());

        let relation = match raw.kind.as_str() {
            "belongs_to" => Relation::BelongsTo {
                foreign_key: raw.foreign_key.unwrap_or_else(|| format!("{}_id", name)),
                owner_key: raw.owner_key.unwrap_or_else(|| target.primary_key.clone()),
                entity: target_tag,
            },
            "has_many" | "has_one" => Relation::HasMany {
                foreign_key: raw
                    .foreign_key
                    .unwrap_or_else(|| format!("{}_id", parent_tag)),
                local_key: raw.local_key.unwrap_or(parent_pk),
                entity: target_tag,
            },
            "belongs_to_many" => {
                let pivot = raw.pivot.unwrap_or_else(|| {
                    let mut pair = [parent_tag, target_tag.as_str()];
                    pair.sort_unstable();
                    pair.join("_")
                });
                Relation::BelongsToMany {
                    pivot,
                    foreign_pivot_key: raw
                        .foreign_pivot_key
                        .unwrap_or_else(|| format!("{}_id", parent_tag)),
                    related_pivot_key: raw
                        .related_pivot_key
                        .unwrap_or_else(|| format!("{}_id", target_tag)),
                    parent_key: raw.local_key.unwrap_or(parent_pk),
                    related_key: raw.owner_key.unwrap_or_else(|| target.primary_key.clone()),
                    entity: target_tag,
                }
            }
            other => {
                return Err(Error::SchemaValidation {
                    message: format!(
                        "entity '{}' relation '{}' has unknown kind '{}'",
                        parent_tag, name, other
                    ),
                })
            }
        };

        Ok(relation)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Raw YAML 구조체 (serde 역직렬화용)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawSchema {
    #[serde(default = "default_version")]
    version: u32,
    entities: HashMap<String, RawEntity>,
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct RawEntity {
    table: Option<String>,
    primary_key: Option<String>,
    columns: Option<Vec<String>>,
    relations: Option<HashMap<String, RawRelation>>,
}

#[derive(Debug, Deserialize)]
struct RawRelation {
    kind: String,
    entity: Option<String>,
    foreign_key: Option<String>,
    owner_key: Option<String>,
    local_key: Option<String>,
    pivot: Option<String>,
    foreign_pivot_key: Option<String>,
    related_pivot_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLINIC_SCHEMA: &str = r#"
version: 1
entities:
  appointment:
    table: appointments
    columns: [id, patient_id, location_id, date, status]
    relations:
      patient: { kind: belongs_to }
      location: { kind: belongs_to, entity: location, foreign_key: location_id }
  patient:
    columns: [id, name, email]
    relations:
      appointments: { kind: belongs_to_many, entity: appointment }
  location:
    columns: [id, name, city]
    relations:
      appointments: { kind: has_many, entity: appointment }
"#;

    #[test]
    fn test_parse_clinic_schema() {
        let ir = SchemaParser::parse_yaml(CLINIC_SCHEMA).unwrap();
        assert_eq!(ir.entity_tags(), vec!["appointment", "location", "patient"]);

        let appointment = ir.get_entity("appointment").unwrap();
        assert_eq!(appointment.table, "appointments");
        assert_eq!(
            appointment.relation("patient"),
            Some(&Relation::BelongsTo {
                entity: "patient".to_string(),
                foreign_key: "patient_id".to_string(),
                owner_key: "id".to_string(),
            })
        );

        // table 생략 시 복수형 기본값
        assert_eq!(ir.get_entity("patient").unwrap().table, "patients");
    }

    #[test]
    fn test_relation_defaults() {
        let ir = SchemaParser::parse_yaml(CLINIC_SCHEMA).unwrap();

        let location = ir.get_entity("location").unwrap();
        assert_eq!(
            location.relation("appointments"),
            Some(&Relation::HasMany {
                entity: "appointment".to_string(),
                foreign_key: "location_id".to_string(),
                local_key: "id".to_string(),
            })
        );

        let patient = ir.get_entity("patient").unwrap();
        match patient.relation("appointments").unwrap() {
            Relation::BelongsToMany {
                pivot,
                foreign_pivot_key,
                related_pivot_key,
                ..
            } => {
                assert_eq!(pivot, "appointment_patient");
                assert_eq!(foreign_pivot_key, "patient_id");
                assert_eq!(related_pivot_key, "appointment_id");
            }
            other => panic!("Expected belongs_to_many, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_relation_target() {
        let yaml = r#"
entities:
  appointment:
    relations:
      doctor: { kind: belongs_to }
"#;
        let err = SchemaParser::parse_yaml(yaml).unwrap_err();
        assert!(matches!(err, Error::InvalidReference { .. }));
    }

    #[test]
    fn test_unknown_relation_kind() {
        let yaml = r#"
entities:
  patient: {}
  appointment:
    relations:
      patient: { kind: morph_to }
"#;
        let err = SchemaParser::parse_yaml(yaml).unwrap_err();
        assert!(matches!(err, Error::SchemaValidation { .. }));
    }

    #[test]
    fn test_duplicate_entity_error() {
        let yaml = r#"
entities:
  Patient: {}
  patient: {}
"#;
        let err = SchemaParser::parse_yaml(yaml).unwrap_err();
        assert!(matches!(err, Error::DuplicateEntity { .. }));
    }

    #[test]
    fn test_malformed_yaml_is_schema_parse_error() {
        let err = SchemaParser::parse_yaml("entities: [unclosed").unwrap_err();
        assert!(matches!(err, Error::SchemaParse { .. }));
        assert_eq!(err.code(), "SCHEMA_PARSE_ERROR");
    }
}
