//! 엔티티 스키마(YAML) 파싱 및 관계 그래프 IR
//!
//! # 개요
//!
//! 필터 키의 관계 체인(`patient.name`의 `patient`)은 엔티티 간 관계 그래프를
//! 따라 해석됩니다. 이 모듈은 `schema.yaml`을 파싱하여 그 그래프를 IR로 만듭니다.
//!
//! # 모듈 구조
//!
//! - `entity`: 엔티티(테이블) 정의
//! - `relation`: 관계 정의 (belongs_to, has_many, belongs_to_many)
//! - `ir`: Schema IR (Bridge/CLI가 사용하는 최종 형태)
//! - `parser`: YAML 파싱 로직

mod entity;
mod ir;
mod parser;
mod relation;

pub use entity::Entity;
pub use ir::SchemaIr;
pub use parser::SchemaParser;
pub use relation::Relation;
