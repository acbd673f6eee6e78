//! gk-core: Gatekeep 공통 핵심 라이브러리
//!
//! 이 크레이트는 Bridge와 CLI가 공유하는 핵심 타입과 로직을 제공합니다.
//!
//! # 모듈 구조
//!
//! - `schema`: 엔티티 스키마(YAML) 파싱 및 관계 그래프 IR
//! - `filter`: JSON 필터 문서 → 조건(predicate) 컴파일
//! - `policy`: 저장된 규칙 목록 기반 액션 권한 평가
//! - `error`: 공통 에러 타입

pub mod error;
pub mod filter;
pub mod policy;
pub mod schema;

pub use error::{Error, Result};
