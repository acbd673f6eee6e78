//! gk-sql: JSON 필터 → SQL 변환 라이브러리
//!
//! 필터 컴파일러가 구동하는 SeaQuery 기반 싱크를 제공합니다.
//! 식별자 quoting은 SeaQuery에 위임하고 값은 항상 바인딩하여 SQL Injection을 차단합니다.
//!
//! # 모듈 구조
//!
//! - `value`: 동적 식별자와 값 변환
//! - `condition`: 조건 싱크 (`SqlConditionSink`)
//! - `builder`: SELECT 쿼리 빌더

pub mod builder;
pub mod condition;
pub mod value;

pub use builder::{FilterQuery, SelectBuilder};
pub use condition::SqlConditionSink;
