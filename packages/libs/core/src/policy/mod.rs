//! 규칙 기반 액션 권한 평가
//!
//! # 개요
//!
//! 액션 이름마다 저장된 규칙 목록(`field operator value`)을 현재 주체의 속성에
//! 대해 순서대로 평가합니다. 모든 규칙을 통과해야 허용되며, 규칙이 없으면 거부합니다.
//!
//! # 모듈 구조
//!
//! - `operator`: 연산자 레지스트리
//! - `rule`: 규칙/규칙 집합 정의
//! - `subject`: 평가 주체와 리졸버
//! - `store`: 규칙 저장소
//! - `evaluator`: 규칙 평가기
//! - `gate`: fail-closed 액션 게이트

mod evaluator;
mod gate;
mod operator;
mod rule;
mod store;
mod subject;

pub use evaluator::RuleEvaluator;
pub use gate::{ActionGate, Decision};
pub use operator::Operator;
pub use rule::{Rule, RuleSet, RulesetConfig};
pub use store::{FileRuleStore, InMemoryRuleStore, RuleStore};
pub use subject::{AttributeBag, Subject, SubjectResolver};
