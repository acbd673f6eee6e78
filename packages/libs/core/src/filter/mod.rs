//! JSON 필터 컴파일러
//!
//! # 개요
//!
//! 평면 JSON 객체(`{"patient.name": "Carlos", "status": ["a", "b"]}`)를
//! 관계 그래프 위의 조건(predicate)으로 컴파일합니다.
//!
//! - 키 하나 = 최상위 AND 항 하나
//! - 배열 값 = 그 항 내부의 OR 그룹
//! - 점(`.`)으로 구분된 앞 세그먼트 = 관계 체인 (존재 조건)
//!
//! 컴파일러는 조건을 직접 실행하지 않고 [`PredicateSink`]를 구동합니다.
//! SQL 빌더, 인메모리 필터 등 실제 백엔드는 싱크로 붙습니다.
//!
//! # 모듈 구조
//!
//! - `document`: 필터 문서 파싱/검증
//! - `key_path`: 필터 키 → (관계 체인, 필드) 분해
//! - `predicate`: 조건 트리 타입
//! - `sink`: 싱크 계약 + 호출 기록용 트리 싱크
//! - `compiler`: 컴파일러
//! - `memory`: JSON 레코드 대상 인메모리 매칭

mod compiler;
mod document;
mod key_path;
mod memory;
mod predicate;
mod sink;

pub use compiler::FilterCompiler;
pub use document::{FilterDocument, FilterValue, Scalar};
pub use key_path::KeyPath;
pub use predicate::{CompiledFilter, Join, Predicate, PredicateGroup};
pub use sink::{PredicateSink, PredicateTreeSink, ScopeBuilder, SinkNode};
