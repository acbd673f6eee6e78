//! 규칙 및 규칙 집합 정의
//!
//! `config/rulesets.yaml`의 구조를 정의합니다.
//!
//! ```yaml
//! rulesets:
//!   - action: submit_form
//!     rules:
//!       - { field: role, operator: "==", value: staff }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 단일 규칙 (`subject.<field> <operator> <value>`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// 주체 속성 이름
    pub field: String,

    /// 연산자 토큰
    ///
    /// 저장된 원문 그대로 보관하고 평가 시점에 해석합니다.
    pub operator: String,

    /// 비교 값
    #[serde(default)]
    pub value: Value,
}

impl Rule {
    pub fn new(field: impl Into<String>, operator: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value,
        }
    }
}

/// 액션 하나에 대한 규칙 목록
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub action: String,

    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// 규칙 집합 파일의 루트 구조
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesetConfig {
    #[serde(default)]
    pub rulesets: Vec<RuleSet>,
}
