//! 평가 주체
//!
//! 규칙이 검사하는 속성 집합(보통 현재 사용자)을 추상화합니다.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 이름으로 속성을 조회할 수 있는 주체
pub trait Subject: Send + Sync {
    /// 속성 값 (없으면 `Value::Null`)
    fn attribute(&self, name: &str) -> Value;
}

/// 명시적 주체가 없을 때 현재 주체를 찾아주는 리졸버
///
/// 현재 요청의 인증 사용자 등 주변 컨텍스트에서 주체를 가져옵니다.
pub trait SubjectResolver: Send + Sync {
    fn resolve(&self) -> Option<Box<dyn Subject>>;
}

/// 속성 맵 기반 주체
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeBag {
    attributes: HashMap<String, Value>,
}

impl AttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// 속성 설정
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// JSON 객체에서 생성 (객체가 아니면 None)
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self {
                attributes: map.into_iter().collect(),
            }),
            _ => None,
        }
    }
}

impl Subject for AttributeBag {
    fn attribute(&self, name: &str) -> Value {
        self.attributes.get(name).cloned().unwrap_or(Value::Null)
    }
}

impl Subject for Value {
    fn attribute(&self, name: &str) -> Value {
        self.get(name).cloned().unwrap_or(Value::Null)
    }
}
