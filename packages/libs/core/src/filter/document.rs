//! 필터 문서
//!
//! 외부에서 들어온 JSON 텍스트를 파싱하고 형태를 검증합니다.
//! 값은 스칼라(string/number/bool) 또는 스칼라 배열만 허용합니다.

use std::fmt;

use serde_json::{Number, Value};

use crate::error::{Error, Result};

/// 필터 스칼라 값
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Number(Number),
    Bool(bool),
}

impl Scalar {
    /// JSON 값에서 변환 (스칼라가 아니면 None)
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Scalar::String(s.clone())),
            Value::Number(n) => Some(Scalar::Number(n.clone())),
            Value::Bool(b) => Some(Scalar::Bool(*b)),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// JSON 값으로 변환
    pub fn to_json(&self) -> Value {
        match self {
            Scalar::String(s) => Value::String(s.clone()),
            Scalar::Number(n) => Value::Number(n.clone()),
            Scalar::Bool(b) => Value::Bool(*b),
        }
    }

    /// JSON 값과 일치하는지 (숫자는 수치 비교)
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Scalar::String(a), Value::String(b)) => a == b,
            (Scalar::Bool(a), Value::Bool(b)) => a == b,
            (Scalar::Number(a), Value::Number(b)) => {
                match (a.as_i64(), b.as_i64(), a.as_u64(), b.as_u64()) {
                    (Some(x), Some(y), _, _) => x == y,
                    (_, _, Some(x), Some(y)) => x == y,
                    _ if a.is_f64() || b.is_f64() => a.as_f64() == b.as_f64(),
                    _ => false,
                }
            }
            _ => false,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "{:?}", s),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value.into())
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

/// 필터 키 하나의 값
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// 단일 값
    Single(Scalar),
    /// 여러 값 (OR 그룹)
    Many(Vec<Scalar>),
}

impl FilterValue {
    /// 배열 값 여부
    pub fn is_multi(&self) -> bool {
        matches!(self, FilterValue::Many(_))
    }

    /// 값 목록
    pub fn values(&self) -> &[Scalar] {
        match self {
            FilterValue::Single(v) => std::slice::from_ref(v),
            FilterValue::Many(vs) => vs,
        }
    }
}

/// 파싱된 필터 문서
///
/// 키 순서는 JSON 텍스트 순서를 그대로 유지합니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterDocument {
    entries: Vec<(String, FilterValue)>,
}

impl FilterDocument {
    /// 빈 문서
    pub fn new() -> Self {
        Self::default()
    }

    /// JSON 텍스트 파싱
    pub fn parse(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| Error::invalid_input(format!("Invalid JSON filter: {}", e)))?;
        Self::from_value(value)
    }

    /// 이미 파싱된 JSON 값에서 생성
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(Error::invalid_input("filter must be a JSON object"));
        };

        let mut entries = Vec::with_capacity(map.len());
        for (key, raw) in map {
            let value = match &raw {
                Value::Array(items) => {
                    let values = items
                        .iter()
                        .map(|item| {
                            Scalar::from_json(item).ok_or_else(|| {
                                Error::invalid_input(format!(
                                    "filter '{}' must contain only scalar values",
                                    key
                                ))
                            })
                        })
                        .collect::<Result<Vec<_>>>()?;
                    FilterValue::Many(values)
                }
                other => FilterValue::Single(Scalar::from_json(other).ok_or_else(|| {
                    Error::invalid_input(format!(
                        "filter '{}' must be a scalar or an array of scalars",
                        key
                    ))
                })?),
            };
            entries.push((key, value));
        }

        Ok(Self { entries })
    }

    /// 항목 추가 (빌더)
    pub fn with(mut self, key: impl Into<String>, value: FilterValue) -> Self {
        self.entries.push((key.into(), value));
        self
    }

    /// 문서 순서대로 순회
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_document_order() {
        let doc = FilterDocument::parse(r#"{"status": "a", "city": "x", "appointment.date": "2025"}"#)
            .unwrap();
        let keys: Vec<&str> = doc.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["status", "city", "appointment.date"]);
    }

    #[test]
    fn test_parse_scalars_and_arrays() {
        let doc = FilterDocument::parse(r#"{"status": ["a", "b"], "id": 7, "active": true}"#).unwrap();
        let values: Vec<&FilterValue> = doc.iter().map(|(_, v)| v).collect();

        assert_eq!(
            values[0],
            &FilterValue::Many(vec![Scalar::from("a"), Scalar::from("b")])
        );
        assert_eq!(values[1], &FilterValue::Single(Scalar::from(7)));
        assert_eq!(values[2], &FilterValue::Single(Scalar::from(true)));
    }

    #[test]
    fn test_invalid_json() {
        let err = FilterDocument::parse("{bad json").unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(matches!(
            FilterDocument::parse(r#"["status"]"#),
            Err(Error::InvalidInput { .. })
        ));
        assert!(matches!(
            FilterDocument::parse("null"),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_non_scalar_values_rejected() {
        assert!(FilterDocument::parse(r#"{"status": null}"#).is_err());
        assert!(FilterDocument::parse(r#"{"status": {"$gt": 1}}"#).is_err());
        assert!(FilterDocument::parse(r#"{"status": ["a", ["b"]]}"#).is_err());
    }

    #[test]
    fn test_scalar_matches_numbers_numerically() {
        let one = Scalar::from(1);
        assert!(one.matches(&serde_json::json!(1)));
        assert!(one.matches(&serde_json::json!(1.0)));
        assert!(!one.matches(&serde_json::json!("1")));
    }

    #[test]
    fn test_single_value_slice() {
        let single = FilterValue::Single(Scalar::from("a"));
        assert!(!single.is_multi());
        assert_eq!(single.values().len(), 1);
    }
}
