//! 비교 연산자 레지스트리
//!
//! 규칙에 저장된 연산자 토큰을 닫힌 열거형으로 매핑합니다.
//! 모든 연산은 전함수이며, 타입이 맞지 않으면 `false`를 반환합니다.

use std::cmp::Ordering;
use std::fmt;

use serde_json::{Number, Value};

/// 규칙 연산자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `in`
    In,
    /// `not_in`
    NotIn,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `contains`
    Contains,
}

impl Operator {
    /// 지원하는 전체 연산자
    pub const ALL: [Operator; 7] = [
        Operator::Eq,
        Operator::Ne,
        Operator::In,
        Operator::NotIn,
        Operator::Gt,
        Operator::Lt,
        Operator::Contains,
    ];

    /// 토큰에서 파싱 (대소문자 구분)
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "==" => Some(Operator::Eq),
            "!=" => Some(Operator::Ne),
            "in" => Some(Operator::In),
            "not_in" => Some(Operator::NotIn),
            ">" => Some(Operator::Gt),
            "<" => Some(Operator::Lt),
            "contains" => Some(Operator::Contains),
            _ => None,
        }
    }

    /// 저장 형식 토큰
    pub fn token(&self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::In => "in",
            Operator::NotIn => "not_in",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Contains => "contains",
        }
    }

    /// 연산 적용
    ///
    /// `a`는 주체 속성 값, `b`는 규칙 값입니다.
    pub fn apply(&self, a: &Value, b: &Value) -> bool {
        match self {
            Operator::Eq => loose_eq(a, b),
            Operator::Ne => !loose_eq(a, b),
            Operator::In => is_member(a, b),
            Operator::NotIn => !is_member(a, b),
            Operator::Gt => compare(a, b) == Some(Ordering::Greater),
            Operator::Lt => compare(a, b) == Some(Ordering::Less),
            Operator::Contains => contains(a, b),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// 숫자는 값으로 비교 (`1 == 1.0`), 나머지는 구조적 동등성
fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y) == Some(Ordering::Equal),
        _ => a == b,
    }
}

/// 정수끼리는 정확히, 한쪽이라도 실수면 f64로 비교
fn compare_numbers(x: &Number, y: &Number) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return Some(a.cmp(&b));
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return Some(a.cmp(&b));
    }
    // 음수 i64 vs i64 범위를 넘는 u64
    match (x.as_i64(), y.as_u64(), x.as_u64(), y.as_i64()) {
        (Some(_), Some(_), None, _) => return Some(Ordering::Less),
        (_, None, Some(_), Some(_)) => return Some(Ordering::Greater),
        _ => {}
    }
    x.as_f64()?.partial_cmp(&y.as_f64()?)
}

fn is_member(a: &Value, b: &Value) -> bool {
    match b {
        Value::Array(items) => items.iter().any(|item| loose_eq(item, a)),
        _ => false,
    }
}

/// 숫자-숫자, 문자열-문자열만 순서가 있음
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// `subject`가 `needle`을 부분 문자열로 포함하는지
fn contains(subject: &Value, needle: &Value) -> bool {
    match (subject, needle) {
        (Value::String(haystack), Value::String(needle)) => haystack.contains(needle.as_str()),
        _ => false,
    }
}
