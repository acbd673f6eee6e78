//! 동적 식별자와 값 변환

use gk_core::filter::Scalar;
use sea_query::Iden;
use serde_json::Value;

/// 동적 테이블/컬럼/별칭 식별자
#[derive(Debug, Clone)]
pub struct DynIden(pub String);

impl DynIden {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl Iden for DynIden {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        // String에 대한 write는 실패하지 않음
        let _ = s.write_str(&self.0);
    }
}

/// 필터 스칼라 → SeaQuery 값
pub fn scalar_to_value(scalar: &Scalar) -> sea_query::Value {
    match scalar {
        Scalar::String(s) => s.as_str().into(),
        Scalar::Bool(b) => (*b).into(),
        Scalar::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.into()
            } else if let Some(f) = n.as_f64() {
                f.into()
            } else {
                n.to_string().into()
            }
        }
    }
}

/// SeaQuery 바인딩 값 → JSON (응답/CLI 출력용)
pub fn value_to_json(value: &sea_query::Value) -> Value {
    use sea_query::Value as V;

    match value {
        V::Bool(Some(b)) => Value::Bool(*b),
        V::TinyInt(Some(i)) => Value::from(*i),
        V::SmallInt(Some(i)) => Value::from(*i),
        V::Int(Some(i)) => Value::from(*i),
        V::BigInt(Some(i)) => Value::from(*i),
        V::TinyUnsigned(Some(i)) => Value::from(*i),
        V::SmallUnsigned(Some(i)) => Value::from(*i),
        V::Unsigned(Some(i)) => Value::from(*i),
        V::BigUnsigned(Some(i)) => Value::from(*i),
        V::Float(Some(f)) => Value::from(*f),
        V::Double(Some(f)) => Value::from(*f),
        V::String(Some(s)) => Value::String(s.to_string()),
        V::Char(Some(c)) => Value::String(c.to_string()),
        _ => Value::Null,
    }
}
