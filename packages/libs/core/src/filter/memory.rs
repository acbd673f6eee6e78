//! 인메모리 매칭
//!
//! 컴파일된 필터를 JSON 레코드에 직접 적용합니다.
//! 관계는 관계 이름을 키로 하는 중첩 객체(단수) 또는 객체 배열(복수)로 표현됩니다.
//!
//! ```json
//! { "status": "confirmed", "patient": { "name": "Carlos" } }
//! ```

use serde_json::Value;

use super::predicate::{CompiledFilter, Join, Predicate, PredicateGroup};

impl CompiledFilter {
    /// 레코드가 모든 최상위 그룹을 만족하는지
    pub fn matches(&self, record: &Value) -> bool {
        self.groups.iter().all(|group| group.matches(record))
    }

    /// 조건을 만족하는 레코드만 남김
    pub fn filter<'a, I>(&self, records: I) -> Vec<&'a Value>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

impl PredicateGroup {
    /// 그룹 평가 (AND가 OR보다 먼저 결합)
    ///
    /// 빈 그룹은 제약이 없으므로 참입니다.
    pub fn matches(&self, record: &Value) -> bool {
        let mut any = false;
        let mut current = true;

        for (i, (predicate, join)) in self.entries().iter().enumerate() {
            if i > 0 && *join == Join::Or {
                any |= current;
                current = true;
            }
            current = current && predicate.matches(record);
        }

        any || current
    }
}

impl Predicate {
    pub fn matches(&self, record: &Value) -> bool {
        match self {
            Predicate::FieldMatch { field, value } => {
                record.get(field).is_some_and(|v| value.matches(v))
            }
            Predicate::RelationshipScoped { chain, inner } => related_records(record, chain)
                .into_iter()
                .any(|related| inner.matches(related)),
        }
    }
}

/// 관계 체인을 따라 도달 가능한 레코드 수집
fn related_records<'a>(record: &'a Value, chain: &[String]) -> Vec<&'a Value> {
    let mut current = vec![record];

    for segment in chain {
        let mut next = Vec::new();
        for candidate in current {
            match candidate.get(segment) {
                Some(related @ Value::Object(_)) => next.push(related),
                Some(Value::Array(items)) => {
                    next.extend(items.iter().filter(|item| item.is_object()))
                }
                _ => {}
            }
        }
        current = next;
    }

    current
}
