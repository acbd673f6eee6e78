//! 규칙 평가기
//!
//! 액션에 저장된 규칙 목록을 주체에 대해 AND 체인으로 평가합니다.

use std::sync::Arc;

use super::operator::Operator;
use super::store::RuleStore;
use super::subject::{Subject, SubjectResolver};
use crate::error::{Error, Result};

/// 규칙 평가기
///
/// - 규칙 집합이 없거나 비어 있으면 거부 (deny-by-default)
/// - 저장 순서대로 평가하며 첫 번째 실패에서 중단
/// - 알 수 없는 연산자는 해당 규칙에 도달했을 때 에러
pub struct RuleEvaluator<S: RuleStore> {
    store: S,
    resolver: Option<Arc<dyn SubjectResolver>>,
}

impl<S: RuleStore> RuleEvaluator<S> {
    /// 새 평가기 생성
    pub fn new(store: S) -> Self {
        Self {
            store,
            resolver: None,
        }
    }

    /// 주변 주체 리졸버 설정
    pub fn with_resolver(mut self, resolver: Arc<dyn SubjectResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// 액션 허용 여부 평가
    ///
    /// # Arguments
    /// * `action` - 액션 이름
    /// * `subject` - 평가 주체 (None이면 리졸버로 조회)
    pub fn is_allowed(&self, action: &str, subject: Option<&dyn Subject>) -> Result<bool> {
        let resolved;
        let subject = match subject {
            Some(subject) => subject,
            None => {
                resolved = self
                    .resolver
                    .as_ref()
                    .and_then(|resolver| resolver.resolve())
                    .ok_or(Error::SubjectNotFound)?;
                &*resolved
            }
        };

        let rules = self.store.load_rules(action)?;
        if rules.is_empty() {
            tracing::debug!(action, allowed = false, "no rules stored for action");
            return Ok(false);
        }

        for (index, rule) in rules.iter().enumerate() {
            let operator =
                Operator::from_token(&rule.operator).ok_or_else(|| Error::UnknownOperator {
                    action: action.to_string(),
                    operator: rule.operator.clone(),
                })?;

            let actual = subject.attribute(&rule.field);
            if !operator.apply(&actual, &rule.value) {
                tracing::debug!(
                    action,
                    allowed = false,
                    rule = index,
                    field = %rule.field,
                    operator = %operator,
                    "rule failed"
                );
                return Ok(false);
            }
        }

        tracing::debug!(action, allowed = true, rules = rules.len(), "all rules passed");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::{json, Value};

    use super::*;
    use crate::policy::rule::Rule;
    use crate::policy::store::InMemoryRuleStore;
    use crate::policy::subject::AttributeBag;

    fn store(action: &str, rules: Vec<Rule>) -> InMemoryRuleStore {
        let mut store = InMemoryRuleStore::new();
        store.insert(action, rules).unwrap();
        store
    }

    fn staff() -> AttributeBag {
        AttributeBag::new().with("role", "staff").with("age", 30)
    }

    /// 읽은 속성 이름을 기록하는 주체
    #[derive(Default)]
    struct RecordingSubject {
        reads: Mutex<Vec<String>>,
    }

    impl Subject for RecordingSubject {
        fn attribute(&self, name: &str) -> Value {
            self.reads.lock().unwrap().push(name.to_string());
            match name {
                "role" => json!("staff"),
                _ => Value::Null,
            }
        }
    }

    struct FixedResolver(Option<AttributeBag>);

    impl SubjectResolver for FixedResolver {
        fn resolve(&self) -> Option<Box<dyn Subject>> {
            self.0
                .clone()
                .map(|bag| Box::new(bag) as Box<dyn Subject>)
        }
    }

    #[test]
    fn test_unknown_action_denies() {
        let evaluator = RuleEvaluator::new(InMemoryRuleStore::new());
        assert!(!evaluator.is_allowed("submit_form", Some(&staff())).unwrap());
    }

    #[test]
    fn test_empty_ruleset_denies() {
        let evaluator = RuleEvaluator::new(store("submit_form", vec![]));
        assert!(!evaluator.is_allowed("submit_form", Some(&staff())).unwrap());
    }

    #[test]
    fn test_all_rules_pass() {
        let evaluator = RuleEvaluator::new(store(
            "submit_form",
            vec![
                Rule::new("role", "==", json!("staff")),
                Rule::new("age", ">", json!(17)),
            ],
        ));
        assert!(evaluator.is_allowed("submit_form", Some(&staff())).unwrap());
    }

    #[test]
    fn test_single_rule_decides() {
        let evaluator =
            RuleEvaluator::new(store("submit_form", vec![Rule::new("role", "==", json!("admin"))]));
        assert!(!evaluator.is_allowed("submit_form", Some(&staff())).unwrap());
    }

    #[test]
    fn test_short_circuit_stops_reading() {
        let evaluator = RuleEvaluator::new(store(
            "submit_form",
            vec![
                Rule::new("role", "==", json!("admin")),
                Rule::new("team", "==", json!("intake")),
            ],
        ));
        let subject = RecordingSubject::default();
        assert!(!evaluator.is_allowed("submit_form", Some(&subject)).unwrap());
        assert_eq!(*subject.reads.lock().unwrap(), vec!["role".to_string()]);
    }

    #[test]
    fn test_short_circuit_after_passing_rule() {
        let evaluator = RuleEvaluator::new(store(
            "submit_form",
            vec![
                Rule::new("role", "==", json!("staff")),
                Rule::new("team", "==", json!("intake")),
                Rule::new("role", "!=", json!("guest")),
            ],
        ));
        let subject = RecordingSubject::default();
        assert!(!evaluator.is_allowed("submit_form", Some(&subject)).unwrap());
        assert_eq!(
            *subject.reads.lock().unwrap(),
            vec!["role".to_string(), "team".to_string()]
        );
    }

    #[test]
    fn test_short_circuit_skips_later_unknown_operator() {
        let evaluator = RuleEvaluator::new(store(
            "submit_form",
            vec![
                Rule::new("role", "==", json!("admin")),
                Rule::new("team", "~=", json!("intake")),
            ],
        ));
        assert!(!evaluator.is_allowed("submit_form", Some(&staff())).unwrap());
    }

    #[test]
    fn test_unknown_operator_fails_loudly() {
        let evaluator = RuleEvaluator::new(store(
            "submit_form",
            vec![
                Rule::new("role", "==", json!("staff")),
                Rule::new("team", "~=", json!("intake")),
            ],
        ));
        let err = evaluator
            .is_allowed("submit_form", Some(&staff()))
            .unwrap_err();
        match err {
            Error::UnknownOperator { action, operator } => {
                assert_eq!(action, "submit_form");
                assert_eq!(operator, "~=");
            }
            other => panic!("Expected UnknownOperator, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_attribute_compares_as_null() {
        let evaluator =
            RuleEvaluator::new(store("submit_form", vec![Rule::new("team", "!=", json!("intake"))]));
        assert!(evaluator.is_allowed("submit_form", Some(&staff())).unwrap());
    }

    #[test]
    fn test_no_subject_without_resolver() {
        let evaluator =
            RuleEvaluator::new(store("submit_form", vec![Rule::new("role", "==", json!("staff"))]));
        let err = evaluator.is_allowed("submit_form", None).unwrap_err();
        assert!(matches!(err, Error::SubjectNotFound));
    }

    #[test]
    fn test_resolver_supplies_subject() {
        let evaluator =
            RuleEvaluator::new(store("submit_form", vec![Rule::new("role", "==", json!("staff"))]))
                .with_resolver(Arc::new(FixedResolver(Some(staff()))));
        assert!(evaluator.is_allowed("submit_form", None).unwrap());

        // 명시적 주체가 리졸버보다 우선
        let guest = AttributeBag::new().with("role", "guest");
        assert!(!evaluator.is_allowed("submit_form", Some(&guest)).unwrap());
    }

    #[test]
    fn test_resolver_without_current_subject() {
        let evaluator =
            RuleEvaluator::new(store("submit_form", vec![Rule::new("role", "==", json!("staff"))]))
                .with_resolver(Arc::new(FixedResolver(None)));
        assert!(matches!(
            evaluator.is_allowed("submit_form", None).unwrap_err(),
            Error::SubjectNotFound
        ));
    }
}
