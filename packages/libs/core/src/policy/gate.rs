//! 액션 게이트
//!
//! 평가기 에러를 거부로 변환하는 fail-closed 래퍼입니다.

use super::evaluator::RuleEvaluator;
use super::store::RuleStore;
use super::subject::Subject;

/// 게이트 판정 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// 허용 여부
    pub allowed: bool,

    /// 거부 사유 (평가 중 에러가 난 경우)
    pub reason: Option<String>,
}

impl Decision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: Option<String>) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }
}

/// 액션 게이트
pub struct ActionGate<S: RuleStore> {
    evaluator: RuleEvaluator<S>,
}

impl<S: RuleStore> ActionGate<S> {
    pub fn new(evaluator: RuleEvaluator<S>) -> Self {
        Self { evaluator }
    }

    /// 액션 허용 여부 판정 (에러는 경고 로그 후 거부)
    pub fn check(&self, action: &str, subject: Option<&dyn Subject>) -> Decision {
        match self.evaluator.is_allowed(action, subject) {
            Ok(true) => Decision::allow(),
            Ok(false) => Decision::deny(None),
            Err(e) => {
                tracing::warn!(action, error = %e, "action check failed, denying");
                Decision::deny(Some(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::policy::rule::Rule;
    use crate::policy::store::InMemoryRuleStore;
    use crate::policy::subject::AttributeBag;

    fn gate(rules: Vec<Rule>) -> ActionGate<InMemoryRuleStore> {
        let mut store = InMemoryRuleStore::new();
        store.insert("submit_form", rules).unwrap();
        ActionGate::new(RuleEvaluator::new(store))
    }

    #[test]
    fn test_allow_and_deny() {
        let gate = gate(vec![Rule::new("role", "==", json!("staff"))]);
        let staff = AttributeBag::new().with("role", "staff");
        let guest = AttributeBag::new().with("role", "guest");

        assert_eq!(gate.check("submit_form", Some(&staff)), Decision::allow());
        assert_eq!(gate.check("submit_form", Some(&guest)), Decision::deny(None));
    }

    #[test]
    fn test_errors_fail_closed() {
        let gate = gate(vec![Rule::new("role", "~=", json!("staff"))]);
        let staff = AttributeBag::new().with("role", "staff");

        let decision = gate.check("submit_form", Some(&staff));
        assert!(!decision.allowed);
        assert!(decision.reason.unwrap().contains("'~='"));

        let decision = gate.check("submit_form", None);
        assert!(!decision.allowed);
        assert!(decision.reason.is_some());
    }
}
