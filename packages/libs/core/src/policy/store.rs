//! 규칙 저장소
//!
//! 액션 이름으로 규칙 목록을 조회합니다. 액션당 규칙 집합은 최대 하나입니다.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::rule::{Rule, RulesetConfig};
use crate::error::{Error, Result};

/// 규칙 저장소 인터페이스
pub trait RuleStore: Send + Sync {
    /// 액션의 규칙 목록 (저장 순서 유지, 없으면 빈 목록)
    fn load_rules(&self, action: &str) -> Result<Vec<Rule>>;
}

/// 메모리 기반 규칙 저장소
#[derive(Debug, Clone, Default)]
pub struct InMemoryRuleStore {
    rulesets: HashMap<String, Vec<Rule>>,
}

impl InMemoryRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 설정에서 생성 (중복 액션은 거부)
    pub fn from_config(config: RulesetConfig) -> Result<Self> {
        let mut store = Self::new();
        for ruleset in config.rulesets {
            store.insert(ruleset.action, ruleset.rules)?;
        }
        Ok(store)
    }

    /// YAML 문자열에서 생성
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: RulesetConfig =
            serde_yaml::from_str(yaml).map_err(|e| Error::RulesetParse {
                message: e.to_string(),
            })?;
        Self::from_config(config)
    }

    /// JSON 문자열에서 생성
    pub fn from_json(json: &str) -> Result<Self> {
        let config: RulesetConfig =
            serde_json::from_str(json).map_err(|e| Error::RulesetParse {
                message: e.to_string(),
            })?;
        Self::from_config(config)
    }

    /// 파일에서 로드 (`.json`이면 JSON, 그 외는 YAML)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        if is_json(path) {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    /// 규칙 집합 추가
    pub fn insert(&mut self, action: impl Into<String>, rules: Vec<Rule>) -> Result<()> {
        let action = action.into();
        if self.rulesets.contains_key(&action) {
            return Err(Error::DuplicateRuleset { action });
        }
        self.rulesets.insert(action, rules);
        Ok(())
    }

    /// 등록된 액션 이름 (정렬됨)
    pub fn actions(&self) -> Vec<&str> {
        let mut actions: Vec<&str> = self.rulesets.keys().map(String::as_str).collect();
        actions.sort();
        actions
    }
}

impl RuleStore for InMemoryRuleStore {
    fn load_rules(&self, action: &str) -> Result<Vec<Rule>> {
        Ok(self.rulesets.get(action).cloned().unwrap_or_default())
    }
}

/// 파일 기반 규칙 저장소
///
/// 호출마다 파일을 다시 읽으므로 편집 내용이 즉시 반영됩니다.
#[derive(Debug, Clone)]
pub struct FileRuleStore {
    path: PathBuf,
}

impl FileRuleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RuleStore for FileRuleStore {
    fn load_rules(&self, action: &str) -> Result<Vec<Rule>> {
        InMemoryRuleStore::from_file(&self.path)?.load_rules(action)
    }
}

impl<T: RuleStore + ?Sized> RuleStore for std::sync::Arc<T> {
    fn load_rules(&self, action: &str) -> Result<Vec<Rule>> {
        (**self).load_rules(action)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RULESETS: &str = r#"
rulesets:
  - action: submit_form
    rules:
      - { field: role, operator: "==", value: staff }
      - { field: team, operator: in, value: [intake, billing] }
"#;

    #[test]
    fn test_load_rules_in_order() {
        let store = InMemoryRuleStore::from_yaml(RULESETS).unwrap();
        let rules = store.load_rules("submit_form").unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].field, "role");
        assert_eq!(rules[1].value, json!(["intake", "billing"]));
    }

    #[test]
    fn test_unknown_action_is_empty() {
        let store = InMemoryRuleStore::from_yaml(RULESETS).unwrap();
        assert!(store.load_rules("delete_patient").unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_action_rejected() {
        let yaml = r#"
rulesets:
  - action: submit_form
  - action: submit_form
"#;
        let err = InMemoryRuleStore::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, Error::DuplicateRuleset { action } if action == "submit_form"));
    }

    #[test]
    fn test_from_json() {
        let store = InMemoryRuleStore::from_json(
            r#"{"rulesets": [{"action": "a", "rules": [{"field": "x", "operator": "!=", "value": 1}]}]}"#,
        )
        .unwrap();
        assert_eq!(store.actions(), vec!["a"]);
    }

    #[test]
    fn test_parse_error() {
        let err = InMemoryRuleStore::from_yaml("rulesets: [oops").unwrap_err();
        assert!(matches!(err, Error::RulesetParse { .. }));
    }

    #[test]
    fn test_file_store_rereads_on_every_call() {
        let path = std::env::temp_dir().join(format!(
            "gk-rulesets-{}-{}.yaml",
            std::process::id(),
            line!()
        ));
        std::fs::write(&path, RULESETS).unwrap();
        let store = FileRuleStore::new(&path);
        assert_eq!(store.load_rules("submit_form").unwrap().len(), 2);

        std::fs::write(
            &path,
            "rulesets:\n  - action: submit_form\n    rules: []\n",
        )
        .unwrap();
        assert!(store.load_rules("submit_form").unwrap().is_empty());

        std::fs::remove_file(&path).unwrap();
        assert!(matches!(
            store.load_rules("submit_form").unwrap_err(),
            Error::Io(_)
        ));
    }
}
