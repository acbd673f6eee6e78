//! 주체 디렉터리
//!
//! `x-gatekeep-subject` 헤더 값(주체 ID)을 속성 집합으로 매핑합니다.
//!
//! ```yaml
//! subjects:
//!   ana: { name: Ana, role: staff }
//! ```

use std::collections::HashMap;
use std::path::Path;

use gk_core::policy::AttributeBag;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubjectDirectory {
    #[serde(default)]
    subjects: HashMap<String, AttributeBag>,
}

impl SubjectDirectory {
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn get(&self, id: &str) -> Option<&AttributeBag> {
        self.subjects.get(id)
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }
}
