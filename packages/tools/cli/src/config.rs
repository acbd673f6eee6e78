//! CLI 설정
//!
//! 파일 경로 결정 순서: CLI 옵션 > 환경변수 > 기본값

use std::path::{Path, PathBuf};

use anyhow::Context;
use gk_core::policy::FileRuleStore;
use gk_core::schema::{SchemaIr, SchemaParser};

const DEFAULT_SCHEMA_PATH: &str = "config/schema.yaml";
const DEFAULT_RULESETS_PATH: &str = "config/rulesets.yaml";

/// CLI 설정
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// 엔티티 스키마 파일
    pub schema_path: PathBuf,

    /// 규칙 집합 파일
    pub rulesets_path: PathBuf,
}

impl CliConfig {
    /// 옵션과 환경변수로부터 설정 결정
    pub fn resolve(schema: Option<PathBuf>, rulesets: Option<PathBuf>) -> Self {
        Self {
            schema_path: schema
                .or_else(|| std::env::var("GK_SCHEMA_PATH").ok().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_PATH)),
            rulesets_path: rulesets
                .or_else(|| std::env::var("GK_RULESETS_PATH").ok().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RULESETS_PATH)),
        }
    }

    /// 스키마 로드
    pub fn load_schema(&self) -> anyhow::Result<SchemaIr> {
        load_schema(&self.schema_path)
    }

    /// 규칙 저장소
    pub fn rule_store(&self) -> FileRuleStore {
        FileRuleStore::new(&self.rulesets_path)
    }
}

fn load_schema(path: &Path) -> anyhow::Result<SchemaIr> {
    SchemaParser::parse_file(path)
        .with_context(|| format!("Failed to load schema from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_paths_win() {
        let config = CliConfig::resolve(
            Some(PathBuf::from("a/schema.yaml")),
            Some(PathBuf::from("b/rulesets.json")),
        );
        assert_eq!(config.schema_path, PathBuf::from("a/schema.yaml"));
        assert_eq!(config.rule_store().path(), Path::new("b/rulesets.json"));
    }

    #[test]
    fn test_missing_schema_file() {
        let config = CliConfig::resolve(Some(PathBuf::from("/nonexistent/schema.yaml")), None);
        let err = config.load_schema().unwrap_err();
        assert!(err.to_string().contains("/nonexistent/schema.yaml"));
    }
}
