//! Bridge 설정

use std::env;
use std::path::PathBuf;

/// Bridge 설정
#[derive(Debug, Clone)]
pub struct Config {
    /// 서버 포트
    pub port: u16,

    /// 엔티티 스키마 파일
    pub schema_path: PathBuf,

    /// 규칙 집합 파일 (요청마다 다시 읽음)
    pub rulesets_path: PathBuf,

    /// 주체 디렉터리 파일
    pub subjects_path: PathBuf,

    /// `/check-sql` 필터의 루트 엔티티
    pub filter_root: String,

    /// PostgreSQL URL (설정 시 `/check-sql`이 쿼리를 실행)
    pub database_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            schema_path: PathBuf::from("config/schema.yaml"),
            rulesets_path: PathBuf::from("config/rulesets.yaml"),
            subjects_path: PathBuf::from("config/subjects.yaml"),
            filter_root: "appointment".to_string(),
            database_url: None,
        }
    }
}

impl Config {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            port: env::var("GK_BRIDGE_PORT")
                .unwrap_or_else(|_| defaults.port.to_string())
                .parse()?,

            schema_path: env::var("GK_SCHEMA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.schema_path),

            rulesets_path: env::var("GK_RULESETS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.rulesets_path),

            subjects_path: env::var("GK_SUBJECTS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.subjects_path),

            filter_root: env::var("GK_FILTER_ROOT").unwrap_or(defaults.filter_root),

            database_url: env::var("GK_DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
        })
    }
}
