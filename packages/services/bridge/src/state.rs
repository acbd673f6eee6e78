//! Bridge 앱 상태

use std::sync::Arc;

use gk_core::policy::{ActionGate, FileRuleStore, RuleEvaluator, RuleStore};
use gk_core::schema::{SchemaIr, SchemaParser};
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::Config;
use crate::middleware::TaskLocalSubjectResolver;
use crate::subjects::SubjectDirectory;

/// 앱 상태
///
/// 모든 핸들러에서 읽기 전용으로 공유하는 상태입니다.
pub struct AppState {
    /// 설정
    pub config: Config,

    /// 엔티티 스키마
    pub schema: SchemaIr,

    /// 액션 게이트 (주체는 요청 task-local에서 조회)
    pub gate: ActionGate<Arc<dyn RuleStore>>,

    /// 주체 디렉터리
    pub subjects: SubjectDirectory,

    /// DB Connection Pool (`GK_DATABASE_URL` 설정 시)
    pub pool: Option<PgPool>,
}

impl AppState {
    /// 설정 파일들을 읽어 상태 생성
    pub async fn load(config: &Config) -> anyhow::Result<Self> {
        let schema = SchemaParser::parse_file(&config.schema_path)?;
        if !schema.has_entity(&config.filter_root) {
            anyhow::bail!(
                "filter root '{}' is not an entity in {}",
                config.filter_root,
                config.schema_path.display()
            );
        }

        let subjects = SubjectDirectory::from_file(&config.subjects_path)?;
        let store: Arc<dyn RuleStore> = Arc::new(FileRuleStore::new(&config.rulesets_path));

        let pool = match &config.database_url {
            Some(url) => Some(PgPoolOptions::new().max_connections(5).connect(url).await?),
            None => None,
        };

        tracing::info!(
            entities = schema.entities.len(),
            subjects = subjects.len(),
            database = pool.is_some(),
            "loaded bridge state"
        );

        Ok(Self::new(config.clone(), schema, store, subjects, pool))
    }

    /// 구성 요소로부터 상태 생성
    pub fn new(
        config: Config,
        schema: SchemaIr,
        store: Arc<dyn RuleStore>,
        subjects: SubjectDirectory,
        pool: Option<PgPool>,
    ) -> Self {
        let evaluator = RuleEvaluator::new(store).with_resolver(Arc::new(TaskLocalSubjectResolver));
        Self {
            config,
            schema,
            gate: ActionGate::new(evaluator),
            subjects,
            pool,
        }
    }
}
