//! SELECT 쿼리 빌더
//!
//! 엔티티 태그와 필터 문서를 받아 파라미터 바인딩된 PostgreSQL을 생성합니다.

use gk_core::filter::{CompiledFilter, FilterCompiler, FilterDocument};
use gk_core::schema::{Entity, SchemaIr};
use gk_core::{Error, Result};
use sea_query::{Asterisk, PostgresQueryBuilder, Query, QueryStatementWriter, SelectStatement};
use serde::Serialize;
use serde_json::Value;

use crate::condition::SqlConditionSink;
use crate::value::{value_to_json, DynIden};

/// 생성된 쿼리
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterQuery {
    /// `$n` 자리표시자를 사용하는 SQL
    pub sql: String,

    /// 자리표시자 순서대로의 바인딩 값
    pub bindings: Vec<Value>,
}

/// SELECT 쿼리 빌더
pub struct SelectBuilder<'a> {
    schema: &'a SchemaIr,
    entity: &'a Entity,
}

impl<'a> SelectBuilder<'a> {
    /// 새 빌더 생성
    ///
    /// 스키마에 없는 엔티티면 `InvalidTarget`을 반환합니다.
    pub fn new(schema: &'a SchemaIr, tag: &str) -> Result<Self> {
        let entity = schema.get_entity(tag).ok_or_else(|| Error::InvalidTarget {
            target: tag.to_string(),
        })?;
        Ok(Self { schema, entity })
    }

    pub fn entity(&self) -> &Entity {
        self.entity
    }

    /// 필터를 적용한 SELECT 문 생성
    ///
    /// # Returns
    /// (SELECT 문, 컴파일된 조건 트리)
    pub fn statement(&self, document: &FilterDocument) -> Result<(SelectStatement, CompiledFilter)> {
        let mut sink = SqlConditionSink::new(self.schema, &self.entity.tag);
        let compiled = FilterCompiler::compile(document, &mut sink)?;
        let condition = sink.into_condition();

        let table = DynIden::new(&self.entity.table);
        let mut query = Query::select();
        query.column((table.clone(), Asterisk)).from(table);
        if !condition.is_empty() {
            query.cond_where(condition);
        }

        Ok((query, compiled))
    }

    /// SQL과 바인딩 생성
    pub fn build(&self, document: &FilterDocument) -> Result<FilterQuery> {
        let (query, _) = self.statement(document)?;
        let (sql, values) = query.build(PostgresQueryBuilder);

        tracing::debug!(entity = %self.entity.tag, bindings = values.0.len(), "built filter query");

        Ok(FilterQuery {
            sql,
            bindings: values.0.iter().map(value_to_json).collect(),
        })
    }

    /// JSON 필터 텍스트에서 SQL과 바인딩 생성
    pub fn build_json(&self, json: &str) -> Result<FilterQuery> {
        let document = FilterDocument::parse(json)?;
        self.build(&document)
    }

    /// 값이 인라인된 SQL (표시용, 실행에 사용하지 말 것)
    pub fn inline_sql(&self, document: &FilterDocument) -> Result<String> {
        let (query, _) = self.statement(document)?;
        Ok(query.to_string(PostgresQueryBuilder))
    }
}
