//! /check-sql 핸들러
//!
//! 필터 문서를 설정된 루트 엔티티 기준 SQL로 컴파일합니다.
//! DB가 설정되어 있으면 쿼리를 실제로 실행해 결과 행도 반환합니다.

use std::sync::Arc;

use axum::{extract::State, Json};
use gk_core::filter::FilterDocument;
use gk_sql::{FilterQuery, SelectBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgPool, PgRow};
use sqlx::query::Query;
use sqlx::{Column, Postgres, Row, TypeInfo};

use crate::error::{BridgeError, Result};
use crate::state::AppState;

/// /check-sql 요청 본문
#[derive(Debug, Deserialize)]
pub struct CheckSqlRequest {
    /// JSON 필터 텍스트 또는 객체
    #[serde(default)]
    pub filters: Value,
}

/// /check-sql 응답 본문
#[derive(Debug, Serialize)]
pub struct CheckSqlResponse {
    pub result: bool,
    pub message: String,
    pub data: CheckSqlData,
}

#[derive(Debug, Serialize)]
pub struct CheckSqlData {
    pub sql: String,
    pub bindings: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Value>>,
}

/// /check-sql 핸들러
pub async fn check_sql(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CheckSqlRequest>,
) -> Result<Json<CheckSqlResponse>> {
    let document = match request.filters {
        Value::String(text) => FilterDocument::parse(&text)?,
        Value::Object(map) => FilterDocument::from_value(Value::Object(map))?,
        Value::Null => {
            return Err(BridgeError::BadRequest {
                message: "Missing 'filters'".to_string(),
            })
        }
        _ => {
            return Err(BridgeError::BadRequest {
                message: "'filters' must be a JSON string or object".to_string(),
            })
        }
    };

    let builder = SelectBuilder::new(&state.schema, &state.config.filter_root)?;
    let FilterQuery { sql, bindings } = builder.build(&document)?;

    let Some(pool) = &state.pool else {
        return Ok(Json(CheckSqlResponse {
            result: true,
            message: "SQL generated".to_string(),
            data: CheckSqlData {
                sql,
                bindings,
                rows: None,
            },
        }));
    };

    let response = match execute(pool, &sql, &bindings).await {
        Ok(rows) => CheckSqlResponse {
            result: true,
            message: format!("Query executed, {} row(s)", rows.len()),
            data: CheckSqlData {
                sql,
                bindings,
                rows: Some(rows),
            },
        },
        Err(e) => {
            tracing::warn!("Query execution failed: {:?}", e);
            CheckSqlResponse {
                result: false,
                message: e.to_string(),
                data: CheckSqlData {
                    sql,
                    bindings,
                    rows: None,
                },
            }
        }
    };

    Ok(Json(response))
}

async fn execute(pool: &PgPool, sql: &str, bindings: &[Value]) -> sqlx::Result<Vec<Value>> {
    let rows = bind_values(sqlx::query::<Postgres>(sql), bindings)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(row_to_json).collect())
}

fn bind_values<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    values: &[Value],
) -> Query<'q, Postgres, PgArguments> {
    for value in values {
        match value {
            Value::Null => query = query.bind(None::<String>),
            Value::Bool(b) => query = query.bind(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    query = query.bind(i);
                } else if let Some(f) = n.as_f64() {
                    query = query.bind(f);
                } else {
                    query = query.bind(n.to_string());
                }
            }
            Value::String(s) => query = query.bind(s.clone()),
            Value::Array(_) | Value::Object(_) => {
                query = query.bind(sqlx::types::Json(value.clone()));
            }
        }
    }
    query
}

fn row_to_json(row: PgRow) -> Value {
    let mut obj = serde_json::Map::new();
    for column in row.columns() {
        let name = column.name();
        let type_name = column.type_info().name().to_ascii_uppercase();
        let value = match type_name.as_str() {
            "INT2" => row
                .try_get::<Option<i16>, _>(name)
                .ok()
                .flatten()
                .map(Value::from),
            "INT4" => row
                .try_get::<Option<i32>, _>(name)
                .ok()
                .flatten()
                .map(Value::from),
            "INT8" => row
                .try_get::<Option<i64>, _>(name)
                .ok()
                .flatten()
                .map(Value::from),
            "FLOAT4" | "FLOAT8" => row
                .try_get::<Option<f64>, _>(name)
                .ok()
                .flatten()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number),
            "BOOL" => row
                .try_get::<Option<bool>, _>(name)
                .ok()
                .flatten()
                .map(Value::Bool),
            "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(name).ok().flatten(),
            _ => row
                .try_get::<Option<String>, _>(name)
                .ok()
                .flatten()
                .map(Value::String),
        }
        .unwrap_or(Value::Null);

        obj.insert(name.to_string(), value);
    }
    Value::Object(obj)
}
