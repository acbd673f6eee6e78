//! Bridge 미들웨어
//!
//! 요청 ID, 현재 주체 컨텍스트, 액션 게이트 미들웨어를 정의합니다.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gk_core::policy::{AttributeBag, Decision, Subject, SubjectResolver};
use uuid::Uuid;

use crate::state::AppState;

/// 주체 ID 헤더
pub const SUBJECT_HEADER: &str = "x-gatekeep-subject";

/// 게이트 거부 응답 메시지
pub const ACCESS_DENIED: &str = "Access denied - User does not have permission for this action";

#[derive(Clone, Debug)]
pub struct RequestId(#[allow(dead_code)] pub String);

tokio::task_local! {
    static REQUEST_ID: String;
    static CURRENT_SUBJECT: Option<AttributeBag>;
}

pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|id| id.clone()).ok()
}

/// 현재 요청의 주체
pub fn current_subject() -> Option<AttributeBag> {
    CURRENT_SUBJECT.try_with(|s| s.clone()).ok().flatten()
}

pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = Uuid::new_v4().to_string();
    req.extensions_mut().insert(RequestId(id.clone()));
    let mut resp = REQUEST_ID.scope(id.clone(), async move { next.run(req).await }).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        resp.headers_mut().insert("x-request-id", value);
    }
    resp
}

/// 헤더의 주체 ID를 디렉터리에서 찾아 task-local에 설정
///
/// 헤더가 없거나 알 수 없는 ID면 주체 없음으로 진행합니다.
pub async fn subject_context(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let subject = req
        .headers()
        .get(SUBJECT_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|id| {
            let found = state.subjects.get(id.trim()).cloned();
            if found.is_none() {
                tracing::debug!(subject = id, "unknown subject id");
            }
            found
        });

    CURRENT_SUBJECT.scope(subject, next.run(req)).await
}

/// 현재 요청 task-local에서 주체를 찾는 리졸버
pub struct TaskLocalSubjectResolver;

impl SubjectResolver for TaskLocalSubjectResolver {
    fn resolve(&self) -> Option<Box<dyn Subject>> {
        current_subject().map(|bag| Box::new(bag) as Box<dyn Subject>)
    }
}

/// 액션 게이트
///
/// 평가 실패(에러 포함)는 모두 403으로 거부합니다.
pub async fn require_action(
    state: Arc<AppState>,
    action: &'static str,
    req: Request,
    next: Next,
) -> Response {
    // 규칙 파일 읽기는 블로킹 스레드에서, 주체 task-local은 그대로 넘김
    let subject = current_subject();
    let decision = tokio::task::spawn_blocking(move || {
        CURRENT_SUBJECT.sync_scope(subject, || state.gate.check(action, None))
    })
    .await
    .unwrap_or_else(|e| {
        tracing::error!(action, "rule check task failed: {}", e);
        Decision::deny(Some(e.to_string()))
    });
    if !decision.allowed {
        tracing::info!(action, reason = ?decision.reason, "request denied");
        return (
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({ "message": ACCESS_DENIED })),
        )
            .into_response();
    }
    next.run(req).await
}
