//! Gatekeep Bridge
//!
//! JSON 필터 → SQL 확인 엔드포인트(`/check-sql`)와
//! 규칙 기반 액션 게이트로 보호되는 엔드포인트(`/submit-form`)를 제공합니다.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::{from_fn, from_fn_with_state, Next};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod middleware;
mod state;
mod subjects;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 환경변수 로드
    dotenvy::dotenv().ok();

    // 로깅 초기화
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gk_bridge=debug,gk_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 설정 로드
    let config = Config::from_env()?;
    tracing::info!("Starting Bridge with config: {:?}", config);

    // 앱 상태 초기화
    let state = Arc::new(AppState::load(&config).await?);

    // 라우터 구성
    let app = create_router(state);

    // 서버 시작
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Bridge listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// 라우터 생성
fn create_router(state: Arc<AppState>) -> Router {
    let submit_form_gate = from_fn_with_state(
        state.clone(),
        |State(state): State<Arc<AppState>>, req: Request, next: Next| {
            middleware::require_action(state, "submit_form", req, next)
        },
    );

    Router::new()
        .route("/check-sql", post(handlers::filter::check_sql))
        .route(
            "/submit-form",
            post(handlers::form::submit_form).route_layer(submit_form_gate),
        )
        // Health check
        .route("/health", get(handlers::health::health_check))
        // Middleware
        .layer(from_fn_with_state(state.clone(), middleware::subject_context))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(from_fn(middleware::request_id))
        // State
        .with_state(state)
}
