//! # 정책 문서 비교 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 데이터베이스 연결 풀 생성과 마이그레이션
//! 4. 문서 저장 디렉토리 생성
//! 5. 버전 저장소와 비교 서비스 구성
//! 6. API 라우터 설정 후 HTTP 서버 시작

mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use config::Config;
use db::{SqliteStore, VersionStore};
use routes::AppState;
use services::{ComparisonService, DiffEngine};
use sqlx::sqlite::SqlitePoolOptions;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // RUST_LOG가 없으면 이 크레이트와 tower_http를 debug 레벨로 출력합니다.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "policy_compare=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting policy-compare server on {}:{}", config.host, config.port);
    tracing::debug!(policy = ?config.diff_policy, "Loaded diff policy");

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    // sqlx::migrate!는 컴파일 타임에 ./migrations 폴더의 SQL 파일들을 포함시킵니다.
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    let documents_path = Path::new(&config.documents_path);
    if !documents_path.exists() {
        tokio::fs::create_dir_all(documents_path).await?;
        tracing::info!("Created documents directory: {}", config.documents_path);
    }

    // 저장소와 비교 서비스는 상태가 없으므로 Arc로 한 번 만들어 모든 요청이 공유합니다.
    let store: Arc<dyn VersionStore> =
        Arc::new(SqliteStore::new(pool.clone(), config.documents_path.clone()));
    let comparisons = Arc::new(ComparisonService::new(
        store.clone(),
        DiffEngine::new(config.diff_policy.clone()),
    ));

    let state = AppState {
        pool,
        documents_path: config.documents_path.clone(),
        store,
        comparisons,
    };

    // 개발 환경 기준으로 모든 출처를 허용합니다. 프로덕션에서는 호스트 도메인만 허용해야 합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api/v1", routes::api_router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
