//! # 문서(Document) 라우트 핸들러
//!
//! 비교할 버전의 원천이 되는 문서와 그 현재 내용(마크다운)을 다룹니다.
//!
//! ## 엔드포인트
//! - `POST   /api/v1/documents`             → 새 문서 생성 (초기 내용 선택)
//! - `GET    /api/v1/documents/{id}`         → 단일 문서 조회
//! - `GET    /api/v1/documents/{id}/content` → 현재 내용 조회
//! - `PUT    /api/v1/documents/{id}/content` → 현재 내용 저장
//!
//! 반환 타입이 `Result<T, AppError>`이면 Axum이
//! `Ok(T)`는 응답으로, `Err(AppError)`는 에러 JSON 응답으로 변환합니다.

use std::sync::Arc;

use crate::{
    db::{self, VersionStore},
    error::AppError,
    models::*,
    services::{self, text, ComparisonService},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// Axum의 State Extractor는 요청마다 clone하므로, 무거운 값은 `Arc`로 감쌉니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (내부적으로 Arc로 공유)
    pub pool: SqlitePool,
    /// 마크다운 문서 저장 디렉토리 경로
    pub documents_path: String,
    /// 버전 저장소
    pub store: Arc<dyn VersionStore>,
    /// 비교 서비스
    pub comparisons: Arc<ComparisonService>,
}

/// `GET /documents/{id}`: 단일 문서를 조회합니다.
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, AppError> {
    let document = db::get_document(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(document))
}

/// `POST /documents`: 새 문서를 생성합니다.
///
/// 마크다운 파일을 먼저 디스크에 쓰고, DB에 메타데이터를 저장합니다.
/// DB 저장이 실패하면 방금 쓴 파일을 지웁니다.
/// 제목이 없으면 "Untitled", 내용이 없으면 빈 파일입니다.
pub async fn create_document(
    State(state): State<AppState>,
    Json(req): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<Document>), AppError> {
    let title = req
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("Untitled");
    let content = req.content.as_deref().unwrap_or_default();

    let id = uuid::Uuid::now_v7().to_string();
    let file_path = services::generate_file_path(title, &id);
    let slug = slug::slugify(title);

    services::write_markdown(&state.documents_path, &file_path, content).await?;
    if let Err(e) = db::create_document(&state.pool, &id, title, &file_path, &slug).await {
        if let Err(cleanup) = services::remove_markdown(&state.documents_path, &file_path).await {
            tracing::warn!(file_path = %file_path, "Failed to remove orphaned markdown file: {}", cleanup);
        }
        return Err(e);
    }
    db::update_document_stats(
        &state.pool,
        &id,
        text::count_words(content) as i64,
        text::count_chars(content) as i64,
    )
    .await?;

    let document = db::get_document(&state.pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created document".to_string()))?;

    tracing::info!(document_id = %document.id, title = %document.title, "Created document");
    Ok((StatusCode::CREATED, Json(document)))
}

/// `GET /documents/{id}/content`: 문서의 현재 마크다운 내용을 조회합니다.
///
/// 응답: `{ "content": "1. Purpose\n..." }`
pub async fn get_document_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DocumentContent>, AppError> {
    let document = db::get_document(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let content = services::read_markdown(&state.documents_path, &document.file_path).await?;
    Ok(Json(DocumentContent { content }))
}

/// `PUT /documents/{id}/content`: 문서의 현재 내용을 저장합니다.
///
/// 디스크 파일을 덮어쓰고 단어 수/글자 수를 갱신합니다.
/// 저장만 할 뿐 버전을 만들지는 않습니다. 버전은 `POST /documents/{id}/versions`로 확정합니다.
pub async fn update_document_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<DocumentContent>,
) -> Result<Json<Value>, AppError> {
    let document = db::get_document(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    services::write_markdown(&state.documents_path, &document.file_path, &req.content).await?;

    let word_count = text::count_words(&req.content) as i64;
    let char_count = text::count_chars(&req.content) as i64;
    db::update_document_stats(&state.pool, &id, word_count, char_count).await?;

    Ok(Json(json!({
        "word_count": word_count,
        "char_count": char_count
    })))
}
