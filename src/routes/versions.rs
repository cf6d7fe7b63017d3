//! # 버전 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET  /api/v1/documents/{id}/versions` → 버전 목록 (최신순, 본문 제외)
//! - `POST /api/v1/documents/{id}/versions` → 현재 내용을 새 버전으로 확정
//! - `GET  /api/v1/versions/{id}`           → 버전 하나 (본문 포함)

use crate::{
    db,
    error::AppError,
    middleware::identity::CurrentUser,
    models::*,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use super::documents::AppState;

pub async fn list_document_versions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    db::get_document(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let versions = state.store.get_versions_for_document(&id).await?;
    let summaries: Vec<VersionSummary> = versions.iter().map(VersionSummary::from).collect();
    Ok(Json(json!({ "versions": summaries })))
}

pub async fn get_version(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Version>, AppError> {
    let version = state
        .store
        .get_version(&id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(version))
}

/// `POST /documents/{id}/versions`: 문서의 현재 내용을 불변 스냅샷으로 저장합니다.
///
/// 본문은 선택 사항입니다. 보내지 않으면 메모 없이 버전을 만듭니다.
pub async fn create_version(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    req: Option<Json<CreateVersionRequest>>,
) -> Result<(StatusCode, Json<Version>), AppError> {
    let content = state
        .store
        .get_current_content(&id)
        .await?
        .ok_or(AppError::NotFound)?;
    let req = req.map(|Json(req)| req).unwrap_or_default();

    let version = state.store.create_version(&id, &content, &req, &user).await?;
    tracing::info!(
        document_id = %id,
        version = %version.version_label,
        created_by = %user.name,
        "Created version"
    );
    Ok((StatusCode::CREATED, Json(version)))
}
