//! # 비교 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST /api/v1/comparisons`               → 두 버전 비교 (ComparisonResult)
//! - `POST /api/v1/documents/{id}/preview`     → 이전 버전과 현재 내용 비교
//! - `POST /api/v1/comparisons/side-by-side`  → 나란히 보기 정렬 블록
//! - `POST /api/v1/comparisons/render`        → 비교 결과 HTML (`text/html`)
//! - `GET  /api/v1/documents/{id}/comparisons` → 비교 이력 (최신순)

use crate::{
    db,
    error::AppError,
    middleware::identity::CurrentUser,
    models::*,
    services::render,
};
use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use serde_json::{json, Value};

use super::documents::AppState;

pub async fn compare_versions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CompareRequest>,
) -> Result<Json<ComparisonResult>, AppError> {
    let result = state
        .comparisons
        .compare_versions(&req.source_version_id, &req.target_version_id, &req.options, &user)
        .await?;
    Ok(Json(result))
}

/// `POST /documents/{id}/preview`: 새 버전을 확정하기 전에 무엇이 바뀔지 미리 봅니다.
pub async fn preview_changes(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<PreviewRequest>,
) -> Result<Json<ComparisonResult>, AppError> {
    let result = state
        .comparisons
        .compare_with_version(&id, &req.previous_version_id, &req.options, &user)
        .await?;
    Ok(Json(result))
}

pub async fn side_by_side(
    State(state): State<AppState>,
    Json(req): Json<SideBySideRequest>,
) -> Result<Json<SideBySideView>, AppError> {
    let view = state
        .comparisons
        .get_side_by_side_view(&req.left_version_id, &req.right_version_id, &req.options)
        .await?;
    Ok(Json(view))
}

/// `POST /comparisons/render`: 비교 결과를 바로 붙여 넣을 수 있는 HTML 조각으로 돌려줍니다.
///
/// `unified`는 변경 목록을 (이력도 남김), `side_by_side`는 정렬 블록 표를 렌더링합니다.
pub async fn render_comparison(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<RenderRequest>,
) -> Result<Html<String>, AppError> {
    let html = match req.layout {
        RenderLayout::Unified => {
            let result = state
                .comparisons
                .compare_versions(&req.source_version_id, &req.target_version_id, &req.options, &user)
                .await?;
            render::generate_unified_diff_html(&result.changes)
        }
        RenderLayout::SideBySide => {
            let view = state
                .comparisons
                .get_side_by_side_view(&req.source_version_id, &req.target_version_id, &req.options)
                .await?;
            render::generate_side_by_side_html(&view.aligned_blocks)
        }
    };
    Ok(Html(html))
}

pub async fn list_document_comparisons(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    db::get_document(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let comparisons = state.comparisons.history(&id).await?;
    Ok(Json(json!({ "comparisons": comparisons })))
}
