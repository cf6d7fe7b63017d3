//! # 라우트 핸들러 모듈
//!
//! 각 하위 모듈:
//! - `comparisons`: 버전 비교, 미리보기, 나란히 보기, HTML 렌더링, 비교 이력
//! - `documents`: 문서 생성/조회와 현재 내용 읽기/쓰기
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `versions`: 버전 목록/조회/생성

pub mod comparisons;
pub mod documents;
pub mod health;
pub mod versions;

pub use comparisons::*;
pub use documents::*;
pub use health::*;
pub use versions::*;

use axum::{
    routing::{get, post},
    Router,
};

/// `/api/v1` 아래에 중첩될 API 라우터를 만듭니다.
///
/// 경로 파라미터는 axum 0.8 문법(`{id}`)을 씁니다.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/documents", post(create_document))
        .route("/documents/{id}", get(get_document))
        .route(
            "/documents/{id}/content",
            get(get_document_content).put(update_document_content),
        )
        .route(
            "/documents/{id}/versions",
            get(list_document_versions).post(create_version),
        )
        .route("/documents/{id}/preview", post(preview_changes))
        .route("/documents/{id}/comparisons", get(list_document_comparisons))
        .route("/versions/{id}", get(get_version))
        .route("/comparisons", post(compare_versions))
        .route("/comparisons/side-by-side", post(side_by_side))
        .route("/comparisons/render", post(render_comparison))
        .route("/health", get(health_check))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
    use tower::ServiceExt;

    use super::*;
    use crate::config::DiffPolicy;
    use crate::db::SqliteStore;
    use crate::services::{ComparisonService, DiffEngine};

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    async fn test_app(dir: &tempfile::TempDir) -> Router {
        app_with_pool(dir, test_pool().await)
    }

    fn app_with_pool(dir: &tempfile::TempDir, pool: SqlitePool) -> Router {
        let documents_path = dir.path().to_str().unwrap().to_string();
        let store: Arc<dyn crate::db::VersionStore> =
            Arc::new(SqliteStore::new(pool.clone(), documents_path.clone()));
        let comparisons = Arc::new(ComparisonService::new(
            store.clone(),
            DiffEngine::new(DiffPolicy::default()),
        ));

        api_router(AppState {
            pool,
            documents_path,
            store,
            comparisons,
        })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("X-User-Id", "u-1")
            .header("X-User-Name", "Editor");
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = send(app, method, uri, body).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&dir).await;

        let (status, body) = send_json(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn unknown_version_is_404_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&dir).await;

        let (status, body) = send_json(&app, "GET", "/versions/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");

        let (status, _) = send_json(
            &app,
            "POST",
            "/comparisons",
            Some(json!({ "source_version_id": "a", "target_version_id": "b" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn failed_document_insert_leaves_no_markdown_file() {
        let dir = tempfile::tempdir().unwrap();
        let pool = test_pool().await;
        let app = app_with_pool(&dir, pool.clone());
        pool.close().await;

        let (status, body) = send_json(
            &app,
            "POST",
            "/documents",
            Some(json!({ "title": "Leave Policy", "content": "1. Leave\nRules." })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "database_error");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn version_lifecycle_and_comparison() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&dir).await;

        let (status, doc) = send_json(
            &app,
            "POST",
            "/documents",
            Some(json!({
                "title": "Code of Conduct",
                "content": "1. Purpose\nThis policy governs conduct.\n2. Scope\nApplies to all staff."
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let doc_id = doc["id"].as_str().unwrap().to_string();
        assert_eq!(doc["word_count"], 12);

        let (status, v1) = send_json(
            &app,
            "POST",
            &format!("/documents/{}/versions", doc_id),
            Some(json!({ "change_notes": "initial" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(v1["version_label"], "1.0");
        assert_eq!(v1["created_by_name"], "Editor");

        let (status, _) = send_json(
            &app,
            "PUT",
            &format!("/documents/{}/content", doc_id),
            Some(json!({
                "content": "1. Purpose\nThis policy governs employee conduct.\n2. Scope\nApplies to all staff.\n3. Enforcement\nViolations result in discipline."
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        // 확정 전 미리보기
        let (status, preview) = send_json(
            &app,
            "POST",
            &format!("/documents/{}/preview", doc_id),
            Some(json!({ "previous_version_id": v1["id"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(preview["target_version"]["id"], Value::Null);
        assert_eq!(preview["summary"]["modifications"], 1);

        let (status, v2) = send_json(&app, "POST", &format!("/documents/{}/versions", doc_id), None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(v2["version_number"], 2);

        let (status, listed) =
            send_json(&app, "GET", &format!("/documents/{}/versions", doc_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed["versions"][0]["version_label"], "2.0");
        assert_eq!(listed["versions"][1]["version_label"], "1.0");

        let (status, result) = send_json(
            &app,
            "POST",
            "/comparisons",
            Some(json!({
                "source_version_id": v1["id"],
                "target_version_id": v2["id"],
                "options": { "detect_moves": true }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(result["summary"]["modifications"], 1);
        assert_eq!(result["summary"]["additions"], 2);
        assert_eq!(result["sections"][2]["status"], "added");
        assert_eq!(result["compared_by_id"], "u-1");

        let (status, history) =
            send_json(&app, "GET", &format!("/documents/{}/comparisons", doc_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history["comparisons"].as_array().unwrap().len(), 2);

        let (status, view) = send_json(
            &app,
            "POST",
            "/comparisons/side-by-side",
            Some(json!({ "left_version_id": v1["id"], "right_version_id": v2["id"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(!view["aligned_blocks"].as_array().unwrap().is_empty());

        let (status, html) = send(
            &app,
            "POST",
            "/comparisons/render",
            Some(json!({
                "source_version_id": v1["id"],
                "target_version_id": v2["id"],
                "layout": "side_by_side"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(html).unwrap();
        assert!(html.starts_with("<table class=\"diff-side-by-side\">"));
        assert!(html.contains("<ins class=\"diff-added\">3. Enforcement</ins>"));

        let (status, html) = send(
            &app,
            "POST",
            "/comparisons/render",
            Some(json!({
                "source_version_id": v1["id"],
                "target_version_id": v2["id"],
                "layout": "unified"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(html).unwrap();
        assert!(html.starts_with("<div class=\"diff-unified\">"));
        assert_eq!(html.matches("<div class=\"diff-line diff-").count(), 3);
        assert!(html.contains("<ins class=\"diff-added\">employee</ins>"));
    }
}
