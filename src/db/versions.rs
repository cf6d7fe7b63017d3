//! # 버전 스냅샷 쿼리
//!
//! `document_versions` 테이블은 append-only입니다. 버전은 생성만 되고 수정되지 않습니다.

use crate::error::AppError;
use crate::models::{CreateVersionRequest, UserIdentity, Version};
use sqlx::SqlitePool;

/// 새 버전 스냅샷을 저장합니다.
///
/// 버전 번호는 문서별 `MAX(version_number) + 1`로 정해지며, 표기는 `"{번호}.0"`입니다.
/// 번호 계산과 삽입은 `BEGIN IMMEDIATE` 트랜잭션 안에서 실행됩니다.
/// 쓰기 잠금을 먼저 잡으므로 동시에 들어온 요청은 같은 번호를 읽지 않고 차례를 기다립니다.
pub async fn create_version(
    pool: &SqlitePool,
    document_id: &str,
    content: &str,
    request: &CreateVersionRequest,
    word_count: i64,
    section_count: i64,
    created_by: &UserIdentity,
) -> Result<Version, AppError> {
    let id = uuid::Uuid::now_v7().to_string();
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

    let next_version: i64 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(version_number), 0) + 1 FROM document_versions WHERE document_id = ?",
    )
    .bind(document_id)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO document_versions (
            id, document_id, version_number, version_label, content,
            summary, effective_date, change_notes, word_count, section_count,
            created_by_id, created_by_name
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(document_id)
    .bind(next_version)
    .bind(format!("{}.0", next_version))
    .bind(content)
    .bind(&request.summary)
    .bind(&request.effective_date)
    .bind(&request.change_notes)
    .bind(word_count)
    .bind(section_count)
    .bind(&created_by.id)
    .bind(&created_by.name)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    get_version(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created version".to_string()))
}

/// 문서의 모든 버전을 최신순으로 조회합니다.
pub async fn list_versions(pool: &SqlitePool, document_id: &str) -> Result<Vec<Version>, AppError> {
    let versions = sqlx::query_as::<_, Version>(
        r#"
        SELECT id, document_id, version_label, version_number, content, html_content,
               summary, effective_date, change_notes, status, word_count, section_count,
               created_by_id, created_by_name, created_at
        FROM document_versions
        WHERE document_id = ?
        ORDER BY version_number DESC
        "#,
    )
    .bind(document_id)
    .fetch_all(pool)
    .await?;

    Ok(versions)
}

pub async fn get_version(pool: &SqlitePool, version_id: &str) -> Result<Option<Version>, AppError> {
    let version = sqlx::query_as::<_, Version>(
        r#"
        SELECT id, document_id, version_label, version_number, content, html_content,
               summary, effective_date, change_notes, status, word_count, section_count,
               created_by_id, created_by_name, created_at
        FROM document_versions
        WHERE id = ?
        "#,
    )
    .bind(version_id)
    .fetch_optional(pool)
    .await?;

    Ok(version)
}
