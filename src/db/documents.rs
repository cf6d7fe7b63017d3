//! # 문서 데이터베이스 쿼리 모듈
//!
//! `documents` 테이블에 대한 쿼리 함수들입니다.
//! 문서의 현재 내용은 DB가 아니라 마크다운 파일에 있으므로,
//! 여기서는 메타데이터(제목, 경로, 통계)만 다룹니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

/// ID로 단일 문서를 조회합니다.
///
/// # 반환값
/// - `Ok(Some(Document))`: 문서를 찾은 경우
/// - `Ok(None)`: 해당 ID의 문서가 없는 경우
pub async fn get_document(pool: &SqlitePool, id: &str) -> Result<Option<Document>, AppError> {
    let doc = sqlx::query_as::<_, Document>(
        r#"
        SELECT id, title, slug, file_path, word_count, char_count, created_at, updated_at
        FROM documents
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(doc)
}

/// 새 문서를 생성합니다.
///
/// 나머지 컬럼(word_count, created_at 등)은 DEFAULT 값이 사용됩니다.
pub async fn create_document(
    pool: &SqlitePool,
    id: &str,
    title: &str,
    file_path: &str,
    slug: &str,
) -> Result<Document, AppError> {
    sqlx::query(
        r#"
        INSERT INTO documents (id, title, slug, file_path)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(slug)
    .bind(file_path)
    .execute(pool)
    .await?;

    get_document(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created document".to_string()))
}

/// 내용 저장 후 단어/문자 수와 수정 시각을 갱신합니다.
pub async fn update_document_stats(
    pool: &SqlitePool,
    id: &str,
    word_count: i64,
    char_count: i64,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE documents
        SET word_count = ?, char_count = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(word_count)
    .bind(char_count)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}
