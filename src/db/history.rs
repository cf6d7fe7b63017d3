//! # 비교 이력 쿼리
//!
//! 변경 목록 전체가 아닌 집계 카운터와 버전 참조만 저장합니다.

use crate::error::AppError;
use crate::models::ComparisonHistoryRecord;
use sqlx::SqlitePool;

pub async fn save_comparison_history(
    pool: &SqlitePool,
    record: &ComparisonHistoryRecord,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO comparison_history (
            id, document_id, source_version_id, target_version_id,
            additions, deletions, modifications,
            major_changes, minor_changes, cosmetic_changes,
            word_count_delta, percent_changed,
            compared_by_id, compared_by_name, compared_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.id)
    .bind(&record.document_id)
    .bind(&record.source_version_id)
    .bind(&record.target_version_id)
    .bind(record.additions)
    .bind(record.deletions)
    .bind(record.modifications)
    .bind(record.major_changes)
    .bind(record.minor_changes)
    .bind(record.cosmetic_changes)
    .bind(record.word_count_delta)
    .bind(record.percent_changed)
    .bind(&record.compared_by_id)
    .bind(&record.compared_by_name)
    .bind(&record.compared_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// 문서의 비교 이력을 최신순으로 조회합니다.
pub async fn list_comparison_history(
    pool: &SqlitePool,
    document_id: &str,
) -> Result<Vec<ComparisonHistoryRecord>, AppError> {
    let records = sqlx::query_as::<_, ComparisonHistoryRecord>(
        r#"
        SELECT id, document_id, source_version_id, target_version_id,
               additions, deletions, modifications,
               major_changes, minor_changes, cosmetic_changes,
               word_count_delta, percent_changed,
               compared_by_id, compared_by_name, compared_at
        FROM comparison_history
        WHERE document_id = ?
        ORDER BY compared_at DESC, id DESC
        "#,
    )
    .bind(document_id)
    .fetch_all(pool)
    .await?;

    Ok(records)
}
