//! # 버전 저장소 추상화
//!
//! 비교 서비스는 버전 조회, 현재 내용 조회, 이력 저장만 필요합니다.
//! 이 기능들을 `VersionStore` 트레이트로 묶어 두면 서비스는 SQLite를 몰라도 되고,
//! 테스트에서는 메모리 저장소로 바꿔 끼울 수 있습니다.
//!
//! 트레이트 객체(`Arc<dyn VersionStore>`)로 공유하기 위해 `async_trait`을 사용합니다.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::{ComparisonHistoryRecord, CreateVersionRequest, UserIdentity, Version};
use crate::services::{markdown, sections, text};

#[async_trait]
pub trait VersionStore: Send + Sync {
    async fn get_version(&self, version_id: &str) -> Result<Option<Version>, AppError>;

    /// 문서의 버전 목록 (최신순)
    async fn get_versions_for_document(&self, document_id: &str) -> Result<Vec<Version>, AppError>;

    /// 새 스냅샷을 저장합니다. 번호는 저장소가 매깁니다.
    async fn create_version(
        &self,
        document_id: &str,
        content: &str,
        request: &CreateVersionRequest,
        created_by: &UserIdentity,
    ) -> Result<Version, AppError>;

    /// 문서의 저장되지 않은 현재 내용. 문서나 내용이 없으면 `None`.
    async fn get_current_content(&self, document_id: &str) -> Result<Option<String>, AppError>;

    async fn save_comparison_history(&self, record: &ComparisonHistoryRecord) -> Result<(), AppError>;

    async fn list_comparison_history(
        &self,
        document_id: &str,
    ) -> Result<Vec<ComparisonHistoryRecord>, AppError>;
}

/// SQLite + 마크다운 파일 기반 저장소
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    documents_path: String,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool, documents_path: impl Into<String>) -> Self {
        Self {
            pool,
            documents_path: documents_path.into(),
        }
    }
}

#[async_trait]
impl VersionStore for SqliteStore {
    async fn get_version(&self, version_id: &str) -> Result<Option<Version>, AppError> {
        super::get_version(&self.pool, version_id).await
    }

    async fn get_versions_for_document(&self, document_id: &str) -> Result<Vec<Version>, AppError> {
        super::list_versions(&self.pool, document_id).await
    }

    async fn create_version(
        &self,
        document_id: &str,
        content: &str,
        request: &CreateVersionRequest,
        created_by: &UserIdentity,
    ) -> Result<Version, AppError> {
        let word_count = text::count_words(content) as i64;
        let section_count = sections::parse_sections(content).len() as i64;
        super::create_version(
            &self.pool,
            document_id,
            content,
            request,
            word_count,
            section_count,
            created_by,
        )
        .await
    }

    async fn get_current_content(&self, document_id: &str) -> Result<Option<String>, AppError> {
        let Some(doc) = super::get_document(&self.pool, document_id).await? else {
            return Ok(None);
        };

        match markdown::read_markdown(&self.documents_path, &doc.file_path).await {
            Ok(content) => Ok(Some(content)),
            Err(AppError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn save_comparison_history(&self, record: &ComparisonHistoryRecord) -> Result<(), AppError> {
        super::save_comparison_history(&self.pool, record).await
    }

    async fn list_comparison_history(
        &self,
        document_id: &str,
    ) -> Result<Vec<ComparisonHistoryRecord>, AppError> {
        super::list_comparison_history(&self.pool, document_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::sync::Arc;

    async fn store_with_document(dir: &tempfile::TempDir) -> (SqliteStore, String) {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();

        let documents_path = dir.path().to_str().unwrap().to_string();
        let doc = super::super::create_document(&pool, "doc-1", "Leave Policy", "leave.md", "leave-policy")
            .await
            .unwrap();
        (SqliteStore::new(pool, documents_path), doc.id)
    }

    #[tokio::test]
    async fn versions_are_numbered_per_document() {
        let dir = tempfile::tempdir().unwrap();
        let (store, doc_id) = store_with_document(&dir).await;
        let author = UserIdentity::new("u-1", "Hana");

        let first = store
            .create_version(&doc_id, "1. Purpose\nRules.", &CreateVersionRequest::default(), &author)
            .await
            .unwrap();
        let second = store
            .create_version(
                &doc_id,
                "1. Purpose\nRules apply.\n2. Scope\nAll staff.",
                &CreateVersionRequest {
                    change_notes: Some("add scope".into()),
                    ..Default::default()
                },
                &author,
            )
            .await
            .unwrap();

        assert_eq!(first.version_number, 1);
        assert_eq!(first.version_label, "1.0");
        assert_eq!(second.version_number, 2);
        assert_eq!(second.version_label, "2.0");
        assert_eq!(second.section_count, Some(2));
        assert_eq!(second.word_count, Some(8));
        assert_eq!(second.created_by_name, "Hana");

        let listed = store.get_versions_for_document(&doc_id).await.unwrap();
        let numbers: Vec<i64> = listed.iter().map(|v| v.version_number).collect();
        assert_eq!(numbers, vec![2, 1]);

        let fetched = store
            .get_version(second.id.as_deref().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.change_notes.as_deref(), Some("add scope"));
        assert!(store.get_version("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn current_content_comes_from_markdown_file() {
        let dir = tempfile::tempdir().unwrap();
        let (store, doc_id) = store_with_document(&dir).await;

        assert_eq!(store.get_current_content(&doc_id).await.unwrap(), None);
        assert_eq!(store.get_current_content("unknown").await.unwrap(), None);

        markdown::write_markdown(dir.path().to_str().unwrap(), "leave.md", "draft text")
            .await
            .unwrap();
        assert_eq!(
            store.get_current_content(&doc_id).await.unwrap().as_deref(),
            Some("draft text")
        );
    }

    #[tokio::test]
    async fn concurrent_version_creation_gets_distinct_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let options = SqliteConnectOptions::new()
            .filename(dir.path().join("versions.db"))
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        super::super::create_document(&pool, "doc-1", "Leave Policy", "leave.md", "leave-policy")
            .await
            .unwrap();
        let store = Arc::new(SqliteStore::new(pool, dir.path().to_str().unwrap().to_string()));

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .create_version(
                            "doc-1",
                            &format!("1. Leave\nRule {}", i),
                            &CreateVersionRequest::default(),
                            &UserIdentity::new("u-1", "Hana"),
                        )
                        .await
                })
            })
            .collect();

        let mut numbers = Vec::new();
        for task in tasks {
            numbers.push(task.await.unwrap().unwrap().version_number);
        }
        numbers.sort_unstable();
        assert_eq!(numbers, (1..=8).collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn history_round_trips_with_null_target() {
        let dir = tempfile::tempdir().unwrap();
        let (store, doc_id) = store_with_document(&dir).await;
        let author = UserIdentity::new("u-1", "Hana");
        let version = store
            .create_version(&doc_id, "text", &CreateVersionRequest::default(), &author)
            .await
            .unwrap();

        let record = ComparisonHistoryRecord {
            id: "h-1".into(),
            document_id: doc_id.clone(),
            source_version_id: version.id.clone(),
            target_version_id: None,
            additions: 1,
            deletions: 0,
            modifications: 2,
            major_changes: 1,
            minor_changes: 2,
            cosmetic_changes: 0,
            word_count_delta: 5,
            percent_changed: 100,
            compared_by_id: "u-1".into(),
            compared_by_name: "Hana".into(),
            compared_at: "2025-01-01T00:00:00Z".into(),
        };
        store.save_comparison_history(&record).await.unwrap();

        let history = store.list_comparison_history(&doc_id).await.unwrap();
        assert_eq!(history, vec![record]);
    }
}
