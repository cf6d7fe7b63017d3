use serde::{Deserialize, Serialize};

/// 편집 중인 정책 문서의 메타데이터
///
/// 현재 내용은 `file_path`가 가리키는 마크다운 파일에 있고,
/// 확정된 스냅샷은 `document_versions` 테이블에 쌓입니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub file_path: String,
    pub word_count: i64,
    pub char_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateDocumentRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentContent {
    pub content: String,
}
