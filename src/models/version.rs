use serde::{Deserialize, Serialize};

/// 문서 내용의 불변 스냅샷
///
/// 버전은 한 번 생성되면 수정되지 않고, 문서별로 append-only 이력을 이룹니다.
/// `id`가 없는 버전은 아직 저장되지 않은 "현재 내용"을 나타냅니다 (미리보기 비교용).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Version {
    pub id: Option<String>,
    pub document_id: String,
    /// 사람이 읽는 버전 표기 (예: "3.0")
    pub version_label: String,
    /// 문서별로 1부터 단조 증가하는 번호. 현재 내용은 0.
    pub version_number: i64,
    pub content: String,
    pub html_content: Option<String>,
    pub summary: Option<String>,
    pub effective_date: Option<String>,
    pub change_notes: Option<String>,
    pub status: String,
    /// 저장된 단어 수. 없으면 비교 시 다시 계산합니다.
    pub word_count: Option<i64>,
    pub section_count: Option<i64>,
    pub created_by_id: String,
    pub created_by_name: String,
    pub created_at: String,
}

/// 버전 목록 응답용 요약 (본문 제외)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VersionSummary {
    pub id: String,
    pub document_id: String,
    pub version_label: String,
    pub version_number: i64,
    pub summary: Option<String>,
    pub change_notes: Option<String>,
    pub status: String,
    pub word_count: Option<i64>,
    pub section_count: Option<i64>,
    pub created_by_name: String,
    pub created_at: String,
}

impl From<&Version> for VersionSummary {
    fn from(version: &Version) -> Self {
        Self {
            id: version.id.clone().unwrap_or_default(),
            document_id: version.document_id.clone(),
            version_label: version.version_label.clone(),
            version_number: version.version_number,
            summary: version.summary.clone(),
            change_notes: version.change_notes.clone(),
            status: version.status.clone(),
            word_count: version.word_count,
            section_count: version.section_count,
            created_by_name: version.created_by_name.clone(),
            created_at: version.created_at.clone(),
        }
    }
}

/// `POST /documents/{id}/versions` 요청 본문
#[derive(Debug, Default, Deserialize)]
pub struct CreateVersionRequest {
    pub change_notes: Option<String>,
    pub summary: Option<String>,
    pub effective_date: Option<String>,
}
