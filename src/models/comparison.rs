//! 비교 엔진의 입출력 타입
//!
//! 변경 항목(`ChangeItem`)과 단어 단위 변경(`WordChange`)은 한 번의 비교 동안만 존재합니다.
//! 저장되는 것은 집계값만 담은 `ComparisonHistoryRecord`뿐입니다.

use serde::{Deserialize, Serialize};

use super::Version;

/// 변경 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Added,
    Removed,
    Modified,
    Moved,
    Unchanged,
}

impl ChangeType {
    /// HTML 클래스 이름 등에 쓰는 소문자 표기
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeType::Added => "added",
            ChangeType::Removed => "removed",
            ChangeType::Modified => "modified",
            ChangeType::Moved => "moved",
            ChangeType::Unchanged => "unchanged",
        }
    }
}

/// 변경이 일어난 블록의 종류 (줄 모양으로 추정)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Paragraph,
    Heading,
    List,
    Table,
    Image,
    Section,
}

/// 변경의 중요도
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Significance {
    Major,
    Minor,
    Cosmetic,
}

/// 변경 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeCategory {
    /// 본문 내용 변경
    Content,
    /// 공백/문장부호/대소문자만 다름
    Formatting,
    /// 제목 변경이나 위치 이동
    Structure,
}

/// 단어 하나의 변경
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordChange {
    pub change_type: ChangeType,
    pub text: String,
    /// 단어 diff 출력 안에서의 순번
    pub position: usize,
}

/// 원본과 대상 사이에서 감지된 변경 하나
///
/// - Added: `new_*` 필드만 채워집니다.
/// - Removed: `original_*` 필드만 채워집니다.
/// - Modified: 양쪽 모두와 `word_changes`가 채워집니다.
/// - Moved: 양쪽 모두 채워지고 `word_changes`는 없습니다.
///
/// 위치는 공백 줄을 제외한 줄 목록 기준의 0부터 시작하는 인덱스입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeItem {
    pub id: usize,
    pub change_type: ChangeType,
    pub block_type: BlockType,
    pub section_number: Option<String>,
    pub section_title: Option<String>,
    pub original_text: Option<String>,
    pub original_position: Option<usize>,
    pub new_text: Option<String>,
    pub new_position: Option<usize>,
    pub word_changes: Option<Vec<WordChange>>,
    pub significance: Significance,
    pub category: Option<ChangeCategory>,
}

/// 섹션 비교 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Added,
    Removed,
    Modified,
    Unchanged,
}

/// 한 섹션을 두 버전에서 맞춰 본 결과
///
/// Unchanged 섹션의 `changes`는 항상 비어 있고,
/// Added/Removed 섹션은 없는 쪽의 내용이 `None`입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionComparison {
    pub section_number: String,
    pub section_title: String,
    pub status: SectionStatus,
    pub original_content: Option<String>,
    pub new_content: Option<String>,
    pub changes: Vec<ChangeItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subsections: Vec<SectionComparison>,
}

/// 비교 결과의 집계 통계
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub additions: usize,
    pub deletions: usize,
    pub modifications: usize,
    pub moves: usize,
    pub total_changes: usize,
    pub major_changes: usize,
    pub minor_changes: usize,
    pub cosmetic_changes: usize,
    /// 대상 단어 수 - 원본 단어 수
    pub word_count_delta: i64,
    /// round(100 × 변경 수 / 원본 줄 수). 짧은 줄 여러 개가 긴 줄 몇 개로 바뀌면 100을 넘을 수 있습니다.
    pub percent_changed: i64,
    pub source_line_count: usize,
}

/// 두 버전 비교의 최종 결과
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub source_version: Version,
    pub target_version: Version,
    pub summary: ComparisonSummary,
    pub changes: Vec<ChangeItem>,
    pub sections: Vec<SectionComparison>,
    pub compared_at: String,
    pub compared_by_id: String,
    pub compared_by_name: String,
}

/// 나란히 보기의 한 행
///
/// Added/Removed 행은 한쪽이 `None`이고, Unchanged 행은 양쪽이 모두 있습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedBlock {
    pub line_number: usize,
    pub left_content: Option<String>,
    pub right_content: Option<String>,
    pub change_type: ChangeType,
    pub left_html: Option<String>,
    pub right_html: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SideBySideView {
    pub left_version: Version,
    pub right_version: Version,
    pub aligned_blocks: Vec<AlignedBlock>,
}

/// 비교 옵션
///
/// JSON 요청에서 생략된 필드는 기본값을 사용합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareOptions {
    /// 공백 연속을 하나로 보고 앞뒤 공백을 무시
    pub ignore_whitespace: bool,
    /// 대소문자 무시
    pub ignore_case: bool,
    /// 인접한 삭제+추가를 수정으로 합치고 단어 단위 diff를 계산
    pub word_level: bool,
    /// 내용이 같은 삭제+추가를 이동으로 합침
    pub detect_moves: bool,
    /// 하위 섹션(예: 1.2)을 상위 섹션(1) 아래에 중첩
    pub nest_subsections: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            ignore_whitespace: false,
            ignore_case: false,
            word_level: true,
            detect_moves: false,
            nest_subsections: false,
        }
    }
}

/// 저장되는 비교 이력 (집계값과 버전 참조만)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ComparisonHistoryRecord {
    pub id: String,
    pub document_id: String,
    pub source_version_id: Option<String>,
    /// 현재 내용과 비교한 경우 None
    pub target_version_id: Option<String>,
    pub additions: i64,
    pub deletions: i64,
    pub modifications: i64,
    pub major_changes: i64,
    pub minor_changes: i64,
    pub cosmetic_changes: i64,
    pub word_count_delta: i64,
    pub percent_changed: i64,
    pub compared_by_id: String,
    pub compared_by_name: String,
    pub compared_at: String,
}

impl ComparisonHistoryRecord {
    pub fn from_result(result: &ComparisonResult) -> Self {
        let summary = &result.summary;
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            document_id: result.target_version.document_id.clone(),
            source_version_id: result.source_version.id.clone(),
            target_version_id: result.target_version.id.clone(),
            additions: summary.additions as i64,
            deletions: summary.deletions as i64,
            modifications: summary.modifications as i64,
            major_changes: summary.major_changes as i64,
            minor_changes: summary.minor_changes as i64,
            cosmetic_changes: summary.cosmetic_changes as i64,
            word_count_delta: summary.word_count_delta,
            percent_changed: summary.percent_changed,
            compared_by_id: result.compared_by_id.clone(),
            compared_by_name: result.compared_by_name.clone(),
            compared_at: result.compared_at.clone(),
        }
    }
}

/// `POST /comparisons` 요청 본문
#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub source_version_id: String,
    pub target_version_id: String,
    #[serde(default)]
    pub options: CompareOptions,
}

/// `POST /documents/{id}/preview` 요청 본문
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub previous_version_id: String,
    #[serde(default)]
    pub options: CompareOptions,
}

/// `POST /comparisons/side-by-side` 요청 본문
#[derive(Debug, Deserialize)]
pub struct SideBySideRequest {
    pub left_version_id: String,
    pub right_version_id: String,
    #[serde(default)]
    pub options: CompareOptions,
}

/// HTML 렌더링 형태
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderLayout {
    #[default]
    Unified,
    SideBySide,
}

/// `POST /comparisons/render` 요청 본문
#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub source_version_id: String,
    pub target_version_id: String,
    #[serde(default)]
    pub options: CompareOptions,
    #[serde(default)]
    pub layout: RenderLayout,
}
