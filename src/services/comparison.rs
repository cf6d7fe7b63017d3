//! # 비교 서비스
//!
//! 버전 조회, 줄 diff, 섹션 분석, 요약 계산을 하나로 묶는 진입점입니다.
//!
//! 계산 자체는 순수 함수이고, I/O는 저장소 조회와 이력 저장뿐입니다.
//! 이력 저장 실패는 로그만 남기고 비교 결과에는 영향을 주지 않습니다.

use std::sync::Arc;

use chrono::Utc;

use crate::db::VersionStore;
use crate::error::AppError;
use crate::models::*;
use crate::services::diff::DiffEngine;
use crate::services::{sections, text};

/// 저장되지 않은 현재 내용을 나타내는 임시 버전의 표기
pub const CURRENT_VERSION_LABEL: &str = "current";

/// 비교 요청을 처리하는 서비스
///
/// 상태가 없으므로 `Arc`로 감싸 모든 요청이 공유합니다.
pub struct ComparisonService {
    store: Arc<dyn VersionStore>,
    engine: DiffEngine,
}

impl ComparisonService {
    pub fn new(store: Arc<dyn VersionStore>, engine: DiffEngine) -> Self {
        Self { store, engine }
    }

    /// 저장된 두 버전을 비교하고 이력을 남깁니다.
    pub async fn compare_versions(
        &self,
        source_version_id: &str,
        target_version_id: &str,
        options: &CompareOptions,
        compared_by: &UserIdentity,
    ) -> Result<ComparisonResult, AppError> {
        let source = self.fetch_version(source_version_id).await?;
        let target = self.fetch_version(target_version_id).await?;

        let result = self.compare(source, target, options, compared_by)?;
        self.record_history(&result).await;
        Ok(result)
    }

    /// 이전 버전과 문서의 현재(저장 전) 내용을 비교합니다.
    ///
    /// 현재 내용은 id가 없는 0번 버전으로 취급되어 비교의 대상(새 쪽)이 됩니다.
    /// 버전이 다른 문서에 속하거나 문서에 현재 내용이 없으면 `NotFound`입니다.
    pub async fn compare_with_version(
        &self,
        document_id: &str,
        previous_version_id: &str,
        options: &CompareOptions,
        compared_by: &UserIdentity,
    ) -> Result<ComparisonResult, AppError> {
        let previous = self.fetch_version(previous_version_id).await?;
        if previous.document_id != document_id {
            return Err(AppError::NotFound);
        }

        let content = self
            .store
            .get_current_content(document_id)
            .await?
            .ok_or(AppError::NotFound)?;
        let current = current_version(document_id, content, compared_by);

        let result = self.compare(previous, current, options, compared_by)?;
        self.record_history(&result).await;
        Ok(result)
    }

    /// 나란히 보기용 정렬 블록. 섹션 분석과 이력 저장은 하지 않습니다.
    pub async fn get_side_by_side_view(
        &self,
        left_version_id: &str,
        right_version_id: &str,
        options: &CompareOptions,
    ) -> Result<SideBySideView, AppError> {
        let left = self.fetch_version(left_version_id).await?;
        let right = self.fetch_version(right_version_id).await?;
        self.check_size(&left.content, &right.content)?;

        let aligned_blocks = self.engine.align_blocks(&left.content, &right.content, options);
        Ok(SideBySideView {
            left_version: left,
            right_version: right,
            aligned_blocks,
        })
    }

    /// 문서의 비교 이력 (최신순)
    pub async fn history(&self, document_id: &str) -> Result<Vec<ComparisonHistoryRecord>, AppError> {
        self.store.list_comparison_history(document_id).await
    }

    /// 이미 가져온 두 버전을 비교합니다. 저장소를 건드리지 않습니다.
    ///
    /// 줄 diff와 섹션 비교는 같은 원문에서 각각 따로 계산됩니다.
    pub fn compare(
        &self,
        source: Version,
        target: Version,
        options: &CompareOptions,
        compared_by: &UserIdentity,
    ) -> Result<ComparisonResult, AppError> {
        self.check_size(&source.content, &target.content)?;

        let source_lines = text::content_lines(&source.content);
        let target_lines = text::content_lines(&target.content);
        let changes = self.engine.diff_lines(&source_lines, &target_lines, options);
        let sections =
            sections::compare_sections(&self.engine, &source.content, &target.content, options);
        let summary = summarize(&source, &target, &changes, source_lines.len());

        tracing::info!(
            source = %source.version_label,
            target = %target.version_label,
            changes = summary.total_changes,
            percent_changed = summary.percent_changed,
            "Compared versions"
        );

        Ok(ComparisonResult {
            source_version: source,
            target_version: target,
            summary,
            changes,
            sections,
            compared_at: timestamp(),
            compared_by_id: compared_by.id.clone(),
            compared_by_name: compared_by.name.clone(),
        })
    }

    async fn fetch_version(&self, version_id: &str) -> Result<Version, AppError> {
        self.store
            .get_version(version_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// LCS 비용은 줄 수의 제곱에 비례하므로 한쪽이라도 상한을 넘으면 거부합니다.
    ///
    /// 나란히 보기는 공백 줄까지 정렬하므로 공백 줄도 센 원래 줄 수를 기준으로 합니다.
    fn check_size(&self, source: &str, target: &str) -> Result<(), AppError> {
        let max_lines = self.engine.policy().max_lines;
        let source_lines = source.lines().count();
        let target_lines = target.lines().count();
        if source_lines > max_lines || target_lines > max_lines {
            tracing::debug!(source_lines, target_lines, max_lines, "Rejected oversized comparison");
            return Err(AppError::BadRequest(format!(
                "Documents larger than {} lines cannot be compared",
                max_lines
            )));
        }
        Ok(())
    }

    async fn record_history(&self, result: &ComparisonResult) {
        let record = ComparisonHistoryRecord::from_result(result);
        if let Err(e) = self.store.save_comparison_history(&record).await {
            tracing::warn!(document_id = %record.document_id, "Failed to save comparison history: {}", e);
        }
    }
}

/// 변경 목록에서 요약 통계를 계산합니다.
///
/// 단어 수는 버전에 저장된 값을 우선 쓰고, 없으면 본문에서 다시 셉니다.
pub fn summarize(
    source: &Version,
    target: &Version,
    changes: &[ChangeItem],
    source_line_count: usize,
) -> ComparisonSummary {
    let mut summary = ComparisonSummary {
        total_changes: changes.len(),
        source_line_count,
        ..Default::default()
    };

    for change in changes {
        match change.change_type {
            ChangeType::Added => summary.additions += 1,
            ChangeType::Removed => summary.deletions += 1,
            ChangeType::Modified => summary.modifications += 1,
            ChangeType::Moved => summary.moves += 1,
            ChangeType::Unchanged => {}
        }
        match change.significance {
            Significance::Major => summary.major_changes += 1,
            Significance::Minor => summary.minor_changes += 1,
            Significance::Cosmetic => summary.cosmetic_changes += 1,
        }
    }

    summary.word_count_delta = word_count(target) - word_count(source);
    summary.percent_changed = match (changes.len(), source_line_count) {
        (0, _) => 0,
        (_, 0) => 100,
        (changed, lines) => (100.0 * changed as f64 / lines as f64).round() as i64,
    };
    summary
}

fn word_count(version: &Version) -> i64 {
    version
        .word_count
        .unwrap_or_else(|| text::count_words(&version.content) as i64)
}

/// 문서의 현재 내용을 id 없는 임시 버전으로 감쌉니다.
fn current_version(document_id: &str, content: String, user: &UserIdentity) -> Version {
    Version {
        id: None,
        document_id: document_id.to_string(),
        version_label: CURRENT_VERSION_LABEL.to_string(),
        version_number: 0,
        content,
        html_content: None,
        summary: None,
        effective_date: None,
        change_notes: None,
        status: "draft".to_string(),
        word_count: None,
        section_count: None,
        created_by_id: user.id.clone(),
        created_by_name: user.name.clone(),
        created_at: timestamp(),
    }
}

/// SQLite `strftime('%Y-%m-%dT%H:%M:%fZ')`와 같은 형식의 현재 시각
fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
