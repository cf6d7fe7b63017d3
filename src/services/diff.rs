//! # Diff 엔진
//!
//! 두 문서 텍스트 사이의 차이를 LCS(최장 공통 부분 수열)로 계산합니다.
//!
//! 처리 순서:
//! 1. `compute_line_diff()`: 줄 단위 LCS로 삭제/추가 목록을 만듭니다.
//! 2. `detect_moves()`: (옵션) 내용이 같은 삭제+추가 쌍을 이동으로 합칩니다.
//! 3. `detect_modifications()`: (옵션) 가까운 삭제+추가 쌍을 수정으로 합치고 단어 diff를 붙입니다.
//!
//! 모든 함수는 메모리 위의 문자열만 다루는 동기 순수 함수입니다.
//! LCS 표는 O(n·m) 시간/공간을 쓰므로 호출자가 입력 크기를 제한해야 합니다.

use std::collections::{HashMap, HashSet, VecDeque};

use sha2::{Digest, Sha256};

use crate::config::DiffPolicy;
use crate::models::{
    AlignedBlock, BlockType, ChangeCategory, ChangeItem, ChangeType, CompareOptions, Significance,
    WordChange,
};
use crate::services::{render, text};

/// LCS 역추적으로 얻은 편집 스크립트의 한 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    /// (원본 인덱스, 대상 인덱스)
    Equal(usize, usize),
    Delete(usize),
    Insert(usize),
}

/// 고전적인 DP로 LCS 표를 채우고 `dp[m][n]`에서 역추적하여 편집 스크립트를 만듭니다.
///
/// 일치 구간 사이의 빈틈에서는 삭제가 추가보다 먼저 나옵니다.
fn edit_script<T: PartialEq>(source: &[T], target: &[T]) -> Vec<Edit> {
    let m = source.len();
    let n = target.len();
    let width = n + 1;
    // (m+1)×(n+1) 표를 1차원 Vec에 펼쳐 둡니다.
    let mut dp = vec![0u32; (m + 1) * width];
    for i in 1..=m {
        for j in 1..=n {
            dp[i * width + j] = if source[i - 1] == target[j - 1] {
                dp[(i - 1) * width + (j - 1)] + 1
            } else {
                dp[(i - 1) * width + j].max(dp[i * width + (j - 1)])
            };
        }
    }

    let mut matches = Vec::with_capacity(dp[m * width + n] as usize);
    let (mut i, mut j) = (m, n);
    while i > 0 && j > 0 {
        if source[i - 1] == target[j - 1] {
            matches.push((i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if dp[(i - 1) * width + j] >= dp[i * width + (j - 1)] {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    matches.reverse();

    let mut script = Vec::with_capacity(m + n);
    let (mut si, mut ti) = (0, 0);
    for (ms, mt) in matches {
        script.extend((si..ms).map(Edit::Delete));
        script.extend((ti..mt).map(Edit::Insert));
        script.push(Edit::Equal(ms, mt));
        si = ms + 1;
        ti = mt + 1;
    }
    script.extend((si..m).map(Edit::Delete));
    script.extend((ti..n).map(Edit::Insert));
    script
}

/// 단어 단위 diff. 공백으로 토큰을 나눈 뒤 같은 LCS를 적용합니다.
///
/// 결과를 순서대로 읽으면서 Unchanged와 Added 단어만 이으면 대상 토큰 목록이 됩니다.
pub fn compute_word_diff(source: &str, target: &str) -> Vec<WordChange> {
    let source_words = text::tokenize(source);
    let target_words = text::tokenize(target);

    edit_script(&source_words, &target_words)
        .into_iter()
        .enumerate()
        .map(|(position, edit)| {
            let (change_type, word) = match edit {
                Edit::Equal(_, t) => (ChangeType::Unchanged, target_words[t]),
                Edit::Delete(s) => (ChangeType::Removed, source_words[s]),
                Edit::Insert(t) => (ChangeType::Added, target_words[t]),
            };
            WordChange {
                change_type,
                text: word.to_string(),
                position,
            }
        })
        .collect()
}

/// 변경 목록을 원본 줄에 적용하여 대상 줄을 재구성합니다.
///
/// 삭제/수정/이동의 원래 위치를 지우고, 추가/수정/이동의 새 텍스트를
/// 새 위치 오름차순으로 끼워 넣습니다.
pub fn replay(source: &[&str], changes: &[ChangeItem]) -> Vec<String> {
    let removed: HashSet<usize> = changes
        .iter()
        .filter(|change| change.change_type != ChangeType::Added)
        .filter_map(|change| change.original_position)
        .collect();

    let mut lines: Vec<String> = source
        .iter()
        .enumerate()
        .filter(|(index, _)| !removed.contains(index))
        .map(|(_, line)| line.to_string())
        .collect();

    let mut inserted: Vec<(usize, &str)> = changes
        .iter()
        .filter(|change| change.change_type != ChangeType::Removed)
        .filter_map(|change| Some((change.new_position?, change.new_text.as_deref()?)))
        .collect();
    inserted.sort_by_key(|(position, _)| *position);

    for (position, line) in inserted {
        let at = position.min(lines.len());
        lines.insert(at, line.to_string());
    }
    lines
}

/// 줄/단어 diff와 중요도 분류를 수행하는 상태 없는 엔진
///
/// 정책 임계값만 들고 있으므로 요청마다 만들거나 복제해서 공유해도 됩니다.
#[derive(Debug, Clone, Default)]
pub struct DiffEngine {
    policy: DiffPolicy,
}

impl DiffEngine {
    pub fn new(policy: DiffPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &DiffPolicy {
        &self.policy
    }

    /// 옵션이 요청한 후처리까지 포함한 전체 줄 비교
    ///
    /// 이동 감지는 수정 감지보다 먼저 실행됩니다.
    /// 그래야 자리를 옮긴 동일한 줄이 "변경 없는 수정"으로 묶이지 않습니다.
    pub fn diff_lines(
        &self,
        source: &[&str],
        target: &[&str],
        options: &CompareOptions,
    ) -> Vec<ChangeItem> {
        let mut changes = self.compute_line_diff(source, target, options);
        if options.detect_moves {
            changes = self.detect_moves(changes, options);
        }
        if options.word_level {
            changes = self.detect_modifications(changes);
        }
        changes
    }

    /// 줄 단위 LCS diff
    ///
    /// 일치하지 않은 원본 줄은 Removed(원래 위치), 일치하지 않은 대상 줄은 Added(새 위치)가 되고,
    /// 일치한 줄은 결과에 나타나지 않습니다.
    /// 줄 비교는 `ignore_whitespace`/`ignore_case` 정규화를 거친 값으로 합니다.
    pub fn compute_line_diff(
        &self,
        source: &[&str],
        target: &[&str],
        options: &CompareOptions,
    ) -> Vec<ChangeItem> {
        let source_keys: Vec<_> = source.iter().map(|l| text::normalize_line(l, options)).collect();
        let target_keys: Vec<_> = target.iter().map(|l| text::normalize_line(l, options)).collect();

        let mut changes = Vec::new();
        for edit in edit_script(&source_keys, &target_keys) {
            let change = match edit {
                Edit::Equal(..) => continue,
                Edit::Delete(s) => self.removed_change(source[s], s),
                Edit::Insert(t) => self.added_change(target[t], t),
            };
            changes.push(change);
        }
        renumber(&mut changes);
        changes
    }

    /// 삭제 뒤쪽 `pairing_window`개 변경 안에서 아직 쓰이지 않은 추가 변경을 찾아,
    /// 단어 집합 Jaccard 유사도가 임계값을 넘으면 하나의 Modified로 합칩니다.
    ///
    /// 전역 최적 짝짓기가 아니라 창 안에서 처음 찾은 후보를 쓰는 탐욕 휴리스틱입니다.
    /// 짝을 찾지 못한 삭제/추가는 그대로 남습니다.
    pub fn detect_modifications(&self, changes: Vec<ChangeItem>) -> Vec<ChangeItem> {
        let len = changes.len();
        let mut slots: Vec<Option<ChangeItem>> = changes.into_iter().map(Some).collect();
        let mut result = Vec::with_capacity(len);

        for i in 0..len {
            let Some(current) = slots[i].take() else {
                continue;
            };
            if current.change_type != ChangeType::Removed {
                result.push(current);
                continue;
            }

            let original = current.original_text.as_deref().unwrap_or_default();
            let window_end = (i + 1 + self.policy.pairing_window).min(len);
            let partner = (i + 1..window_end).find(|&j| {
                slots[j].as_ref().is_some_and(|candidate| {
                    candidate.change_type == ChangeType::Added
                        && text::jaccard(original, candidate.new_text.as_deref().unwrap_or_default())
                            > self.policy.pairing_similarity
                })
            });

            match partner.and_then(|j| slots[j].take()) {
                Some(added) => result.push(self.modified_change(&current, &added)),
                None => result.push(current),
            }
        }

        renumber(&mut result);
        result
    }

    /// 정규화한 내용의 SHA-256이 같은 삭제/추가 쌍을 순서대로 Moved로 합칩니다.
    ///
    /// LCS가 이미 순서가 유지되는 일치를 모두 소비하므로,
    /// 남은 동일 내용 쌍은 실제로 자리를 옮긴 줄입니다.
    /// 원래 위치와 새 위치가 같은 쌍은 이동이 아니므로 짝짓지 않습니다.
    pub fn detect_moves(&self, changes: Vec<ChangeItem>, options: &CompareOptions) -> Vec<ChangeItem> {
        let digest = |line: &str| -> Vec<u8> {
            Sha256::digest(text::normalize_line(line, options).as_bytes()).to_vec()
        };

        let mut removed_by_hash: HashMap<Vec<u8>, VecDeque<usize>> = HashMap::new();
        for (index, change) in changes.iter().enumerate() {
            if let (ChangeType::Removed, Some(line)) = (change.change_type, &change.original_text) {
                removed_by_hash.entry(digest(line.as_str())).or_default().push_back(index);
            }
        }

        // 삭제 인덱스 → 짝이 된 추가 인덱스
        let mut pairs: HashMap<usize, usize> = HashMap::new();
        let mut paired_additions: HashSet<usize> = HashSet::new();
        for (index, change) in changes.iter().enumerate() {
            let (ChangeType::Added, Some(line)) = (change.change_type, &change.new_text) else {
                continue;
            };
            let Some(queue) = removed_by_hash.get_mut(&digest(line.as_str())) else {
                continue;
            };
            let candidate = queue
                .iter()
                .position(|&removed| changes[removed].original_position != change.new_position);
            if let Some(removed) = candidate.and_then(|slot| queue.remove(slot)) {
                pairs.insert(removed, index);
                paired_additions.insert(index);
            }
        }
        if pairs.is_empty() {
            return changes;
        }

        let mut result = Vec::with_capacity(changes.len() - pairs.len());
        for (index, change) in changes.iter().enumerate() {
            if paired_additions.contains(&index) {
                continue;
            }
            match pairs.get(&index) {
                Some(&added) => result.push(moved_change(change, &changes[added])),
                None => result.push(change.clone()),
            }
        }
        renumber(&mut result);
        result
    }

    /// 변경 중요도를 분류합니다.
    ///
    /// - 공백/문장부호/대소문자를 지운 결과가 같으면 Cosmetic
    /// - `1 - 공통 단어 / max(원본 단어, 새 단어)`가 임계값을 넘거나
    ///   단어 수 차이가 임계값을 넘으면 Major
    /// - 나머지는 Minor
    pub fn assess_significance(&self, original: &str, new: &str) -> Significance {
        if text::strip_formatting(original) == text::strip_formatting(new) {
            return Significance::Cosmetic;
        }

        let original_words = text::plain_words(original);
        let new_words = text::plain_words(new);
        let original_set: HashSet<&str> = original_words.iter().map(String::as_str).collect();
        let new_set: HashSet<&str> = new_words.iter().map(String::as_str).collect();

        let common = original_set.intersection(&new_set).count();
        let largest = original_set.len().max(new_set.len());
        let change_ratio = if largest == 0 {
            0.0
        } else {
            1.0 - common as f64 / largest as f64
        };
        let word_delta = original_words.len().abs_diff(new_words.len());

        if change_ratio > self.policy.major_change_ratio || word_delta > self.policy.major_word_delta {
            Significance::Major
        } else {
            Significance::Minor
        }
    }

    /// 나란히 보기용 정렬
    ///
    /// `compute_line_diff`와 달리 공백 줄도 포함한 모든 줄을 정렬합니다.
    /// 행 번호는 원래 줄 번호와 무관하게 1부터 증가합니다.
    pub fn align_blocks(&self, left: &str, right: &str, options: &CompareOptions) -> Vec<AlignedBlock> {
        let left_lines: Vec<&str> = left.lines().collect();
        let right_lines: Vec<&str> = right.lines().collect();
        let left_keys: Vec<_> = left_lines.iter().map(|l| text::normalize_line(l, options)).collect();
        let right_keys: Vec<_> = right_lines.iter().map(|l| text::normalize_line(l, options)).collect();

        edit_script(&left_keys, &right_keys)
            .into_iter()
            .enumerate()
            .map(|(row, edit)| {
                let (change_type, left_content, right_content) = match edit {
                    Edit::Equal(l, r) => (ChangeType::Unchanged, Some(left_lines[l]), Some(right_lines[r])),
                    Edit::Delete(l) => (ChangeType::Removed, Some(left_lines[l]), None),
                    Edit::Insert(r) => (ChangeType::Added, None, Some(right_lines[r])),
                };
                AlignedBlock {
                    line_number: row + 1,
                    left_content: left_content.map(str::to_string),
                    right_content: right_content.map(str::to_string),
                    change_type,
                    left_html: left_content.map(|line| render::line_html(line, change_type)),
                    right_html: right_content.map(|line| render::line_html(line, change_type)),
                }
            })
            .collect()
    }

    fn removed_change(&self, line: &str, position: usize) -> ChangeItem {
        let significance = self.assess_significance(line, "");
        let block_type = text::detect_block_type(line);
        ChangeItem {
            id: 0,
            change_type: ChangeType::Removed,
            block_type,
            section_number: text::extract_section_number(line),
            section_title: None,
            original_text: Some(line.to_string()),
            original_position: Some(position),
            new_text: None,
            new_position: None,
            word_changes: None,
            significance,
            category: Some(category_for(block_type, significance)),
        }
    }

    fn added_change(&self, line: &str, position: usize) -> ChangeItem {
        let significance = self.assess_significance("", line);
        let block_type = text::detect_block_type(line);
        ChangeItem {
            id: 0,
            change_type: ChangeType::Added,
            block_type,
            section_number: text::extract_section_number(line),
            section_title: None,
            original_text: None,
            original_position: None,
            new_text: Some(line.to_string()),
            new_position: Some(position),
            word_changes: None,
            significance,
            category: Some(category_for(block_type, significance)),
        }
    }

    /// 삭제와 추가를 하나의 수정으로 합칩니다. 위치와 섹션 정보는 양쪽에서 가져옵니다.
    fn modified_change(&self, removed: &ChangeItem, added: &ChangeItem) -> ChangeItem {
        let mut change = self.modification(
            removed.original_text.as_deref().unwrap_or_default(),
            added.new_text.as_deref().unwrap_or_default(),
        );
        change.original_position = removed.original_position;
        change.new_position = added.new_position;
        change.section_number = added
            .section_number
            .clone()
            .or_else(|| removed.section_number.clone());
        change.section_title = added.section_title.clone().or_else(|| removed.section_title.clone());
        change
    }

    /// 두 텍스트 사이의 Modified 변경 (단어 diff 포함). 블록 종류는 새 텍스트 기준이며 위치는 비어 있습니다.
    ///
    /// 한쪽 단어 수가 `max_line_words`를 넘으면 단어 diff는 비워 둡니다.
    pub fn modification(&self, original: &str, new: &str) -> ChangeItem {
        let significance = self.assess_significance(original, new);
        let words = original.split_whitespace().count().max(new.split_whitespace().count());
        let word_changes = (words <= self.policy.max_line_words).then(|| compute_word_diff(original, new));
        let block_type = text::detect_block_type(new);
        ChangeItem {
            id: 0,
            change_type: ChangeType::Modified,
            block_type,
            section_number: text::extract_section_number(new),
            section_title: None,
            original_text: Some(original.to_string()),
            original_position: None,
            new_text: Some(new.to_string()),
            new_position: None,
            word_changes,
            significance,
            category: Some(category_for(block_type, significance)),
        }
    }
}

fn moved_change(removed: &ChangeItem, added: &ChangeItem) -> ChangeItem {
    ChangeItem {
        id: 0,
        change_type: ChangeType::Moved,
        block_type: added.block_type,
        section_number: added.section_number.clone(),
        section_title: added.section_title.clone(),
        original_text: removed.original_text.clone(),
        original_position: removed.original_position,
        new_text: added.new_text.clone(),
        new_position: added.new_position,
        word_changes: None,
        significance: Significance::Minor,
        category: Some(ChangeCategory::Structure),
    }
}

fn category_for(block_type: BlockType, significance: Significance) -> ChangeCategory {
    match (block_type, significance) {
        (_, Significance::Cosmetic) => ChangeCategory::Formatting,
        (BlockType::Heading | BlockType::Section, _) => ChangeCategory::Structure,
        _ => ChangeCategory::Content,
    }
}

/// 변경 식별자를 1부터 순서대로 다시 매깁니다.
fn renumber(changes: &mut [ChangeItem]) {
    for (index, change) in changes.iter_mut().enumerate() {
        change.id = index + 1;
    }
}
