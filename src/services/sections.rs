//! # 섹션 분석기
//!
//! 문서를 번호가 붙은 섹션으로 나누고, 두 버전의 섹션을 서로 맞춰
//! 변경을 문서 구조 단위로 보여줍니다.
//!
//! - 제목 인식: `1.`, `2.3`, `4)` 같은 번호 또는 `Section 5:` 표기 + 같은 줄의 제목
//! - 첫 제목 이전의 텍스트는 어떤 섹션에도 속하지 않으며 버려집니다.
//! - 섹션 매칭: 같은 번호가 우선, 없으면 제목 Jaccard 유사도가 임계값을 넘는 섹션
//! - 정렬: 번호를 점으로 나눈 숫자 단위로 비교 ("2" < "10")

use std::cmp::Ordering;

use crate::models::{BlockType, ChangeItem, CompareOptions, SectionComparison, SectionStatus};
use crate::services::diff::DiffEngine;
use crate::services::text;

/// 문서에서 잘라낸 섹션 하나
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub number: String,
    pub title: String,
    /// 제목 줄 다음부터 다음 제목 직전까지의 본문
    pub content: String,
}

impl Section {
    fn heading(&self) -> String {
        format!("{} {}", self.number, self.title)
    }
}

/// 문서를 섹션 목록으로 나눕니다. 제목을 하나도 찾지 못하면 빈 목록입니다.
pub fn parse_sections(content: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<(String, String, Vec<&str>)> = None;

    for line in content.lines() {
        if let Some((number, title)) = text::parse_heading(line) {
            if let Some(done) = current.take() {
                sections.push(finish(done));
            }
            current = Some((number, title, Vec::new()));
        } else if let Some((_, _, body)) = current.as_mut() {
            body.push(line);
        }
    }
    if let Some(done) = current {
        sections.push(finish(done));
    }
    sections
}

fn finish((number, title, body): (String, String, Vec<&str>)) -> Section {
    Section {
        number,
        title,
        content: body.join("\n").trim().to_string(),
    }
}

/// 섹션 번호를 점 단위 숫자로 비교합니다. 숫자가 아닌 조각은 문자열로 비교합니다.
pub fn compare_section_numbers(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ordering = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(x), Ok(y)) => x.cmp(&y),
                    _ => x.cmp(y),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

/// 두 버전의 섹션을 맞춰 비교합니다.
///
/// 매칭된 섹션은 본문을 줄 단위로 diff하여 변경이 있으면 Modified, 없으면 Unchanged입니다.
/// 제목이나 번호만 바뀐 경우에도 제목 줄 변경 하나를 담은 Modified가 됩니다.
/// 짝이 없는 원본 섹션은 Removed, 남은 대상 섹션은 Added입니다.
pub fn compare_sections(
    engine: &DiffEngine,
    source_text: &str,
    target_text: &str,
    options: &CompareOptions,
) -> Vec<SectionComparison> {
    let source_sections = parse_sections(source_text);
    let target_sections = parse_sections(target_text);
    let mut claimed = vec![false; target_sections.len()];
    let mut comparisons = Vec::with_capacity(source_sections.len() + target_sections.len());

    for source in &source_sections {
        let matched = find_match(engine, source, &target_sections, &claimed);
        let comparison = match matched {
            Some(index) => {
                claimed[index] = true;
                compare_pair(engine, source, &target_sections[index], options)
            }
            None => SectionComparison {
                section_number: source.number.clone(),
                section_title: source.title.clone(),
                status: SectionStatus::Removed,
                original_content: Some(source.content.clone()),
                new_content: None,
                changes: Vec::new(),
                subsections: Vec::new(),
            },
        };
        comparisons.push(comparison);
    }

    for (target, _) in target_sections
        .iter()
        .zip(&claimed)
        .filter(|(_, claimed)| !**claimed)
    {
        comparisons.push(SectionComparison {
            section_number: target.number.clone(),
            section_title: target.title.clone(),
            status: SectionStatus::Added,
            original_content: None,
            new_content: Some(target.content.clone()),
            changes: Vec::new(),
            subsections: Vec::new(),
        });
    }

    comparisons.sort_by(|a, b| compare_section_numbers(&a.section_number, &b.section_number));

    if options.nest_subsections {
        nest_subsections(comparisons)
    } else {
        comparisons
    }
}

/// 같은 번호를 먼저 찾고, 없으면 제목 유사도로 찾습니다. 이미 짝지어진 대상은 건너뜁니다.
fn find_match(
    engine: &DiffEngine,
    source: &Section,
    targets: &[Section],
    claimed: &[bool],
) -> Option<usize> {
    let unclaimed = move || {
        targets
            .iter()
            .enumerate()
            .filter(move |(index, _)| !claimed[*index])
    };

    unclaimed()
        .find(|(_, target)| target.number == source.number)
        .or_else(|| {
            unclaimed().find(|(_, target)| {
                text::jaccard(&source.title, &target.title)
                    > engine.policy().section_title_similarity
            })
        })
        .map(|(index, _)| index)
}

fn compare_pair(
    engine: &DiffEngine,
    source: &Section,
    target: &Section,
    options: &CompareOptions,
) -> SectionComparison {
    let source_lines = text::content_lines(&source.content);
    let target_lines = text::content_lines(&target.content);
    let mut changes = engine.diff_lines(&source_lines, &target_lines, options);

    let (source_heading, target_heading) = (source.heading(), target.heading());
    let title_changed = text::normalize_line(&source_heading, options).trim()
        != text::normalize_line(&target_heading, options).trim();
    if title_changed {
        changes.insert(0, title_change(engine, source, target));
        for (index, change) in changes.iter_mut().enumerate() {
            change.id = index + 1;
        }
    }

    for change in &mut changes {
        change.section_number = Some(target.number.clone());
        change.section_title = Some(target.title.clone());
    }

    SectionComparison {
        section_number: target.number.clone(),
        section_title: target.title.clone(),
        status: if changes.is_empty() {
            SectionStatus::Unchanged
        } else {
            SectionStatus::Modified
        },
        original_content: Some(source.content.clone()),
        new_content: Some(target.content.clone()),
        changes,
        subsections: Vec::new(),
    }
}

/// 제목 줄(번호 포함) 자체의 수정. 위치 필드는 본문 줄 위치와 섞이지 않도록 비워 둡니다.
fn title_change(engine: &DiffEngine, source: &Section, target: &Section) -> ChangeItem {
    let mut change = engine.modification(&source.heading(), &target.heading());
    change.block_type = BlockType::Section;
    change
}

/// 번호가 `부모.자식` 형태인 섹션을 가장 가까운 상위 섹션 아래로 옮깁니다.
///
/// 입력은 번호순으로 정렬되어 있어야 합니다. 상위 섹션이 목록에 없으면 최상위에 남습니다.
pub fn nest_subsections(flat: Vec<SectionComparison>) -> Vec<SectionComparison> {
    let mut roots: Vec<SectionComparison> = Vec::new();
    for section in flat {
        insert_nested(&mut roots, section);
    }
    roots
}

fn insert_nested(siblings: &mut Vec<SectionComparison>, section: SectionComparison) {
    if let Some(last) = siblings.last_mut() {
        if is_ancestor(&last.section_number, &section.section_number) {
            insert_nested(&mut last.subsections, section);
            return;
        }
    }
    siblings.push(section);
}

fn is_ancestor(parent: &str, child: &str) -> bool {
    child.len() > parent.len()
        && child.starts_with(parent)
        && child.as_bytes()[parent.len()] == b'.'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChangeType;

    fn compare(source: &str, target: &str) -> Vec<SectionComparison> {
        compare_sections(&DiffEngine::default(), source, target, &CompareOptions::default())
    }

    #[test]
    fn parses_sections_and_drops_preamble() {
        let sections = parse_sections(
            "Company handbook\n\n1. Purpose\nThis policy governs conduct.\n\nSection 2: Scope\nApplies to all staff.\nIncluding contractors.",
        );
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].number, "1");
        assert_eq!(sections[0].title, "Purpose");
        assert_eq!(sections[0].content, "This policy governs conduct.");
        assert_eq!(sections[1].number, "2");
        assert_eq!(sections[1].title, "Scope");
        assert_eq!(sections[1].content, "Applies to all staff.\nIncluding contractors.");
    }

    #[test]
    fn text_without_headings_has_no_sections() {
        assert!(parse_sections("Just a paragraph.\nAnother one.").is_empty());
        assert!(parse_sections("").is_empty());
        assert!(compare("no headings", "still none").is_empty());
    }

    #[test]
    fn sections_matched_by_number_are_modified_in_place() {
        let result = compare(
            "2. Scope\nApplies to contractors.",
            "2. Scope\nApplies to contractors and interns.",
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].section_number, "2");
        assert_eq!(result[0].status, SectionStatus::Modified);
        assert!(!result[0].changes.is_empty());
        assert!(result[0]
            .changes
            .iter()
            .all(|c| c.section_number.as_deref() == Some("2")));
    }

    #[test]
    fn renumbered_section_is_matched_by_title() {
        let result = compare(
            "1. Purpose\nText.\n2. Annual leave entitlement\nTwenty days.",
            "1. Purpose\nText.\n3. Annual leave entitlement\nTwenty days.",
        );
        assert_eq!(result.len(), 2);
        assert_eq!(result[1].section_number, "3");
        assert_eq!(result[1].status, SectionStatus::Modified);
        assert_eq!(result[1].changes.len(), 1);
        assert_eq!(result[1].changes[0].block_type, BlockType::Section);
        assert_eq!(result[1].changes[0].change_type, ChangeType::Modified);
    }

    #[test]
    fn unmatched_sections_are_added_or_removed() {
        let result = compare(
            "1. Purpose\nText.\n2. Legacy rules\nOld.",
            "1. Purpose\nText.\n3. Enforcement\nViolations result in discipline.",
        );
        let statuses: Vec<_> = result
            .iter()
            .map(|s| (s.section_number.as_str(), s.status))
            .collect();
        assert_eq!(
            statuses,
            vec![
                ("1", SectionStatus::Unchanged),
                ("2", SectionStatus::Removed),
                ("3", SectionStatus::Added),
            ]
        );
        assert!(result[0].changes.is_empty());
        assert!(result[1].new_content.is_none());
        assert!(result[2].original_content.is_none());
    }

    #[test]
    fn section_numbers_sort_numerically() {
        let mut numbers = vec!["10", "2", "1.10", "1.2", "1"];
        numbers.sort_by(|a, b| compare_section_numbers(a, b));
        assert_eq!(numbers, vec!["1", "1.2", "1.10", "2", "10"]);
    }

    #[test]
    fn subsections_nest_under_nearest_ancestor() {
        let source = "1. General\nA.\n1.1 Definitions\nB.\n1.1.1 Staff\nC.\n2. Leave\nD.\n3.1 Orphan\nE.";
        let options = CompareOptions {
            nest_subsections: true,
            ..CompareOptions::default()
        };
        let result = compare_sections(&DiffEngine::default(), source, source, &options);

        let top: Vec<_> = result.iter().map(|s| s.section_number.as_str()).collect();
        assert_eq!(top, vec!["1", "2", "3.1"]);
        assert_eq!(result[0].subsections.len(), 1);
        assert_eq!(result[0].subsections[0].section_number, "1.1");
        assert_eq!(result[0].subsections[0].subsections[0].section_number, "1.1.1");
        assert!(!is_ancestor("1", "10"));
    }
}
