//! # 비교 결과 HTML 렌더링
//!
//! 비교 결과를 화면에 붙여 넣을 수 있는 HTML 조각으로 만듭니다.
//! 모든 텍스트는 이스케이프되며, 추가는 `<ins>`, 삭제는 `<del>`로 표시합니다.

use crate::models::{AlignedBlock, ChangeItem, ChangeType, WordChange};

/// HTML 특수 문자를 이스케이프합니다.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// 한 줄을 변경 종류에 맞는 태그로 감쌉니다.
pub fn line_html(line: &str, change_type: ChangeType) -> String {
    let escaped = escape_html(line);
    match change_type {
        ChangeType::Added => format!("<ins class=\"diff-added\">{}</ins>", escaped),
        ChangeType::Removed => format!("<del class=\"diff-removed\">{}</del>", escaped),
        _ => escaped,
    }
}

/// 단어 diff를 인라인 HTML로 만듭니다. 단어는 공백 하나로 이어 붙입니다.
pub fn generate_inline_diff_html(words: &[WordChange]) -> String {
    words
        .iter()
        .map(|word| line_html(&word.text, word.change_type))
        .collect::<Vec<_>>()
        .join(" ")
}

/// 변경 목록을 한 줄에 하나씩 `<div>`로 나열합니다. 수정은 인라인 단어 diff로 보여줍니다.
pub fn generate_unified_diff_html(changes: &[ChangeItem]) -> String {
    let mut html = String::from("<div class=\"diff-unified\">");
    for change in changes {
        html.push_str(&format!(
            "<div class=\"diff-line diff-{}\" data-change-id=\"{}\">{}</div>",
            change.change_type.as_str(),
            change.id,
            change_body(change)
        ));
    }
    html.push_str("</div>");
    html
}

fn change_body(change: &ChangeItem) -> String {
    let original = change.original_text.as_deref().unwrap_or_default();
    let new = change.new_text.as_deref().unwrap_or_default();
    match change.change_type {
        ChangeType::Added => line_html(new, ChangeType::Added),
        ChangeType::Removed => line_html(original, ChangeType::Removed),
        ChangeType::Modified => match &change.word_changes {
            Some(words) => generate_inline_diff_html(words),
            None => format!(
                "{} {}",
                line_html(original, ChangeType::Removed),
                line_html(new, ChangeType::Added)
            ),
        },
        ChangeType::Moved => format!(
            "<span class=\"diff-moved\" data-from=\"{}\" data-to=\"{}\">{}</span>",
            change.original_position.unwrap_or_default(),
            change.new_position.unwrap_or_default(),
            escape_html(new)
        ),
        ChangeType::Unchanged => escape_html(new),
    }
}

/// 정렬된 블록을 두 칸짜리 표로 만듭니다.
pub fn generate_side_by_side_html(blocks: &[AlignedBlock]) -> String {
    let mut html = String::from("<table class=\"diff-side-by-side\"><tbody>");
    for block in blocks {
        let cell = |content: &Option<String>, rendered: &Option<String>| match (rendered, content) {
            (Some(rendered), _) => rendered.clone(),
            (None, Some(content)) => line_html(content, block.change_type),
            (None, None) => String::new(),
        };
        html.push_str(&format!(
            "<tr class=\"diff-{}\"><td class=\"line-number\">{}</td><td class=\"left\">{}</td><td class=\"right\">{}</td></tr>",
            block.change_type.as_str(),
            block.line_number,
            cell(&block.left_content, &block.left_html),
            cell(&block.right_content, &block.right_html),
        ));
    }
    html.push_str("</tbody></table>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CompareOptions;
    use crate::services::diff::{compute_word_diff, DiffEngine};

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn inline_diff_marks_added_and_removed_words() {
        let words = compute_word_diff("governs conduct", "governs <employee> conduct");
        assert_eq!(
            generate_inline_diff_html(&words),
            "governs <ins class=\"diff-added\">&lt;employee&gt;</ins> conduct"
        );
    }

    #[test]
    fn unified_renders_one_div_per_change() {
        let engine = DiffEngine::default();
        let moves = CompareOptions { detect_moves: true, ..CompareOptions::default() };

        let mut changes = engine.diff_lines(
            &["Intro", "Move <me>", "Middle", "End"],
            &["Intro", "Middle", "End", "Move <me>"],
            &moves,
        );
        changes.push(engine.modification("The quick brown fox", "The quick red fox"));
        let mut without_words = engine.modification("a < b", "a > b");
        without_words.word_changes = None;
        changes.push(without_words);
        changes.extend(engine.compute_line_diff(&[], &["New & improved"], &CompareOptions::default()));
        changes.extend(engine.compute_line_diff(&["Old \"rule\""], &[], &CompareOptions::default()));
        for (index, change) in changes.iter_mut().enumerate() {
            change.id = index + 1;
        }

        let html = generate_unified_diff_html(&changes);
        assert!(html.starts_with("<div class=\"diff-unified\">"));
        assert_eq!(html.matches("<div class=\"diff-line diff-").count(), 5);
        assert!(html.contains("<div class=\"diff-line diff-moved\" data-change-id=\"1\">"));
        assert!(html.contains(
            "<span class=\"diff-moved\" data-from=\"1\" data-to=\"3\">Move &lt;me&gt;</span>"
        ));
        assert_eq!(html.matches("diff-line diff-modified").count(), 2);
        assert!(html.contains("<del class=\"diff-removed\">brown</del>"));
        assert!(html.contains("<ins class=\"diff-added\">red</ins>"));
        assert!(html.contains(
            "<del class=\"diff-removed\">a &lt; b</del> <ins class=\"diff-added\">a &gt; b</ins>"
        ));
        assert!(html.contains(
            "<div class=\"diff-line diff-added\" data-change-id=\"4\"><ins class=\"diff-added\">New &amp; improved</ins></div>"
        ));
        assert!(html.contains("<del class=\"diff-removed\">Old &quot;rule&quot;</del>"));
        assert!(!html.contains("<me>"));
    }

    #[test]
    fn side_by_side_renders_one_row_per_block() {
        let blocks = vec![
            AlignedBlock {
                line_number: 1,
                left_content: Some("same".into()),
                right_content: Some("same".into()),
                change_type: ChangeType::Unchanged,
                left_html: None,
                right_html: None,
            },
            AlignedBlock {
                line_number: 2,
                left_content: None,
                right_content: Some("new & improved".into()),
                change_type: ChangeType::Added,
                left_html: None,
                right_html: None,
            },
        ];
        let html = generate_side_by_side_html(&blocks);
        assert_eq!(html.matches("<tr").count(), 2);
        assert!(html.contains("<ins class=\"diff-added\">new &amp; improved</ins>"));
        assert!(html.contains("<td class=\"left\"></td>"));
    }
}
