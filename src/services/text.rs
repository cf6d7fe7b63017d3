//! # 텍스트 분석 도우미
//!
//! 줄/단어 분리, 정규화, 유사도 계산, 블록 모양 추정 등
//! diff 엔진과 섹션 분석기가 공통으로 쓰는 순수 함수들입니다.
//!
//! 정규식은 `once_cell::sync::Lazy`로 처음 사용할 때 한 번만 컴파일합니다.

use std::borrow::Cow;
use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{BlockType, CompareOptions};

/// `1. Purpose`, `2.3) Scope` 같은 번호 제목
pub(crate) static NUMBERED_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)*)[.)]?\s+(\S.*)$").unwrap());

/// `Section 4: Enforcement` 같은 명시적 섹션 제목
pub(crate) static SECTION_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^section\s+(\d+(?:\.\d+)*)\s*[:.\-]\s*(.*)$").unwrap());

static MARKDOWN_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,6}\s+\S").unwrap());

/// 글머리 기호(`-`, `*`, `+`, `•`) 또는 `a)`, `(1)` 형태의 목록
static LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([-*+•]\s+|\(?[a-zA-Z0-9]{1,3}\)\s+)").unwrap());

static MARKDOWN_IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").unwrap());

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// 텍스트의 단어 수 (공백으로 분리)
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// 텍스트의 문자 수 (유니코드 문자 단위)
pub fn count_chars(text: &str) -> usize {
    text.chars().count()
}

/// 비교 대상 줄 목록. 공백만 있는 줄은 제외합니다.
pub fn content_lines(text: &str) -> Vec<&str> {
    text.lines().filter(|line| !line.trim().is_empty()).collect()
}

/// 옵션에 따라 줄을 비교용으로 정규화합니다. 정규화가 필요 없으면 빌린 값을 그대로 돌려줍니다.
pub fn normalize_line<'a>(line: &'a str, options: &CompareOptions) -> Cow<'a, str> {
    let mut normalized = Cow::Borrowed(line);
    if options.ignore_whitespace {
        normalized = Cow::Owned(WHITESPACE_RUN.replace_all(line.trim(), " ").into_owned());
    }
    if options.ignore_case {
        normalized = Cow::Owned(normalized.to_lowercase());
    }
    normalized
}

/// 공백 기준 토큰 목록
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// 소문자로 바꾼 단어 집합
pub fn word_set(text: &str) -> HashSet<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// 두 텍스트 단어 집합의 Jaccard 유사도 (교집합 / 합집합). 둘 다 비어 있으면 0.
pub fn jaccard(a: &str, b: &str) -> f64 {
    let left = word_set(a);
    let right = word_set(b);
    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }
    left.intersection(&right).count() as f64 / union as f64
}

/// 공백과 문장부호를 모두 지우고 소문자로 바꾼 문자열.
/// 이 값이 같으면 두 텍스트는 모양만 다릅니다.
pub fn strip_formatting(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// 문장부호를 뗀 소문자 단어 목록 (빈 토큰 제외)
pub fn plain_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(strip_formatting)
        .filter(|word| !word.is_empty())
        .collect()
}

/// 마크다운 제목 기호(`#`)와 앞뒤 공백을 걷어낸 줄
fn heading_candidate(line: &str) -> &str {
    line.trim().trim_start_matches('#').trim_start()
}

/// 줄이 섹션 제목이면 `(번호, 제목)`을 돌려줍니다.
pub fn parse_heading(line: &str) -> Option<(String, String)> {
    let candidate = heading_candidate(line);
    let caps = SECTION_HEADING
        .captures(candidate)
        .or_else(|| NUMBERED_HEADING.captures(candidate))?;
    Some((caps[1].to_string(), caps[2].trim().to_string()))
}

/// 줄 앞머리의 섹션 번호 (`2.1`, `Section 4` → `4`)
pub fn extract_section_number(line: &str) -> Option<String> {
    parse_heading(line).map(|(number, _)| number)
}

/// 줄 모양으로 블록 종류를 추정합니다.
pub fn detect_block_type(line: &str) -> BlockType {
    let trimmed = line.trim();
    if MARKDOWN_HEADING.is_match(trimmed) || parse_heading(trimmed).is_some() {
        BlockType::Heading
    } else if LIST_ITEM.is_match(trimmed) {
        BlockType::List
    } else if trimmed.matches('|').count() >= 2 {
        BlockType::Table
    } else if MARKDOWN_IMAGE.is_match(trimmed) {
        BlockType::Image
    } else {
        BlockType::Paragraph
    }
}
