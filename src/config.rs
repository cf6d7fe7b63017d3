//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값과 비교 정책(임계값)을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 서버 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `DOCUMENTS_PATH`: 문서의 현재 내용(마크다운)이 저장되는 디렉토리
//! - `HOST`: 서버 바인딩 주소
//! - `PORT`: 서버 포트 번호
//!
//! 비교 정책 항목 (`DiffPolicy`):
//! - `DIFF_PAIRING_SIMILARITY`: 삭제+추가 쌍을 "수정"으로 묶는 Jaccard 임계값
//! - `DIFF_PAIRING_WINDOW`: 수정 쌍을 찾을 때 앞으로 살펴보는 변경 개수
//! - `DIFF_MAJOR_CHANGE_RATIO`: 이 비율을 넘는 단어 변화는 Major
//! - `DIFF_MAJOR_WORD_DELTA`: 단어 수 차이가 이 값을 넘으면 Major
//! - `DIFF_SECTION_TITLE_SIMILARITY`: 섹션 제목 매칭 임계값
//! - `DIFF_MAX_LINES`: 한쪽 문서가 가질 수 있는 최대 줄 수 (공백 줄 포함, LCS 비용 상한)
//! - `DIFF_MAX_LINE_WORDS`: 단어 diff를 계산할 한 줄의 최대 단어 수

use std::env;
use std::str::FromStr;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 경로 (예: "sqlite:data/policies.db")
    pub database_url: String,
    /// 문서의 현재 내용(마크다운 파일)이 저장되는 디렉토리 경로
    pub documents_path: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    pub port: u16,
    /// 비교 엔진이 사용하는 휴리스틱 임계값들
    pub diff_policy: DiffPolicy,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없거나 파싱에 실패해도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            documents_path: env::var("DOCUMENTS_PATH")
                .unwrap_or_else(|_| "data/documents".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            diff_policy: DiffPolicy::from_env(),
        })
    }
}

/// 비교 엔진의 정책 상수
///
/// 어떤 형식 모델에서 유도된 값이 아니라 운영 중 조정할 수 있는 휴리스틱입니다.
/// 코드 수정 없이 환경변수로 바꿀 수 있습니다.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffPolicy {
    /// 삭제+추가 쌍을 수정(Modified)으로 합치는 최소 Jaccard 유사도 (초과해야 함)
    pub pairing_similarity: f64,
    /// 삭제 변경 뒤로 몇 개의 변경까지 추가 변경을 찾을지
    pub pairing_window: usize,
    /// `1 - 공통 단어 / 최대 단어 수`가 이 값을 넘으면 Major
    pub major_change_ratio: f64,
    /// 단어 수 차이의 절대값이 이 값을 넘으면 Major
    pub major_word_delta: usize,
    /// 섹션 번호가 다를 때 제목 유사도로 매칭하는 임계값 (초과해야 함)
    pub section_title_similarity: f64,
    /// 비교 대상 한쪽의 최대 줄 수 (공백 줄 포함)
    pub max_lines: usize,
    /// 수정된 줄 한쪽의 단어 수가 이 값을 넘으면 단어 diff 없이 삭제/추가 쌍으로만 보여줍니다.
    pub max_line_words: usize,
}

impl Default for DiffPolicy {
    fn default() -> Self {
        Self {
            pairing_similarity: 0.5,
            pairing_window: 4,
            major_change_ratio: 0.3,
            major_word_delta: 10,
            section_title_similarity: 0.8,
            max_lines: 5000,
            max_line_words: 1000,
        }
    }
}

impl DiffPolicy {
    /// `DIFF_*` 환경변수에서 정책을 읽습니다. 없는 값은 기본값을 사용합니다.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            pairing_similarity: env_or("DIFF_PAIRING_SIMILARITY", defaults.pairing_similarity),
            pairing_window: env_or("DIFF_PAIRING_WINDOW", defaults.pairing_window),
            major_change_ratio: env_or("DIFF_MAJOR_CHANGE_RATIO", defaults.major_change_ratio),
            major_word_delta: env_or("DIFF_MAJOR_WORD_DELTA", defaults.major_word_delta),
            section_title_similarity: env_or(
                "DIFF_SECTION_TITLE_SIMILARITY",
                defaults.section_title_similarity,
            ),
            max_lines: env_or("DIFF_MAX_LINES", defaults.max_lines),
            max_line_words: env_or("DIFF_MAX_LINE_WORDS", defaults.max_line_words),
        }
    }
}

/// 환경변수를 읽어 `T`로 파싱합니다. 변수가 없거나 파싱에 실패하면 `default`를 반환합니다.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
