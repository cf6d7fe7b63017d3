//! # 비즈니스 로직 모듈
//!
//! - `comparison`: 버전 조회와 diff, 섹션 분석, 요약을 묶는 비교 서비스
//! - `diff`: 줄/단어 LCS diff, 수정/이동 감지, 중요도 평가, 나란히 보기 정렬
//! - `markdown`: 문서 현재 내용(.md 파일) 읽기/쓰기
//! - `render`: 비교 결과 HTML 렌더링
//! - `sections`: 섹션 파싱과 섹션 단위 비교
//! - `text`: 공통 텍스트 분석 도우미

pub mod comparison;
pub mod diff;
pub mod markdown;
pub mod render;
pub mod sections;
pub mod text;

// 라우트 핸들러에서 `services::read_markdown`처럼 바로 쓸 수 있게 재공개합니다.
pub use comparison::ComparisonService;
pub use diff::DiffEngine;
pub use markdown::*;
