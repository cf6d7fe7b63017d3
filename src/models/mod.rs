//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `comparison`: 비교 결과, 변경 항목, 섹션 비교, 나란히 보기 블록
//! - `document`: 편집 중인 문서
//! - `user`: 비교/버전 생성자 신원
//! - `version`: 불변 버전 스냅샷
//!
//! `pub use X::*;`로 재공개하여 `crate::models::Version`처럼 짧게 접근합니다.

pub mod comparison;
pub mod document;
pub mod user;
pub mod version;

pub use comparison::*;
pub use document::*;
pub use user::*;
pub use version::*;
