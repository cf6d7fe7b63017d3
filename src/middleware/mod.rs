//! # 요청 추출기(Extractor) 모듈
//!
//! - `identity`: 비교/버전 생성자를 헤더에서 읽는 `CurrentUser`

pub mod identity;
