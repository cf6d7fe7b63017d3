//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 각 하위 모듈:
//! - `documents`: 문서 메타데이터 쿼리
//! - `versions`: 불변 버전 스냅샷 쿼리
//! - `history`: 비교 이력 쿼리
//! - `store`: 비교 서비스가 사용하는 `VersionStore` 트레이트와 SQLite 구현

pub mod documents;
pub mod history;
pub mod store;
pub mod versions;

// `crate::db::get_version`처럼 바로 접근할 수 있게 재공개합니다.
pub use documents::*;
pub use history::*;
pub use store::{SqliteStore, VersionStore};
pub use versions::*;
