//! # 마크다운 파일 I/O 서비스
//!
//! 문서의 현재(편집 중) 내용은 디스크의 .md 파일에 저장됩니다.
//! 일반 std::fs는 블로킹이므로 비동기 서버에서는 `tokio::fs`를 사용합니다.

use crate::error::AppError;
use std::path::PathBuf;
use tokio::fs;

/// 디스크에서 마크다운 파일을 읽어 문자열로 반환합니다.
///
/// # 매개변수
/// - `documents_path`: 문서 저장 루트 디렉토리 (예: "data/documents")
/// - `file_path`: 루트 디렉토리 기준 상대 경로 (예: "code-of-conduct.md")
pub async fn read_markdown(documents_path: &str, file_path: &str) -> Result<String, AppError> {
    let full_path = PathBuf::from(documents_path).join(file_path);
    let content = fs::read_to_string(&full_path).await?;
    Ok(content)
}

/// 마크다운 내용을 디스크 파일에 저장합니다. 부모 디렉토리가 없으면 생성합니다.
pub async fn write_markdown(
    documents_path: &str,
    file_path: &str,
    content: &str,
) -> Result<(), AppError> {
    let full_path = PathBuf::from(documents_path).join(file_path);

    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    fs::write(&full_path, content).await?;
    Ok(())
}

/// 마크다운 파일을 삭제합니다. 파일이 이미 없으면 성공으로 봅니다.
pub async fn remove_markdown(documents_path: &str, file_path: &str) -> Result<(), AppError> {
    let full_path = PathBuf::from(documents_path).join(file_path);
    match fs::remove_file(&full_path).await {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

/// 문서 제목과 ID로 파일 저장 경로를 만듭니다.
///
/// 같은 제목의 문서가 서로 덮어쓰지 않도록 ID 앞부분을 붙입니다.
///
/// # 예시
/// ```text
/// generate_file_path("Code of Conduct", "0192f1c2-...") → "code-of-conduct-0192f1c2.md"
/// ```
pub fn generate_file_path(title: &str, id: &str) -> String {
    let slug = slug::slugify(title);
    let suffix: String = id.chars().take(8).collect();
    if slug.is_empty() {
        format!("{}.md", suffix)
    } else {
        format!("{}-{}.md", slug, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_path_is_slug_plus_id_prefix() {
        assert_eq!(
            generate_file_path("Code of Conduct", "0192f1c2-aaaa-bbbb"),
            "code-of-conduct-0192f1c2.md"
        );
        assert_eq!(generate_file_path("!!!", "abcdef123456"), "abcdef12.md");
    }

    #[tokio::test]
    async fn write_then_read_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap();

        write_markdown(root, "nested/policy.md", "1. Purpose\nText")
            .await
            .unwrap();
        let content = read_markdown(root, "nested/policy.md").await.unwrap();
        assert_eq!(content, "1. Purpose\nText");
    }

    #[tokio::test]
    async fn remove_tolerates_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap();

        write_markdown(root, "policy.md", "text").await.unwrap();
        remove_markdown(root, "policy.md").await.unwrap();
        assert!(!dir.path().join("policy.md").exists());
        remove_markdown(root, "policy.md").await.unwrap();
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_markdown(dir.path().to_str().unwrap(), "nope.md")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
