use serde::{Deserialize, Serialize};

/// 비교를 실행하거나 버전을 만든 사용자
///
/// 인증은 이 서비스의 관심사가 아니며, 상위 애플리케이션이 전달한 값을 그대로 기록합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub name: String,
}

impl UserIdentity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// 신원 헤더가 없는 요청에 사용하는 기본 사용자
    pub fn anonymous() -> Self {
        Self::new("anonymous", "Anonymous")
    }
}
