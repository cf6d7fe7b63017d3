//! # 요청자 신원 추출기
//!
//! 비교와 버전 생성에 기록할 사용자를 `X-User-Id`/`X-User-Name` 헤더에서 읽습니다.
//! 인증은 앞단의 호스트 애플리케이션이 맡으므로 여기서는 값을 검증하지 않습니다.
//! 헤더가 없으면 익명 사용자로 처리하며, 요청을 거부하지 않습니다.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::models::UserIdentity;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_NAME_HEADER: &str = "x-user-name";

#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserIdentity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };

        let identity = match (header(USER_ID_HEADER), header(USER_NAME_HEADER)) {
            (Some(id), Some(name)) => UserIdentity::new(id, name),
            // 이름이 없으면 id를 표시 이름으로 씁니다.
            (Some(id), None) => UserIdentity::new(id, id),
            (None, _) => UserIdentity::anonymous(),
        };

        Ok(CurrentUser(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> UserIdentity {
        let (mut parts, _) = request.into_parts();
        let CurrentUser(identity) = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        identity
    }

    #[tokio::test]
    async fn reads_identity_headers() {
        let request = Request::builder()
            .header("X-User-Id", "u-42")
            .header("X-User-Name", "Min")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await, UserIdentity::new("u-42", "Min"));
    }

    #[tokio::test]
    async fn falls_back_to_id_then_anonymous() {
        let id_only = Request::builder().header("X-User-Id", "u-42").body(()).unwrap();
        assert_eq!(extract(id_only).await, UserIdentity::new("u-42", "u-42"));

        let blank = Request::builder().header("X-User-Id", "  ").body(()).unwrap();
        assert_eq!(extract(blank).await, UserIdentity::anonymous());

        let none = Request::builder().body(()).unwrap();
        assert_eq!(extract(none).await, UserIdentity::anonymous());
    }
}
