use axum::http::{header, HeaderMap};
use tracing::warn;

use crate::remote::{RemoteService, UserIdentity};

/// Token carried by the request, if any. Accepts `Bearer` in either case.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let auth = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    auth.strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))
}

/// Resolve the identity behind an access token. Absence (no token, a
/// rejected token, or a failed lookup) is an authorization failure for
/// the caller, never a retryable condition.
pub async fn current_user(
    remote: &dyn RemoteService,
    token: Option<&str>,
) -> Option<UserIdentity> {
    let token = token?;
    match remote.get_user(token).await {
        Ok(user) => user,
        Err(e) => {
            warn!(error = %e, "session lookup failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MemoryRemote;

    #[test]
    fn bearer_token_strips_the_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer abc123".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc123"));

        headers.insert(header::AUTHORIZATION, "Basic abc123".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        headers.remove(header::AUTHORIZATION);
        assert_eq!(bearer_token(&headers), None);
    }

    #[tokio::test]
    async fn current_user_is_none_without_a_session() {
        let remote = MemoryRemote::new();
        assert!(current_user(&remote, None).await.is_none());
        assert!(current_user(&remote, Some("stale-token")).await.is_none());
    }

    #[tokio::test]
    async fn current_user_resolves_a_signed_in_identity() {
        let remote = MemoryRemote::new();
        remote.sign_up("a@b.co", "secretpw").await.unwrap();
        let session = remote.sign_in("a@b.co", "secretpw").await.unwrap();

        let user = current_user(&remote, Some(&session.access_token)).await;
        assert_eq!(user.unwrap().id, session.user.id);
    }
}
