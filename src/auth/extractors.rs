use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::session;
use crate::error::AppError;
use crate::remote::UserIdentity;
use crate::state::AppState;

/// Extracts the session identity, rejecting when none exists. Handlers
/// that can render without a session call `session::current_user` instead.
pub struct CurrentUser(pub UserIdentity);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session::bearer_token(&parts.headers);
        session::current_user(state.remote.as_ref(), token)
            .await
            .map(CurrentUser)
            .ok_or_else(|| AppError::Auth("no active session".into()))
    }
}
