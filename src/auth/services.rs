use tracing::info;

use super::dto::RegisterDraft;
use crate::error::AppError;
use crate::profile::{self, dto::NewProfile};
use crate::remote::{AuthSession, UserIdentity};
use crate::state::AppState;

/// Sign-up, avatar upload, then profile insert, in that order. A failure
/// after sign-up leaves an auth identity with no profile row; there is no
/// compensating delete.
pub async fn register(state: &AppState, draft: RegisterDraft) -> Result<UserIdentity, AppError> {
    let user = state
        .remote
        .sign_up(&draft.email, &draft.password)
        .await
        .map_err(|e| AppError::Auth(format!("sign-up failed: {e}")))?;

    let image_url = profile::services::upload_avatar(state, user.id, &draft.image).await?;

    profile::repo::insert(
        state.remote.as_ref(),
        NewProfile {
            user_id: user.id,
            email: draft.email,
            full_name: draft.full_name,
            gender: draft.gender,
            image_url,
        },
    )
    .await
    .map_err(|e| AppError::DataAccess(e.to_string()))?;

    info!(user_id = %user.id, "account registered");
    Ok(user)
}

pub async fn login(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<AuthSession, AppError> {
    state
        .remote
        .sign_in(email, password)
        .await
        .map_err(|e| AppError::Auth(format!("sign-in failed: {e}")))
}
