use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::dto::{ProfilePatch, UserProfile};
use super::repo;
use crate::error::AppError;
use crate::forms::SelectedImage;
use crate::state::AppState;

pub const PROFILE_PREFIX: &str = "profile_pics";

/// Store the avatar under a name keyed on the account id, overwriting any
/// previous one, and resolve its public URL.
pub async fn upload_avatar(
    state: &AppState,
    user_id: Uuid,
    image: &SelectedImage,
) -> Result<String, AppError> {
    let path = format!("{}/{}.{}", PROFILE_PREFIX, user_id, image.ext());
    state
        .remote
        .upload_object(
            &state.config.storage_bucket,
            &path,
            image.body.clone(),
            &image.content_type,
            true,
        )
        .await
        .map_err(|e| AppError::Upload(e.to_string()))?;
    Ok(state.remote.public_url(&state.config.storage_bucket, &path))
}

pub async fn find(state: &AppState, user_id: Uuid) -> Result<UserProfile, AppError> {
    repo::find_by_user_id(state.remote.as_ref(), user_id)
        .await
        .map_err(|e| AppError::DataAccess(e.to_string()))?
        .ok_or(AppError::NotFound("profile"))
}

/// One row update; a new avatar is re-uploaded first, reusing the
/// id-keyed object path.
pub async fn update(
    state: &AppState,
    user_id: Uuid,
    patch: ProfilePatch,
) -> Result<(), AppError> {
    let mut row = json!({
        "email": patch.email,
        "full_name": patch.full_name,
        "gender": patch.gender,
    });
    if let Some(image) = &patch.new_image {
        row["image_url"] = upload_avatar(state, user_id, image).await?.into();
    }

    let changed = repo::update_by_user_id(state.remote.as_ref(), user_id, row)
        .await
        .map_err(|e| AppError::DataAccess(e.to_string()))?;
    if changed == 0 {
        return Err(AppError::NotFound("profile"));
    }
    info!(user_id = %user_id, "profile updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;

    use super::*;
    use crate::auth::services::register;
    use crate::auth::dto::RegisterDraft;
    use crate::remote::MemoryRemote;

    fn avatar() -> SelectedImage {
        SelectedImage {
            file_name: "me.png".into(),
            content_type: "image/png".into(),
            body: Bytes::from_static(b"avatar"),
        }
    }

    async fn registered(state: &AppState) -> Uuid {
        register(
            state,
            RegisterDraft {
                full_name: "Jane Doe".into(),
                email: "jane@example.com".into(),
                password: "longenough".into(),
                gender: "Female".into(),
                image: avatar(),
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn update_without_image_keeps_the_stored_avatar() {
        let remote = Arc::new(MemoryRemote::new());
        let state = AppState::fake_with(remote.clone());
        let user_id = registered(&state).await;

        let before = find(&state, user_id).await.unwrap();
        update(
            &state,
            user_id,
            ProfilePatch {
                email: "jane@example.com".into(),
                full_name: "Jane A. Doe".into(),
                gender: "Female".into(),
                new_image: None,
            },
        )
        .await
        .unwrap();

        let after = find(&state, user_id).await.unwrap();
        assert_eq!(after.full_name, "Jane A. Doe");
        assert_eq!(after.image_url, before.image_url);
        assert_eq!(remote.object_count(), 1);
    }

    #[tokio::test]
    async fn avatar_reupload_reuses_the_id_keyed_path() {
        let remote = Arc::new(MemoryRemote::new());
        let state = AppState::fake_with(remote.clone());
        let user_id = registered(&state).await;

        update(
            &state,
            user_id,
            ProfilePatch {
                email: "jane@example.com".into(),
                full_name: "Jane Doe".into(),
                gender: "Female".into(),
                new_image: Some(avatar()),
            },
        )
        .await
        .unwrap();

        assert_eq!(remote.object_count(), 1);
        assert!(remote.has_object("food_bk", &format!("{PROFILE_PREFIX}/{user_id}.png")));
    }

    #[tokio::test]
    async fn find_for_an_unknown_account_is_not_found() {
        let state = AppState::fake();
        assert!(matches!(
            find(&state, Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
