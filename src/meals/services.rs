//! The meal record gateway: each write performs at most one storage
//! mutation and exactly one row mutation, never wrapped in a transaction.

use serde_json::json;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{MealDraft, MealEntry, MealPatch};
use super::repo;
use crate::error::AppError;
use crate::forms::SelectedImage;
use crate::remote::UserIdentity;
use crate::state::AppState;

pub const FOOD_PREFIX: &str = "food_pics";

/// The owner's entries, newest date first. A transport failure is a
/// `DataAccess` error; an empty `Ok` means the owner has no entries.
pub async fn list(state: &AppState, owner: &UserIdentity) -> Result<Vec<MealEntry>, AppError> {
    repo::list_by_owner(state.remote.as_ref(), owner.id)
        .await
        .map_err(|e| AppError::DataAccess(e.to_string()))
}

pub async fn find(
    state: &AppState,
    owner: &UserIdentity,
    id: Uuid,
) -> Result<MealEntry, AppError> {
    repo::find_for_owner(state.remote.as_ref(), owner.id, id)
        .await
        .map_err(|e| AppError::DataAccess(e.to_string()))?
        .ok_or(AppError::NotFound("meal entry"))
}

async fn upload(
    state: &AppState,
    path: &str,
    image: &SelectedImage,
    upsert: bool,
) -> Result<String, AppError> {
    state
        .remote
        .upload_object(
            &state.config.storage_bucket,
            path,
            image.body.clone(),
            &image.content_type,
            upsert,
        )
        .await
        .map_err(|e| AppError::Upload(e.to_string()))?;
    Ok(state.remote.public_url(&state.config.storage_bucket, path))
}

fn now_rfc3339() -> Result<String, AppError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| AppError::DataAccess(e.to_string()))
}

/// Upload first, then insert, with the row bound to the session identity.
/// The object name carries the owner id and the current time so repeated
/// submissions never collide. If the insert fails, the uploaded object is
/// left orphaned; there is no rollback across the two services.
pub async fn create(
    state: &AppState,
    owner: &UserIdentity,
    draft: MealDraft,
) -> Result<MealEntry, AppError> {
    let stamp = OffsetDateTime::now_utc().unix_timestamp();
    let path = format!("{}/{}-{}.{}", FOOD_PREFIX, owner.id, stamp, draft.image.ext());
    let image_url = upload(state, &path, &draft.image, false).await?;

    let row = json!({
        "user_id": owner.id,
        "date": draft.date,
        "meal_name": draft.meal_name,
        "meal_type": draft.meal_type,
        "image_url": image_url,
    });
    let entry = repo::insert(state.remote.as_ref(), row).await.map_err(|e| {
        warn!(object = %path, "meal insert failed after upload; stored object is orphaned");
        AppError::DataAccess(e.to_string())
    })?;

    info!(meal_id = %entry.id, "meal entry created");
    Ok(entry)
}

/// One row update, always refreshing `updated_at`. A new image is
/// re-uploaded under a name keyed on the record id, so repeated edits
/// reuse the same object path; without one the stored URL is preserved.
pub async fn update(
    state: &AppState,
    owner: &UserIdentity,
    id: Uuid,
    patch: MealPatch,
) -> Result<(), AppError> {
    let mut row = json!({
        "date": patch.date,
        "meal_name": patch.meal_name,
        "meal_type": patch.meal_type,
        "updated_at": now_rfc3339()?,
    });
    if let Some(image) = &patch.new_image {
        let path = format!("{}/{}.{}", FOOD_PREFIX, id, image.ext());
        row["image_url"] = upload(state, &path, image, true).await?.into();
    }

    let changed = repo::update_for_owner(state.remote.as_ref(), owner.id, id, row)
        .await
        .map_err(|e| AppError::DataAccess(e.to_string()))?;
    if changed == 0 {
        return Err(AppError::NotFound("meal entry"));
    }
    info!(meal_id = %id, "meal entry updated");
    Ok(())
}

/// Removes the row only; the stored photo is intentionally left behind.
pub async fn delete(state: &AppState, owner: &UserIdentity, id: Uuid) -> Result<(), AppError> {
    let removed = repo::delete_for_owner(state.remote.as_ref(), owner.id, id)
        .await
        .map_err(|e| AppError::DataAccess(e.to_string()))?;
    if removed == 0 {
        return Err(AppError::NotFound("meal entry"));
    }
    info!(meal_id = %id, "meal entry deleted");
    Ok(())
}
