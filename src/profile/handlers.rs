use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::UserProfile;
use super::forms::ProfileForm;
use super::services;
use crate::auth::handlers::{read_image, read_text};
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile/:user_id", get(get_profile).post(update_profile))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

fn owned_by(user_id: Uuid, requester: &crate::remote::UserIdentity) -> Result<(), AppError> {
    if requester.id != user_id {
        return Err(AppError::Auth("profile belongs to another account".into()));
    }
    Ok(())
}

#[instrument(skip(state))]
async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserProfile>, AppError> {
    owned_by(user_id, &user)?;
    let profile = services::find(&state, user_id).await?;
    Ok(Json(profile))
}

#[instrument(skip(state, mp))]
async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(user_id): Path<Uuid>,
    mut mp: Multipart,
) -> Result<(StatusCode, HeaderMap), AppError> {
    owned_by(user_id, &user)?;

    let mut form = ProfileForm::new();
    while let Some(field) = mp.next_field().await.map_err(|_| AppError::MalformedPayload)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "image" => {
                let image = read_image(field, "avatar").await?;
                // An empty file part means nothing was chosen.
                if !image.body.is_empty() {
                    form.set_image(image);
                }
            }
            "full_name" => form.set_full_name(read_text(field).await?),
            "email" => form.set_email(read_text(field).await?),
            "gender" => form.set_gender(read_text(field).await?),
            _ => {}
        }
    }

    form.submit(&state, user_id).await?;

    let mut headers = HeaderMap::new();
    headers.insert(header::LOCATION, HeaderValue::from_static("/dashboard"));
    Ok((StatusCode::OK, headers))
}
