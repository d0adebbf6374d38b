use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::MealEntry;
use super::forms::MealForm;
use super::services;
use crate::auth::handlers::{read_image, read_text};
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/addfood", post(add_food))
        .route("/updatefood/:id", get(edit_food).post(update_food))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

async fn fill_form(form: &mut MealForm, mp: &mut Multipart) -> Result<(), AppError> {
    while let Some(field) = mp.next_field().await.map_err(|_| AppError::MalformedPayload)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "image" => {
                let image = read_image(field, "meal").await?;
                // An empty file part means nothing was chosen.
                if !image.body.is_empty() {
                    form.set_image(image);
                }
            }
            "date" => form.set_date(read_text(field).await?),
            "meal_name" => form.set_meal_name(read_text(field).await?),
            "meal_type" => form.set_meal_type(read_text(field).await?),
            _ => {}
        }
    }
    Ok(())
}

fn to_dashboard() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::LOCATION, HeaderValue::from_static("/dashboard"));
    headers
}

#[instrument(skip(state, mp))]
async fn add_food(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut mp: Multipart,
) -> Result<(StatusCode, HeaderMap, Json<MealEntry>), AppError> {
    let mut form = MealForm::new();
    fill_form(&mut form, &mut mp).await?;
    let entry = form.submit_create(&state, &user).await?;
    Ok((StatusCode::CREATED, to_dashboard(), Json(entry)))
}

/// Entry pre-populated for the edit screen, owner-scoped.
#[instrument(skip(state))]
async fn edit_food(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MealEntry>, AppError> {
    let entry = services::find(&state, &user, id).await?;
    Ok(Json(entry))
}

#[instrument(skip(state, mp))]
async fn update_food(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    mut mp: Multipart,
) -> Result<(StatusCode, HeaderMap), AppError> {
    let mut form = MealForm::new();
    fill_form(&mut form, &mut mp).await?;
    form.submit_update(&state, &user, id).await?;
    Ok((StatusCode::OK, to_dashboard()))
}
