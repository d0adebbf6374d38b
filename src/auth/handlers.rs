use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::post,
    Json, Router,
};
use tracing::instrument;

use super::dto::{LoginRequest, RegisteredResponse};
use super::forms::{LoginForm, RegisterForm};
use crate::error::AppError;
use crate::forms::SelectedImage;
use crate::remote::AuthSession;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthSession>, AppError> {
    let mut form = LoginForm::new();
    form.set_email(payload.email);
    form.set_password(payload.password);
    let session = form.submit(&state).await?;
    Ok(Json(session))
}

#[instrument(skip(state, mp))]
async fn register(
    State(state): State<AppState>,
    mut mp: Multipart,
) -> Result<(StatusCode, HeaderMap, Json<RegisteredResponse>), AppError> {
    let mut form = RegisterForm::new();
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
            "password" => form.set_password(read_text(field).await?),
            "gender" => form.set_gender(read_text(field).await?),
            _ => {}
        }
    }

    let user = form.submit(&state).await?;

    let mut headers = HeaderMap::new();
    headers.insert(header::LOCATION, HeaderValue::from_static("/login"));
    Ok((
        StatusCode::CREATED,
        headers,
        Json(RegisteredResponse {
            user_id: user.id,
            email: user.email,
        }),
    ))
}

pub(crate) async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field.text().await.map_err(|_| AppError::MalformedPayload)
}

pub(crate) async fn read_image(
    field: axum::extract::multipart::Field<'_>,
    fallback_name: &str,
) -> Result<SelectedImage, AppError> {
    let file_name = field.file_name().unwrap_or(fallback_name).to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let body = field
        .bytes()
        .await
        .map_err(|e| AppError::Upload(e.to_string()))?;
    Ok(SelectedImage {
        file_name,
        content_type,
        body,
    })
}
