use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use super::view::{Dashboard, DashboardState};
use crate::auth::{session, CurrentUser};
use crate::error::AppError;
use crate::meals::dto::MealEntry;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/meals/:id", delete(delete_meal))
}

#[derive(Debug, Deserialize)]
struct DashboardQuery {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Serialize)]
struct DashboardPage {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    meals: Vec<MealEntry>,
}

/// The dashboard renders with or without a session; an absent one shows
/// the failed state rather than rejecting the page outright.
#[instrument(skip(state, headers))]
async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<DashboardQuery>,
) -> Json<DashboardPage> {
    let session =
        session::current_user(state.remote.as_ref(), session::bearer_token(&headers)).await;

    let mut page = Dashboard::new();
    page.load(&state, session).await;
    page.set_query(params.q);

    let meals = page.visible().into_iter().cloned().collect();
    let (status, error) = match page.state() {
        DashboardState::Loading => ("loading", None),
        DashboardState::Ready(_) => ("ready", None),
        DashboardState::Empty => ("empty", None),
        DashboardState::Failed(msg) => ("failed", Some(msg.clone())),
    };
    Json(DashboardPage {
        status,
        error,
        meals,
    })
}

#[derive(Debug, Deserialize)]
struct DeleteParams {
    #[serde(default)]
    confirm: bool,
}

/// The dashboard's delete action: confirmation is checked before any
/// remote call is made.
#[instrument(skip(state))]
async fn delete_meal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteParams>,
) -> Result<StatusCode, AppError> {
    let mut page = Dashboard::new();
    page.load(&state, Some(user)).await;
    page.delete(&state, id, params.confirm).await?;
    Ok(StatusCode::NO_CONTENT)
}
