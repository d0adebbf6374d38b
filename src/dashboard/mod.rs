use axum::Router;

use crate::state::AppState;

pub mod handlers;
pub mod view;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
