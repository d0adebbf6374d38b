use axum::Router;

use crate::state::AppState;

pub mod dto;
pub mod forms;
pub mod handlers;
pub mod repo;
pub mod services;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
