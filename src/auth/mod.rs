use axum::Router;

use crate::state::AppState;

pub mod dto;
mod forms;
pub mod handlers;
pub mod services;
pub mod session;
pub(crate) mod extractors;

pub use extractors::CurrentUser;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
