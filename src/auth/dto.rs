use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::forms::SelectedImage;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisteredResponse {
    pub user_id: Uuid,
    pub email: String,
}

/// Validated registration payload; every field present.
#[derive(Debug, Clone)]
pub struct RegisterDraft {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub gender: String,
    pub image: SelectedImage,
}
