use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One account's profile, as stored in the `user_tb` collection.
/// `user_id` is the same identifier the auth service issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub gender: String,
    pub image_url: String,
}

/// Profile row written once, at registration.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub gender: String,
    pub image_url: String,
}

/// Validated profile-form payload; a missing image keeps the stored avatar.
#[derive(Debug, Clone)]
pub struct ProfilePatch {
    pub email: String,
    pub full_name: String,
    pub gender: String,
    pub new_image: Option<crate::forms::SelectedImage>,
}
