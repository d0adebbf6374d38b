use uuid::Uuid;

use super::dto::ProfilePatch;
use super::services;
use crate::error::AppError;
use crate::forms::{is_valid_email, required, ImagePreview, SelectedImage};
use crate::state::AppState;

/// Draft state behind the edit-profile screen.
#[derive(Debug, Default)]
pub struct ProfileForm {
    full_name: String,
    email: String,
    gender: String,
    image: Option<SelectedImage>,
    busy: bool,
}

impl ProfileForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_full_name(&mut self, v: impl Into<String>) {
        self.full_name = v.into();
    }

    pub fn set_email(&mut self, v: impl Into<String>) {
        self.email = v.into();
    }

    pub fn set_gender(&mut self, v: impl Into<String>) {
        self.gender = v.into();
    }

    pub fn set_image(&mut self, image: SelectedImage) {
        self.image = Some(image);
    }

    pub fn preview(&self) -> Option<ImagePreview<'_>> {
        self.image.as_ref().map(SelectedImage::preview)
    }

    pub fn in_flight(&self) -> bool {
        self.busy
    }

    fn validate(&self) -> Result<ProfilePatch, AppError> {
        let full_name = required(&self.full_name, "full_name")?.to_string();
        let email = required(&self.email, "email")?.trim().to_lowercase();
        let gender = required(&self.gender, "gender")?.to_string();
        if !is_valid_email(&email) {
            return Err(AppError::Auth("invalid email".into()));
        }
        Ok(ProfilePatch {
            email,
            full_name,
            gender,
            new_image: self.image.clone(),
        })
    }

    /// Validate, then push the patch. On success the caller redirects to
    /// the dashboard. Refuses while a submission is in flight.
    pub async fn submit(&mut self, state: &AppState, user_id: Uuid) -> Result<(), AppError> {
        if self.busy {
            return Err(AppError::Busy);
        }
        let patch = self.validate()?;
        self.busy = true;
        let result = services::update(state, user_id, patch).await;
        self.busy = false;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> ProfileForm {
        let mut form = ProfileForm::new();
        form.set_full_name("Jane Doe");
        form.set_email("jane@example.com");
        form.set_gender("Female");
        form
    }

    #[tokio::test]
    async fn profile_form_requires_the_text_fields() {
        let state = AppState::fake();
        let user_id = Uuid::new_v4();

        let mut form = filled_form();
        form.set_email("");
        assert!(matches!(
            form.submit(&state, user_id).await,
            Err(AppError::MissingField("email"))
        ));

        let mut form = filled_form();
        form.set_email("not-an-email");
        assert!(matches!(
            form.submit(&state, user_id).await,
            Err(AppError::Auth(_))
        ));
    }

    #[tokio::test]
    async fn busy_form_refuses_a_second_submit() {
        let state = AppState::fake();
        let mut form = filled_form();
        form.busy = true;
        assert!(matches!(
            form.submit(&state, Uuid::new_v4()).await,
            Err(AppError::Busy)
        ));
    }
}
