use super::dto::RegisterDraft;
use super::services;
use crate::error::AppError;
use crate::forms::{is_valid_email, required, ImagePreview, SelectedImage};
use crate::remote::{AuthSession, UserIdentity};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

/// Draft state behind the registration screen.
#[derive(Debug, Default)]
pub struct RegisterForm {
    full_name: String,
    email: String,
    password: String,
    gender: String,
    image: Option<SelectedImage>,
    busy: bool,
}

impl RegisterForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_full_name(&mut self, v: impl Into<String>) {
        self.full_name = v.into();
    }

    pub fn set_email(&mut self, v: impl Into<String>) {
        self.email = v.into();
    }

    pub fn set_password(&mut self, v: impl Into<String>) {
        self.password = v.into();
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

    fn validate(&self) -> Result<RegisterDraft, AppError> {
        let full_name = required(&self.full_name, "full_name")?.to_string();
        let email = required(&self.email, "email")?.trim().to_lowercase();
        let password = required(&self.password, "password")?.to_string();
        let gender = required(&self.gender, "gender")?.to_string();
        let image = self
            .image
            .clone()
            .ok_or(AppError::MissingField("image"))?;

        if !is_valid_email(&email) {
            return Err(AppError::Auth("invalid email".into()));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::Auth("password too short".into()));
        }

        Ok(RegisterDraft {
            full_name,
            email,
            password,
            gender,
            image,
        })
    }

    /// Validate, then run the sign-up flow. Refuses while a previous
    /// submission is still in flight.
    pub async fn submit(&mut self, state: &AppState) -> Result<UserIdentity, AppError> {
        if self.busy {
            return Err(AppError::Busy);
        }
        let draft = self.validate()?;
        self.busy = true;
        let result = services::register(state, draft).await;
        self.busy = false;
        result
    }
}

/// Draft state behind the login screen.
#[derive(Debug, Default)]
pub struct LoginForm {
    email: String,
    password: String,
    busy: bool,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_email(&mut self, v: impl Into<String>) {
        self.email = v.into();
    }

    pub fn set_password(&mut self, v: impl Into<String>) {
        self.password = v.into();
    }

    pub fn in_flight(&self) -> bool {
        self.busy
    }

    pub async fn submit(&mut self, state: &AppState) -> Result<AuthSession, AppError> {
        if self.busy {
            return Err(AppError::Busy);
        }
        let email = required(&self.email, "email")?.trim().to_lowercase();
        let password = required(&self.password, "password")?.to_string();
        self.busy = true;
        let result = services::login(state, &email, &password).await;
        self.busy = false;
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;

    use super::*;
    use crate::profile::repo::USER_TABLE;
    use crate::remote::MemoryRemote;

    fn filled_form() -> RegisterForm {
        let mut form = RegisterForm::new();
        form.set_full_name("Jane Doe");
        form.set_email("Jane@Example.com");
        form.set_password("longenough");
        form.set_gender("Female");
        form.set_image(SelectedImage {
            file_name: "me.png".into(),
            content_type: "image/png".into(),
            body: Bytes::from_static(b"avatar"),
        });
        form
    }

    #[tokio::test]
    async fn register_requires_every_field() {
        let state = AppState::fake();

        let mut form = filled_form();
        form.set_full_name("");
        assert!(matches!(
            form.submit(&state).await,
            Err(AppError::MissingField("full_name"))
        ));

        let mut form = RegisterForm::new();
        form.set_full_name("Jane Doe");
        form.set_email("jane@example.com");
        form.set_password("longenough");
        form.set_gender("Female");
        assert!(matches!(
            form.submit(&state).await,
            Err(AppError::MissingField("image"))
        ));
    }

    #[tokio::test]
    async fn register_checks_email_shape_and_password_length() {
        let state = AppState::fake();

        let mut form = filled_form();
        form.set_email("not-an-email");
        assert!(matches!(form.submit(&state).await, Err(AppError::Auth(_))));

        let mut form = filled_form();
        form.set_password("short");
        assert!(matches!(form.submit(&state).await, Err(AppError::Auth(_))));
    }

    #[tokio::test]
    async fn failed_validation_touches_nothing_remote() {
        let remote = Arc::new(MemoryRemote::new());
        let state = AppState::fake_with(remote.clone());

        let mut form = filled_form();
        form.set_gender("  ");
        let _ = form.submit(&state).await;

        assert_eq!(remote.object_count(), 0);
        assert_eq!(remote.row_count(USER_TABLE), 0);
    }

    #[tokio::test]
    async fn register_lowercases_the_email() {
        let state = AppState::fake();
        let mut form = filled_form();
        let user = form.submit(&state).await.unwrap();
        assert_eq!(user.email, "jane@example.com");
    }

    #[tokio::test]
    async fn busy_form_refuses_a_second_submit() {
        let state = AppState::fake();
        let mut form = filled_form();
        form.busy = true;
        assert!(matches!(form.submit(&state).await, Err(AppError::Busy)));

        form.busy = false;
        assert!(form.submit(&state).await.is_ok());
        assert!(!form.in_flight());
    }

    #[tokio::test]
    async fn login_form_requires_both_fields() {
        let state = AppState::fake();
        let mut form = LoginForm::new();
        form.set_email("jane@example.com");
        assert!(matches!(
            form.submit(&state).await,
            Err(AppError::MissingField("password"))
        ));
    }
}
