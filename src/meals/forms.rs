use time::macros::format_description;
use time::Date;
use uuid::Uuid;

use super::dto::{MealDraft, MealEntry, MealPatch};
use super::services;
use crate::error::AppError;
use crate::forms::{required, ImagePreview, SelectedImage};
use crate::remote::UserIdentity;
use crate::state::AppState;

/// Draft state behind the add-meal and edit-meal screens. Field values are
/// held as entered; parsing and presence checks happen on submit, before
/// any network call.
#[derive(Debug, Default)]
pub struct MealForm {
    date: String,
    meal_name: String,
    meal_type: String,
    image: Option<SelectedImage>,
    busy: bool,
}

impl MealForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_date(&mut self, v: impl Into<String>) {
        self.date = v.into();
    }

    pub fn set_meal_name(&mut self, v: impl Into<String>) {
        self.meal_name = v.into();
    }

    pub fn set_meal_type(&mut self, v: impl Into<String>) {
        self.meal_type = v.into();
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

    fn parse_date(&self) -> Result<Date, AppError> {
        let raw = required(&self.date, "date")?;
        Date::parse(raw, &format_description!("[year]-[month]-[day]"))
            .map_err(|_| AppError::MalformedPayload)
    }

    fn validate_create(&self) -> Result<MealDraft, AppError> {
        Ok(MealDraft {
            date: self.parse_date()?,
            meal_name: required(&self.meal_name, "meal_name")?.to_string(),
            meal_type: required(&self.meal_type, "meal_type")?.to_string(),
            image: self.image.clone().ok_or(AppError::MissingField("image"))?,
        })
    }

    fn validate_update(&self) -> Result<MealPatch, AppError> {
        Ok(MealPatch {
            date: self.parse_date()?,
            meal_name: required(&self.meal_name, "meal_name")?.to_string(),
            meal_type: required(&self.meal_type, "meal_type")?.to_string(),
            new_image: self.image.clone(),
        })
    }

    /// Validate, then run the create flow. On success the caller redirects
    /// to the dashboard. Refuses while a submission is in flight.
    pub async fn submit_create(
        &mut self,
        state: &AppState,
        owner: &UserIdentity,
    ) -> Result<MealEntry, AppError> {
        if self.busy {
            return Err(AppError::Busy);
        }
        let draft = self.validate_create()?;
        self.busy = true;
        let result = services::create(state, owner, draft).await;
        self.busy = false;
        result
    }

    /// Validate, then run the update flow against an existing entry.
    pub async fn submit_update(
        &mut self,
        state: &AppState,
        owner: &UserIdentity,
        id: Uuid,
    ) -> Result<(), AppError> {
        if self.busy {
            return Err(AppError::Busy);
        }
        let patch = self.validate_update()?;
        self.busy = true;
        let result = services::update(state, owner, id, patch).await;
        self.busy = false;
        result
    }
}
