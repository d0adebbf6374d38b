use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::forms::SelectedImage;

/// One logged meal, as stored in the `food_tb` collection. `user_id` is
/// fixed at creation; `created_at` comes from the remote service and
/// `updated_at` is refreshed by every update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: Date,
    pub meal_name: String,
    pub meal_type: String,
    pub image_url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl MealEntry {
    /// Date rendered the way the dashboard shows and filters it.
    pub fn date_text(&self) -> String {
        self.date
            .format(&format_description!("[year]-[month]-[day]"))
            .unwrap_or_default()
    }
}

/// Validated add-form payload; all four fields present.
#[derive(Debug, Clone)]
pub struct MealDraft {
    pub date: Date,
    pub meal_name: String,
    pub meal_type: String,
    pub image: SelectedImage,
}

/// Validated edit-form payload; a missing image keeps the stored photo.
#[derive(Debug, Clone)]
pub struct MealPatch {
    pub date: Date,
    pub meal_name: String,
    pub meal_type: String,
    pub new_image: Option<SelectedImage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn entry_serializes_with_plain_dates_and_rfc3339_timestamps() {
        let entry = MealEntry {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            date: date!(2023 - 10 - 26),
            meal_name: "Grilled Chicken Salad".into(),
            meal_type: "Lunch".into(),
            image_url: "https://fake.local/x.jpg".into(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["date"], "2023-10-26");
        assert_eq!(json["created_at"], "1970-01-01T00:00:00Z");

        let back: MealEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back.date_text(), "2023-10-26");
    }
}
