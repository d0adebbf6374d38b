//! Row-level access to the `user_tb` collection.

use anyhow::Context;
use serde_json::{json, Value};
use uuid::Uuid;

use super::dto::{NewProfile, UserProfile};
use crate::remote::{EqFilter, RemoteService};

pub const USER_TABLE: &str = "user_tb";

fn user_filter(user_id: Uuid) -> EqFilter {
    EqFilter::new("user_id", user_id.to_string())
}

pub async fn insert(remote: &dyn RemoteService, profile: NewProfile) -> anyhow::Result<UserProfile> {
    let row = remote
        .insert_row(
            USER_TABLE,
            json!({
                "user_id": profile.user_id,
                "email": profile.email,
                "full_name": profile.full_name,
                "gender": profile.gender,
                "image_url": profile.image_url,
            }),
        )
        .await?;
    serde_json::from_value(row).context("decode inserted profile")
}

pub async fn find_by_user_id(
    remote: &dyn RemoteService,
    user_id: Uuid,
) -> anyhow::Result<Option<UserProfile>> {
    let rows = remote
        .select_rows(USER_TABLE, &[user_filter(user_id)], None)
        .await?;
    rows.into_iter()
        .next()
        .map(|row| serde_json::from_value(row).context("decode profile row"))
        .transpose()
}

pub async fn update_by_user_id(
    remote: &dyn RemoteService,
    user_id: Uuid,
    patch: Value,
) -> anyhow::Result<u64> {
    remote
        .update_rows(USER_TABLE, &[user_filter(user_id)], patch)
        .await
}
