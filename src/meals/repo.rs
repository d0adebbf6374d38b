//! Row-level access to the `food_tb` collection. Every operation carries
//! the owner in its filter; nothing here can reach another user's rows.

use anyhow::Context;
use serde_json::Value;
use uuid::Uuid;

use super::dto::MealEntry;
use crate::remote::{EqFilter, OrderBy, RemoteService};

pub const FOOD_TABLE: &str = "food_tb";

fn owner_filter(owner: Uuid) -> EqFilter {
    EqFilter::new("user_id", owner.to_string())
}

fn id_filter(id: Uuid) -> EqFilter {
    EqFilter::new("id", id.to_string())
}

fn decode(row: Value) -> anyhow::Result<MealEntry> {
    serde_json::from_value(row).context("decode meal row")
}

pub async fn list_by_owner(
    remote: &dyn RemoteService,
    owner: Uuid,
) -> anyhow::Result<Vec<MealEntry>> {
    let rows = remote
        .select_rows(FOOD_TABLE, &[owner_filter(owner)], Some(&OrderBy::desc("date")))
        .await?;
    rows.into_iter().map(decode).collect()
}

pub async fn find_for_owner(
    remote: &dyn RemoteService,
    owner: Uuid,
    id: Uuid,
) -> anyhow::Result<Option<MealEntry>> {
    let rows = remote
        .select_rows(FOOD_TABLE, &[id_filter(id), owner_filter(owner)], None)
        .await?;
    rows.into_iter().next().map(decode).transpose()
}

pub async fn insert(remote: &dyn RemoteService, row: Value) -> anyhow::Result<MealEntry> {
    let row = remote.insert_row(FOOD_TABLE, row).await?;
    decode(row).context("decode inserted meal")
}

pub async fn update_for_owner(
    remote: &dyn RemoteService,
    owner: Uuid,
    id: Uuid,
    patch: Value,
) -> anyhow::Result<u64> {
    remote
        .update_rows(FOOD_TABLE, &[id_filter(id), owner_filter(owner)], patch)
        .await
}

pub async fn delete_for_owner(
    remote: &dyn RemoteService,
    owner: Uuid,
    id: Uuid,
) -> anyhow::Result<u64> {
    remote
        .delete_rows(FOOD_TABLE, &[id_filter(id), owner_filter(owner)])
        .await
}
