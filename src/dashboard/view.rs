use tracing::warn;
use uuid::Uuid;

use crate::error::AppError;
use crate::meals::dto::MealEntry;
use crate::meals::services;
use crate::remote::UserIdentity;
use crate::state::AppState;

/// Lifecycle of the dashboard's one remote fetch.
#[derive(Debug)]
pub enum DashboardState {
    Loading,
    Ready(Vec<MealEntry>),
    Empty,
    Failed(String),
}

/// The dashboard screen: the owner's list, fetched once, plus a live
/// search query evaluated over it in memory.
pub struct Dashboard {
    owner: Option<UserIdentity>,
    state: DashboardState,
    query: String,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            owner: None,
            state: DashboardState::Loading,
            query: String::new(),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Resolve the session, then fetch the owner's entries once. An absent
    /// session lands in `Failed`: nothing to show, not a crash.
    pub async fn load(&mut self, state: &AppState, session: Option<UserIdentity>) {
        let Some(owner) = session else {
            self.state = DashboardState::Failed("no active session".into());
            return;
        };
        self.state = match services::list(state, &owner).await {
            Ok(entries) if entries.is_empty() => DashboardState::Empty,
            Ok(entries) => DashboardState::Ready(entries),
            Err(e) => {
                warn!(error = %e, "dashboard load failed");
                DashboardState::Failed(e.to_string())
            }
        };
        self.owner = Some(owner);
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// The rows the current query leaves visible. A pure view over the
    /// already-fetched list; never re-queries the gateway.
    pub fn visible(&self) -> Vec<&MealEntry> {
        let entries: &[MealEntry] = match &self.state {
            DashboardState::Ready(entries) => entries,
            _ => &[],
        };
        let query = self.query.trim().to_lowercase();
        if query.is_empty() {
            return entries.iter().collect();
        }
        entries.iter().filter(|m| Self::matches(m, &query)).collect()
    }

    fn matches(entry: &MealEntry, query: &str) -> bool {
        entry.meal_name.to_lowercase().contains(query)
            || entry.meal_type.to_lowercase().contains(query)
            || entry.date_text().contains(query)
    }

    /// Delete an entry after explicit confirmation. On success the entry
    /// leaves local state without a re-fetch; on failure local state is
    /// untouched and the error surfaces to the caller.
    pub async fn delete(
        &mut self,
        state: &AppState,
        id: Uuid,
        confirmed: bool,
    ) -> Result<(), AppError> {
        if !confirmed {
            return Err(AppError::MissingField("confirm"));
        }
        let owner = self
            .owner
            .clone()
            .ok_or_else(|| AppError::Auth("no active session".into()))?;

        services::delete(state, &owner, id).await?;

        if let DashboardState::Ready(entries) = &mut self.state {
            entries.retain(|m| m.id != id);
            if entries.is_empty() {
                self.state = DashboardState::Empty;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;
    use time::macros::date;
    use time::Date;

    use super::*;
    use crate::forms::SelectedImage;
    use crate::meals::dto::MealDraft;
    use crate::remote::{MemoryRemote, RemoteService};

    async fn owner_with_meals(
        remote: &MemoryRemote,
        state: &AppState,
        meals: &[(&str, &str, Date)],
    ) -> UserIdentity {
        let owner = remote.sign_up("a@example.com", "longenough").await.unwrap();
        for (name, kind, day) in meals {
            services::create(
                state,
                &owner,
                MealDraft {
                    date: *day,
                    meal_name: (*name).into(),
                    meal_type: (*kind).into(),
                    image: SelectedImage {
                        file_name: "photo.jpg".into(),
                        content_type: "image/jpeg".into(),
                        body: Bytes::from_static(b"pixels"),
                    },
                },
            )
            .await
            .unwrap();
        }
        owner
    }

    #[tokio::test]
    async fn missing_session_fails_softly() {
        let state = AppState::fake();
        let mut page = Dashboard::new();
        assert!(matches!(page.state(), DashboardState::Loading));

        page.load(&state, None).await;
        assert!(matches!(page.state(), DashboardState::Failed(_)));
        assert!(page.visible().is_empty());
    }

    #[tokio::test]
    async fn zero_entries_is_empty_not_failed() {
        let remote = Arc::new(MemoryRemote::new());
        let state = AppState::fake_with(remote.clone());
        let owner = remote.sign_up("a@example.com", "longenough").await.unwrap();

        let mut page = Dashboard::new();
        page.load(&state, Some(owner)).await;
        assert!(matches!(page.state(), DashboardState::Empty));
    }

    #[tokio::test]
    async fn query_filters_name_type_and_date_case_insensitively() {
        let remote = Arc::new(MemoryRemote::new());
        let state = AppState::fake_with(remote.clone());
        let owner = owner_with_meals(
            &remote,
            &state,
            &[
                ("Scrambled Eggs with Toast", "Breakfast", date!(2023 - 10 - 26)),
                ("Grilled Chicken Salad", "Lunch", date!(2023 - 10 - 26)),
            ],
        )
        .await;

        let mut page = Dashboard::new();
        page.load(&state, Some(owner)).await;

        page.set_query("lunch");
        let visible = page.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].meal_name, "Grilled Chicken Salad");

        page.set_query("2023-10-26");
        assert_eq!(page.visible().len(), 2);

        page.set_query("zzz");
        assert!(page.visible().is_empty());

        page.set_query("");
        assert_eq!(page.visible().len(), 2);
    }

    #[tokio::test]
    async fn unconfirmed_delete_is_refused_before_any_remote_call() {
        let remote = Arc::new(MemoryRemote::new());
        let state = AppState::fake_with(remote.clone());
        let owner = owner_with_meals(
            &remote,
            &state,
            &[("Salad", "Lunch", date!(2023 - 10 - 26))],
        )
        .await;

        let mut page = Dashboard::new();
        page.load(&state, Some(owner.clone())).await;
        let id = page.visible()[0].id;

        let err = page.delete(&state, id, false).await.unwrap_err();
        assert!(matches!(err, AppError::MissingField("confirm")));

        // Entry still listed locally and remotely.
        assert_eq!(page.visible().len(), 1);
        assert_eq!(services::list(&state, &owner).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn confirmed_delete_drops_the_entry_locally_without_a_refetch() {
        let remote = Arc::new(MemoryRemote::new());
        let state = AppState::fake_with(remote.clone());
        let owner = owner_with_meals(
            &remote,
            &state,
            &[
                ("Salad", "Lunch", date!(2023 - 10 - 26)),
                ("Oatmeal", "Breakfast", date!(2023 - 10 - 25)),
            ],
        )
        .await;

        let mut page = Dashboard::new();
        page.load(&state, Some(owner)).await;
        let id = page.visible()[0].id;

        page.delete(&state, id, true).await.unwrap();
        let visible = page.visible();
        assert_eq!(visible.len(), 1);
        assert!(visible.iter().all(|m| m.id != id));

        // Deleting the last entry settles into Empty.
        let last = visible[0].id;
        page.delete(&state, last, true).await.unwrap();
        assert!(matches!(page.state(), DashboardState::Empty));
    }

    #[tokio::test]
    async fn failed_delete_leaves_local_state_untouched() {
        let remote = Arc::new(MemoryRemote::new());
        let state = AppState::fake_with(remote.clone());
        let owner = owner_with_meals(
            &remote,
            &state,
            &[("Salad", "Lunch", date!(2023 - 10 - 26))],
        )
        .await;

        let mut page = Dashboard::new();
        page.load(&state, Some(owner)).await;

        let err = page.delete(&state, Uuid::new_v4(), true).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(page.visible().len(), 1);
    }
}
