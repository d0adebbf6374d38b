//! Boundary to the hosted backend. Auth identities, record rows, and
//! stored images all live behind this trait; the app itself keeps no
//! state past a single request.

mod http;
mod memory;

pub use http::HttpRemote;
pub use memory::MemoryRemote;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Authenticated identity as reported by the backend's auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: Uuid,
    pub email: String,
}

/// Result of a successful sign-in: an opaque access token plus the identity
/// it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub user: UserIdentity,
}

/// Equality predicate on one column, the only row filter the backend's
/// REST surface is asked for here.
#[derive(Debug, Clone)]
pub struct EqFilter {
    pub column: &'static str,
    pub value: String,
}

impl EqFilter {
    pub fn new(column: &'static str, value: impl Into<String>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }
}

/// Single sort key applied by the backend before rows are returned.
#[derive(Debug, Clone)]
pub struct OrderBy {
    pub column: &'static str,
    pub descending: bool,
}

impl OrderBy {
    pub fn desc(column: &'static str) -> Self {
        Self {
            column,
            descending: true,
        }
    }
}

/// The surface the hosted backend exposes: identity, row CRUD scoped by
/// equality filters, and object storage with public URLs. Rows travel as
/// raw JSON; typed mapping happens in the per-domain repo modules.
#[async_trait]
pub trait RemoteService: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> anyhow::Result<UserIdentity>;
    async fn sign_in(&self, email: &str, password: &str) -> anyhow::Result<AuthSession>;
    async fn get_user(&self, access_token: &str) -> anyhow::Result<Option<UserIdentity>>;

    async fn insert_row(&self, table: &str, row: Value) -> anyhow::Result<Value>;
    async fn select_rows(
        &self,
        table: &str,
        filters: &[EqFilter],
        order: Option<&OrderBy>,
    ) -> anyhow::Result<Vec<Value>>;
    /// Returns the number of rows matched.
    async fn update_rows(
        &self,
        table: &str,
        filters: &[EqFilter],
        patch: Value,
    ) -> anyhow::Result<u64>;
    /// Returns the number of rows removed.
    async fn delete_rows(&self, table: &str, filters: &[EqFilter]) -> anyhow::Result<u64>;

    async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        body: Bytes,
        content_type: &str,
        upsert: bool,
    ) -> anyhow::Result<()>;
    fn public_url(&self, bucket: &str, path: &str) -> String;
}
