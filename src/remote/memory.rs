use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{AuthSession, EqFilter, OrderBy, RemoteService, UserIdentity};

struct Account {
    id: Uuid,
    email: String,
    password: String,
}

#[derive(Default)]
struct Inner {
    accounts: Vec<Account>,
    sessions: HashMap<String, UserIdentity>,
    tables: HashMap<String, Vec<Value>>,
    objects: HashMap<String, (Bytes, String)>,
}

/// In-memory stand-in for the hosted backend. Used by `AppState::fake()`
/// and the test suites; never touches the network.
#[derive(Default)]
pub struct MemoryRemote {
    inner: Mutex<Inner>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("remote state lock")
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.lock().tables.get(table).map_or(0, Vec::len)
    }

    pub fn object_count(&self) -> usize {
        self.lock().objects.len()
    }

    pub fn has_object(&self, bucket: &str, path: &str) -> bool {
        self.lock().objects.contains_key(&object_key(bucket, path))
    }

    fn matches(row: &Value, filters: &[EqFilter]) -> bool {
        filters.iter().all(|f| match row.get(f.column) {
            Some(Value::String(s)) => s == &f.value,
            Some(other) => other.to_string() == f.value,
            None => false,
        })
    }
}

fn object_key(bucket: &str, path: &str) -> String {
    format!("{bucket}/{path}")
}

fn column_text(row: &Value, column: &str) -> String {
    match row.get(column) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

fn now_text() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

#[async_trait]
impl RemoteService for MemoryRemote {
    async fn sign_up(&self, email: &str, password: &str) -> anyhow::Result<UserIdentity> {
        let mut inner = self.lock();
        if inner.accounts.iter().any(|a| a.email == email) {
            anyhow::bail!("email already registered");
        }
        let id = Uuid::new_v4();
        inner.accounts.push(Account {
            id,
            email: email.to_string(),
            password: password.to_string(),
        });
        Ok(UserIdentity {
            id,
            email: email.to_string(),
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> anyhow::Result<AuthSession> {
        let mut inner = self.lock();
        let account = inner
            .accounts
            .iter()
            .find(|a| a.email == email && a.password == password)
            .ok_or_else(|| anyhow::anyhow!("invalid credentials"))?;
        let user = UserIdentity {
            id: account.id,
            email: account.email.clone(),
        };
        let token = Uuid::new_v4().to_string();
        inner.sessions.insert(token.clone(), user.clone());
        Ok(AuthSession {
            access_token: token,
            user,
        })
    }

    async fn get_user(&self, access_token: &str) -> anyhow::Result<Option<UserIdentity>> {
        Ok(self.lock().sessions.get(access_token).cloned())
    }

    async fn insert_row(&self, table: &str, mut row: Value) -> anyhow::Result<Value> {
        let obj = row
            .as_object_mut()
            .ok_or_else(|| anyhow::anyhow!("row must be a JSON object"))?;
        obj.entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        obj.entry("created_at")
            .or_insert_with(|| Value::String(now_text()));
        obj.entry("updated_at")
            .or_insert_with(|| Value::String(now_text()));

        self.lock()
            .tables
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn select_rows(
        &self,
        table: &str,
        filters: &[EqFilter],
        order: Option<&OrderBy>,
    ) -> anyhow::Result<Vec<Value>> {
        let inner = self.lock();
        let mut rows: Vec<Value> = inner
            .tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|r| Self::matches(r, filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        if let Some(order) = order {
            rows.sort_by(|a, b| {
                let (a, b) = (column_text(a, order.column), column_text(b, order.column));
                if order.descending {
                    b.cmp(&a)
                } else {
                    a.cmp(&b)
                }
            });
        }
        Ok(rows)
    }

    async fn update_rows(
        &self,
        table: &str,
        filters: &[EqFilter],
        patch: Value,
    ) -> anyhow::Result<u64> {
        let patch = patch
            .as_object()
            .ok_or_else(|| anyhow::anyhow!("patch must be a JSON object"))?
            .clone();
        let mut inner = self.lock();
        let mut changed = 0;
        if let Some(rows) = inner.tables.get_mut(table) {
            for row in rows.iter_mut().filter(|r| Self::matches(r, filters)) {
                if let Some(obj) = row.as_object_mut() {
                    for (k, v) in &patch {
                        obj.insert(k.clone(), v.clone());
                    }
                    changed += 1;
                }
            }
        }
        Ok(changed)
    }

    async fn delete_rows(&self, table: &str, filters: &[EqFilter]) -> anyhow::Result<u64> {
        let mut inner = self.lock();
        let Some(rows) = inner.tables.get_mut(table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|r| !Self::matches(r, filters));
        Ok((before - rows.len()) as u64)
    }

    async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        body: Bytes,
        content_type: &str,
        upsert: bool,
    ) -> anyhow::Result<()> {
        let key = object_key(bucket, path);
        let mut inner = self.lock();
        if !upsert && inner.objects.contains_key(&key) {
            anyhow::bail!("object already exists: {}", key);
        }
        inner.objects.insert(key, (body, content_type.to_string()));
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("https://fake.local/object/public/{bucket}/{path}")
    }
}
