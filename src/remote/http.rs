use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, StatusCode};
use serde_json::Value;

use super::{AuthSession, EqFilter, OrderBy, RemoteService, UserIdentity};

/// reqwest-backed client for the hosted backend's REST surface.
#[derive(Clone)]
pub struct HttpRemote {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpRemote {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn filter_query(filters: &[EqFilter]) -> Vec<(String, String)> {
        filters
            .iter()
            .map(|f| (f.column.to_string(), format!("eq.{}", f.value)))
            .collect()
    }

    /// Rows changed by a write, as reported in the representation the
    /// backend returns when asked for one.
    async fn changed_rows(res: reqwest::Response, action: &str) -> anyhow::Result<u64> {
        if !res.status().is_success() {
            anyhow::bail!("{} rejected: {}", action, res.status());
        }
        let rows: Vec<Value> = res.json().await.with_context(|| format!("{action} response"))?;
        Ok(rows.len() as u64)
    }
}

#[async_trait]
impl RemoteService for HttpRemote {
    async fn sign_up(&self, email: &str, password: &str) -> anyhow::Result<UserIdentity> {
        let res = self
            .http
            .post(format!("{}/auth/v1/signup", self.base_url))
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .context("sign-up request")?;
        if !res.status().is_success() {
            anyhow::bail!("sign-up rejected: {}", res.status());
        }
        res.json().await.context("sign-up response")
    }

    async fn sign_in(&self, email: &str, password: &str) -> anyhow::Result<AuthSession> {
        let res = self
            .http
            .post(format!(
                "{}/auth/v1/token?grant_type=password",
                self.base_url
            ))
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .context("sign-in request")?;
        if !res.status().is_success() {
            anyhow::bail!("sign-in rejected: {}", res.status());
        }
        res.json().await.context("sign-in response")
    }

    async fn get_user(&self, access_token: &str) -> anyhow::Result<Option<UserIdentity>> {
        let res = self
            .http
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .context("session lookup request")?;
        match res.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            s if s.is_success() => Ok(Some(res.json().await.context("session lookup response")?)),
            s => anyhow::bail!("session lookup rejected: {}", s),
        }
    }

    async fn insert_row(&self, table: &str, row: Value) -> anyhow::Result<Value> {
        let res = self
            .http
            .post(self.rest_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await
            .context("insert request")?;
        if !res.status().is_success() {
            anyhow::bail!("insert rejected: {}", res.status());
        }
        let mut rows: Vec<Value> = res.json().await.context("insert response")?;
        if rows.is_empty() {
            anyhow::bail!("insert returned no representation");
        }
        Ok(rows.remove(0))
    }

    async fn select_rows(
        &self,
        table: &str,
        filters: &[EqFilter],
        order: Option<&OrderBy>,
    ) -> anyhow::Result<Vec<Value>> {
        let mut query = vec![("select".to_string(), "*".to_string())];
        query.extend(Self::filter_query(filters));
        if let Some(order) = order {
            let dir = if order.descending { "desc" } else { "asc" };
            query.push(("order".to_string(), format!("{}.{}", order.column, dir)));
        }
        let res = self
            .http
            .get(self.rest_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&query)
            .send()
            .await
            .context("select request")?;
        if !res.status().is_success() {
            anyhow::bail!("select rejected: {}", res.status());
        }
        res.json().await.context("select response")
    }

    async fn update_rows(
        &self,
        table: &str,
        filters: &[EqFilter],
        patch: Value,
    ) -> anyhow::Result<u64> {
        let res = self
            .http
            .patch(self.rest_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=representation")
            .query(&Self::filter_query(filters))
            .json(&patch)
            .send()
            .await
            .context("update request")?;
        Self::changed_rows(res, "update").await
    }

    async fn delete_rows(&self, table: &str, filters: &[EqFilter]) -> anyhow::Result<u64> {
        let res = self
            .http
            .delete(self.rest_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=representation")
            .query(&Self::filter_query(filters))
            .send()
            .await
            .context("delete request")?;
        Self::changed_rows(res, "delete").await
    }

    async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        body: Bytes,
        content_type: &str,
        upsert: bool,
    ) -> anyhow::Result<()> {
        let res = self
            .http
            .post(format!(
                "{}/storage/v1/object/{}/{}",
                self.base_url, bucket, path
            ))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(header::CONTENT_TYPE, content_type)
            .header("x-upsert", if upsert { "true" } else { "false" })
            .body(body)
            .send()
            .await
            .context("upload request")?;
        if !res.status().is_success() {
            anyhow::bail!("upload rejected: {}", res.status());
        }
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, bucket, path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_shape() {
        let remote = HttpRemote::new("https://backend.example/", "key");
        assert_eq!(
            remote.public_url("food_bk", "food_pics/a.jpg"),
            "https://backend.example/storage/v1/object/public/food_bk/food_pics/a.jpg"
        );
    }

    #[test]
    fn filter_query_renders_eq_predicates() {
        let q = HttpRemote::filter_query(&[
            EqFilter::new("user_id", "u-1"),
            EqFilter::new("id", "m-2"),
        ]);
        assert_eq!(
            q,
            vec![
                ("user_id".to_string(), "eq.u-1".to_string()),
                ("id".to_string(), "eq.m-2".to_string()),
            ]
        );
    }
}
