use crate::core::{Result, SeatRecord, SeatStore};
use crate::utils::error::TrackerError;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;

/// `seats` table access through Supabase's PostgREST endpoint.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: Client,
    rest_url: String,
    api_key: String,
}

impl SupabaseStore {
    pub fn new(project_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        tracing::debug!("Created Supabase client for {}", project_url);

        Ok(Self {
            client,
            rest_url: format!("{}/rest/v1", project_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn check(response: Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response.text().await.unwrap_or_default();
        Err(TrackerError::StoreError {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl SeatStore for SupabaseStore {
    async fn delete_all(&self, table: &str) -> Result<()> {
        // PostgREST 拒絕沒有過濾條件的 DELETE
        let response = self
            .authorized(self.client.delete(self.table_url(table)))
            .query(&[("course_id", "not.is.null")])
            .send()
            .await?;

        Self::check(response).await
    }

    async fn bulk_insert(&self, table: &str, rows: &[SeatRecord]) -> Result<()> {
        let response = self
            .authorized(self.client.post(self.table_url(table)))
            .header("Prefer", "return=minimal")
            .json(rows)
            .send()
            .await?;

        Self::check(response).await
    }
}
