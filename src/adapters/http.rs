use crate::core::{FetchedPage, PageSource, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("seat-tracker/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn get(&self, url: &str) -> Result<FetchedPage> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        tracing::debug!("GET {} -> {}", url, status);

        let body = response.text().await?;
        Ok(FetchedPage { status, body })
    }
}
