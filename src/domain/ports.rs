use crate::domain::model::SeatRecord;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Raw HTTP response as seen by the fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait PageSource: Send + Sync {
    /// Transport failures come back as `Err`; any HTTP status is `Ok`.
    async fn get(&self, url: &str) -> Result<FetchedPage>;
}

#[async_trait]
pub trait SeatStore: Send + Sync {
    async fn delete_all(&self, table: &str) -> Result<()>;
    async fn bulk_insert(&self, table: &str, rows: &[SeatRecord]) -> Result<()>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, subject: &str, body: &str) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn course_list_url(&self) -> &str;
    fn catalog_base_url(&self) -> &str;
    fn term(&self) -> &str;
    fn chunk_divisor(&self) -> usize;
    fn request_delay(&self) -> Duration;
    fn max_attempts(&self) -> u32;
    fn seats_table(&self) -> &str;
}
