use crate::core::aggregator::ErrorAggregator;
use crate::domain::ports::PageSource;

/// GET with a bounded number of attempts. Failures never escape: an exhausted
/// budget becomes one `REQUEST FAILED` record and `None`.
pub struct Fetcher<P: PageSource> {
    source: P,
}

impl<P: PageSource> Fetcher<P> {
    pub fn new(source: P) -> Self {
        Self { source }
    }

    pub async fn fetch(
        &self,
        url: &str,
        max_attempts: u32,
        errors: &mut ErrorAggregator,
    ) -> Option<String> {
        let mut remaining = max_attempts.max(1);

        while remaining > 0 {
            remaining -= 1;
            tracing::debug!("GET {} ({} attempt(s) left after this)", url, remaining);

            match self.source.get(url).await {
                Ok(page) if page.is_success() => return Some(page.body),
                Ok(page) => {
                    tracing::warn!("Request returned HTTP {}: {}", page.status, url);
                }
                Err(e) => {
                    tracing::warn!("Request error for {}: {}", url, e);
                }
            }
        }

        tracing::error!("Giving up after {} attempt(s): {}", max_attempts.max(1), url);
        errors.request_failed(url);
        None
    }
}
