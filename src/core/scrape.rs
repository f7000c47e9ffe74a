use crate::core::aggregator::ErrorAggregator;
use crate::core::fetcher::Fetcher;
use crate::core::parser::SectionParser;
use crate::domain::model::{CourseId, SeatMap};
use crate::domain::ports::PageSource;
use std::ops::Range;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    pub catalog_base_url: String,
    pub term: String,
    pub chunk_divisor: usize,
    pub request_delay: Duration,
    pub max_attempts: u32,
}

/// `floor(len / divisor)`, never below 1.
pub fn chunk_size(len: usize, divisor: usize) -> usize {
    (len / divisor.max(1)).max(1)
}

/// Contiguous, non-overlapping windows covering `0..len`; the last one takes
/// whatever is left.
pub fn chunk_bounds(len: usize, divisor: usize) -> Vec<Range<usize>> {
    let size = chunk_size(len, divisor);
    let mut bounds = Vec::new();
    let mut l = 0;
    let mut r = size.min(len);

    while l < len {
        bounds.push(l..r);
        l = r;
        r = (r + size).min(len);
    }

    bounds
}

pub fn sections_url(base: &str, term: &str, chunk: &[CourseId]) -> String {
    let ids = chunk
        .iter()
        .map(CourseId::as_str)
        .collect::<Vec<_>>()
        .join(",");
    format!("{}/{}/sections?courseIds={}", base.trim_end_matches('/'), term, ids)
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScrapeStats {
    pub chunks: usize,
    pub failed_chunks: usize,
    pub unretrieved_courses: usize,
    pub sections_parsed: usize,
    pub sections_skipped: usize,
}

/// Walks the course list chunk by chunk, one paced request at a time.
pub struct ChunkedScraper<'a, P: PageSource> {
    fetcher: &'a Fetcher<P>,
    parser: SectionParser,
    settings: ScrapeSettings,
}

impl<'a, P: PageSource> ChunkedScraper<'a, P> {
    pub fn new(fetcher: &'a Fetcher<P>, parser: SectionParser, settings: ScrapeSettings) -> Self {
        Self {
            fetcher,
            parser,
            settings,
        }
    }

    pub async fn scrape(
        &self,
        course_ids: &[CourseId],
        errors: &mut ErrorAggregator,
    ) -> (SeatMap, ScrapeStats) {
        let mut seats = SeatMap::new();
        let mut stats = ScrapeStats::default();

        for (index, window) in chunk_bounds(course_ids.len(), self.settings.chunk_divisor)
            .into_iter()
            .enumerate()
        {
            let chunk = &course_ids[window];
            stats.chunks += 1;

            // 固定間隔，避免觸發對方的流量限制
            if index > 0 && !self.settings.request_delay.is_zero() {
                tokio::time::sleep(self.settings.request_delay).await;
            }

            tracing::info!(
                "Requesting sections page for {} courses: {} to {}",
                chunk.len(),
                chunk[0],
                chunk[chunk.len() - 1]
            );
            let url = sections_url(&self.settings.catalog_base_url, &self.settings.term, chunk);

            let Some(page) = self
                .fetcher
                .fetch(&url, self.settings.max_attempts, errors)
                .await
            else {
                tracing::warn!("Seat info for {} courses was not retrieved", chunk.len());
                stats.failed_chunks += 1;
                stats.unretrieved_courses += chunk.len();
                continue;
            };

            let parsed = self.parser.parse(&page, chunk);
            stats.sections_parsed += parsed.records.len();
            stats.sections_skipped += parsed.skipped.len();
            seats.extend(parsed.records);
        }

        tracing::info!(
            "Scrape finished: {} sections from {} chunk(s), {} chunk(s) failed, {} section(s) skipped",
            seats.len(),
            stats.chunks,
            stats.failed_chunks,
            stats.sections_skipped
        );

        (seats, stats)
    }
}
