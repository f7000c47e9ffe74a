use crate::core::aggregator::ErrorAggregator;
use crate::core::course_list::load_course_list;
use crate::core::fetcher::Fetcher;
use crate::core::parser::SectionParser;
use crate::core::reconcile::{reconcile, ReconcileOutcome};
use crate::core::scrape::{ChunkedScraper, ScrapeSettings, ScrapeStats};
use crate::domain::ports::{ConfigProvider, Notifier, PageSource, SeatStore};
use crate::utils::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The course list could not be downloaded; nothing was scraped or written.
    CourseListUnavailable { errors_reported: usize },
    Completed {
        courses: usize,
        sections: usize,
        scrape: ScrapeStats,
        reconcile: ReconcileOutcome,
        errors_reported: usize,
    },
}

impl RunOutcome {
    pub fn is_fatal(&self) -> bool {
        matches!(self, RunOutcome::CourseListUnavailable { .. })
    }
}

pub struct SeatTracker<P, S, N, C>
where
    P: PageSource,
    S: SeatStore,
    N: Notifier,
    C: ConfigProvider,
{
    fetcher: Fetcher<P>,
    store: S,
    notifier: N,
    config: C,
}

impl<P, S, N, C> SeatTracker<P, S, N, C>
where
    P: PageSource,
    S: SeatStore,
    N: Notifier,
    C: ConfigProvider,
{
    pub fn new(source: P, store: S, notifier: N, config: C) -> Self {
        Self {
            fetcher: Fetcher::new(source),
            store,
            notifier,
            config,
        }
    }

    /// One full scrape-and-replace pass. Only a failed alert delivery is an `Err`.
    pub async fn run(&self) -> Result<RunOutcome> {
        let mut errors = ErrorAggregator::new();
        tracing::info!("Starting seat tracking run for term {}", self.config.term());

        let Some(course_ids) =
            load_course_list(&self.fetcher, self.config.course_list_url(), &mut errors).await
        else {
            tracing::error!("Course list unavailable, aborting before scraping");
            let errors_reported = errors.flush(&self.notifier).await?;
            return Ok(RunOutcome::CourseListUnavailable { errors_reported });
        };

        let scraper = ChunkedScraper::new(&self.fetcher, SectionParser::new()?, self.scrape_settings());
        let (seats, stats) = scraper.scrape(&course_ids, &mut errors).await;

        let reconcile = reconcile(&self.store, self.config.seats_table(), &seats, &mut errors).await;

        let errors_reported = errors.flush(&self.notifier).await?;
        tracing::info!(
            "Run finished: {} courses, {} sections, {} error(s) reported",
            course_ids.len(),
            seats.len(),
            errors_reported
        );

        Ok(RunOutcome::Completed {
            courses: course_ids.len(),
            sections: seats.len(),
            scrape: stats,
            reconcile,
            errors_reported,
        })
    }

    fn scrape_settings(&self) -> ScrapeSettings {
        ScrapeSettings {
            catalog_base_url: self.config.catalog_base_url().to_string(),
            term: self.config.term().to_string(),
            chunk_divisor: self.config.chunk_divisor(),
            request_delay: self.config.request_delay(),
            max_attempts: self.config.max_attempts(),
        }
    }
}
