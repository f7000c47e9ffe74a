use crate::core::aggregator::ErrorAggregator;
use crate::core::fetcher::Fetcher;
use crate::domain::model::CourseId;
use crate::domain::ports::PageSource;

pub const COURSE_LIST_ATTEMPTS: u32 = 3;

/// `None` means the list could not be downloaded; the run cannot continue.
pub async fn load_course_list<P: PageSource>(
    fetcher: &Fetcher<P>,
    source_url: &str,
    errors: &mut ErrorAggregator,
) -> Option<Vec<CourseId>> {
    tracing::info!("Downloading course list from {}", source_url);
    let text = fetcher
        .fetch(source_url, COURSE_LIST_ATTEMPTS, errors)
        .await?;

    let courses = parse_course_list(&text);
    tracing::info!("Course list downloaded: {} courses", courses.len());
    Some(courses)
}

/// One identifier per line, order preserved. Blank lines (including the one
/// left by a trailing newline) are dropped.
pub fn parse_course_list(text: &str) -> Vec<CourseId> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(CourseId::from)
        .collect()
}
