use anyhow::Context;
use seat_tracker::utils::{logger, validation::Validate};
use seat_tracker::{
    AlertNotifier, AppConfig, HttpPageSource, RunOutcome, SeatTracker, SupabaseStore, TrackerError,
};

const CONFIG_ENV: &str = "SEAT_TRACKER_CONFIG";
const EXIT_FAILURE: i32 = 1;
const EXIT_COURSE_LIST_UNAVAILABLE: i32 = 2;

fn load_config() -> Result<AppConfig, TrackerError> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => AppConfig::from_file(path),
        Err(_) => AppConfig::from_env(),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(EXIT_FAILURE);
        }
    };

    logger::init_logger(config.logging.verbose, config.logging.format);
    tracing::info!("Starting seat-tracker");

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(EXIT_FAILURE);
    }

    let source = HttpPageSource::new(config.timeout()).context("building HTTP client")?;
    let store = SupabaseStore::new(&config.store.url, &config.store.key, config.timeout())
        .context("building Supabase client")?;
    let notifier = AlertNotifier::new(&config.notify).context("building alert notifier")?;

    let tracker = SeatTracker::new(source, store, notifier, config);

    match tracker.run().await {
        Ok(RunOutcome::CourseListUnavailable { .. }) => {
            tracing::error!("❌ Course list could not be downloaded, run aborted");
            std::process::exit(EXIT_COURSE_LIST_UNAVAILABLE);
        }
        Ok(RunOutcome::Completed {
            sections,
            scrape,
            errors_reported,
            ..
        }) => {
            if scrape.failed_chunks > 0 || scrape.sections_skipped > 0 {
                tracing::warn!(
                    "⚠️ {} of {} chunk(s) failed ({} course(s) not retrieved), {} section(s) skipped",
                    scrape.failed_chunks,
                    scrape.chunks,
                    scrape.unretrieved_courses,
                    scrape.sections_skipped
                );
            }
            if errors_reported > 0 {
                tracing::warn!(
                    "⚠️ Run completed with {} error(s); alert sent",
                    errors_reported
                );
            } else {
                tracing::info!("✅ Run completed: {} sections uploaded", sections);
            }
        }
        Err(e) => {
            tracing::error!("❌ {}", e);
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(EXIT_FAILURE);
        }
    }

    Ok(())
}
