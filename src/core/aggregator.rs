use crate::domain::model::{ErrorKind, ErrorRecord};
use crate::domain::ports::Notifier;
use crate::utils::error::Result;

pub const ALERT_SUBJECT: &str = "🚨 URGENT 🚨: Seat tracking failure alert";

/// Collects non-fatal failures for one run and reports them as a single alert.
#[derive(Debug, Default)]
pub struct ErrorAggregator {
    records: Vec<ErrorRecord>,
}

impl ErrorAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: ErrorKind) {
        tracing::debug!("Recording {}: {}", kind.label(), kind.detail());
        self.records.push(ErrorRecord { kind });
    }

    pub fn request_failed(&mut self, url: impl Into<String>) {
        self.record(ErrorKind::RequestFailed { url: url.into() });
    }

    pub fn store_error(&mut self, detail: impl Into<String>) {
        self.record(ErrorKind::StoreError {
            detail: detail.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    /// HTML body: bold label, detail on the next line, records separated by a blank line.
    pub fn render(&self) -> String {
        self.records
            .iter()
            .map(|err| format!("<strong>{}</strong><br>{}", err.label(), err.detail()))
            .collect::<Vec<_>>()
            .join("<br><br>")
    }

    /// Sends one alert containing every record, or nothing on a clean run.
    /// Returns the number of records reported.
    pub async fn flush<N: Notifier + ?Sized>(self, notifier: &N) -> Result<usize> {
        if self.records.is_empty() {
            tracing::info!("No errors recorded, skipping failure alert");
            return Ok(0);
        }

        tracing::warn!("Sending failure alert with {} error(s)", self.records.len());
        notifier.notify(ALERT_SUBJECT, &self.render()).await?;
        Ok(self.records.len())
    }
}
