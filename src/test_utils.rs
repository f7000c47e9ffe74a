//! Hand-written port doubles shared by the unit tests.

use crate::domain::model::SeatRecord;
use crate::domain::ports::{ConfigProvider, FetchedPage, Notifier, PageSource, SeatStore};
use crate::utils::error::{Result, TrackerError};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub fn ok_page(body: &str) -> Result<FetchedPage> {
    Ok(FetchedPage {
        status: 200,
        body: body.to_string(),
    })
}

pub fn status_page(status: u16) -> Result<FetchedPage> {
    Ok(FetchedPage {
        status,
        body: String::new(),
    })
}

pub fn transport_error() -> Result<FetchedPage> {
    Err(TrackerError::IoError(std::io::Error::new(
        std::io::ErrorKind::ConnectionReset,
        "connection reset by peer",
    )))
}

/// Replies from a per-URL script; once a script runs out (or for unknown
/// URLs) every request gets a 404.
#[derive(Clone, Default)]
pub struct ScriptedSource {
    scripts: Arc<Mutex<HashMap<String, VecDeque<Result<FetchedPage>>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn script(&self, url: &str, replies: Vec<Result<FetchedPage>>) {
        let mut scripts = self.scripts.lock().await;
        scripts.entry(url.to_string()).or_default().extend(replies);
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    pub async fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().await.iter().filter(|c| *c == url).count()
    }
}

#[async_trait]
impl PageSource for ScriptedSource {
    async fn get(&self, url: &str) -> Result<FetchedPage> {
        self.calls.lock().await.push(url.to_string());
        let mut scripts = self.scripts.lock().await;
        match scripts.get_mut(url).and_then(|queue| queue.pop_front()) {
            Some(reply) => reply,
            None => status_page(404),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    DeleteAll(String),
    BulkInsert(String, Vec<SeatRecord>),
}

#[derive(Clone, Default)]
pub struct RecordingStore {
    calls: Arc<Mutex<Vec<StoreCall>>>,
    fail_delete: bool,
    fail_insert: bool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_delete() -> Self {
        Self {
            fail_delete: true,
            ..Self::default()
        }
    }

    pub fn failing_insert() -> Self {
        Self {
            fail_insert: true,
            ..Self::default()
        }
    }

    pub async fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl SeatStore for RecordingStore {
    async fn delete_all(&self, table: &str) -> Result<()> {
        self.calls
            .lock()
            .await
            .push(StoreCall::DeleteAll(table.to_string()));
        if self.fail_delete {
            return Err(TrackerError::StoreError {
                status: 401,
                message: "Invalid API key".to_string(),
            });
        }
        Ok(())
    }

    async fn bulk_insert(&self, table: &str, rows: &[SeatRecord]) -> Result<()> {
        self.calls
            .lock()
            .await
            .push(StoreCall::BulkInsert(table.to_string(), rows.to_vec()));
        if self.fail_insert {
            return Err(TrackerError::StoreError {
                status: 409,
                message: "duplicate key value violates unique constraint".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct SpyNotifier {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    fail: bool,
}

impl SpyNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for SpyNotifier {
    async fn notify(&self, subject: &str, body: &str) -> Result<()> {
        self.sent
            .lock()
            .await
            .push((subject.to_string(), body.to_string()));
        if self.fail {
            return Err(TrackerError::NotificationError {
                message: "relay refused connection".to_string(),
            });
        }
        Ok(())
    }
}

pub struct MockConfig {
    pub course_list_url: String,
    pub catalog_base_url: String,
    pub term: String,
    pub chunk_divisor: usize,
    pub max_attempts: u32,
    pub seats_table: String,
}

impl MockConfig {
    pub fn new() -> Self {
        Self {
            course_list_url: "http://courses.test/courses_list.txt".to_string(),
            catalog_base_url: "http://catalog.test/soc".to_string(),
            term: "202501".to_string(),
            chunk_divisor: 2,
            max_attempts: 3,
            seats_table: "seats".to_string(),
        }
    }
}

impl ConfigProvider for MockConfig {
    fn course_list_url(&self) -> &str {
        &self.course_list_url
    }

    fn catalog_base_url(&self) -> &str {
        &self.catalog_base_url
    }

    fn term(&self) -> &str {
        &self.term
    }

    fn chunk_divisor(&self) -> usize {
        self.chunk_divisor
    }

    fn request_delay(&self) -> Duration {
        Duration::ZERO
    }

    fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    fn seats_table(&self) -> &str {
        &self.seats_table
    }
}

/// Catalog markup with one container per course, each holding the given
/// `(section_id, open, total, waitlist)` sections.
pub fn catalog_page(courses: &[(&str, &[(&str, u32, u32, u32)])]) -> String {
    let mut html = String::from("<html><body><div class=\"courses-container\">");
    for (course_id, sections) in courses {
        html.push_str(&format!(
            "<div id=\"{course_id}\" class=\"course\"><div class=\"sections-container\">"
        ));
        for (section_id, open, total, waitlist) in sections.iter() {
            html.push_str(&format!(
                r#"<div class="section delivery-f2f">
  <input type="hidden" name="sectionId" value="{section_id}">
  <span class="section-id">{section_id}</span>
  <span class="total-seats">Total: <span class="total-seats-count">{total}</span></span>
  <span class="open-seats">Open: <span class="open-seats-count">{open}</span></span>
  <span class="waitlist">Waitlist: <span class="waitlist-count">{waitlist}</span></span>
</div>"#
            ));
        }
        html.push_str("</div></div>");
    }
    html.push_str("</div></body></html>");
    html
}
