pub mod aggregator;
pub mod course_list;
pub mod engine;
pub mod fetcher;
pub mod parser;
pub mod reconcile;
pub mod scrape;

pub use crate::domain::model::{CourseId, ErrorKind, ErrorRecord, SeatKey, SeatMap, SeatRecord, SectionId};
pub use crate::domain::ports::{ConfigProvider, FetchedPage, Notifier, PageSource, SeatStore};
pub use crate::utils::error::Result;
