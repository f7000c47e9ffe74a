pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

pub use crate::adapters::{AlertNotifier, HttpPageSource, SupabaseStore};
pub use crate::config::AppConfig;
pub use crate::core::engine::{RunOutcome, SeatTracker};
pub use crate::utils::error::{Result, TrackerError};
