use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 課程代碼，例如 `CMSC131`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(String);

impl CourseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CourseId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// 班級代碼，只在同一門課內唯一，例如 `0101`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeatKey {
    pub course_id: CourseId,
    pub section_id: SectionId,
}

/// One section's seat counters at scrape time. Field names double as the
/// `seats` table's column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatRecord {
    pub course_id: CourseId,
    pub section_id: SectionId,
    /// Open seats as reported by the catalog.
    pub current_seats: u32,
    pub max_seats: u32,
    pub waitlist: u32,
}

impl SeatRecord {
    pub fn key(&self) -> SeatKey {
        SeatKey {
            course_id: self.course_id.clone(),
            section_id: self.section_id.clone(),
        }
    }
}

/// Snapshot of every scraped section, keyed by `(course, section)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeatMap {
    entries: BTreeMap<SeatKey, SeatRecord>,
}

impl SeatMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins; the replaced record is returned.
    pub fn insert(&mut self, record: SeatRecord) -> Option<SeatRecord> {
        self.entries.insert(record.key(), record)
    }

    pub fn get(&self, key: &SeatKey) -> Option<&SeatRecord> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeatRecord> {
        self.entries.values()
    }

    /// 轉成資料表列，依 key 排序
    pub fn to_rows(&self) -> Vec<SeatRecord> {
        self.entries.values().cloned().collect()
    }

    pub fn from_rows(rows: impl IntoIterator<Item = SeatRecord>) -> Self {
        let mut map = Self::new();
        map.extend(rows);
        map
    }
}

impl Extend<SeatRecord> for SeatMap {
    fn extend<I: IntoIterator<Item = SeatRecord>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    RequestFailed { url: String },
    StoreError { detail: String },
}

impl ErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::RequestFailed { .. } => "REQUEST FAILED",
            ErrorKind::StoreError { .. } => "SUPABASE ERROR",
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            ErrorKind::RequestFailed { url } => url,
            ErrorKind::StoreError { detail } => detail,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub kind: ErrorKind,
}

impl ErrorRecord {
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    pub fn detail(&self) -> &str {
        self.kind.detail()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(course: &str, section: &str, current: u32, max: u32, waitlist: u32) -> SeatRecord {
        SeatRecord {
            course_id: course.into(),
            section_id: section.into(),
            current_seats: current,
            max_seats: max,
            waitlist,
        }
    }

    #[test]
    fn test_seat_map_last_write_wins() {
        let mut map = SeatMap::new();
        assert!(map.insert(record("CMSC131", "0101", 3, 30, 0)).is_none());

        let replaced = map.insert(record("CMSC131", "0101", 0, 30, 4));

        assert_eq!(replaced.unwrap().current_seats, 3);
        assert_eq!(map.len(), 1);
        let key = SeatKey {
            course_id: "CMSC131".into(),
            section_id: "0101".into(),
        };
        assert_eq!(map.get(&key).unwrap().waitlist, 4);
    }

    #[test]
    fn test_rows_round_trip_through_json() {
        let mut map = SeatMap::new();
        map.extend(vec![
            record("MATH140", "0201", 12, 40, 0),
            record("CMSC131", "0101", 0, 30, 7),
            record("CMSC131", "0102", 1, 30, 0),
            record("ENGL101", "FC01", 19, 19, 0),
        ]);

        let json = serde_json::to_string(&map.to_rows()).unwrap();
        let rows: Vec<SeatRecord> = serde_json::from_str(&json).unwrap();
        let restored = SeatMap::from_rows(rows);

        assert_eq!(restored, map);
    }

    #[test]
    fn test_row_uses_column_names() {
        let row = serde_json::to_value(record("CMSC131", "0101", 5, 30, 2)).unwrap();

        assert_eq!(
            row,
            serde_json::json!({
                "course_id": "CMSC131",
                "section_id": "0101",
                "current_seats": 5,
                "max_seats": 30,
                "waitlist": 2
            })
        );
    }

    #[test]
    fn test_rows_are_sorted_by_key() {
        let map = SeatMap::from_rows(vec![
            record("MATH140", "0201", 1, 1, 0),
            record("CMSC131", "0102", 1, 1, 0),
            record("CMSC131", "0101", 1, 1, 0),
        ]);

        let keys: Vec<(String, String)> = map
            .to_rows()
            .into_iter()
            .map(|r| (r.course_id.to_string(), r.section_id.to_string()))
            .collect();

        assert_eq!(
            keys,
            vec![
                ("CMSC131".to_string(), "0101".to_string()),
                ("CMSC131".to_string(), "0102".to_string()),
                ("MATH140".to_string(), "0201".to_string()),
            ]
        );
    }

    #[test]
    fn test_error_kind_labels() {
        let request = ErrorKind::RequestFailed {
            url: "https://example.com".to_string(),
        };
        let store = ErrorKind::StoreError {
            detail: "permission denied".to_string(),
        };

        assert_eq!(request.label(), "REQUEST FAILED");
        assert_eq!(request.detail(), "https://example.com");
        assert_eq!(store.label(), "SUPABASE ERROR");
        assert_eq!(store.detail(), "permission denied");
    }
}
