//! Prayer-request records and the operations the family log performs on them.
//!
//! Records are plain data owned by the caller. The search engine only reads
//! them; the lifecycle helpers here (`new_request`, `mark_answered`, the edits)
//! validate input the same way the log's entry forms do.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Lifecycle state of a prayer request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Current,
    Answered,
}

/// Validation failures for record edits
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("prayer request text cannot be empty")]
    EmptyRequest,
    #[error("answer text cannot be empty")]
    EmptyAnswer,
    #[error("prayer request {0} has not been answered")]
    NotAnswered(String),
}

/// A single prayer request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerRecord {
    pub id: String,
    pub name: String,
    pub request_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_text: Option<String>,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answered_at: Option<DateTime<Utc>>,
}

impl PrayerRecord {
    /// Create a new, unanswered request
    pub fn new_request(
        id: impl Into<String>,
        name: impl Into<String>,
        request_text: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, RecordError> {
        let request_text = non_empty(request_text).ok_or(RecordError::EmptyRequest)?;
        Ok(Self {
            id: id.into(),
            name: name.into(),
            request_text,
            answer_text: None,
            status: Status::Current,
            requested_at: Some(now),
            answered_at: None,
        })
    }

    /// Mark the request answered
    pub fn mark_answered(&mut self, answer_text: &str, now: DateTime<Utc>) -> Result<(), RecordError> {
        let answer_text = non_empty(answer_text).ok_or(RecordError::EmptyAnswer)?;
        self.status = Status::Answered;
        self.answer_text = Some(answer_text);
        self.answered_at = Some(now);
        Ok(())
    }

    /// Change the requester and request body. `requested_at` is left alone.
    pub fn edit_request(&mut self, name: &str, request_text: &str) -> Result<(), RecordError> {
        let request_text = non_empty(request_text).ok_or(RecordError::EmptyRequest)?;
        self.name = name.to_string();
        self.request_text = request_text;
        Ok(())
    }

    pub fn edit_answer(&mut self, answer_text: &str) -> Result<(), RecordError> {
        if self.status != Status::Answered {
            return Err(RecordError::NotAnswered(self.id.clone()));
        }
        let answer_text = non_empty(answer_text).ok_or(RecordError::EmptyAnswer)?;
        self.answer_text = Some(answer_text);
        Ok(())
    }

    /// Answer text, treating an empty string as absent
    pub fn answer(&self) -> Option<&str> {
        self.answer_text.as_deref().filter(|s| !s.is_empty())
    }

    pub fn is_answered(&self) -> bool {
        self.status == Status::Answered
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Records split by status, each group in input order
#[derive(Debug, Default)]
pub struct StatusPartition<'a> {
    pub current: Vec<&'a PrayerRecord>,
    pub answered: Vec<&'a PrayerRecord>,
}

pub fn partition_by_status<'a, I>(records: I) -> StatusPartition<'a>
where
    I: IntoIterator<Item = &'a PrayerRecord>,
{
    let mut partition = StatusPartition::default();
    for record in records {
        match record.status {
            Status::Current => partition.current.push(record),
            Status::Answered => partition.answered.push(record),
        }
    }
    partition
}

/// Order by request time, newest first. Undated records go last.
pub fn sort_newest_first(records: &mut [PrayerRecord]) {
    records.sort_by(|a, b| match (a.requested_at, b.requested_at) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// Whether any request was made within `window` before `now`
pub fn has_recent_request(records: &[PrayerRecord], now: DateTime<Utc>, window: Duration) -> bool {
    records.iter().any(|r| {
        r.requested_at
            .map(|at| now.signed_duration_since(at) < window)
            .unwrap_or(false)
    })
}

/// Parse a JSON array of records
pub fn parse_records(json: &str) -> Result<Vec<PrayerRecord>> {
    serde_json::from_str(json).context("Failed to parse prayer records")
}

/// Load records from a JSON file
pub fn load_records(path: &Path) -> Result<Vec<PrayerRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read records file {}", path.display()))?;
    let records = parse_records(&content)
        .with_context(|| format!("Invalid records file {}", path.display()))?;
    tracing::debug!(count = records.len(), path = %path.display(), "loaded prayer records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_new_request_trims_text() {
        let r = PrayerRecord::new_request("1", "Ann", "  job interview \n", at(1, 9)).unwrap();
        assert_eq!(r.request_text, "job interview");
        assert_eq!(r.status, Status::Current);
        assert_eq!(r.requested_at, Some(at(1, 9)));
        assert!(r.answer().is_none());
    }

    #[test]
    fn test_new_request_rejects_blank() {
        let err = PrayerRecord::new_request("1", "Ann", "   ", at(1, 9)).unwrap_err();
        assert_eq!(err, RecordError::EmptyRequest);
    }

    #[test]
    fn test_answer_sets_status() {
        let mut r = PrayerRecord::new_request("2", "Ben", "surgery recovery", at(1, 9)).unwrap();
        r.mark_answered(" fully healed ", at(5, 12)).unwrap();
        assert!(r.is_answered());
        assert_eq!(r.answer(), Some("fully healed"));
        assert_eq!(r.answered_at, Some(at(5, 12)));
    }

    #[test]
    fn test_answer_rejects_blank() {
        let mut r = PrayerRecord::new_request("2", "Ben", "surgery recovery", at(1, 9)).unwrap();
        assert_eq!(r.mark_answered("", at(5, 12)), Err(RecordError::EmptyAnswer));
        assert_eq!(r.status, Status::Current);
    }

    #[test]
    fn test_edit_request_keeps_requested_at() {
        let mut r = PrayerRecord::new_request("3", "Cal", "exams", at(2, 8)).unwrap();
        r.edit_request("Callum", "final exams").unwrap();
        assert_eq!(r.name, "Callum");
        assert_eq!(r.request_text, "final exams");
        assert_eq!(r.requested_at, Some(at(2, 8)));
    }

    #[test]
    fn test_edit_answer_requires_answered() {
        let mut r = PrayerRecord::new_request("4", "Dee", "travel", at(2, 8)).unwrap();
        assert_eq!(
            r.edit_answer("safe trip"),
            Err(RecordError::NotAnswered("4".to_string()))
        );
        r.mark_answered("arrived", at(3, 8)).unwrap();
        r.edit_answer("arrived safely").unwrap();
        assert_eq!(r.answer(), Some("arrived safely"));
    }

    #[test]
    fn test_empty_answer_text_is_absent() {
        let mut r = PrayerRecord::new_request("5", "Eve", "rain", at(2, 8)).unwrap();
        r.answer_text = Some(String::new());
        assert!(r.answer().is_none());
    }

    #[test]
    fn test_partition_preserves_order() {
        let mut a = PrayerRecord::new_request("a", "A", "one", at(1, 1)).unwrap();
        let b = PrayerRecord::new_request("b", "B", "two", at(1, 2)).unwrap();
        let c = PrayerRecord::new_request("c", "C", "three", at(1, 3)).unwrap();
        a.mark_answered("done", at(2, 1)).unwrap();
        let records = vec![a, b, c];

        let parts = partition_by_status(&records);
        let current: Vec<_> = parts.current.iter().map(|r| r.id.as_str()).collect();
        let answered: Vec<_> = parts.answered.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(current, vec!["b", "c"]);
        assert_eq!(answered, vec!["a"]);
    }

    #[test]
    fn test_sort_newest_first() {
        let mut undated = PrayerRecord::new_request("u", "U", "undated", at(1, 1)).unwrap();
        undated.requested_at = None;
        let mut records = vec![
            undated,
            PrayerRecord::new_request("old", "O", "old", at(1, 1)).unwrap(),
            PrayerRecord::new_request("new", "N", "new", at(9, 1)).unwrap(),
        ];
        sort_newest_first(&mut records);
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old", "u"]);
    }

    #[test]
    fn test_has_recent_request() {
        let records = vec![PrayerRecord::new_request("1", "A", "x", at(1, 9)).unwrap()];
        assert!(has_recent_request(&records, at(2, 8), Duration::days(1)));
        assert!(!has_recent_request(&records, at(2, 10), Duration::days(1)));
        assert!(!has_recent_request(&[], at(2, 8), Duration::days(1)));
    }

    #[test]
    fn test_parse_records_json() {
        let json = r#"[
            {"id": "1", "name": "Ann", "requestText": "job interview", "status": "current"},
            {"id": "2", "name": "Ben", "requestText": "surgery recovery",
             "answerText": "fully healed", "status": "answered",
             "requestedAt": "2024-03-01T09:00:00Z", "answeredAt": null}
        ]"#;
        let records = parse_records(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].answer_text, None);
        assert_eq!(records[1].status, Status::Answered);
        assert_eq!(records[1].requested_at, Some(at(1, 9)));
        assert_eq!(records[1].answered_at, None);
    }

    #[test]
    fn test_parse_records_rejects_bad_status() {
        let json = r#"[{"id": "1", "name": "Ann", "requestText": "x", "status": "pending"}]"#;
        assert!(parse_records(json).is_err());
    }

    #[test]
    fn test_load_records_missing_file() {
        let err = load_records(Path::new("/nonexistent/prayers.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read records file"));
    }
}
