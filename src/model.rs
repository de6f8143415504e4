//! Record and derived types
//!
//! Source records (`TaskRecord`, `NoteRecord`) mirror the remote API's JSON
//! shape. Derived types (`DayBucket`, `StatsSnapshot`, `WeeklyPoint`,
//! `TimelineEntry`) are rebuilt on every aggregation pass.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder shown for notes without a title
pub const UNTITLED: &str = "Untitled";

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority `{other}`")),
        }
    }
}

/// A task as returned by the record source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

/// A note as returned by the record source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub pinned: bool,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
}

impl NoteRecord {
    /// Title to display, falling back to [`UNTITLED`] when absent or blank
    pub fn display_title(&self) -> &str {
        match self.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => UNTITLED,
        }
    }

    /// Preview of the note body, cut at `max_chars` characters
    pub fn excerpt(&self, max_chars: usize) -> String {
        let mut out: String = self.content.chars().take(max_chars).collect();
        if self.content.chars().count() > max_chars {
            out.push_str("...");
        }
        out
    }
}

/// Category reference on a note: either a bare id or an embedded object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(String),
    Embedded {
        #[serde(rename = "_id", alias = "id")]
        id: String,
        #[serde(default)]
        name: Option<String>,
    },
}

impl CategoryRef {
    pub fn id(&self) -> &str {
        match self {
            CategoryRef::Id(id) => id,
            CategoryRef::Embedded { id, .. } => id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            CategoryRef::Id(_) => None,
            CategoryRef::Embedded { name, .. } => name.as_deref(),
        }
    }
}

/// Activity count for one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket {
    #[serde(rename = "date")]
    pub date_key: String,
    pub count: u32,
}

impl DayBucket {
    pub fn new(date_key: impl Into<String>, count: u32) -> Self {
        Self {
            date_key: date_key.into(),
            count,
        }
    }
}

/// Summary counters shown on the dashboard cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    pub total_notes: usize,
    pub pinned_notes: usize,
}

impl StatsSnapshot {
    /// Completed share of all tasks, rounded to a whole percent
    pub fn completion_percent(&self) -> u32 {
        if self.total_tasks == 0 {
            return 0;
        }
        (self.completed_tasks as f64 / self.total_tasks as f64 * 100.0).round() as u32
    }
}

/// Per-day task and note counts in the weekly series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPoint {
    #[serde(rename = "date")]
    pub date_key: String,
    pub task_count: u32,
    pub note_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineKind {
    Task,
    Note,
}

/// One row of the merged activity feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub kind: TimelineKind,
    pub occurred_at: DateTime<Utc>,
    pub label: String,
}

impl TimelineEntry {
    pub fn describe(&self) -> String {
        match self.kind {
            TimelineKind::Task => format!("Created task: {}", self.label),
            TimelineKind::Note => format!("Added note: {}", self.label),
        }
    }
}

/// Intensity level (0-4) of a heatmap cell relative to the busiest day
pub fn heat_level(count: u32, max: u32) -> u8 {
    if count == 0 {
        return 0;
    }
    let ratio = count as f64 / max.max(1) as f64;
    if ratio <= 0.25 {
        1
    } else if ratio <= 0.5 {
        2
    } else if ratio <= 0.75 {
        3
    } else {
        4
    }
}

/// Lenient `createdAt` parsing: RFC 3339 or a bare `YYYY-MM-DD` (midnight UTC)
pub mod timestamp {
    use super::*;

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid createdAt timestamp `{raw}`"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_from_api_json() {
        let json = r#"{"_id":"t1","title":"Write report","priority":"high","completed":true,"createdAt":"2024-03-05T10:15:00.000Z"}"#;
        let task: TaskRecord = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, "t1");
        assert_eq!(task.priority, Priority::High);
        assert!(task.completed);
        assert_eq!(task.created_at.to_rfc3339(), "2024-03-05T10:15:00+00:00");
    }

    #[test]
    fn test_bare_date_is_midnight_utc() {
        let json = r#"{"id":"1","title":"T","createdAt":"2024-01-01"}"#;
        let task: TaskRecord = serde_json::from_str(json).unwrap();
        assert_eq!(task.created_at.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(task.priority, Priority::Low);
        assert!(!task.completed);
    }

    #[test]
    fn test_invalid_timestamp_rejected() {
        let json = r#"{"_id":"1","title":"T","createdAt":"yesterday"}"#;
        assert!(serde_json::from_str::<TaskRecord>(json).is_err());
    }

    #[test]
    fn test_note_category_shapes() {
        let embedded = r#"{"_id":"n1","content":"x","createdAt":"2024-01-01","category":{"_id":"c1","name":"Work"}}"#;
        let note: NoteRecord = serde_json::from_str(embedded).unwrap();
        let category = note.category.unwrap();
        assert_eq!(category.id(), "c1");
        assert_eq!(category.name(), Some("Work"));

        let bare = r#"{"_id":"n2","content":"x","createdAt":"2024-01-01","category":"c2"}"#;
        let note: NoteRecord = serde_json::from_str(bare).unwrap();
        assert_eq!(note.category, Some(CategoryRef::Id("c2".to_string())));
    }

    #[test]
    fn test_display_title_fallback() {
        let json = r#"{"_id":"n1","title":"  ","content":"","createdAt":"2024-01-01"}"#;
        let note: NoteRecord = serde_json::from_str(json).unwrap();
        assert_eq!(note.display_title(), UNTITLED);
    }

    #[test]
    fn test_excerpt_truncates_on_chars() {
        let json = r#"{"_id":"n1","content":"héllo wörld","createdAt":"2024-01-01"}"#;
        let note: NoteRecord = serde_json::from_str(json).unwrap();
        assert_eq!(note.excerpt(5), "héllo...");
        assert_eq!(note.excerpt(50), "héllo wörld");
    }

    #[test]
    fn test_completion_percent() {
        let stats = StatsSnapshot {
            total_tasks: 3,
            completed_tasks: 2,
            pending_tasks: 1,
            ..Default::default()
        };
        assert_eq!(stats.completion_percent(), 67);
        assert_eq!(StatsSnapshot::default().completion_percent(), 0);
    }

    #[test]
    fn test_heat_level_thresholds() {
        assert_eq!(heat_level(0, 8), 0);
        assert_eq!(heat_level(2, 8), 1);
        assert_eq!(heat_level(4, 8), 2);
        assert_eq!(heat_level(6, 8), 3);
        assert_eq!(heat_level(8, 8), 4);
        assert_eq!(heat_level(1, 0), 4);
    }
}
