//! Recency ranking for the "recent notes" and "recent tasks" previews

use chrono::{DateTime, Utc};

use crate::model::{NoteRecord, TaskRecord};

/// Anything carrying a creation timestamp
pub trait Timestamped {
    fn created_at(&self) -> DateTime<Utc>;
}

impl Timestamped for TaskRecord {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Timestamped for NoteRecord {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Up to `n` records, newest first. Records sharing a timestamp keep their
/// input order (`sort_by` is stable).
pub fn top_recent<T: Timestamped + Clone>(records: &[T], n: usize) -> Vec<T> {
    if n == 0 {
        return Vec::new();
    }
    let mut sorted: Vec<&T> = records.iter().collect();
    sorted.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    sorted.into_iter().take(n).cloned().collect()
}
