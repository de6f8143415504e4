//! Unified activity feed over tasks and notes
//!
//! Tasks are laid down before notes and then stable-sorted newest first, so a
//! task and a note created at the same instant always come out task-first.

use crate::model::{NoteRecord, TaskRecord, TimelineEntry, TimelineKind};

pub const TIMELINE_LIMIT: usize = 6;

/// Merges task-created and note-created events into one feed of at most
/// `limit` entries, newest first.
pub fn merge(tasks: &[TaskRecord], notes: &[NoteRecord], limit: usize) -> Vec<TimelineEntry> {
    let mut entries: Vec<TimelineEntry> = Vec::with_capacity(tasks.len() + notes.len());

    entries.extend(tasks.iter().map(|t| TimelineEntry {
        kind: TimelineKind::Task,
        occurred_at: t.created_at,
        label: t.title.clone(),
    }));
    entries.extend(notes.iter().map(|n| TimelineEntry {
        kind: TimelineKind::Note,
        occurred_at: n.created_at,
        label: n.display_title().to_string(),
    }));

    entries.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    entries.truncate(limit);
    entries
}
