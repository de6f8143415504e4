//! Plain-text rendering of dashboard sections

use std::fmt::Write;

use crate::analytics::BucketZone;
use crate::dashboard::Dashboard;
use crate::model::{heat_level, DayBucket, NoteRecord, StatsSnapshot, TaskRecord, WeeklyPoint};

const HEAT_GLYPHS: [char; 5] = ['·', '░', '▒', '▓', '█'];
const HEATMAP_COLUMNS: usize = 7;
const BAR_WIDTH: u32 = 20;
const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn stats(stats: &StatsSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<12} {}", "Tasks", stats.total_tasks);
    let _ = writeln!(out, "{:<12} {}", "Completed", stats.completed_tasks);
    let _ = writeln!(out, "{:<12} {}", "Pending", stats.pending_tasks);
    let _ = writeln!(out, "{:<12} {}", "Notes", stats.total_notes);
    let _ = writeln!(out, "{:<12} {}", "Pinned", stats.pinned_notes);
    let _ = writeln!(out, "{:<12} {}%", "Completion", stats.completion_percent());
    out
}

pub fn weekly(points: &[WeeklyPoint]) -> String {
    if points.is_empty() {
        return "No weekly data\n".to_string();
    }

    let max = points
        .iter()
        .map(|p| p.task_count.max(p.note_count))
        .max()
        .unwrap_or(0)
        .max(1);

    let mut out = String::new();
    for point in points {
        let width = (point.task_count * BAR_WIDTH).div_ceil(max) as usize;
        let _ = writeln!(
            out,
            "{} {:<width$} {:>3} tasks {:>3} notes",
            // MM-DD
            point.date_key.get(5..).unwrap_or(&point.date_key),
            "#".repeat(width),
            point.task_count,
            point.note_count,
            width = BAR_WIDTH as usize,
        );
    }
    out
}

pub fn heatmap(buckets: &[DayBucket]) -> String {
    if buckets.is_empty() {
        return "No activity\n".to_string();
    }

    let max = buckets.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    let mut out = String::new();
    for row in buckets.chunks(HEATMAP_COLUMNS) {
        let first = &row[0].date_key;
        let cells: String = row
            .iter()
            .map(|b| HEAT_GLYPHS[heat_level(b.count, max) as usize])
            .collect();
        let _ = writeln!(out, "{} {}", first, cells);
    }
    let total = buckets.iter().fold(0u32, |acc, b| acc.saturating_add(b.count));
    let _ = writeln!(out, "{} tasks in {} days, busiest day {}", total, buckets.len(), max);
    out
}

pub fn recent_notes(notes: &[NoteRecord], zone: BucketZone, excerpt_chars: usize) -> String {
    if notes.is_empty() {
        return "No notes yet.\n".to_string();
    }
    let mut out = String::new();
    for note in notes {
        let pin = if note.pinned { " *" } else { "" };
        let _ = writeln!(
            out,
            "{} {}{}",
            zone.format(note.created_at, DATE_FORMAT),
            note.display_title(),
            pin
        );
        let excerpt = note.excerpt(excerpt_chars);
        if !excerpt.is_empty() {
            let _ = writeln!(out, "    {}", excerpt.replace('\n', " "));
        }
    }
    out
}

pub fn recent_tasks(tasks: &[TaskRecord], zone: BucketZone) -> String {
    if tasks.is_empty() {
        return "No tasks yet.\n".to_string();
    }
    let mut out = String::new();
    for task in tasks {
        let _ = writeln!(
            out,
            "{} {:<40} {:<6} {}",
            zone.format(task.created_at, DATE_FORMAT),
            task.title,
            task.priority.as_str(),
            if task.completed { "Done" } else { "Pending" }
        );
    }
    out
}

pub fn timeline(dashboard: &Dashboard) -> String {
    if dashboard.timeline.is_empty() {
        return "No recent activity\n".to_string();
    }
    let mut out = String::new();
    for entry in &dashboard.timeline {
        let _ = writeln!(
            out,
            "{} {}",
            dashboard.zone.format(entry.occurred_at, "%Y-%m-%d %H:%M"),
            entry.describe()
        );
    }
    out
}
