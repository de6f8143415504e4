//! Summary statistics, weekly series and activity heatmap
//!
//! All outputs are pure functions of the two record snapshots and the
//! bucketer's "today". Records are indexed by calendar day once per
//! collection, so each window day is a single map lookup rather than a re-scan.
//!
//! The heatmap counts tasks only. Notes are left out on purpose so the grid
//! matches the remote `tasks/activity/heatmap` endpoint it stands in for.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use super::bucket::{format_day, DayBucketer};
use crate::model::{DayBucket, NoteRecord, StatsSnapshot, TaskRecord, WeeklyPoint};

pub const WEEKLY_DAYS: usize = 7;
pub const HEATMAP_DAYS: usize = 30;

/// Window lengths for the bucketed outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Windows {
    pub weekly_days: usize,
    pub heatmap_days: usize,
}

impl Default for Windows {
    fn default() -> Self {
        Self {
            weekly_days: WEEKLY_DAYS,
            heatmap_days: HEATMAP_DAYS,
        }
    }
}

/// Where the heatmap values came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum HeatmapOrigin {
    /// Every window day was supplied by the external heatmap
    External,
    /// External counts where present, local task counts for the missing days
    Merged { external_days: usize },
    /// Computed locally from tasks
    LocalFallback,
}

/// Output of one aggregation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    pub stats: StatsSnapshot,
    pub weekly: Vec<WeeklyPoint>,
    pub heatmap: Vec<DayBucket>,
    pub heatmap_origin: HeatmapOrigin,
}

/// Runs every aggregation over one snapshot.
///
/// `external_heatmap` is the pre-aggregated heatmap from the record source;
/// pass an empty slice when it was unavailable.
pub fn aggregate(
    bucketer: &DayBucketer,
    windows: Windows,
    tasks: &[TaskRecord],
    notes: &[NoteRecord],
    external_heatmap: &[DayBucket],
) -> Aggregate {
    let task_days = count_by_day(bucketer, tasks.iter().map(|t| t.created_at));
    let note_days = count_by_day(bucketer, notes.iter().map(|n| n.created_at));

    let stats = summarize(tasks, notes);
    let weekly = weekly_from_index(bucketer, windows.weekly_days, &task_days, &note_days);
    let local = heatmap_from_index(bucketer, windows.heatmap_days, &task_days);
    let (heatmap, heatmap_origin) = resolve_heatmap(external_heatmap, local);

    debug!(
        tasks = stats.total_tasks,
        notes = stats.total_notes,
        weekly_days = weekly.len(),
        heatmap_days = heatmap.len(),
        origin = ?heatmap_origin,
        "aggregation complete"
    );

    Aggregate {
        stats,
        weekly,
        heatmap,
        heatmap_origin,
    }
}

/// Dashboard counters. `pending_tasks` is derived from the completed count,
/// so `completed + pending == total` always holds.
pub fn summarize(tasks: &[TaskRecord], notes: &[NoteRecord]) -> StatsSnapshot {
    let total_tasks = tasks.len();
    let completed_tasks = tasks.iter().filter(|t| t.completed).count();

    StatsSnapshot {
        total_tasks,
        completed_tasks,
        pending_tasks: total_tasks - completed_tasks,
        total_notes: notes.len(),
        pinned_notes: notes.iter().filter(|n| n.pinned).count(),
    }
}

/// Per-day task and note counts over the `days` ending today, zero-filled
pub fn weekly_series(
    bucketer: &DayBucketer,
    days: usize,
    tasks: &[TaskRecord],
    notes: &[NoteRecord],
) -> Vec<WeeklyPoint> {
    let task_days = count_by_day(bucketer, tasks.iter().map(|t| t.created_at));
    let note_days = count_by_day(bucketer, notes.iter().map(|n| n.created_at));
    weekly_from_index(bucketer, days, &task_days, &note_days)
}

/// Task-creation heatmap over the `days` ending today, zero-filled
pub fn task_heatmap(bucketer: &DayBucketer, days: usize, tasks: &[TaskRecord]) -> Vec<DayBucket> {
    let task_days = count_by_day(bucketer, tasks.iter().map(|t| t.created_at));
    heatmap_from_index(bucketer, days, &task_days)
}

/// Chooses between the external heatmap and the local one.
///
/// An empty external heatmap means the local buckets are used unchanged. A
/// non-empty one is projected onto the local window: each day takes the
/// external count when present (duplicate keys are summed) and the local
/// count otherwise. Summed counts saturate at `u32::MAX`. External days
/// outside the window are dropped, so the
/// result always has the local window's length and order.
pub fn resolve_heatmap(
    external: &[DayBucket],
    local: Vec<DayBucket>,
) -> (Vec<DayBucket>, HeatmapOrigin) {
    if external.is_empty() {
        return (local, HeatmapOrigin::LocalFallback);
    }

    let mut by_day: HashMap<NaiveDate, u32> = HashMap::new();
    for bucket in external {
        match parse_day_key(&bucket.date_key) {
            Some(day) => {
                let count = by_day.entry(day).or_insert(0);
                *count = count.saturating_add(bucket.count);
            }
            None => warn!(date = %bucket.date_key, "ignoring heatmap bucket with invalid date"),
        }
    }

    let mut external_days = 0;
    let merged: Vec<DayBucket> = local
        .into_iter()
        .map(|bucket| {
            match parse_day_key(&bucket.date_key).and_then(|d| by_day.get(&d)) {
                Some(&count) => {
                    external_days += 1;
                    DayBucket::new(bucket.date_key, count)
                }
                None => bucket,
            }
        })
        .collect();

    let origin = if external_days == 0 {
        HeatmapOrigin::LocalFallback
    } else if external_days == merged.len() {
        HeatmapOrigin::External
    } else {
        HeatmapOrigin::Merged { external_days }
    };

    if origin != HeatmapOrigin::External {
        debug!(
            external_buckets = external.len(),
            matched = external_days,
            window = merged.len(),
            "external heatmap incomplete; filled from local task counts"
        );
    }

    (merged, origin)
}

fn count_by_day(
    bucketer: &DayBucketer,
    stamps: impl Iterator<Item = DateTime<Utc>>,
) -> HashMap<NaiveDate, u32> {
    let mut counts = HashMap::new();
    for ts in stamps {
        let count = counts.entry(bucketer.day(ts)).or_insert(0u32);
        *count = count.saturating_add(1);
    }
    counts
}

fn weekly_from_index(
    bucketer: &DayBucketer,
    days: usize,
    task_days: &HashMap<NaiveDate, u32>,
    note_days: &HashMap<NaiveDate, u32>,
) -> Vec<WeeklyPoint> {
    bucketer
        .last_n_days(days)
        .into_iter()
        .map(|day| WeeklyPoint {
            date_key: format_day(day),
            task_count: task_days.get(&day).copied().unwrap_or(0),
            note_count: note_days.get(&day).copied().unwrap_or(0),
        })
        .collect()
}

fn heatmap_from_index(
    bucketer: &DayBucketer,
    days: usize,
    task_days: &HashMap<NaiveDate, u32>,
) -> Vec<DayBucket> {
    bucketer
        .last_n_days(days)
        .into_iter()
        .map(|day| DayBucket::new(format_day(day), task_days.get(&day).copied().unwrap_or(0)))
        .collect()
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part
fn parse_day_key(key: &str) -> Option<NaiveDate> {
    let date = key.trim().get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::bucket::BucketZone;
    use crate::model::Priority;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 18, 30, 0).unwrap()
    }

    fn bucketer() -> DayBucketer {
        DayBucketer::new(now(), BucketZone::Utc)
    }

    fn task(id: &str, completed: bool, created_at: DateTime<Utc>) -> TaskRecord {
        TaskRecord {
            id: id.to_string(),
            title: format!("task {id}"),
            priority: Priority::Medium,
            completed,
            created_at,
        }
    }

    fn note(id: &str, pinned: bool, created_at: DateTime<Utc>) -> NoteRecord {
        NoteRecord {
            id: id.to_string(),
            title: Some(format!("note {id}")),
            content: String::new(),
            pinned,
            created_at,
            category: None,
        }
    }

    #[test]
    fn test_stats_invariant_holds_for_every_split() {
        for total in 0..12 {
            for completed in 0..=total {
                let tasks: Vec<TaskRecord> = (0..total)
                    .map(|i| task(&i.to_string(), i < completed, now()))
                    .collect();
                let stats = summarize(&tasks, &[]);
                assert_eq!(stats.total_tasks, total);
                assert_eq!(stats.completed_tasks, completed);
                assert_eq!(stats.completed_tasks + stats.pending_tasks, stats.total_tasks);
            }
        }
    }

    #[test]
    fn test_two_task_scenario() {
        let tasks = vec![
            task("1", true, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            task("2", false, Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()),
        ];
        let stats = summarize(&tasks, &[]);
        assert_eq!(
            stats,
            StatsSnapshot {
                total_tasks: 2,
                completed_tasks: 1,
                pending_tasks: 1,
                total_notes: 0,
                pinned_notes: 0,
            }
        );
    }

    #[test]
    fn test_pinned_notes_counted() {
        let notes = vec![note("a", true, now()), note("b", false, now()), note("c", true, now())];
        let stats = summarize(&[], &notes);
        assert_eq!(stats.total_notes, 3);
        assert_eq!(stats.pinned_notes, 2);
    }

    #[test]
    fn test_weekly_series_zero_filled_and_bucketed() {
        let tasks = vec![
            task("1", false, now()),
            task("2", false, now() - Duration::hours(17)),
            task("3", false, now() - Duration::days(6)),
            task("old", false, now() - Duration::days(7)),
        ];
        let notes = vec![note("a", false, now() - Duration::days(2))];

        let weekly = weekly_series(&bucketer(), WEEKLY_DAYS, &tasks, &notes);
        assert_eq!(weekly.len(), 7);
        assert_eq!(weekly[0].date_key, "2024-06-09");
        assert_eq!(weekly[0].task_count, 1);
        assert_eq!(weekly[4].date_key, "2024-06-13");
        assert_eq!(weekly[4].note_count, 1);
        assert_eq!(weekly[6].date_key, "2024-06-15");
        assert_eq!(weekly[6].task_count, 2);
        let total: u32 = weekly.iter().map(|p| p.task_count).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_empty_collections_still_fill_windows() {
        let result = aggregate(&bucketer(), Windows::default(), &[], &[], &[]);
        assert_eq!(result.weekly.len(), WEEKLY_DAYS);
        assert_eq!(result.heatmap.len(), HEATMAP_DAYS);
        assert!(result.heatmap.iter().all(|b| b.count == 0));
        assert_eq!(result.heatmap.last().unwrap().date_key, "2024-06-15");
        assert_eq!(result.heatmap_origin, HeatmapOrigin::LocalFallback);
    }

    #[test]
    fn test_local_heatmap_counts_one_task_today() {
        let tasks = vec![task("1", false, now())];
        let result = aggregate(&bucketer(), Windows::default(), &tasks, &[], &[]);
        let nonzero: Vec<_> = result.heatmap.iter().filter(|b| b.count > 0).collect();
        assert_eq!(nonzero.len(), 1);
        assert_eq!(nonzero[0].date_key, "2024-06-15");
        assert_eq!(nonzero[0].count, 1);
        assert_eq!(result.heatmap.iter().filter(|b| b.count == 0).count(), 29);
    }

    #[test]
    fn test_heatmap_ignores_notes() {
        let notes = vec![note("a", false, now())];
        let heatmap = aggregate(&bucketer(), Windows::default(), &[], &notes, &[]).heatmap;
        assert!(heatmap.iter().all(|b| b.count == 0));
    }

    #[test]
    fn test_full_external_heatmap_preferred() {
        let tasks = vec![task("1", false, now())];
        let external: Vec<DayBucket> = bucketer()
            .last_n_day_keys(HEATMAP_DAYS)
            .into_iter()
            .map(|k| DayBucket::new(k, 5))
            .collect();
        let result = aggregate(&bucketer(), Windows::default(), &tasks, &[], &external);
        assert_eq!(result.heatmap_origin, HeatmapOrigin::External);
        assert!(result.heatmap.iter().all(|b| b.count == 5));
    }

    #[test]
    fn test_partial_external_heatmap_merged_with_local() {
        let tasks = vec![task("1", false, now()), task("2", false, now() - Duration::days(1))];
        let external = vec![
            DayBucket::new("2024-06-14", 9),
            DayBucket::new("2024-06-14", 1),
            DayBucket::new("2023-01-01", 40),
            DayBucket::new("garbage", 3),
        ];
        let result = aggregate(&bucketer(), Windows::default(), &tasks, &[], &external);
        assert_eq!(result.heatmap.len(), HEATMAP_DAYS);
        assert_eq!(result.heatmap_origin, HeatmapOrigin::Merged { external_days: 1 });
        assert_eq!(result.heatmap[28], DayBucket::new("2024-06-14", 10));
        assert_eq!(result.heatmap[29], DayBucket::new("2024-06-15", 1));
    }

    #[test]
    fn test_duplicate_external_counts_saturate() {
        let external = vec![
            DayBucket::new("2024-06-15", u32::MAX),
            DayBucket::new("2024-06-15", 1),
        ];
        let (heatmap, origin) =
            resolve_heatmap(&external, task_heatmap(&bucketer(), HEATMAP_DAYS, &[]));
        assert_eq!(origin, HeatmapOrigin::Merged { external_days: 1 });
        assert_eq!(heatmap[29], DayBucket::new("2024-06-15", u32::MAX));
        assert_eq!(heatmap[28].count, 0);
    }

    #[test]
    fn test_external_outside_window_falls_back() {
        let external = vec![DayBucket::new("2020-01-01", 2)];
        let (heatmap, origin) =
            resolve_heatmap(&external, task_heatmap(&bucketer(), HEATMAP_DAYS, &[]));
        assert_eq!(origin, HeatmapOrigin::LocalFallback);
        assert!(heatmap.iter().all(|b| b.count == 0));
    }

    #[test]
    fn test_external_keys_with_time_part() {
        let external = vec![DayBucket::new("2024-06-15T00:00:00.000Z", 4)];
        let (heatmap, _) = resolve_heatmap(&external, task_heatmap(&bucketer(), 3, &[]));
        assert_eq!(heatmap[2], DayBucket::new("2024-06-15", 4));
    }

    #[test]
    fn test_aggregation_is_reproducible() {
        let tasks: Vec<TaskRecord> = (0..20)
            .map(|i| task(&i.to_string(), i % 3 == 0, now() - Duration::hours(i * 13)))
            .collect();
        let notes: Vec<NoteRecord> = (0..9)
            .map(|i| note(&i.to_string(), i % 2 == 0, now() - Duration::hours(i * 29)))
            .collect();
        let first = aggregate(&bucketer(), Windows::default(), &tasks, &notes, &[]);
        let second = aggregate(&bucketer(), Windows::default(), &tasks, &notes, &[]);
        assert_eq!(first, second);
    }
}
