//! Dashboard loading: concurrent fetch, join, then pure aggregation
//!
//! Failure policy:
//! - tasks or notes failing is fatal; no partial dashboard is produced
//! - the heatmap failing is recovered by computing it locally from tasks,
//!   and reported only as `Dashboard::heatmap_failure`

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};

use crate::analytics::{self, BucketZone, DayBucketer, HeatmapOrigin, Windows};
use crate::model::{
    DayBucket, NoteRecord, StatsSnapshot, TaskRecord, TimelineEntry, WeeklyPoint,
};
use crate::source::{FetchError, RecordSource};

/// Required collection whose fetch failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Tasks,
    Notes,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Tasks => write!(f, "tasks"),
            Collection::Notes => write!(f, "notes"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DashboardError {
    /// A required collection could not be fetched. Nothing is aggregated.
    #[error("failed to fetch {collection}: {source}")]
    FetchFailure {
        collection: Collection,
        #[source]
        source: FetchError,
    },
}

/// Heatmap source failure that was recovered locally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("heatmap source unavailable: {reason}")]
pub struct OptionalSourceFailure {
    pub reason: String,
}

/// Records fetched in one load, joined before any aggregation
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub tasks: Vec<TaskRecord>,
    pub notes: Vec<NoteRecord>,
    /// Empty when the heatmap source failed or had nothing
    pub heatmap: Vec<DayBucket>,
    pub heatmap_failure: Option<OptionalSourceFailure>,
}

/// Preview and window sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    pub windows: Windows,
    pub recent_notes: usize,
    pub recent_tasks: usize,
    pub timeline_limit: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            windows: Windows::default(),
            recent_notes: 3,
            recent_tasks: 5,
            timeline_limit: analytics::TIMELINE_LIMIT,
        }
    }
}

/// Everything the presentation layer renders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub today: String,
    /// Zone the day keys were computed in; previews are printed in it too
    #[serde(skip)]
    pub zone: BucketZone,
    pub stats: StatsSnapshot,
    pub weekly: Vec<WeeklyPoint>,
    pub heatmap: Vec<DayBucket>,
    pub heatmap_origin: HeatmapOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heatmap_failure: Option<OptionalSourceFailure>,
    pub recent_notes: Vec<NoteRecord>,
    pub recent_tasks: Vec<TaskRecord>,
    pub timeline: Vec<TimelineEntry>,
}

/// Fetches tasks, notes and heatmap concurrently and waits for all three
pub async fn fetch_snapshot(source: &dyn RecordSource) -> Result<Snapshot, DashboardError> {
    info!(source = source.id(), "fetching dashboard records");

    let (tasks, notes, heatmap) = tokio::join!(
        source.fetch_tasks(),
        source.fetch_notes(),
        source.fetch_heatmap()
    );

    let tasks = tasks.map_err(|err| {
        warn!(error = %err, "task fetch failed");
        DashboardError::FetchFailure {
            collection: Collection::Tasks,
            source: err,
        }
    })?;
    let notes = notes.map_err(|err| {
        warn!(error = %err, "note fetch failed");
        DashboardError::FetchFailure {
            collection: Collection::Notes,
            source: err,
        }
    })?;

    let (heatmap, heatmap_failure) = match heatmap {
        Ok(buckets) => (buckets, None),
        Err(err) => {
            info!(error = %err, "heatmap source unavailable; using local task counts");
            (
                Vec::new(),
                Some(OptionalSourceFailure {
                    reason: err.to_string(),
                }),
            )
        }
    };

    info!(
        tasks = tasks.len(),
        notes = notes.len(),
        heatmap_buckets = heatmap.len(),
        "records fetched"
    );

    Ok(Snapshot {
        tasks,
        notes,
        heatmap,
        heatmap_failure,
    })
}

/// Builds every dashboard section from a joined snapshot
pub fn build(snapshot: &Snapshot, bucketer: &DayBucketer, options: &DashboardOptions) -> Dashboard {
    let aggregate = analytics::aggregate(
        bucketer,
        options.windows,
        &snapshot.tasks,
        &snapshot.notes,
        &snapshot.heatmap,
    );

    let recent_notes = analytics::top_recent(&snapshot.notes, options.recent_notes);
    let recent_tasks = analytics::top_recent(&snapshot.tasks, options.recent_tasks);
    // The feed is drawn from the previews, not the full collections.
    let timeline = analytics::merge(&recent_tasks, &recent_notes, options.timeline_limit);

    Dashboard {
        today: bucketer.today_key(),
        zone: bucketer.zone(),
        stats: aggregate.stats,
        weekly: aggregate.weekly,
        heatmap: aggregate.heatmap,
        heatmap_origin: aggregate.heatmap_origin,
        heatmap_failure: snapshot.heatmap_failure.clone(),
        recent_notes,
        recent_tasks,
        timeline,
    }
}

/// Fetch then build. Fails without producing any section when tasks or notes
/// could not be fetched.
pub async fn load(
    source: &dyn RecordSource,
    bucketer: &DayBucketer,
    options: &DashboardOptions,
) -> Result<Dashboard, DashboardError> {
    let snapshot = fetch_snapshot(source).await?;
    Ok(build(&snapshot, bucketer, options))
}
