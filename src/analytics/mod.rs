//! Dashboard analytics: day bucketing, aggregation, recency ranking and the
//! merged activity timeline. Everything here is a pure function of record
//! snapshots plus an injected "today".

pub mod aggregate;
pub mod bucket;
pub mod recent;
pub mod timeline;

pub use aggregate::{aggregate, resolve_heatmap, summarize, task_heatmap, weekly_series};
pub use aggregate::{Aggregate, HeatmapOrigin, Windows, HEATMAP_DAYS, WEEKLY_DAYS};
pub use bucket::{BucketZone, DayBucketer};
pub use recent::{top_recent, Timestamped};
pub use timeline::{merge, TIMELINE_LIMIT};
