pub mod analytics;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod model;
pub mod source;
pub mod store;

pub use config::Config;
pub use dashboard::{Dashboard, DashboardError, DashboardOptions, OptionalSourceFailure};
pub use source::{open_source, FetchError, RecordSource, SourceKind};
pub use store::SnapshotStore;
