//! Record source trait and registry
//!
//! A record source hands out immutable snapshots of the task and note
//! collections plus an optional pre-aggregated heatmap. Sources:
//! - Api: remote REST API with bearer-token auth
//! - File: directory of JSON snapshot files
//! - Store: local SQLite snapshot database (see `crate::store`)

mod api;
mod file;

pub use api::ApiSource;
pub use file::FileSource;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{DayBucket, NoteRecord, TaskRecord};
use crate::store::SnapshotStore;
use crate::Config;

/// Why a single fetch failed
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("malformed payload: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not provided by this source")]
    Unsupported,
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Source type selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Api,
    File,
    Store,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Api => "api",
            SourceKind::File => "file",
            SourceKind::Store => "store",
        }
    }
}

/// Supplier of record snapshots
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Short identifier used in logs, e.g. "api" or "file"
    fn id(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> String;

    async fn fetch_tasks(&self) -> Result<Vec<TaskRecord>, FetchError>;

    async fn fetch_notes(&self) -> Result<Vec<NoteRecord>, FetchError>;

    /// Pre-aggregated task heatmap. May be empty; failures are recovered by
    /// the caller.
    async fn fetch_heatmap(&self) -> Result<Vec<DayBucket>, FetchError>;
}

/// Builds the record source selected by `kind`
pub fn open_source(config: &Config, kind: SourceKind) -> Result<Box<dyn RecordSource>> {
    let source: Box<dyn RecordSource> = match kind {
        SourceKind::Api => {
            let base_url = config
                .source
                .base_url
                .clone()
                .context("source.base_url must be set for the api source")?;
            Box::new(ApiSource::new(base_url, config.api_token())?)
        }
        SourceKind::File => Box::new(FileSource::new(config.snapshot_dir())),
        SourceKind::Store => Box::new(SnapshotStore::open(&config.database_path())?),
    };

    tracing::debug!(source = source.id(), description = %source.description(), "record source ready");
    Ok(source)
}
