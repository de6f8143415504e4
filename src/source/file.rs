//! JSON snapshot directory source
//!
//! Layout: `<dir>/tasks.json`, `<dir>/notes.json`, optional `<dir>/heatmap.json`.
//! Each file holds a JSON array in the remote API's record format.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use super::{FetchError, RecordSource};
use crate::model::{DayBucket, NoteRecord, TaskRecord};

pub const TASKS_FILE: &str = "tasks.json";
pub const NOTES_FILE: &str = "notes.json";
pub const HEATMAP_FILE: &str = "heatmap.json";

pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, FetchError> {
    let content = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&content)
        .map_err(|e| FetchError::Decode(format!("{}: {}", path.display(), e)))
}

#[async_trait]
impl RecordSource for FileSource {
    fn id(&self) -> &str {
        "file"
    }

    fn description(&self) -> String {
        format!("JSON snapshots in {}", self.dir.display())
    }

    async fn fetch_tasks(&self) -> Result<Vec<TaskRecord>, FetchError> {
        read_json(&self.dir.join(TASKS_FILE)).await
    }

    async fn fetch_notes(&self) -> Result<Vec<NoteRecord>, FetchError> {
        read_json(&self.dir.join(NOTES_FILE)).await
    }

    async fn fetch_heatmap(&self) -> Result<Vec<DayBucket>, FetchError> {
        read_json(&self.dir.join(HEATMAP_FILE)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_snapshot_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(TASKS_FILE),
            r#"[{"_id":"1","title":"A","completed":true,"createdAt":"2024-01-01"}]"#,
        )
        .unwrap();
        std::fs::write(dir.path().join(NOTES_FILE), "[]").unwrap();

        let source = FileSource::new(dir.path().to_path_buf());
        let tasks = source.fetch_tasks().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert!(tasks[0].completed);
        assert!(source.fetch_notes().await.unwrap().is_empty());
        assert!(matches!(source.fetch_heatmap().await, Err(FetchError::Io(_))));
    }

    #[tokio::test]
    async fn test_malformed_file_is_decode_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(NOTES_FILE), "{not json").unwrap();

        let source = FileSource::new(dir.path().to_path_buf());
        match source.fetch_notes().await {
            Err(FetchError::Decode(msg)) => assert!(msg.contains(NOTES_FILE)),
            other => panic!("expected decode error, got {other:?}"),
        }
    }
}
