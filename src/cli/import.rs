//! Import command implementation

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::model::{NoteRecord, TaskRecord};
use crate::store::SnapshotStore;

pub fn run(store: &SnapshotStore, tasks: Option<&Path>, notes: Option<&Path>) -> Result<()> {
    if tasks.is_none() && notes.is_none() {
        println!("Nothing to import. Pass --tasks and/or --notes.");
        return Ok(());
    }

    if let Some(path) = tasks {
        let records: Vec<TaskRecord> = read_snapshot(path)?;
        let count = store.replace_tasks(&records)?;
        println!("Imported {} tasks from {}", count, path.display());
    }

    if let Some(path) = notes {
        let records: Vec<NoteRecord> = read_snapshot(path)?;
        let count = store.replace_notes(&records)?;
        println!("Imported {} notes from {}", count, path.display());
    }

    Ok(())
}

fn read_snapshot<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid snapshot {}", path.display()))
}
