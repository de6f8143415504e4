//! Local snapshot store with SQLite
//!
//! Holds the last imported task and note snapshots so the dashboard can be
//! rendered offline. Each import replaces the whole collection; read order
//! matches the imported order.

mod schema;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::model::{timestamp, CategoryRef, DayBucket, NoteRecord, TaskRecord};
use crate::source::{FetchError, RecordSource};

pub use schema::SCHEMA;

pub struct SnapshotStore {
    conn: Mutex<Connection>,
}

impl SnapshotStore {
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("snapshot store lock poisoned"))
    }

    // ============================================
    // IMPORT
    // ============================================

    /// Replace the stored task snapshot
    pub fn replace_tasks(&self, tasks: &[TaskRecord]) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM tasks", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO tasks (position, id, title, priority, completed, created_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )?;
            for (position, task) in tasks.iter().enumerate() {
                stmt.execute(params![
                    position as i64,
                    task.id,
                    task.title,
                    task.priority.as_str(),
                    task.completed,
                    task.created_at.to_rfc3339(),
                ])
                .with_context(|| format!("Failed to store task {}", task.id))?;
            }
        }
        tx.execute(
            "INSERT INTO imports (collection, record_count) VALUES ('tasks', ?)",
            params![tasks.len() as i64],
        )?;
        tx.commit()?;
        Ok(tasks.len())
    }

    /// Replace the stored note snapshot
    pub fn replace_notes(&self, notes: &[NoteRecord]) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM notes", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO notes (position, id, title, content, pinned, created_at,
                                    category_id, category_name, category_embedded)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )?;
            for (position, note) in notes.iter().enumerate() {
                stmt.execute(params![
                    position as i64,
                    note.id,
                    note.title,
                    note.content,
                    note.pinned,
                    note.created_at.to_rfc3339(),
                    note.category.as_ref().map(|c| c.id()),
                    note.category.as_ref().and_then(|c| c.name()),
                    matches!(note.category, Some(CategoryRef::Embedded { .. })),
                ])
                .with_context(|| format!("Failed to store note {}", note.id))?;
            }
        }
        tx.execute(
            "INSERT INTO imports (collection, record_count) VALUES ('notes', ?)",
            params![notes.len() as i64],
        )?;
        tx.commit()?;
        Ok(notes.len())
    }

    // ============================================
    // QUERIES
    // ============================================

    pub fn list_tasks(&self) -> Result<Vec<TaskRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, priority, completed, created_at FROM tasks ORDER BY position",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, bool>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut tasks = vec![];
        for row in rows {
            let (id, title, priority, completed, created_at) = row?;
            tasks.push(TaskRecord {
                priority: priority
                    .parse()
                    .map_err(|e: String| anyhow::anyhow!("task {id}: {e}"))?,
                created_at: parse_stored_timestamp(&id, &created_at)?,
                id,
                title,
                completed,
            });
        }
        Ok(tasks)
    }

    pub fn list_notes(&self) -> Result<Vec<NoteRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, content, pinned, created_at, category_id, category_name, category_embedded
             FROM notes ORDER BY position",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, bool>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, Option<String>>(6)?,
                row.get::<_, bool>(7)?,
            ))
        })?;

        let mut notes = vec![];
        for row in rows {
            let (id, title, content, pinned, created_at, category_id, category_name, embedded) =
                row?;
            let category = category_id.map(|cid| {
                if embedded {
                    CategoryRef::Embedded {
                        id: cid,
                        name: category_name,
                    }
                } else {
                    CategoryRef::Id(cid)
                }
            });
            notes.push(NoteRecord {
                created_at: parse_stored_timestamp(&id, &created_at)?,
                id,
                title,
                content,
                pinned,
                category,
            });
        }
        Ok(notes)
    }

    /// Number of imports recorded for a collection
    pub fn import_count(&self, collection: &str) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM imports WHERE collection = ?",
            params![collection],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn parse_stored_timestamp(id: &str, raw: &str) -> Result<chrono::DateTime<chrono::Utc>> {
    timestamp::parse(raw).with_context(|| format!("record {id}: invalid created_at `{raw}`"))
}

#[async_trait]
impl RecordSource for SnapshotStore {
    fn id(&self) -> &str {
        "store"
    }

    fn description(&self) -> String {
        "Local SQLite snapshot store".to_string()
    }

    async fn fetch_tasks(&self) -> Result<Vec<TaskRecord>, FetchError> {
        self.list_tasks().map_err(|e| FetchError::Decode(format!("{e:#}")))
    }

    async fn fetch_notes(&self) -> Result<Vec<NoteRecord>, FetchError> {
        self.list_notes().map_err(|e| FetchError::Decode(format!("{e:#}")))
    }

    async fn fetch_heatmap(&self) -> Result<Vec<DayBucket>, FetchError> {
        Err(FetchError::Unsupported)
    }
}
