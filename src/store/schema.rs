//! SQLite schema for the local snapshot store
//!
//! Timestamps are stored as RFC 3339 text in UTC. Category references keep
//! the id, the optional name, and whether the snapshot embedded the category
//! object or referenced it by id.

pub const SCHEMA: &str = r#"
-- ============================================
-- TASKS
-- ============================================

CREATE TABLE IF NOT EXISTS tasks (
    position INTEGER PRIMARY KEY,          -- Snapshot order, preserved on read
    id TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    priority TEXT NOT NULL DEFAULT 'low',  -- 'low', 'medium', 'high'
    completed BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tasks_created ON tasks(created_at);

-- ============================================
-- NOTES
-- ============================================

CREATE TABLE IF NOT EXISTS notes (
    position INTEGER PRIMARY KEY,
    id TEXT NOT NULL UNIQUE,
    title TEXT,                            -- NULL renders as "Untitled"
    content TEXT NOT NULL DEFAULT '',
    pinned BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TEXT NOT NULL,
    category_id TEXT,
    category_name TEXT,
    category_embedded BOOLEAN NOT NULL DEFAULT FALSE  -- object vs bare id
);

CREATE INDEX IF NOT EXISTS idx_notes_created ON notes(created_at);

-- ============================================
-- IMPORTS
-- ============================================

CREATE TABLE IF NOT EXISTS imports (
    id INTEGER PRIMARY KEY,
    collection TEXT NOT NULL,              -- 'tasks' | 'notes'
    record_count INTEGER NOT NULL,
    imported_at DATETIME DEFAULT CURRENT_TIMESTAMP
);
"#;
