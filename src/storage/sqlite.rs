use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

use crate::errors::PerfError;
use super::{validate_blob_name, ReportStorage};

const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS reports (
    name TEXT PRIMARY KEY,
    body TEXT NOT NULL,
    created_at TEXT NOT NULL
);
";

/// Reports kept in a single SQLite table, one row per blob name.
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    pub fn open(path: &str) -> Result<Self, PerfError> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| PerfError::Database(format!("Failed to open database: {}", e)))?;

        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| PerfError::Database(format!("Failed to set pragmas: {}", e)))?;

        Self::initialize(conn)
    }

    pub fn in_memory() -> Result<Self, PerfError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| PerfError::Database(format!("Failed to open in-memory db: {}", e)))?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> Result<Self, PerfError> {
        conn.execute_batch(CREATE_TABLES)
            .map_err(|e| PerfError::Database(format!("Failed to create tables: {}", e)))?;
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, PerfError> {
        self.conn.lock()
            .map_err(|_| PerfError::Database("Database connection lock poisoned".into()))
    }
}

#[async_trait]
impl ReportStorage for SqliteStorage {
    async fn put(&self, name: &str, body: &str) -> Result<(), PerfError> {
        validate_blob_name(name)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO reports (name, body, created_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET body = excluded.body, created_at = excluded.created_at",
            rusqlite::params![name, body, Utc::now().to_rfc3339()],
        ).map_err(|e| PerfError::Storage(format!("Failed to store {}: {}", name, e)))?;
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Option<String>, PerfError> {
        validate_blob_name(name)?;
        let conn = self.lock()?;
        conn.query_row(
            "SELECT body FROM reports WHERE name = ?1",
            rusqlite::params![name],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|e| PerfError::Storage(format!("Failed to read {}: {}", name, e)))
    }

    fn backend_name(&self) -> &str { "sqlite" }
}
