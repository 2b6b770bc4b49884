use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;
use tracing::info;

use crate::error::AppResult;

pub mod migrations;

pub mod repositories;

const SCHEMA_SQL: &str = include_str!("schema.sql");

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the SQLite file. Each request opens its own short-lived
/// connection; WAL keeps readers and the single writer from blocking
/// each other.
#[derive(Clone, Debug)]
pub struct DbPool {
    path: PathBuf,
}

impl DbPool {
    /// Creates the database file if needed and brings its schema up to
    /// date. Bootstrap happens exactly once here; connections handed out
    /// later only set per-connection pragmas.
    pub fn new<P: Into<PathBuf>>(path: P) -> AppResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let pool = Self { path };
        let conn = pool.open()?;
        conn.execute_batch(SCHEMA_SQL)?;
        migrations::run(&conn)?;
        info!(target: "app::db", db_path = %pool.path.display(), "database ready");

        Ok(pool)
    }

    pub fn get_connection(&self) -> AppResult<Connection> {
        self.open()
    }

    pub fn with_connection<F, T>(&self, callback: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T>,
    {
        let conn = self.open()?;
        callback(&conn)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> AppResult<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update(None, "foreign_keys", 1)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(conn)
    }
}
