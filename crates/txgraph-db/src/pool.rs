//! SQLite connection handling.
//!
//! File-backed pools open a fresh connection for every operation and drop it
//! as soon as the closure returns, on both the success and the error path.
//! In-memory pools cannot reopen their database, so they keep one shared
//! connection behind a mutex.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use rusqlite::Connection;
use thiserror::Error;

/// Database error types.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Connection(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Connection lock poisoned")]
    Lock,

    #[error("Blocking task failed: {0}")]
    Task(String),
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

enum Backing {
    File(PathBuf),
    Memory(Mutex<Connection>),
}

/// Handle to the relational store.
pub struct DbPool {
    backing: Backing,
}

impl DbPool {
    /// Open a file-backed pool, creating the parent directory if needed.
    pub fn open(path: &Path) -> DbResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DbError::Migration(format!("cannot create {}: {}", parent.display(), e)))?;
            }
        }
        Ok(Self {
            backing: Backing::File(path.to_path_buf()),
        })
    }

    /// Create an in-memory pool (for testing).
    pub fn in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            backing: Backing::Memory(Mutex::new(conn)),
        })
    }

    /// Path of the database file, `None` for in-memory pools.
    pub fn path(&self) -> Option<&Path> {
        match &self.backing {
            Backing::File(path) => Some(path),
            Backing::Memory(_) => None,
        }
    }

    /// Run `f` with a connection scoped to this call.
    pub fn with_conn<T, F>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        match &self.backing {
            Backing::File(path) => {
                let conn = open_file(path)?;
                f(&conn)
            }
            Backing::Memory(conn) => {
                let guard = conn.lock().map_err(|_| DbError::Lock)?;
                f(&guard)
            }
        }
    }

    /// Run `f` with a mutable connection scoped to this call.
    pub fn with_conn_mut<T, F>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&mut Connection) -> DbResult<T>,
    {
        match &self.backing {
            Backing::File(path) => {
                let mut conn = open_file(path)?;
                f(&mut conn)
            }
            Backing::Memory(conn) => {
                let mut guard = conn.lock().map_err(|_| DbError::Lock)?;
                f(&mut guard)
            }
        }
    }
}

fn open_file(path: &Path) -> DbResult<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(conn)
}
