//! Connection setup for the SQLite-backed `kv_store` table.
//!
//! # Responsibility
//! - Hand `SqliteKeyValueStore` a connection whose `kv_store` table exists.
//! - Refuse files whose layout this build cannot read or write safely.
//!
//! # Invariants
//! - `PRAGMA user_version` holds the version of the last applied migration.
//! - A connection is only returned after every pending script committed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or preparing the key-value database.
#[derive(Debug)]
pub enum DbError {
    /// SQLite rejected the open, a pragma, or a migration script. The file may
    /// be locked, unreadable, or not a SQLite database at all.
    Sqlite(rusqlite::Error),
    /// The file was migrated by a newer build. Its `kv_store` layout is
    /// unknown here, so snapshots are neither read nor overwritten.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "kv_store schema version {db_version} was written by a newer build (this build supports up to {latest_supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
