//! Read-only warehouse access
//!
//! The analytics core never talks to a database handle directly; it goes
//! through the [`QueryExecutor`] capability, which is one call: SQL string
//! in, rows of dynamic values out. Production uses [`SqliteWarehouse`];
//! tests substitute fakes or in-memory databases.

mod schema;

use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use thiserror::Error;

pub use schema::SCHEMA;

/// Warehouse error taxonomy. Auth and Query are fatal to the current
/// render pass and propagate unchanged; there are no retries.
#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error("warehouse authentication failed: {0}")]
    Auth(String),

    #[error("warehouse query failed: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("malformed result row: {0}")]
    Decode(String),
}

/// Read-only SQL execution capability.
///
/// Rows come back as positional [`Value`] columns; callers own the SQL and
/// know the column order they asked for.
pub trait QueryExecutor {
    fn query(&self, sql: &str) -> Result<Vec<Vec<Value>>, WarehouseError>;
}

/// SQLite-backed warehouse, opened read-only.
#[derive(Debug)]
pub struct SqliteWarehouse {
    conn: Connection,
}

impl SqliteWarehouse {
    /// Open the warehouse database at `path`. The connection is read-only;
    /// a missing or unreadable database is an authentication failure, not
    /// a query failure.
    pub fn open(path: &Path) -> Result<Self, WarehouseError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| WarehouseError::Auth(format!("{}: {}", path.display(), e)))?;
        Ok(Self { conn })
    }

    /// Wrap an existing connection. Used by tests and local tooling that
    /// provision a database from [`SCHEMA`] first.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }
}

impl QueryExecutor for SqliteWarehouse {
    fn query(&self, sql: &str) -> Result<Vec<Vec<Value>>, WarehouseError> {
        let mut stmt = self.conn.prepare(sql)?;
        let column_count = stmt.column_count();

        let rows = stmt.query_map([], |row| {
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                values.push(row.get::<_, Value>(i)?);
            }
            Ok(values)
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
