use std::path::{Path, PathBuf};

use rusqlite::{Connection, params_from_iter};
use tracing::debug;

use super::{QueryExecutor, Row};
use crate::error::StoreError;
use crate::sql::{SqlValue, Statement};

/// Location label used for in-memory databases.
pub const IN_MEMORY: &str = ":memory:";

/// SQLite-backed store. Every statement runs in autocommit mode.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    location: Option<PathBuf>,
}

impl SqliteStore {
    pub fn in_memory() -> Result<Self, StoreError> {
        Ok(Self { conn: Connection::open_in_memory()?, location: None })
    }

    /// Create a new database file. An existing file is never reused.
    pub fn create(path: &Path) -> Result<Self, StoreError> {
        if path.exists() {
            return Err(StoreError::AlreadyExists(path.to_path_buf()));
        }
        Ok(Self { conn: Connection::open(path)?, location: Some(path.to_path_buf()) })
    }

    /// `path` when given, otherwise an in-memory database.
    pub fn open_output(path: Option<&Path>) -> Result<Self, StoreError> {
        match path {
            Some(path) => Self::create(path),
            None => Self::in_memory(),
        }
    }

    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    pub fn describe_location(&self) -> String {
        self.location().map_or_else(|| IN_MEMORY.to_string(), |p| p.display().to_string())
    }

    /// Number of rows in `table`.
    pub fn count_rows(&self, table: &str) -> Result<i64, StoreError> {
        let count = self
            .conn
            .query_row(&format!("SELECT count(*) FROM {}", table), [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl QueryExecutor for SqliteStore {
    fn execute(&mut self, statement: &Statement) -> Result<Vec<Row>, StoreError> {
        debug!("Running query: '{}'", statement);
        let mut stmt = self.conn.prepare(statement.sql())?;
        let column_count = stmt.column_count();
        let mut rows = stmt.query(params_from_iter(statement.params().iter()))?;

        let mut results = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(column_count);
            for index in 0..column_count {
                values.push(SqlValue::from(row.get_ref(index)?));
            }
            results.push(values);
        }
        debug!(rows = results.len(), "Query ran successfully");
        Ok(results)
    }
}
