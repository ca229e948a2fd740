//! The statement-execution boundary.
//!
//! The loader only needs to run one statement at a time and read back rows, so
//! any relational engine can sit behind [`QueryExecutor`].

pub mod sqlite;

pub use sqlite::{IN_MEMORY, SqliteStore};

use crate::error::StoreError;
use crate::sql::{SqlValue, Statement};

pub type Row = Vec<SqlValue>;

pub trait QueryExecutor {
    /// Run `statement` and return every row it produced.
    fn execute(&mut self, statement: &Statement) -> Result<Vec<Row>, StoreError>;
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for &mut T {
    fn execute(&mut self, statement: &Statement) -> Result<Vec<Row>, StoreError> {
        (**self).execute(statement)
    }
}
