//! SQL execution shim over a pool/connection capability trait.
//!
//! Call sites that run SQL should not care whether they own a fresh
//! connection or are participating in a caller's transaction. That
//! capability is explicit here: [`QueryExecutor`] has one implementation
//! that acquires connections from a pool per call ([`PoolExecutor`]) and
//! one that runs every statement on a borrowed, already-open connection
//! ([`TransactionExecutor`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use svckit::db::{PoolExecutor, QueryExecutor, rows_to_json};
//!
//! let mut db = PoolExecutor::new(pool);
//! let rows = db
//!     .fetch_all("SELECT id, name FROM projects WHERE owner = ?", &[owner.into()])
//!     .await?;
//! let dicts = rows_to_json(&rows);
//! ```

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::sqlite::{SqliteArguments, SqlitePool, SqliteRow};
use sqlx::{Column, Row, Sqlite, SqliteConnection, TypeInfo, ValueRef};

use crate::error::{Result, SvckitError};

/// Capability to run SQL statements.
///
/// The two implementations differ only in where the connection comes from;
/// the statement surface is identical, so helpers can be written once and
/// used both inside and outside transactions.
#[async_trait]
pub trait QueryExecutor: Send {
    /// Run a query and return all result rows.
    async fn fetch_all(&mut self, sql: &str, params: &[Value]) -> Result<Vec<SqliteRow>>;

    /// Run a statement with no result rows (INSERT, UPDATE, DDL) and return
    /// the number of rows affected.
    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64>;
}

/// Executor that owns a pool and acquires a connection per call.
///
/// Each call is its own implicit transaction.
#[derive(Debug, Clone)]
pub struct PoolExecutor {
    pool: SqlitePool,
}

impl PoolExecutor {
    /// Wrap a connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Access the underlying pool, e.g. to open an explicit transaction for
    /// a [`TransactionExecutor`].
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl QueryExecutor for PoolExecutor {
    async fn fetch_all(&mut self, sql: &str, params: &[Value]) -> Result<Vec<SqliteRow>> {
        let query = bind_params(sqlx::query(sql), params)?;
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64> {
        let query = bind_params(sqlx::query(sql), params)?;
        Ok(query.execute(&self.pool).await?.rows_affected())
    }
}

/// Executor that runs inside a caller-owned connection or open transaction.
///
/// Statements issued here become visible (or are rolled back) together with
/// everything else on that transaction.
pub struct TransactionExecutor<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> TransactionExecutor<'c> {
    /// Borrow an open connection. A `&mut sqlx::Transaction` dereferences
    /// to the connection, so it can be passed here directly.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl QueryExecutor for TransactionExecutor<'_> {
    async fn fetch_all(&mut self, sql: &str, params: &[Value]) -> Result<Vec<SqliteRow>> {
        let query = bind_params(sqlx::query(sql), params)?;
        Ok(query.fetch_all(&mut *self.conn).await?)
    }

    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64> {
        let query = bind_params(sqlx::query(sql), params)?;
        Ok(query.execute(&mut *self.conn).await?.rows_affected())
    }
}

fn bind_params<'q>(
    mut query: sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &'q [Value],
) -> Result<sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>> {
    for param in params {
        query = match param {
            Value::Null => query.bind(None::<String>),
            Value::Bool(b) => query.bind(*b),
            Value::Number(n) if n.is_i64() => query.bind(n.as_i64()),
            Value::Number(n) => query.bind(n.as_f64()),
            Value::String(s) => query.bind(s.as_str()),
            other => {
                return Err(SvckitError::Serialization(format!(
                    "unsupported SQL parameter: {}",
                    other
                )))
            }
        };
    }
    Ok(query)
}

/// Convert result rows to column-name → JSON-value maps.
pub fn rows_to_json(rows: &[SqliteRow]) -> Vec<Map<String, Value>> {
    rows.iter().map(row_to_json).collect()
}

fn row_to_json(row: &SqliteRow) -> Map<String, Value> {
    let mut map = Map::new();
    for (index, column) in row.columns().iter().enumerate() {
        // Dispatch on the stored value's type; decoding by trial would let
        // SQLite coerce REAL values to integers.
        let value = match row.try_get_raw(index) {
            Ok(raw) if raw.is_null() => Value::Null,
            Ok(raw) => match raw.type_info().name() {
                "INTEGER" => row
                    .try_get::<i64, _>(index)
                    .map(Value::from)
                    .unwrap_or(Value::Null),
                "REAL" => row
                    .try_get::<f64, _>(index)
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                "BOOLEAN" => row
                    .try_get::<bool, _>(index)
                    .map(Value::Bool)
                    .unwrap_or(Value::Null),
                _ => row
                    .try_get::<String, _>(index)
                    .map(Value::String)
                    .unwrap_or(Value::Null),
            },
            Err(_) => Value::Null,
        };
        map.insert(column.name().to_string(), value);
    }
    map
}
