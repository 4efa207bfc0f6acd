//! # EntryLite SQLite Driver
//!
//! SQLite implementation of the EntryLite store traits, built on `rusqlite`.
//!
//! ## ⚠️ Internal Implementation Detail
//!
//! Users should depend on the main `entrylite` crate instead.
//!
//! Every [`SqliteStore::connect`] opens a brand new SQLite connection; nothing
//! is pooled. The store counts the connections it has handed out that are
//! still open, which is how leaks are detected in tests.

#![warn(missing_docs)]
#![warn(clippy::all)]

use entrylite_core::{
    Config, Connection, Error, Param, Result, RowStream, Statement, Store, Value,
};
use rusqlite::ffi;
use rusqlite::types::{Null, ValueRef};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// In-memory database name. Each connection gets its own empty database.
pub const MEMORY: &str = ":memory:";

/// Where a SQLite database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqliteTarget {
    /// Database file
    File(PathBuf),
    /// Private in-memory database
    Memory,
}

impl SqliteTarget {
    /// Parses a connection string.
    ///
    /// Accepts a bare path, `sqlite:<path>` or `jdbc:sqlite:<path>`.
    pub fn parse(connection_string: &str) -> Self {
        let path = connection_string
            .strip_prefix("jdbc:sqlite:")
            .or_else(|| connection_string.strip_prefix("sqlite:"))
            .unwrap_or(connection_string);
        if path == MEMORY {
            SqliteTarget::Memory
        } else {
            SqliteTarget::File(PathBuf::from(path))
        }
    }
}

/// SQLite store handing out one connection per call.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    target: SqliteTarget,
    open: Arc<AtomicUsize>,
}

impl SqliteStore {
    /// Store backed by the database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::with_target(SqliteTarget::File(path.as_ref().to_path_buf()))
    }

    /// Store described by a connection string.
    pub fn from_connection_string(connection_string: &str) -> Self {
        Self::with_target(SqliteTarget::parse(connection_string))
    }

    /// Store described by a [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self::from_connection_string(&config.connection_string)
    }

    fn with_target(target: SqliteTarget) -> Self {
        Self {
            target,
            open: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Where this store's database lives.
    pub fn target(&self) -> &SqliteTarget {
        &self.target
    }

    /// Connections handed out by this store that are still open.
    pub fn open_connections(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }
}

impl Store for SqliteStore {
    type Connection = SqliteConnection;

    fn connect(&self) -> Result<SqliteConnection> {
        let inner = match &self.target {
            SqliteTarget::Memory => rusqlite::Connection::open_in_memory(),
            SqliteTarget::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    if !parent.exists() {
                        tracing::debug!(dir = %parent.display(), "Creating database directory");
                        fs::create_dir_all(parent).map_err(|e| {
                            Error::Connection(format!(
                                "cannot create directory {}: {}",
                                parent.display(),
                                e
                            ))
                        })?;
                    }
                }
                rusqlite::Connection::open(path)
            }
        }
        .map_err(|e| Error::Connection(e.to_string()))?;

        Ok(SqliteConnection {
            inner,
            _open: OpenGuard::acquire(&self.open),
        })
    }
}

/// Decrements the store's open-connection count when dropped.
#[derive(Debug)]
struct OpenGuard(Arc<AtomicUsize>);

impl OpenGuard {
    fn acquire(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        OpenGuard(Arc::clone(counter))
    }
}

impl Drop for OpenGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// An open SQLite connection.
#[derive(Debug)]
pub struct SqliteConnection {
    inner: rusqlite::Connection,
    _open: OpenGuard,
}

impl SqliteConnection {
    /// Runs one or more statements without parameters. Used for schema
    /// setup; the executor never goes through here.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.inner.execute_batch(sql).map_err(map_error)
    }
}

impl Connection for SqliteConnection {
    type Statement<'conn> = SqliteStatement<'conn> where Self: 'conn;

    fn prepare(&self, sql: &str) -> Result<SqliteStatement<'_>> {
        let inner = self.inner.prepare(sql).map_err(map_error)?;
        Ok(SqliteStatement { inner })
    }

    fn close(self) -> Result<()> {
        let SqliteConnection { inner, _open } = self;
        inner.close().map_err(|(_, e)| map_error(e))
    }
}

/// A prepared SQLite statement.
pub struct SqliteStatement<'conn> {
    inner: rusqlite::Statement<'conn>,
}

impl Statement for SqliteStatement<'_> {
    type Rows<'stmt> = SqliteRows<'stmt> where Self: 'stmt;

    fn parameter_count(&self) -> usize {
        self.inner.parameter_count()
    }

    fn bind(&mut self, index: usize, value: &Param) -> Result<()> {
        let bound = match value {
            Param::Null => self.inner.raw_bind_parameter(index, Null),
            Param::Text(s) => self.inner.raw_bind_parameter(index, s.as_str()),
            Param::Integer(i) => self.inner.raw_bind_parameter(index, *i),
            Param::Float(f) => self.inner.raw_bind_parameter(index, *f),
            Param::Boolean(b) => self.inner.raw_bind_parameter(index, *b),
        };
        bound.map_err(map_error)
    }

    fn column_names(&self) -> Vec<String> {
        self.inner
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn execute(&mut self) -> Result<usize> {
        self.inner.raw_execute().map_err(map_error)
    }

    fn query(&mut self) -> Result<SqliteRows<'_>> {
        let width = self.inner.column_count();
        Ok(SqliteRows {
            rows: self.inner.raw_query(),
            width,
        })
    }
}

/// Cursor over a SQLite result.
pub struct SqliteRows<'stmt> {
    rows: rusqlite::Rows<'stmt>,
    width: usize,
}

impl RowStream for SqliteRows<'_> {
    fn next_row(&mut self) -> Result<Option<Vec<Value>>> {
        let Some(row) = self.rows.next().map_err(map_error)? else {
            return Ok(None);
        };
        let mut values = Vec::with_capacity(self.width);
        for i in 0..self.width {
            values.push(to_value(row.get_ref(i).map_err(map_error)?));
        }
        Ok(Some(values))
    }
}

fn to_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Float(f),
        // SQLite does not validate TEXT; bytes that are not UTF-8 stay bytes
        ValueRef::Text(t) => match std::str::from_utf8(t) {
            Ok(text) => Value::Text(text.to_owned()),
            Err(_) => Value::Blob(t.to_vec()),
        },
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}

/// Classifies a rusqlite error by its primary SQLite result code.
pub fn map_error(err: rusqlite::Error) -> Error {
    match err {
        rusqlite::Error::SqliteFailure(failure, message) => {
            let code = failure.extended_code & 0xff;
            let message = message.unwrap_or_else(|| failure.to_string());
            match code {
                ffi::SQLITE_CONSTRAINT => Error::ConstraintViolation { code, message },
                ffi::SQLITE_ERROR => Error::Syntax { code, message },
                ffi::SQLITE_CANTOPEN | ffi::SQLITE_NOTADB => Error::Connection(message),
                _ => Error::Store {
                    code: Some(code),
                    message,
                },
            }
        }
        other => Error::Store {
            code: None,
            message: other.to_string(),
        },
    }
}
