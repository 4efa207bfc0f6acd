//! Statement executor.
//!
//! Every call opens its own connection, prepares the statement, binds the
//! parameters, runs it and closes the connection before returning. The
//! only exception is [`Executor::try_execute_query`], whose [`Cursor`]
//! keeps the connection until the caller closes it.
//!
//! Two flavours of each operation exist:
//!
//! - `try_*` methods return a [`Result`], so "nothing matched" (`Ok(0)`,
//!   `Ok(vec![])`) is distinguishable from a failure.
//! - The plain methods (`execute_mutation`, `execute_insert`,
//!   `execute_query_collect`, ...) collapse every failure into the same
//!   negative outcome as "nothing matched": `false`, an empty `Vec` or
//!   `None`. The cause is only visible in the logs.
//!
//! Neither flavour panics.

use crate::binder;
use crate::cursor::Cursor;
use entrylite_core::{
    display_params, Config, Connection, Error, Param, Result, Row, RowStream, Statement, Store,
};
use entrylite_sqlite::SqliteStore;
use std::fmt;
use tracing::{debug, error, info, warn};

/// Flavour of a mutating statement, used for log wording only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mutation {
    Any,
    Insert,
    Update,
    Delete,
}

impl Mutation {
    fn past_tense(self) -> &'static str {
        match self {
            Mutation::Any => "affected",
            Mutation::Insert => "inserted",
            Mutation::Update => "updated",
            Mutation::Delete => "deleted",
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mutation::Any => "statement",
            Mutation::Insert => "insert",
            Mutation::Update => "update",
            Mutation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Executes parameterized SQL against a [`Store`].
#[derive(Debug, Clone)]
pub struct Executor<S> {
    store: S,
}

impl Executor<SqliteStore> {
    /// Executor over the SQLite database named by `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(SqliteStore::from_config(config))
    }
}

impl<S: Store> Executor<S> {
    /// Creates an executor over `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs an INSERT, UPDATE or DELETE and returns the rows affected.
    pub fn try_execute_mutation(&self, sql: &str, params: &[Param]) -> Result<usize> {
        self.mutate(Mutation::Any, sql, params)
    }

    /// Runs a mutating statement; true iff at least one row was affected.
    ///
    /// Zero rows affected and every failure both yield false.
    pub fn execute_mutation(&self, sql: &str, params: &[Param]) -> bool {
        matches!(self.mutate(Mutation::Any, sql, params), Ok(n) if n > 0)
    }

    /// [`execute_mutation`](Self::execute_mutation) for INSERT statements.
    pub fn execute_insert(&self, sql: &str, params: &[Param]) -> bool {
        matches!(self.mutate(Mutation::Insert, sql, params), Ok(n) if n > 0)
    }

    /// [`execute_mutation`](Self::execute_mutation) for UPDATE statements.
    pub fn execute_update(&self, sql: &str, params: &[Param]) -> bool {
        matches!(self.mutate(Mutation::Update, sql, params), Ok(n) if n > 0)
    }

    /// [`execute_mutation`](Self::execute_mutation) for DELETE statements.
    pub fn execute_delete(&self, sql: &str, params: &[Param]) -> bool {
        matches!(self.mutate(Mutation::Delete, sql, params), Ok(n) if n > 0)
    }

    /// Runs a query and returns a live cursor owning the connection.
    ///
    /// Rows are read from the store as the cursor is advanced. The caller
    /// is responsible for closing the cursor; dropping it is enough.
    pub fn try_execute_query(&self, sql: &str, params: &[Param]) -> Result<Cursor>
    where
        S::Connection: Send + 'static,
    {
        let connection = self.open(sql, params)?;
        match Cursor::open(connection, sql, params) {
            Ok(cursor) => {
                info!(columns = cursor.columns().len(), "SELECT executed, cursor open");
                Ok(cursor)
            }
            Err(e) => {
                report_failure("select", sql, params, &e);
                Err(e)
            }
        }
    }

    /// Runs a query and returns a cursor, or `None` on any failure.
    pub fn execute_query(&self, sql: &str, params: &[Param]) -> Option<Cursor>
    where
        S::Connection: Send + 'static,
    {
        self.try_execute_query(sql, params).ok()
    }

    /// Runs a query and returns every row.
    pub fn try_execute_query_collect(&self, sql: &str, params: &[Param]) -> Result<Vec<Row>> {
        let connection = self.open(sql, params)?;
        let outcome = collect(&connection, sql, params);
        release(connection);
        match outcome {
            Ok(rows) => {
                info!(rows = rows.len(), "SELECT executed, {} row(s) fetched", rows.len());
                Ok(rows)
            }
            Err(e) => {
                report_failure("select", sql, params, &e);
                Err(e)
            }
        }
    }

    /// Runs a query and returns every row, or an empty `Vec` on any
    /// failure.
    ///
    /// An empty result is therefore ambiguous: either nothing matched or
    /// the query failed. Use
    /// [`try_execute_query_collect`](Self::try_execute_query_collect) to
    /// tell them apart.
    pub fn execute_query_collect(&self, sql: &str, params: &[Param]) -> Vec<Row> {
        self.try_execute_query_collect(sql, params).unwrap_or_default()
    }

    fn mutate(&self, kind: Mutation, sql: &str, params: &[Param]) -> Result<usize> {
        let connection = self.open(sql, params)?;
        let outcome = run(&connection, sql, params);
        release(connection);
        match outcome {
            Ok(0) => {
                warn!(query = sql, "No row {}", kind.past_tense());
                Ok(0)
            }
            Ok(n) => {
                info!(rows_affected = n, "{} succeeded: {} row(s) {}", kind, n, kind.past_tense());
                Ok(n)
            }
            Err(e) => {
                report_failure(&kind.to_string(), sql, params, &e);
                Err(e)
            }
        }
    }

    fn open(&self, sql: &str, params: &[Param]) -> Result<S::Connection> {
        match self.store.connect() {
            Ok(connection) => {
                debug!("Connection established");
                Ok(connection)
            }
            Err(e) => {
                report_failure("connect", sql, params, &e);
                Err(e)
            }
        }
    }
}

/// Prepares `sql` and binds `params`, logging the statement about to run.
pub(crate) fn prepare<'c, C: Connection>(
    connection: &'c C,
    sql: &str,
    params: &[Param],
) -> Result<C::Statement<'c>> {
    let mut statement = connection.prepare(sql)?;
    binder::bind(&mut statement, params)?;
    info!(query = sql, params = %display_params(params), "Executing");
    Ok(statement)
}

fn run<C: Connection>(connection: &C, sql: &str, params: &[Param]) -> Result<usize> {
    let mut statement = prepare(connection, sql, params)?;
    statement.execute()
}

fn collect<C: Connection>(connection: &C, sql: &str, params: &[Param]) -> Result<Vec<Row>> {
    let mut statement = prepare(connection, sql, params)?;
    let columns = statement.column_names();
    let mut stream = statement.query()?;
    let mut rows = Vec::new();
    while let Some(values) = stream.next_row()? {
        rows.push(Row::from_columns(&columns, values));
    }
    Ok(rows)
}

fn release<C: Connection>(connection: C) {
    match connection.close() {
        Ok(()) => debug!("Connection closed"),
        Err(e) => warn!(error = %e, "Failed to close connection"),
    }
}

fn report_failure(operation: &str, sql: &str, params: &[Param], err: &Error) {
    error!(
        operation,
        kind = ?err.kind(),
        code = ?err.code(),
        query = sql,
        params = %display_params(params),
        "{} failed: {}",
        operation,
        err
    );
}
