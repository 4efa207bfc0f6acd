//! Store driver capability traits.
//!
//! The executor only ever talks to a store through these traits, so any
//! store able to open connections, prepare statements, bind positional
//! parameters and step through results can sit underneath it.

use crate::error::Result;
use crate::value::{Param, Value};

/// A store able to hand out fresh connections.
pub trait Store {
    /// Connection type produced by this store
    type Connection: Connection;

    /// Opens a new connection. Every call yields an independent connection.
    fn connect(&self) -> Result<Self::Connection>;
}

/// An open connection.
pub trait Connection {
    /// Prepared statement borrowing this connection
    type Statement<'conn>: Statement
    where
        Self: 'conn;

    /// Compiles `sql` into a prepared statement.
    fn prepare(&self, sql: &str) -> Result<Self::Statement<'_>>;

    /// Closes the connection, reporting any failure to do so.
    ///
    /// Dropping a connection also closes it, silently.
    fn close(self) -> Result<()>;
}

/// A prepared statement.
pub trait Statement {
    /// Forward-only cursor over this statement's result
    type Rows<'stmt>: RowStream
    where
        Self: 'stmt;

    /// Number of placeholders in the statement.
    fn parameter_count(&self) -> usize;

    /// Binds `value` to the placeholder at `index` (1-based).
    fn bind(&mut self, index: usize, value: &Param) -> Result<()>;

    /// Result column names in order. Empty for statements without a result.
    fn column_names(&self) -> Vec<String>;

    /// Runs a mutating statement and returns the number of rows affected.
    fn execute(&mut self) -> Result<usize>;

    /// Runs a query and returns a cursor over its rows.
    fn query(&mut self) -> Result<Self::Rows<'_>>;
}

/// Forward-only cursor over result rows.
pub trait RowStream {
    /// Next row's values in column order, or `None` at the end.
    fn next_row(&mut self) -> Result<Option<Vec<Value>>>;
}
