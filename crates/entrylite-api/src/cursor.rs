//! Cursor returned by [`Executor::try_execute_query`](crate::Executor::try_execute_query).

use crate::executor;
use entrylite_core::{Connection, Error, Param, Result, Row, RowStream, Statement, Value};
use std::fmt;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::{self, JoinHandle};
use tracing::dispatcher;

type Step = Result<Option<Vec<Value>>>;

/// Live, forward-only handle over a query result.
///
/// Unlike every other executor call, the connection does not close before
/// the call returns: the cursor owns it, together with the prepared
/// statement and the open result. Each [`next`](Iterator::next) steps the
/// store for exactly one row. Closing the cursor, explicitly via
/// [`Cursor::close`] or by dropping it, releases the result, the statement
/// and the connection together.
///
/// The statement is stepped on a dedicated thread that owns the
/// connection, since a prepared statement borrows its connection. While a
/// result is partially read, SQLite keeps a read lock on the database and
/// writers from other connections wait for it.
///
/// A read failure mid-result is logged and ends the iteration. A cursor
/// cannot be restarted; issue the query again to re-read.
pub struct Cursor {
    columns: Vec<String>,
    requests: Option<SyncSender<()>>,
    steps: Receiver<Step>,
    worker: Option<JoinHandle<Result<()>>>,
    exhausted: bool,
}

impl Cursor {
    /// Prepares, binds and opens `sql` on `connection`.
    ///
    /// Returns once the result is open, before any row is read. On failure
    /// the connection is already closed when this returns.
    pub(crate) fn open<C>(connection: C, sql: &str, params: &[Param]) -> Result<Self>
    where
        C: Connection + Send + 'static,
    {
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<Vec<String>>>(1);
        let (request_tx, request_rx) = mpsc::sync_channel::<()>(1);
        let (step_tx, step_rx) = mpsc::sync_channel::<Step>(1);
        let sql = sql.to_string();
        let params = params.to_vec();
        let dispatch = dispatcher::get_default(|current| current.clone());

        let worker = thread::Builder::new()
            .name("entrylite-cursor".to_string())
            .spawn(move || {
                dispatcher::with_default(&dispatch, || {
                    if serve(&connection, &sql, &params, ready_tx, &request_rx, step_tx) {
                        // Connection stays checked out until the cursor goes away
                        while request_rx.recv().is_ok() {}
                    }
                    let closed = connection.close();
                    if closed.is_ok() {
                        tracing::debug!("Cursor connection closed");
                    }
                    closed
                })
            })?;

        match ready_rx.recv() {
            Ok(Ok(columns)) => Ok(Self {
                columns,
                requests: Some(request_tx),
                steps: step_rx,
                worker: Some(worker),
                exhausted: false,
            }),
            Ok(Err(e)) => {
                drop(request_tx);
                if let Ok(Err(close_err)) = worker.join() {
                    tracing::warn!(error = %close_err, "Failed to close connection");
                }
                Err(e)
            }
            Err(_) => {
                drop(request_tx);
                let _ = worker.join();
                Err(worker_lost())
            }
        }
    }

    /// Result column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Whether the last row has been read.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Closes the cursor and its connection.
    pub fn close(mut self) -> Result<()> {
        self.shutdown()
    }

    fn fetch(&self) -> Step {
        let requests = self.requests.as_ref().ok_or_else(worker_lost)?;
        requests.send(()).map_err(|_| worker_lost())?;
        self.steps.recv().map_err(|_| worker_lost())?
    }

    fn shutdown(&mut self) -> Result<()> {
        self.exhausted = true;
        self.requests = None;
        match self.worker.take() {
            Some(worker) => worker.join().map_err(|_| worker_lost())?,
            None => Ok(()),
        }
    }
}

impl Iterator for Cursor {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        if self.exhausted {
            return None;
        }
        match self.fetch() {
            Ok(Some(values)) => Some(Row::from_columns(&self.columns, values)),
            Ok(None) => {
                self.exhausted = true;
                None
            }
            Err(e) => {
                self.exhausted = true;
                tracing::error!(
                    kind = ?e.kind(),
                    code = ?e.code(),
                    "Cursor read failed: {}",
                    e
                );
                None
            }
        }
    }
}

impl Drop for Cursor {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            tracing::warn!(error = %e, "Failed to close cursor connection");
        }
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("columns", &self.columns)
            .field("exhausted", &self.exhausted)
            .field("open", &self.worker.is_some())
            .finish()
    }
}

/// Runs on the cursor thread: opens the result, then steps one row per
/// request. Returns whether the result was opened.
fn serve<C: Connection>(
    connection: &C,
    sql: &str,
    params: &[Param],
    ready: SyncSender<Result<Vec<String>>>,
    requests: &Receiver<()>,
    steps: SyncSender<Step>,
) -> bool {
    let mut statement = match executor::prepare(connection, sql, params) {
        Ok(statement) => statement,
        Err(e) => {
            let _ = ready.send(Err(e));
            return false;
        }
    };
    let columns = statement.column_names();
    let mut rows = match statement.query() {
        Ok(rows) => rows,
        Err(e) => {
            let _ = ready.send(Err(e));
            return false;
        }
    };
    if ready.send(Ok(columns)).is_err() {
        return false;
    }

    while requests.recv().is_ok() {
        let step = rows.next_row();
        let more = matches!(step, Ok(Some(_)));
        if steps.send(step).is_err() || !more {
            break;
        }
    }
    true
}

fn worker_lost() -> Error {
    Error::Store {
        code: None,
        message: "cursor thread stopped unexpectedly".to_string(),
    }
}
