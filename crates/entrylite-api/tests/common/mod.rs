// Common test utilities for executor integration tests

use entrylite::{
    Connection, Error, Executor, Param, Result, RowStream, SqliteStore, Statement, Store, Value,
};
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;

pub const EMPLOYEES_SCHEMA: &str = "
    CREATE TABLE employees (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nom TEXT NOT NULL,
        prenom TEXT,
        departement TEXT,
        salaire REAL,
        statut INTEGER
    );
    CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT UNIQUE);
";

/// Test fixture with a SQLite database file in a temporary directory
pub struct DbFixture {
    #[allow(dead_code)]
    pub temp_dir: TempDir,
    pub executor: Executor<SqliteStore>,
}

impl DbFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = SqliteStore::open(temp_dir.path().join("db").join("db.db"));
        let conn = store.connect().expect("Failed to connect");
        conn.execute_batch(EMPLOYEES_SCHEMA)
            .expect("Failed to create schema");
        conn.close().expect("Failed to close setup connection");

        Self {
            temp_dir,
            executor: Executor::new(store),
        }
    }

    pub fn open_connections(&self) -> usize {
        self.executor.store().open_connections()
    }
}

impl Default for DbFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory log sink scoped to a closure
#[derive(Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

#[allow(dead_code)]
impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` with this capture as the thread's subscriber
    pub fn run<T>(&self, f: impl FnOnce() -> T) -> T {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }

    pub fn contents(&self) -> String {
        let buf = self.buf.lock().expect("log buffer poisoned");
        String::from_utf8_lossy(&buf).into_owned()
    }
}

pub struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CaptureWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .expect("log buffer poisoned")
            .extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter(Arc::clone(&self.buf))
    }
}

/// Counters shared by a mock store and everything it hands out
#[derive(Default)]
pub struct MockState {
    pub open: AtomicUsize,
    pub executed: AtomicUsize,
    pub stepped: AtomicUsize,
    pub rows: AtomicUsize,
    pub refuse_connections: AtomicBool,
}

/// Scripted store that has no boolean type and counts executions
#[derive(Clone)]
pub struct MockStore {
    pub state: Arc<MockState>,
}

#[allow(dead_code)]
impl MockStore {
    pub fn new() -> Self {
        Self::with_rows(1)
    }

    /// Queries yield `rows` rows: `[Integer(1)]`, `[Integer(2)]`, ...
    pub fn with_rows(rows: usize) -> Self {
        let state = MockState::default();
        state.rows.store(rows, Ordering::SeqCst);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn unreachable() -> Self {
        let store = Self::new();
        store.state.refuse_connections.store(true, Ordering::SeqCst);
        store
    }

    pub fn executed(&self) -> usize {
        self.state.executed.load(Ordering::SeqCst)
    }

    pub fn open_connections(&self) -> usize {
        self.state.open.load(Ordering::SeqCst)
    }

    /// Rows handed out by result streams so far
    pub fn stepped(&self) -> usize {
        self.state.stepped.load(Ordering::SeqCst)
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MockStore {
    type Connection = MockConnection;

    fn connect(&self) -> Result<MockConnection> {
        if self.state.refuse_connections.load(Ordering::SeqCst) {
            return Err(Error::Connection("mock store is unreachable".to_string()));
        }
        self.state.open.fetch_add(1, Ordering::SeqCst);
        Ok(MockConnection {
            state: Arc::clone(&self.state),
        })
    }
}

pub struct MockConnection {
    state: Arc<MockState>,
}

impl Drop for MockConnection {
    fn drop(&mut self) {
        self.state.open.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Connection for MockConnection {
    type Statement<'conn> = MockStatement<'conn> where Self: 'conn;

    fn prepare(&self, sql: &str) -> Result<MockStatement<'_>> {
        Ok(MockStatement {
            state: &self.state,
            placeholders: sql.matches('?').count(),
        })
    }

    fn close(self) -> Result<()> {
        Ok(())
    }
}

pub struct MockStatement<'conn> {
    state: &'conn MockState,
    placeholders: usize,
}

impl Statement for MockStatement<'_> {
    type Rows<'stmt> = MockRows<'stmt> where Self: 'stmt;

    fn parameter_count(&self) -> usize {
        self.placeholders
    }

    fn bind(&mut self, index: usize, value: &Param) -> Result<()> {
        match value {
            Param::Boolean(_) => Err(Error::UnsupportedParameterType {
                index,
                type_name: value.type_name(),
            }),
            _ => Ok(()),
        }
    }

    fn column_names(&self) -> Vec<String> {
        vec!["one".to_string()]
    }

    fn execute(&mut self) -> Result<usize> {
        self.state.executed.fetch_add(1, Ordering::SeqCst);
        Ok(1)
    }

    fn query(&mut self) -> Result<MockRows<'_>> {
        self.state.executed.fetch_add(1, Ordering::SeqCst);
        Ok(MockRows {
            state: self.state,
            next: 1,
        })
    }
}

pub struct MockRows<'stmt> {
    state: &'stmt MockState,
    next: usize,
}

impl RowStream for MockRows<'_> {
    fn next_row(&mut self) -> Result<Option<Vec<Value>>> {
        if self.next > self.state.rows.load(Ordering::SeqCst) {
            return Ok(None);
        }
        self.state.stepped.fetch_add(1, Ordering::SeqCst);
        let value = Value::Integer(self.next as i64);
        self.next += 1;
        Ok(Some(vec![value]))
    }
}
