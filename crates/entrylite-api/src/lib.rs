//! # EntryLite
//!
//! Parameterized SQL execution for desktop data-entry applications.
//!
//! EntryLite binds typed parameters into prepared statements, runs
//! INSERT/SELECT/UPDATE/DELETE against a local SQLite database, maps result
//! rows into ordered column → value maps and classifies failures. Each call
//! opens and closes its own connection.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use entrylite::{params, Executor, SqliteStore};
//!
//! let db = Executor::new(SqliteStore::open("db/db.db"));
//!
//! db.execute_mutation(
//!     "CREATE TABLE IF NOT EXISTS employees (id INTEGER PRIMARY KEY, nom TEXT, salaire REAL)",
//!     &[],
//! );
//! let inserted = db.execute_insert(
//!     "INSERT INTO employees (nom, salaire) VALUES (?, ?)",
//!     &params!["Nejara", 52000.0],
//! );
//! assert!(inserted);
//!
//! for row in db.execute_query_collect("SELECT nom, salaire FROM employees WHERE salaire > ?", &params![50000.0]) {
//!     println!("{} earns {}", row.get("nom").unwrap(), row.get("salaire").unwrap());
//! }
//! ```
//!
//! ## Failure reporting
//!
//! The plain methods never return an error: failures become `false`, an
//! empty `Vec` or `None` and are logged with their [`ErrorKind`]. The `try_*`
//! methods return [`Result`] for callers that need to tell "no rows" from
//! "failed".

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod binder;
pub mod cursor;
pub mod executor;
pub mod logging;

pub use cursor::Cursor;
pub use executor::Executor;
pub use logging::{LogConfig, LogFormat, LogOutput};

// Re-export core types
pub use entrylite_core::{
    config, display_params, params, params_from_values, Config, Connection, Error, ErrorKind,
    Param, Result, Row, RowStream, Statement, Store, Value,
};

// SQLite driver
pub use entrylite_sqlite::{SqliteConnection, SqliteStore, SqliteTarget};

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything an application needs after [`bootstrap`].
pub struct Bootstrap {
    /// Effective configuration
    pub config: Config,
    /// Executor over the configured SQLite database
    pub executor: Executor<SqliteStore>,
    /// Keeps the log writer alive; drop at shutdown
    pub log_guard: Option<WorkerGuard>,
}

/// Loads configuration, starts logging and builds the executor.
///
/// A missing or unreadable configuration file is not fatal: defaults are
/// used and a warning is logged once logging is up. Logging goes to a new
/// timestamped file in the configured log directory at `level`, unless
/// the host already installed a `tracing` subscriber: that one is kept,
/// no log file is created and `log_guard` is `None`.
///
/// # Examples
///
/// ```rust,no_run
/// let app = entrylite::bootstrap("config/database.toml", "info")?;
/// let rows = app.executor.execute_query_collect("SELECT * FROM departments", &[]);
/// # Ok::<(), entrylite::Error>(())
/// ```
pub fn bootstrap<P: AsRef<Path>>(config_path: P, level: &str) -> Result<Bootstrap> {
    let config_path = config_path.as_ref();
    let loaded = Config::from_file(config_path);
    let config = loaded.as_ref().cloned().unwrap_or_default();

    let log_guard = if logging::subscriber_installed() {
        tracing::warn!(
            log_directory = %config.log_directory.display(),
            "A log subscriber is already installed, keeping it"
        );
        None
    } else {
        LogConfig::default()
            .with_level(level)
            .with_directory(&config.log_directory)
            .init()?
    };

    match loaded {
        Ok(_) => tracing::info!(
            url = %config.connection_string,
            "Configuration loaded from {}",
            config_path.display()
        ),
        Err(e) => tracing::warn!(
            error = %e,
            "Cannot load configuration file {}, using defaults",
            config_path.display()
        ),
    }

    Ok(Bootstrap {
        executor: Executor::from_config(&config),
        config,
        log_guard,
    })
}
