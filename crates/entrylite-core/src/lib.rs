//! # EntryLite Core
//!
//! Core types and store-driver traits for EntryLite.
//!
//! ## ⚠️ Internal Implementation Detail
//!
//! Users should depend on the main `entrylite` crate instead, which
//! re-exports everything needed from here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod row;
pub mod store;
pub mod value;

pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use row::Row;
pub use store::{Connection, RowStream, Statement, Store};
pub use value::{display_params, params_from_values, Param, Value};
