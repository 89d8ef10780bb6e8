// SQLite backend
//
// - config: bb8 connection manager and pool construction
// - params: conversion from `RowValues` to rusqlite values
// - query: result extraction
// - executor: statement execution on the blocking pool

pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use config::{SharedSqliteConnection, SqliteManager, SqlitePool, SqlitePooledConnection};
pub use query::build_result_set;
