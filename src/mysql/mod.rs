// MySQL backend
//
// - config: options -> connection URL -> `mysql_async::Pool`
// - params: conversion from `RowValues` to `mysql_async::Value`
// - query: result extraction
// - executor: statement execution

pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use config::{build_pool, connection_url};
