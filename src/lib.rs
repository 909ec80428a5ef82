//! `sales-insights` library crate.
//!
//! The binary (`sales`) is a thin wrapper around this library so that:
//!
//! - the aggregation engine is testable without spawning processes
//! - other front-ends can hold a `Session` and read snapshots directly

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
