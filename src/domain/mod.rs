//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - the ingested row type (`SaleRecord`)
//! - the fixed catalog (products, regions, customer types)
//! - category derivation (`CategorySource`)

pub mod types;

pub use types::*;
