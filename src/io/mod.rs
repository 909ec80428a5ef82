//! Input/output helpers.
//!
//! - sales CSV ingest (`ingest`)
//! - sales CSV + report JSON writers (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
