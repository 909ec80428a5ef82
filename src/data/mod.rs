//! Data sources other than a user-supplied CSV.

pub mod sample;

pub use sample::{GenerationSummary, GeneratorConfig, generate_sales, summarize};
