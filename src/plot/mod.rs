//! Terminal plotting helpers.

pub mod ascii;

pub use ascii::{render_bar_chart, render_trend_chart};
