//! Text presentation of engine reports.

pub mod format;

pub use format::{
    fmt_money, format_about, format_customers, format_dashboard, format_forecast, format_generation,
    format_product_performance, format_rollup, format_summary, format_trend,
};
