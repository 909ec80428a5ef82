//! Report structures returned by the aggregation engine.
//!
//! All of these are plain data (serializable, comparable) so the text layer and
//! the JSON export can consume them without touching the engine.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Headline totals over the whole record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_sales: f64,
    /// `total_sales / total_orders`, or 0 for an empty set.
    pub average_sale: f64,
    pub total_orders: usize,
    /// First and last sale date; `None` for an empty set.
    pub date_range: Option<DateRange>,
    /// Sum of sales dated on the reference day. Usually 0 for historical data.
    pub sales_today: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// One labelled sum in a rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupEntry {
    pub label: String,
    pub value: f64,
}

/// Grouped sums of `total_sale`, ordered by value descending.
///
/// Equal values are ordered by label so output is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rollup {
    pub entries: Vec<RollupEntry>,
}

impl Rollup {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.value).sum()
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.label == label).map(|e| e.value)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    /// Largest value (the first entry), if any.
    pub fn max_value(&self) -> Option<f64> {
        self.entries.first().map(|e| e.value)
    }
}

/// Week-over-week trend of sales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    /// Sales per `YYYY-WW` bucket, ascending by key.
    pub weekly_sales: BTreeMap<String, f64>,
    /// Percentage growth for each consecutive pair of weeks.
    pub growth_rates: Vec<f64>,
    /// Mean of `growth_rates`, rounded to 2 decimals (0 with fewer than 2 weeks).
    pub average_weekly_growth: f64,
    pub total_weeks: usize,
    pub best_week: Option<String>,
    pub worst_week: Option<String>,
}

/// Statistics over synthesized customer segments (`region_customerType`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerReport {
    /// Mean total spend per segment, rounded to 2 decimals.
    pub average_order_value: f64,
    pub top_spending_segment: Option<String>,
    pub most_frequent_segment: Option<String>,
    pub customer_segments: usize,
    /// Sum of segment order counts (equals the number of orders).
    pub total_customers: usize,
}

/// Per-product metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMetrics {
    pub total_revenue: f64,
    pub units_sold: u64,
    /// Mean unit price across the product's orders.
    pub average_price: f64,
    pub total_orders: usize,
    pub revenue_per_order: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPerformance {
    pub product_metrics: BTreeMap<String, ProductMetrics>,
    /// Product names by total revenue, descending.
    pub rank_by_revenue: Vec<String>,
    pub best_selling_product: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Naive next-month forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Sales per `YYYY-MM`, ascending by key.
    pub monthly_trend: BTreeMap<String, f64>,
    pub predicted_next_month: f64,
    pub confidence: Confidence,
}

/// Every report for one snapshot, as exported to JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportBundle {
    pub source: String,
    pub generated_on: NaiveDate,
    pub summary: SummaryStats,
    pub sales_by_category: Rollup,
    pub top_products: Rollup,
    pub regional_analysis: Rollup,
    pub sales_trend: TrendReport,
    pub customers: CustomerReport,
    pub product_performance: ProductPerformance,
    pub forecast: Forecast,
}
