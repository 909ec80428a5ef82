//! Aggregation engine.
//!
//! A `SalesAnalyzer` is an immutable snapshot of a loaded record set. Every
//! query is a read-only scan over the full set; nothing is cached between
//! queries, and nothing is mutated after construction. Reloading data means
//! building a new analyzer (see `app::session`).

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::config::AnalysisConfig;
use crate::domain::{SaleRecord, round2};
use crate::error::LoadError;
use crate::io::ingest::load_sales;

pub mod reports;
pub mod sink;

pub use reports::*;
pub use sink::{EngineEvent, EventSink, MemorySink, NullSink, TracingSink};

/// Week bucket format: year + Sunday-based week of year (`00` before the first Sunday).
const WEEK_KEY_FORMAT: &str = "%Y-%U";
const MONTH_KEY_FORMAT: &str = "%Y-%m";

/// Months of history needed for a `high` confidence forecast.
const HIGH_CONFIDENCE_MONTHS: usize = 3;

pub struct SalesAnalyzer {
    records: Vec<SaleRecord>,
    source: String,
    config: AnalysisConfig,
    sink: Arc<dyn EventSink>,
}

impl std::fmt::Debug for SalesAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesAnalyzer")
            .field("source", &self.source)
            .field("records", &self.records.len())
            .field("config", &self.config)
            .finish()
    }
}

impl SalesAnalyzer {
    /// Load a CSV file into a new snapshot.
    ///
    /// Fails on a missing file or on the first malformed row; there are no
    /// partial loads.
    pub fn load(path: &Path, config: &AnalysisConfig, sink: Arc<dyn EventSink>) -> Result<Self, LoadError> {
        let source = path.display().to_string();
        match load_sales(path) {
            Ok(records) => Ok(Self::with_source(records, source, config, sink)),
            Err(err) => {
                sink.log_event(&EngineEvent::LoadFailed {
                    source,
                    error: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Build a snapshot from records already in memory.
    pub fn from_records(records: Vec<SaleRecord>, config: &AnalysisConfig, sink: Arc<dyn EventSink>) -> Self {
        Self::with_source(records, "<memory>".to_string(), config, sink)
    }

    fn with_source(
        records: Vec<SaleRecord>,
        source: String,
        config: &AnalysisConfig,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        sink.log_event(&EngineEvent::Loaded {
            records: records.len(),
            source: source.clone(),
        });
        Self {
            records,
            source,
            config: config.clone(),
            sink,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn trace_query(&self, name: &'static str) {
        self.sink.log_event(&EngineEvent::Query {
            name,
            records: self.records.len(),
        });
    }

    /// Headline totals, with "sales today" taken against the local calendar date.
    pub fn summary_stats(&self) -> SummaryStats {
        self.summary_stats_on(Local::now().date_naive())
    }

    pub fn summary_stats_on(&self, today: NaiveDate) -> SummaryStats {
        self.trace_query("summary_stats");

        let total_sales: f64 = self.records.iter().map(|r| r.total_sale).sum();
        let total_orders = self.records.len();
        let average_sale = if total_orders > 0 {
            total_sales / total_orders as f64
        } else {
            0.0
        };

        let start = self.records.iter().map(|r| r.sale_date).min();
        let end = self.records.iter().map(|r| r.sale_date).max();
        let date_range = start.zip(end).map(|(start, end)| DateRange { start, end });

        let sales_today = self
            .records
            .iter()
            .filter(|r| r.sale_date == today)
            .map(|r| r.total_sale)
            .sum();

        SummaryStats {
            total_sales,
            average_sale,
            total_orders,
            date_range,
            sales_today,
        }
    }

    /// Sales per category, using the configured category source.
    pub fn sales_by_category(&self) -> Rollup {
        self.trace_query("sales_by_category");
        let source = self.config.category_source;
        rollup_by(&self.records, |r| source.category_of(r))
    }

    /// The `n` best-selling products by revenue.
    pub fn top_products(&self, n: usize) -> Rollup {
        self.trace_query("top_products");
        let mut rollup = rollup_by(&self.records, |r| r.product.as_str());
        rollup.entries.truncate(n);
        rollup
    }

    /// `top_products` with the configured default `n`.
    pub fn top_products_default(&self) -> Rollup {
        self.top_products(self.config.top_n)
    }

    pub fn regional_analysis(&self) -> Rollup {
        self.trace_query("regional_analysis");
        rollup_by(&self.records, |r| r.region.as_str())
    }

    /// Weekly sums and week-over-week growth.
    pub fn sales_trend_analysis(&self) -> TrendReport {
        self.trace_query("sales_trend_analysis");

        let weekly_sales = sum_by_date_key(&self.records, WEEK_KEY_FORMAT);
        let values: Vec<f64> = weekly_sales.values().copied().collect();
        let growth_rates = growth_rates(&values);
        let average_weekly_growth = round2(mean(&growth_rates).unwrap_or(0.0));

        let best_week = extreme_key(weekly_sales.iter().map(|(k, v)| (k, *v)), Ordering::Greater);
        let worst_week = extreme_key(weekly_sales.iter().map(|(k, v)| (k, *v)), Ordering::Less);

        TrendReport {
            total_weeks: weekly_sales.len(),
            weekly_sales,
            growth_rates,
            average_weekly_growth,
            best_week,
            worst_week,
        }
    }

    /// Spend and order frequency per `region_customerType` segment.
    pub fn customer_analysis(&self) -> CustomerReport {
        self.trace_query("customer_analysis");

        let mut segments: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        for r in &self.records {
            let entry = segments.entry(r.segment_key()).or_insert((0.0, 0));
            entry.0 += r.total_sale;
            entry.1 += 1;
        }

        let spend: Vec<f64> = segments.values().map(|(s, _)| *s).collect();
        let average_order_value = round2(mean(&spend).unwrap_or(0.0));
        let top_spending_segment = extreme_key(segments.iter().map(|(k, (s, _))| (k, *s)), Ordering::Greater);
        let most_frequent_segment =
            extreme_key(segments.iter().map(|(k, (_, n))| (k, *n as f64)), Ordering::Greater);

        CustomerReport {
            average_order_value,
            top_spending_segment,
            most_frequent_segment,
            customer_segments: segments.len(),
            total_customers: segments.values().map(|(_, n)| n).sum(),
        }
    }

    /// Revenue, units, pricing and order counts per product.
    pub fn product_performance_metrics(&self) -> ProductPerformance {
        self.trace_query("product_performance_metrics");

        #[derive(Default)]
        struct Acc {
            revenue: f64,
            units: u64,
            price_sum: f64,
            orders: usize,
        }

        let mut acc: BTreeMap<&str, Acc> = BTreeMap::new();
        for r in &self.records {
            let a = acc.entry(r.product.as_str()).or_default();
            a.revenue += r.total_sale;
            a.units += u64::from(r.quantity);
            a.price_sum += r.unit_price;
            a.orders += 1;
        }

        let product_metrics: BTreeMap<String, ProductMetrics> = acc
            .into_iter()
            .map(|(product, a)| {
                let orders = a.orders as f64;
                let metrics = ProductMetrics {
                    total_revenue: round2(a.revenue),
                    units_sold: a.units,
                    average_price: round2(a.price_sum / orders),
                    total_orders: a.orders,
                    revenue_per_order: round2(a.revenue / orders),
                };
                (product.to_string(), metrics)
            })
            .collect();

        let mut ranked: Vec<(&String, f64)> = product_metrics
            .iter()
            .map(|(name, m)| (name, m.total_revenue))
            .collect();
        ranked.sort_by(|a, b| desc_by_value(a.1, b.1).then_with(|| a.0.cmp(b.0)));
        let rank_by_revenue: Vec<String> = ranked.into_iter().map(|(name, _)| name.clone()).collect();
        let best_selling_product = rank_by_revenue.first().cloned();

        ProductPerformance {
            product_metrics,
            rank_by_revenue,
            best_selling_product,
        }
    }

    /// Monthly sums and a moving-average guess for the next month.
    pub fn predictive_insights(&self) -> Forecast {
        self.trace_query("predictive_insights");

        let monthly_trend = sum_by_date_key(&self.records, MONTH_KEY_FORMAT);
        let values: Vec<f64> = monthly_trend.values().copied().collect();

        let (predicted, confidence) = if values.len() >= 2 {
            let window = self.config.forecast_window.clamp(1, values.len());
            let recent = &values[values.len() - window..];
            let confidence = if values.len() >= HIGH_CONFIDENCE_MONTHS {
                Confidence::High
            } else {
                Confidence::Medium
            };
            (mean(recent).unwrap_or(0.0), confidence)
        } else {
            (mean(&values).unwrap_or(0.0), Confidence::Low)
        };

        Forecast {
            monthly_trend,
            predicted_next_month: round2(predicted),
            confidence,
        }
    }

    /// Every report at once, "today" being the local calendar date.
    pub fn full_report(&self) -> ReportBundle {
        self.full_report_on(Local::now().date_naive())
    }

    pub fn full_report_on(&self, today: NaiveDate) -> ReportBundle {
        ReportBundle {
            source: self.source.clone(),
            generated_on: today,
            summary: self.summary_stats_on(today),
            sales_by_category: self.sales_by_category(),
            top_products: self.top_products_default(),
            regional_analysis: self.regional_analysis(),
            sales_trend: self.sales_trend_analysis(),
            customers: self.customer_analysis(),
            product_performance: self.product_performance_metrics(),
            forecast: self.predictive_insights(),
        }
    }
}

/// Percentage change between consecutive values (0 when the previous value is not positive).
pub fn growth_rates(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| {
            let (previous, current) = (w[0], w[1]);
            if previous > 0.0 {
                (current - previous) / previous * 100.0
            } else {
                0.0
            }
        })
        .collect()
}

fn rollup_by(records: &[SaleRecord], key: impl Fn(&SaleRecord) -> &str) -> Rollup {
    let mut sums: HashMap<&str, f64> = HashMap::new();
    for r in records {
        *sums.entry(key(r)).or_insert(0.0) += r.total_sale;
    }

    let mut entries: Vec<RollupEntry> = sums
        .into_iter()
        .map(|(label, value)| RollupEntry {
            label: label.to_string(),
            value,
        })
        .collect();
    entries.sort_by(|a, b| desc_by_value(a.value, b.value).then_with(|| a.label.cmp(&b.label)));

    Rollup { entries }
}

fn sum_by_date_key(records: &[SaleRecord], format: &str) -> BTreeMap<String, f64> {
    let mut sums = BTreeMap::new();
    for r in records {
        *sums.entry(r.sale_date.format(format).to_string()).or_insert(0.0) += r.total_sale;
    }
    sums
}

fn desc_by_value(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Key of the largest (`Greater`) or smallest (`Less`) value.
///
/// Items are expected in ascending key order; on ties the first key seen wins.
fn extreme_key<'a>(items: impl Iterator<Item = (&'a String, f64)>, wanted: Ordering) -> Option<String> {
    let mut best: Option<(&String, f64)> = None;
    for (key, value) in items {
        let replace = match best {
            None => true,
            Some((_, current)) => value.partial_cmp(&current) == Some(wanted),
        };
        if replace {
            best = Some((key, value));
        }
    }
    best.map(|(key, _)| key.clone())
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CATEGORY_ACCESSORIES, CATEGORY_DEVICES, CATEGORY_ELECTRONICS, CategorySource};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sale(product: &str, region: &str, customer_type: &str, sale_date: NaiveDate, total_sale: f64) -> SaleRecord {
        SaleRecord {
            order_id: format!("ORD_{product}_{sale_date}"),
            product: product.to_string(),
            category: crate::domain::generated_category(product).to_string(),
            quantity: 1,
            unit_price: total_sale,
            sale_date,
            region: region.to_string(),
            customer_type: customer_type.to_string(),
            total_sale,
        }
    }

    fn analyzer(records: Vec<SaleRecord>) -> SalesAnalyzer {
        SalesAnalyzer::from_records(records, &AnalysisConfig::default(), Arc::new(NullSink))
    }

    fn mixed() -> Vec<SaleRecord> {
        vec![
            sale("Laptop", "Norte", "Empresa", date(2024, 1, 8), 1200.0),
            sale("Mouse", "Sur", "Individual", date(2024, 1, 9), 60.5),
            sale("Impresora", "Este", "Gobierno", date(2024, 1, 15), 300.0),
            sale("Monitor", "Norte", "Empresa", date(2024, 2, 2), 450.25),
            sale("Teclado", "Oeste", "Individual", date(2024, 2, 20), 80.0),
            sale("Laptop", "Sur", "Gobierno", date(2024, 3, 1), 999.99),
            sale("Auriculares", "Norte", "Empresa", date(2024, 3, 5), 120.0),
        ]
    }

    fn assert_descending(rollup: &Rollup) {
        for w in rollup.entries.windows(2) {
            assert!(w[0].value >= w[1].value, "{rollup:?} is not descending");
        }
    }

    #[test]
    fn summary_totals_and_average() {
        let a = analyzer(mixed());
        let s = a.summary_stats_on(date(2024, 3, 5));

        let expected: f64 = mixed().iter().map(|r| r.total_sale).sum();
        assert!((s.total_sales - expected).abs() < 1e-9);
        assert_eq!(s.total_orders, 7);
        assert!((s.average_sale - s.total_sales / 7.0).abs() < 1e-12);
        assert_eq!(s.date_range.unwrap().to_string(), "2024-01-08 to 2024-03-05");
        assert!((s.sales_today - 120.0).abs() < 1e-12);
    }

    #[test]
    fn sales_today_is_zero_outside_history() {
        let s = analyzer(mixed()).summary_stats_on(date(2030, 1, 1));
        assert_eq!(s.sales_today, 0.0);
    }

    #[test]
    fn empty_set_returns_sentinels() {
        let a = analyzer(Vec::new());
        let s = a.summary_stats_on(date(2024, 1, 1));
        assert_eq!(s.total_sales, 0.0);
        assert_eq!(s.average_sale, 0.0);
        assert_eq!(s.total_orders, 0);
        assert!(s.date_range.is_none());

        assert!(a.sales_by_category().is_empty());
        assert!(a.top_products(5).is_empty());

        let t = a.sales_trend_analysis();
        assert_eq!(t.total_weeks, 0);
        assert_eq!(t.average_weekly_growth, 0.0);
        assert!(t.best_week.is_none() && t.worst_week.is_none());

        let p = a.product_performance_metrics();
        assert!(p.product_metrics.is_empty());
        assert!(p.best_selling_product.is_none());

        let f = a.predictive_insights();
        assert_eq!(f.predicted_next_month, 0.0);
        assert_eq!(f.confidence, Confidence::Low);
    }

    #[test]
    fn empty_customer_analysis() {
        let c = analyzer(Vec::new()).customer_analysis();
        assert_eq!(
            c,
            CustomerReport {
                average_order_value: 0.0,
                top_spending_segment: None,
                most_frequent_segment: None,
                customer_segments: 0,
                total_customers: 0,
            }
        );
    }

    #[test]
    fn category_rollup_uses_product_map_by_default() {
        let a = analyzer(mixed());
        let rollup = a.sales_by_category();
        assert_descending(&rollup);

        // Monitor is re-derived as electronics, Impresora falls into the catch-all bucket.
        let electronics = rollup.get(CATEGORY_ELECTRONICS).unwrap();
        assert!((electronics - (1200.0 + 450.25 + 999.99)).abs() < 1e-9);
        assert!((rollup.get(CATEGORY_DEVICES).unwrap() - 300.0).abs() < 1e-9);
        assert!((rollup.get(CATEGORY_ACCESSORIES).unwrap() - (60.5 + 80.0 + 120.0)).abs() < 1e-9);

        let total = a.summary_stats_on(date(2024, 1, 1)).total_sales;
        assert!((rollup.total() - total).abs() < 1e-6);
    }

    #[test]
    fn category_rollup_can_use_stored_column() {
        let config = AnalysisConfig {
            category_source: CategorySource::Stored,
            ..AnalysisConfig::default()
        };
        let a = SalesAnalyzer::from_records(mixed(), &config, Arc::new(NullSink));
        let rollup = a.sales_by_category();
        assert!(rollup.get(CATEGORY_DEVICES).is_none());
        assert_eq!(rollup.len(), 2);
    }

    #[test]
    fn top_products_is_a_bounded_descending_subset() {
        let a = analyzer(mixed());
        let all = a.top_products(usize::MAX);
        let top = a.top_products(3);

        assert_eq!(top.len(), 3);
        assert_descending(&top);
        for e in &top.entries {
            assert_eq!(all.get(&e.label), Some(e.value));
        }
        assert_eq!(top.entries[0].label, "Laptop");
        assert!((top.entries[0].value - 2199.99).abs() < 1e-9);

        // Fewer distinct products than requested: everything comes back.
        assert_eq!(a.top_products(50).len(), 6);
        assert_eq!(a.top_products_default().len(), 5);
    }

    #[test]
    fn regional_rollup_is_sorted_and_complete() {
        let a = analyzer(mixed());
        let regions = a.regional_analysis();
        assert_descending(&regions);
        assert_eq!(regions.entries[0].label, "Norte");
        let total = a.summary_stats_on(date(2024, 1, 1)).total_sales;
        assert!((regions.total() - total).abs() < 1e-6);
    }

    #[test]
    fn equal_rollup_values_are_ordered_by_label() {
        let a = analyzer(vec![
            sale("Mouse", "Sur", "Empresa", date(2024, 1, 1), 10.0),
            sale("Mouse", "Este", "Empresa", date(2024, 1, 1), 10.0),
        ]);
        let regions = a.regional_analysis();
        let labels: Vec<&str> = regions.labels().collect();
        assert_eq!(labels, ["Este", "Sur"]);
    }

    #[test]
    fn growth_rates_between_weeks() {
        let rates = growth_rates(&[100.0, 150.0, 100.0]);
        assert_eq!(rates.len(), 2);
        assert!((rates[0] - 50.0).abs() < 1e-12);
        assert!((rates[1] + 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(growth_rates(&[0.0, 50.0]), vec![0.0]);
        assert!(growth_rates(&[10.0]).is_empty());
    }

    #[test]
    fn weekly_trend_with_tied_worst_week() {
        // 2024-01-07 is the first Sunday of 2024, so these land in weeks 01, 02, 03.
        let a = analyzer(vec![
            sale("Laptop", "Norte", "Empresa", date(2024, 1, 8), 100.0),
            sale("Mouse", "Sur", "Empresa", date(2024, 1, 16), 90.0),
            sale("Mouse", "Sur", "Empresa", date(2024, 1, 17), 60.0),
            sale("Tablet", "Este", "Gobierno", date(2024, 1, 22), 100.0),
        ]);
        let t = a.sales_trend_analysis();

        let keys: Vec<&str> = t.weekly_sales.keys().map(String::as_str).collect();
        assert_eq!(keys, ["2024-01", "2024-02", "2024-03"]);
        assert_eq!(t.total_weeks, 3);
        assert_eq!(t.average_weekly_growth, 8.33);
        assert_eq!(t.best_week.as_deref(), Some("2024-02"));
        assert_eq!(t.worst_week.as_deref(), Some("2024-01"));
    }

    #[test]
    fn weekly_trend_with_tied_best_week() {
        let t = analyzer(vec![
            sale("Laptop", "Norte", "Empresa", date(2024, 1, 8), 100.0),
            sale("Mouse", "Sur", "Empresa", date(2024, 1, 15), 50.0),
            sale("Tablet", "Este", "Gobierno", date(2024, 1, 22), 100.0),
        ])
        .sales_trend_analysis();

        assert_eq!(t.best_week.as_deref(), Some("2024-01"));
        assert_eq!(t.worst_week.as_deref(), Some("2024-02"));
    }

    #[test]
    fn weeks_stay_ordered_across_new_year() {
        // 2024-12-29 and 2025-01-05 are Sundays; 2025-01-01 falls before the first one.
        let t = analyzer(vec![
            sale("Mouse", "Sur", "Empresa", date(2025, 1, 6), 100.0),
            sale("Laptop", "Norte", "Empresa", date(2025, 1, 2), 200.0),
            sale("Tablet", "Este", "Gobierno", date(2024, 12, 30), 100.0),
        ])
        .sales_trend_analysis();

        let keys: Vec<&str> = t.weekly_sales.keys().map(String::as_str).collect();
        assert_eq!(keys, ["2024-52", "2025-00", "2025-01"]);
        assert_eq!(t.growth_rates, vec![100.0, -50.0]);
        assert_eq!(t.average_weekly_growth, 25.0);
        assert_eq!(t.best_week.as_deref(), Some("2025-00"));
        assert_eq!(t.worst_week.as_deref(), Some("2024-52"));
    }

    #[test]
    fn days_before_first_sunday_are_week_zero() {
        let t = analyzer(vec![sale("Mouse", "Sur", "Empresa", date(2024, 1, 6), 10.0)]).sales_trend_analysis();
        assert!(t.weekly_sales.contains_key("2024-00"));
        assert_eq!(t.average_weekly_growth, 0.0);
    }

    #[test]
    fn customer_segments_and_tie_break() {
        let a = analyzer(vec![
            sale("Laptop", "Sur", "Empresa", date(2024, 1, 1), 500.0),
            sale("Mouse", "Norte", "Individual", date(2024, 1, 2), 100.0),
            sale("Mouse", "Norte", "Individual", date(2024, 1, 3), 100.0),
            sale("Tablet", "Este", "Gobierno", date(2024, 1, 4), 500.0),
        ]);
        let c = a.customer_analysis();
        assert_eq!(c.customer_segments, 3);
        assert_eq!(c.total_customers, 4);
        assert!((c.average_order_value - 400.0).abs() < 1e-12);
        // Este_Gobierno and Sur_Empresa tie on spend; the smaller key wins.
        assert_eq!(c.top_spending_segment.as_deref(), Some("Este_Gobierno"));
        assert_eq!(c.most_frequent_segment.as_deref(), Some("Norte_Individual"));
    }

    #[test]
    fn product_performance_for_single_product() {
        let mut first = sale("Laptop", "Norte", "Empresa", date(2024, 1, 1), 100.0);
        first.quantity = 1;
        first.unit_price = 100.0;
        let mut second = sale("Laptop", "Sur", "Empresa", date(2024, 1, 2), 400.0);
        second.quantity = 2;
        second.unit_price = 200.0;

        let p = analyzer(vec![first, second]).product_performance_metrics();
        let m = &p.product_metrics["Laptop"];
        assert_eq!(
            *m,
            ProductMetrics {
                total_revenue: 500.0,
                units_sold: 3,
                average_price: 150.0,
                total_orders: 2,
                revenue_per_order: 250.0,
            }
        );
        assert_eq!(p.rank_by_revenue, vec!["Laptop".to_string()]);
        assert_eq!(p.best_selling_product.as_deref(), Some("Laptop"));
    }

    #[test]
    fn product_ranking_follows_revenue() {
        let p = analyzer(mixed()).product_performance_metrics();
        assert_eq!(p.rank_by_revenue.len(), 6);
        assert_eq!(p.rank_by_revenue[0], "Laptop");
        assert_eq!(p.rank_by_revenue[1], "Monitor");
        assert_eq!(p.rank_by_revenue.last().map(String::as_str), Some("Mouse"));
    }

    #[test]
    fn forecast_with_one_month_is_low_confidence() {
        let f = analyzer(vec![
            sale("Laptop", "Norte", "Empresa", date(2024, 1, 3), 600.0),
            sale("Laptop", "Norte", "Empresa", date(2024, 1, 20), 400.0),
        ])
        .predictive_insights();
        assert_eq!(f.monthly_trend.get("2024-01"), Some(&1000.0));
        assert_eq!(f.predicted_next_month, 1000.0);
        assert_eq!(f.confidence, Confidence::Low);
        assert_eq!(f.confidence.to_string(), "low");
    }

    #[test]
    fn forecast_with_two_months_is_medium() {
        let f = analyzer(vec![
            sale("Laptop", "Norte", "Empresa", date(2024, 1, 3), 100.0),
            sale("Laptop", "Norte", "Empresa", date(2024, 2, 3), 200.0),
        ])
        .predictive_insights();
        assert_eq!(f.predicted_next_month, 150.0);
        assert_eq!(f.confidence, Confidence::Medium);
    }

    #[test]
    fn forecast_averages_the_most_recent_three_months() {
        // Input order is deliberately not chronological.
        let f = analyzer(vec![
            sale("Laptop", "Norte", "Empresa", date(2024, 4, 3), 400.0),
            sale("Laptop", "Norte", "Empresa", date(2024, 1, 3), 100.0),
            sale("Laptop", "Norte", "Empresa", date(2024, 3, 3), 300.0),
            sale("Laptop", "Norte", "Empresa", date(2024, 2, 3), 200.0),
        ])
        .predictive_insights();
        assert_eq!(f.predicted_next_month, 300.0);
        assert_eq!(f.confidence, Confidence::High);
        let months: Vec<&str> = f.monthly_trend.keys().map(String::as_str).collect();
        assert_eq!(months, ["2024-01", "2024-02", "2024-03", "2024-04"]);
    }

    #[test]
    fn sink_sees_load_and_queries() {
        let sink = Arc::new(MemorySink::default());
        let a = SalesAnalyzer::from_records(mixed(), &AnalysisConfig::default(), sink.clone());
        a.regional_analysis();

        let events = sink.events();
        assert_eq!(
            events[0],
            EngineEvent::Loaded {
                records: 7,
                source: "<memory>".to_string()
            }
        );
        assert_eq!(
            events[1],
            EngineEvent::Query {
                name: "regional_analysis",
                records: 7
            }
        );
    }

    #[test]
    fn missing_file_fails_and_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(MemorySink::default());
        let err = SalesAnalyzer::load(&dir.path().join("none.csv"), &AnalysisConfig::default(), sink.clone())
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(sink.events()[0], EngineEvent::LoadFailed { .. }));
    }

    #[test]
    fn generated_file_round_trips_order_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        let config = crate::data::GeneratorConfig {
            count: 321,
            history_days: 90,
            seed: Some(9),
        };
        let records = crate::data::generate_sales(&config, date(2024, 5, 31)).unwrap();
        crate::io::write_sales_csv(&path, &records).unwrap();

        let a = SalesAnalyzer::load(&path, &AnalysisConfig::default(), Arc::new(NullSink)).unwrap();
        assert_eq!(a.source(), path.display().to_string());
        let s = a.summary_stats_on(date(2024, 5, 31));
        assert_eq!(s.total_orders, 321);
        assert_eq!(a.customer_analysis().total_customers, 321);
        assert!(a.sales_trend_analysis().total_weeks >= 12);
    }

    #[test]
    fn full_report_bundles_every_query() {
        let a = analyzer(mixed());
        let bundle = a.full_report_on(date(2024, 3, 5));
        assert_eq!(bundle.summary.total_orders, 7);
        assert_eq!(bundle.top_products.len(), 5);
        assert_eq!(bundle.forecast.confidence, Confidence::High);
        assert_eq!(bundle.generated_on, date(2024, 3, 5));
    }

    #[test]
    fn analyzer_can_be_shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SalesAnalyzer>();
    }
}
