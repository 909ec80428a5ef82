//! Formatted terminal output for every report.
//!
//! We keep formatting code in one place so:
//! - the engine stays free of presentation concerns
//! - output changes are localized (and covered by golden tests)

use std::path::Path;

use crate::config::AppConfig;
use crate::data::GenerationSummary;
use crate::engine::{
    CustomerReport, Forecast, ProductPerformance, ReportBundle, Rollup, SummaryStats, TrendReport,
};
use crate::plot::{render_bar_chart, render_trend_chart};

const CARD_WIDTH: usize = 24;
const BAR_WIDTH: usize = 30;

/// The full dashboard: metric cards, then every report in turn.
pub fn format_dashboard(bundle: &ReportBundle, config: &AppConfig) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {} - Sales Dashboard ===\n", config.general.app_name));
    out.push_str(&format!(
        "Source: {} | generated: {}\n\n",
        bundle.source, bundle.generated_on
    ));

    out.push_str(&render_cards(&[
        ("Total sales", fmt_money(bundle.summary.total_sales)),
        ("Weekly growth", fmt_percent(bundle.sales_trend.average_weekly_growth)),
        ("Avg order value", fmt_money(bundle.customers.average_order_value)),
    ]));
    out.push_str(&render_cards(&[
        ("Total orders", fmt_count(bundle.summary.total_orders)),
        ("Weeks analysed", bundle.sales_trend.total_weeks.to_string()),
        ("Customer segments", bundle.customers.customer_segments.to_string()),
    ]));
    out.push_str(&render_cards(&[
        ("Sales today", fmt_money(bundle.summary.sales_today)),
        ("Best product", or_dash(bundle.product_performance.best_selling_product.as_deref())),
        ("Forecast", fmt_money(bundle.forecast.predicted_next_month)),
    ]));
    out.push('\n');

    out.push_str(&format_rollup("Sales by category", &bundle.sales_by_category));
    out.push('\n');
    out.push_str(&format_rollup("Top products", &bundle.top_products));
    out.push('\n');
    out.push_str(&format_rollup("Sales by region", &bundle.regional_analysis));
    out.push('\n');
    out.push_str(&format_trend(&bundle.sales_trend));
    out.push('\n');
    out.push_str(&format_customers(&bundle.customers));
    out.push('\n');
    out.push_str(&format_forecast(&bundle.forecast));

    out
}

pub fn format_summary(stats: &SummaryStats) -> String {
    let mut out = String::new();
    out.push_str("Summary:\n");
    out.push_str(&format!("- total sales   : {}\n", fmt_money(stats.total_sales)));
    out.push_str(&format!("- orders        : {}\n", fmt_count(stats.total_orders)));
    out.push_str(&format!("- average sale  : {}\n", fmt_money(stats.average_sale)));
    out.push_str(&format!(
        "- period        : {}\n",
        stats
            .date_range
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string())
    ));
    out.push_str(&format!("- sales today   : {}\n", fmt_money(stats.sales_today)));
    out
}

/// A titled ranked list with proportional bars.
pub fn format_rollup(title: &str, rollup: &Rollup) -> String {
    let mut out = String::new();
    out.push_str(&format!("{title}:\n"));
    out.push_str(&render_bar_chart(rollup, BAR_WIDTH));
    out
}

pub fn format_trend(trend: &TrendReport) -> String {
    let mut out = String::new();
    out.push_str("Weekly trend:\n");
    out.push_str(&format!(
        "- weeks: {} | average growth: {} | best: {} | worst: {}\n",
        trend.total_weeks,
        fmt_percent(trend.average_weekly_growth),
        or_dash(trend.best_week.as_deref()),
        or_dash(trend.worst_week.as_deref()),
    ));
    out.push_str(&render_trend_chart(&trend.weekly_sales, 60, 10));

    if !trend.weekly_sales.is_empty() {
        out.push_str(&format!("{:<8} {:>14} {:>9}\n", "week", "sales", "growth"));
        out.push_str(&format!("{:-<8} {:-<14} {:-<9}\n", "", "", ""));
        for (i, (week, sales)) in trend.weekly_sales.iter().enumerate() {
            // The first week has no predecessor to grow from.
            let growth = i
                .checked_sub(1)
                .and_then(|j| trend.growth_rates.get(j))
                .map(|g| fmt_percent(*g))
                .unwrap_or_else(|| "-".to_string());
            out.push_str(&format!("{week:<8} {:>14} {growth:>9}\n", fmt_money(*sales)));
        }
    }
    out
}

pub fn format_customers(customers: &CustomerReport) -> String {
    let mut out = String::new();
    out.push_str("Customer segments:\n");
    out.push_str(&format!(
        "- segments: {} | orders: {}\n",
        customers.customer_segments,
        fmt_count(customers.total_customers)
    ));
    out.push_str(&format!(
        "- average spend per segment: {}\n",
        fmt_money(customers.average_order_value)
    ));
    out.push_str(&format!(
        "- top spending: {}\n",
        or_dash(customers.top_spending_segment.as_deref())
    ));
    out.push_str(&format!(
        "- most frequent: {}\n",
        or_dash(customers.most_frequent_segment.as_deref())
    ));
    out
}

pub fn format_product_performance(performance: &ProductPerformance) -> String {
    let mut out = String::new();
    out.push_str("Product performance:\n");
    out.push_str(
        format!(
            "{:<4} {:<14} {:>14} {:>7} {:>12} {:>7} {:>14}",
            "rank", "product", "revenue", "units", "avg_price", "orders", "per_order"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<4} {:-<14} {:-<14} {:-<7} {:-<12} {:-<7} {:-<14}",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for (i, name) in performance.rank_by_revenue.iter().enumerate() {
        let Some(m) = performance.product_metrics.get(name) else {
            continue;
        };
        out.push_str(
            format!(
                "{:<4} {:<14} {:>14} {:>7} {:>12} {:>7} {:>14}",
                i + 1,
                truncate(name, 14),
                fmt_money(m.total_revenue),
                m.units_sold,
                fmt_money(m.average_price),
                m.total_orders,
                fmt_money(m.revenue_per_order),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out.push_str(&format!(
        "Best selling: {}\n",
        or_dash(performance.best_selling_product.as_deref())
    ));
    out
}

pub fn format_forecast(forecast: &Forecast) -> String {
    let mut out = String::new();
    out.push_str("Forecast:\n");
    for (month, sales) in &forecast.monthly_trend {
        out.push_str(&format!("- {month}: {}\n", fmt_money(*sales)));
    }
    out.push_str(&format!(
        "- next month: {} (confidence: {})\n",
        fmt_money(forecast.predicted_next_month),
        forecast.confidence
    ));
    out
}

pub fn format_about(config: &AppConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} v{}\n", config.general.app_name, env!("CARGO_PKG_VERSION")));
    out.push_str(&format!("by {}\n\n", config.general.author));
    out.push_str("Offline sales analysis over a flat CSV record set:\n");
    out.push_str("- category, product and regional rollups\n");
    out.push_str("- weekly growth trend and next-month forecast\n");
    out.push_str("- customer segment statistics\n");
    out
}

pub fn format_generation(summary: &GenerationSummary, path: &Path) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Generated {} records -> {}\n",
        fmt_count(summary.records),
        path.display()
    ));
    out.push_str(&format!("- products: {}\n", summary.distinct_products));
    out.push_str(&format!("- total sales: {}\n", fmt_money(summary.total_sales)));
    out.push_str(&format!(
        "- period: {} to {}\n",
        summary.period_start, summary.period_end
    ));
    out
}

/// Lay out metric cards side by side.
fn render_cards(cards: &[(&str, String)]) -> String {
    let inner = CARD_WIDTH - 4;
    let border = format!("+{}+", "-".repeat(CARD_WIDTH - 2));

    let mut rows = [String::new(), String::new(), String::new(), String::new()];
    for (i, (title, value)) in cards.iter().enumerate() {
        let sep = if i == 0 { "" } else { " " };
        rows[0].push_str(&format!("{sep}{border}"));
        rows[1].push_str(&format!("{sep}| {:<inner$} |", truncate(title, inner)));
        rows[2].push_str(&format!("{sep}| {:<inner$} |", truncate(value, inner)));
        rows[3].push_str(&format!("{sep}{border}"));
    }

    let mut out = String::new();
    for row in rows {
        out.push_str(&row);
        out.push('\n');
    }
    out
}

/// `$1,234.56` style currency.
pub fn fmt_money(v: f64) -> String {
    let sign = if v < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", v.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{sign}${}.{frac_part}", group_thousands(int_part))
}

fn fmt_count(n: usize) -> String {
    group_thousands(&n.to_string())
}

fn fmt_percent(v: f64) -> String {
    format!("{v:.2}%")
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn or_dash(v: Option<&str>) -> String {
    v.unwrap_or("-").to_string()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use crate::engine::{Confidence, DateRange, ProductMetrics};

    #[test]
    fn money_is_grouped_with_two_decimals() {
        assert_eq!(fmt_money(0.0), "$0.00");
        assert_eq!(fmt_money(999.999), "$1,000.00");
        assert_eq!(fmt_money(1234567.891), "$1,234,567.89");
        assert_eq!(fmt_money(-42.5), "-$42.50");
        assert_eq!(fmt_count(2000), "2,000");
    }

    #[test]
    fn cards_golden_snapshot() {
        let txt = render_cards(&[("Orders", "12".to_string()), ("Weeks", "3".to_string())]);
        let expected = concat!(
            "+----------------------+ +----------------------+\n",
            "| Orders               | | Weeks                |\n",
            "| 12                   | | 3                    |\n",
            "+----------------------+ +----------------------+\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn summary_shows_period_or_dash() {
        let mut stats = SummaryStats {
            total_sales: 1500.0,
            average_sale: 750.0,
            total_orders: 2,
            date_range: Some(DateRange {
                start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            }),
            sales_today: 0.0,
        };
        let txt = format_summary(&stats);
        assert!(txt.contains("- total sales   : $1,500.00"));
        assert!(txt.contains("2024-01-01 to 2024-03-31"));

        stats.date_range = None;
        assert!(format_summary(&stats).contains("- period        : -"));
    }

    #[test]
    fn forecast_lists_months_and_confidence() {
        let forecast = Forecast {
            monthly_trend: [("2024-01".to_string(), 1000.0)].into_iter().collect(),
            predicted_next_month: 1000.0,
            confidence: Confidence::Low,
        };
        let txt = format_forecast(&forecast);
        assert!(txt.contains("- 2024-01: $1,000.00"));
        assert!(txt.contains("next month: $1,000.00 (confidence: low)"));
    }

    #[test]
    fn product_table_follows_ranking() {
        let mut product_metrics = BTreeMap::new();
        for (name, revenue) in [("Mouse", 50.0), ("Laptop", 500.0)] {
            product_metrics.insert(
                name.to_string(),
                ProductMetrics {
                    total_revenue: revenue,
                    units_sold: 1,
                    average_price: revenue,
                    total_orders: 1,
                    revenue_per_order: revenue,
                },
            );
        }
        let performance = ProductPerformance {
            product_metrics,
            rank_by_revenue: vec!["Laptop".to_string(), "Mouse".to_string()],
            best_selling_product: Some("Laptop".to_string()),
        };

        let txt = format_product_performance(&performance);
        let laptop = txt.find("Laptop").unwrap();
        let mouse = txt.find("Mouse").unwrap();
        assert!(laptop < mouse);
        assert!(txt.ends_with("Best selling: Laptop\n"));
    }

    #[test]
    fn trend_table_leaves_first_growth_blank() {
        let trend = TrendReport {
            weekly_sales: [("2024-01".to_string(), 100.0), ("2024-02".to_string(), 150.0)]
                .into_iter()
                .collect(),
            growth_rates: vec![50.0],
            average_weekly_growth: 50.0,
            total_weeks: 2,
            best_week: Some("2024-02".to_string()),
            worst_week: Some("2024-01".to_string()),
        };
        let txt = format_trend(&trend);
        assert!(txt.contains("best: 2024-02 | worst: 2024-01"));
        let rows: Vec<&str> = txt.lines().filter(|l| l.starts_with("2024-0") && l.contains('$')).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].trim_end().ends_with('-'));
        assert!(rows[1].trim_end().ends_with("50.00%"));
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("Auriculares", 20), "Auriculares");
        assert_eq!(truncate("Auriculares", 6), "Auric.");
    }
}
