//! Synthetic sales fixture generation.
//!
//! Produces randomized rows over a fixed catalog so the engine has something
//! to aggregate when no real data exists.

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::config::DataConfig;
use crate::domain::{CUSTOMER_TYPES, PRODUCTS, REGIONS, SaleRecord, generated_category, round2};
use crate::error::AppError;

const PRICE_MIN: f64 = 50.0;
const PRICE_MAX: f64 = 1500.0;
const QUANTITY_MAX: u32 = 5;
const FIRST_ORDER_NUMBER: usize = 1000;

/// Generator settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub count: usize,
    /// Dates are drawn from the `history_days` days before the end date.
    pub history_days: u32,
    pub seed: Option<u64>,
}

impl From<&DataConfig> for GeneratorConfig {
    fn from(data: &DataConfig) -> Self {
        Self {
            count: data.default_records,
            history_days: data.history_days,
            seed: data.seed,
        }
    }
}

/// What a generation run produced (for the CLI banner and logs).
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    pub records: usize,
    pub distinct_products: usize,
    pub total_sales: f64,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

/// Generate `config.count` sale rows ending at `end_date`.
pub fn generate_sales(config: &GeneratorConfig, end_date: NaiveDate) -> Result<Vec<SaleRecord>, AppError> {
    if config.count == 0 {
        return Err(AppError::new(2, "Record count must be > 0."));
    }
    if config.history_days == 0 {
        return Err(AppError::new(2, "History window must be at least 1 day."));
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let start_date = period_start(end_date, config.history_days);
    let mut records = Vec::with_capacity(config.count);

    for i in 0..config.count {
        let product = PRODUCTS[rng.gen_range(0..PRODUCTS.len())];
        let unit_price: f64 = rng.gen_range(PRICE_MIN..=PRICE_MAX);
        let quantity = rng.gen_range(1..=QUANTITY_MAX);
        let day_offset = rng.gen_range(0..i64::from(config.history_days));
        let region = REGIONS[rng.gen_range(0..REGIONS.len())];
        let customer_type = CUSTOMER_TYPES[rng.gen_range(0..CUSTOMER_TYPES.len())];

        records.push(SaleRecord {
            order_id: format!("ORD_{}", FIRST_ORDER_NUMBER + i),
            product: product.to_string(),
            category: generated_category(product).to_string(),
            quantity,
            unit_price: round2(unit_price),
            sale_date: start_date + Duration::days(day_offset),
            region: region.to_string(),
            customer_type: customer_type.to_string(),
            // The total uses the unrounded price.
            total_sale: round2(unit_price * f64::from(quantity)),
        });
    }

    Ok(records)
}

/// Summarize a generated record set.
pub fn summarize(records: &[SaleRecord], config: &GeneratorConfig, end_date: NaiveDate) -> GenerationSummary {
    let mut products: Vec<&str> = records.iter().map(|r| r.product.as_str()).collect();
    products.sort_unstable();
    products.dedup();

    GenerationSummary {
        records: records.len(),
        distinct_products: products.len(),
        total_sales: records.iter().map(|r| r.total_sale).sum(),
        period_start: period_start(end_date, config.history_days),
        period_end: end_date,
    }
}

fn period_start(end_date: NaiveDate, history_days: u32) -> NaiveDate {
    end_date - Duration::days(i64::from(history_days))
}
