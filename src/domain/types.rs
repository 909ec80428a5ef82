//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - parsed from the sales CSV
//! - written back out by the fixture generator
//! - exported to JSON inside report bundles

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Fixed product catalog used by the fixture generator.
pub const PRODUCTS: [&str; 8] = [
    "Laptop",
    "Mouse",
    "Teclado",
    "Monitor",
    "Tablet",
    "Smartphone",
    "Auriculares",
    "Impresora",
];

/// Fixed sales regions.
pub const REGIONS: [&str; 4] = ["Norte", "Sur", "Este", "Oeste"];

/// Fixed customer types.
pub const CUSTOMER_TYPES: [&str; 3] = ["Individual", "Empresa", "Gobierno"];

pub const CATEGORY_ELECTRONICS: &str = "Electrónicos";
pub const CATEGORY_ACCESSORIES: &str = "Accesorios";
pub const CATEGORY_DEVICES: &str = "Dispositivos";

/// CSV header, in the order the generator writes it.
pub const CSV_COLUMNS: [&str; 9] = [
    "order_id",
    "product",
    "category",
    "quantity",
    "unit_price",
    "sale_date",
    "region",
    "customer_type",
    "total_sale",
];

/// One row of the ingested record set.
///
/// `total_sale` is taken from the source as-is; it is expected to equal
/// `quantity * unit_price` but is never re-validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub order_id: String,
    pub product: String,
    pub category: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub sale_date: NaiveDate,
    pub region: String,
    pub customer_type: String,
    pub total_sale: f64,
}

impl SaleRecord {
    /// Synthesized customer segment key (`region_customerType`).
    pub fn segment_key(&self) -> String {
        format!("{}_{}", self.region, self.customer_type)
    }
}

/// Where category rollups take their category label from.
///
/// `ProductMap` reproduces the historical behavior: the stored `category`
/// column is ignored and the category is re-derived from a hardcoded product
/// list that does not match what the generator writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CategorySource {
    #[default]
    ProductMap,
    Stored,
}

impl CategorySource {
    pub fn category_of(self, record: &SaleRecord) -> &str {
        match self {
            CategorySource::ProductMap => derived_category(&record.product),
            CategorySource::Stored => &record.category,
        }
    }
}

/// Category derived from the product name for rollups.
pub fn derived_category(product: &str) -> &'static str {
    match product {
        "Laptop" | "Tablet" | "Smartphone" | "Monitor" => CATEGORY_ELECTRONICS,
        "Mouse" | "Teclado" | "Auriculares" => CATEGORY_ACCESSORIES,
        _ => CATEGORY_DEVICES,
    }
}

/// Category written into the `category` column at generation time.
///
/// Only a coarse two-way split; `Dispositivos` is never produced here.
pub fn generated_category(product: &str) -> &'static str {
    match product {
        "Laptop" | "Tablet" | "Smartphone" => CATEGORY_ELECTRONICS,
        _ => CATEGORY_ACCESSORIES,
    }
}

/// Round a currency-like value to 2 decimal places.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
