//! Writers: sales CSV (fixture output) and report bundle JSON.

use std::fs::{File, create_dir_all};
use std::path::Path;

use crate::domain::{CSV_COLUMNS, SaleRecord};
use crate::engine::ReportBundle;
use crate::error::AppError;

/// Write a record set in the ingest CSV format (header + one row per sale).
///
/// Parent directories are created as needed.
pub fn write_sales_csv(path: &Path, records: &[SaleRecord]) -> Result<(), AppError> {
    ensure_parent_dir(path)?;
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create sales CSV '{}': {e}", path.display())))?;

    let mut writer = csv::Writer::from_writer(file);
    writer
        .write_record(CSV_COLUMNS)
        .map_err(|e| AppError::new(4, format!("Failed to write sales CSV header: {e}")))?;

    for r in records {
        writer
            .write_record([
                r.order_id.clone(),
                r.product.clone(),
                r.category.clone(),
                r.quantity.to_string(),
                format!("{:.2}", r.unit_price),
                r.sale_date.format("%Y-%m-%d").to_string(),
                r.region.clone(),
                r.customer_type.clone(),
                format!("{:.2}", r.total_sale),
            ])
            .map_err(|e| AppError::new(4, format!("Failed to write sales CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush sales CSV: {e}")))?;
    Ok(())
}

/// Write every report as pretty JSON.
pub fn write_report_json(path: &Path, bundle: &ReportBundle) -> Result<(), AppError> {
    ensure_parent_dir(path)?;
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create report JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, bundle)
        .map_err(|e| AppError::new(4, format!("Failed to write report JSON: {e}")))?;

    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)
            .map_err(|e| AppError::new(4, format!("Failed to create directory '{}': {e}", parent.display())))?;
    }
    Ok(())
}
