//! CSV ingest.
//!
//! Turns the sales CSV into a `Vec<SaleRecord>`.
//!
//! Unlike a forgiving importer, this is **all-or-nothing**: the first row with a
//! missing field or an unparseable number/date rejects the whole source. The
//! caller decides how to recover (typically by generating demo data).

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{CSV_COLUMNS, SaleRecord};
use crate::error::LoadError;

/// Load every row of a sales CSV file.
pub fn load_sales(path: &Path) -> Result<Vec<SaleRecord>, LoadError> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LoadError::SourceNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    read_sales(file)
}

/// Parse sales rows from any reader (header row required).
pub fn read_sales<R: Read>(reader: R) -> Result<Vec<SaleRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| LoadError::MalformedRow {
            line: 1,
            message: format!("Failed to read CSV headers: {e}"),
        })?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // Blank lines are skipped by the reader, so prefer its own position.
        // The counter assumes one record per line after the header.
        let position = match &result {
            Ok(record) => record.position(),
            Err(err) => err.position(),
        };
        let line = position.map(|p| p.line() as usize).unwrap_or(idx + 2);

        let record = result.map_err(|e| LoadError::MalformedRow {
            line,
            message: format!("CSV parse error: {e}"),
        })?;

        let sale = parse_row(&record, &header_map)
            .map_err(|message| LoadError::MalformedRow { line, message })?;
        records.push(sale);
    }

    Ok(records)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), LoadError> {
    for column in CSV_COLUMNS {
        if !header_map.contains_key(column) {
            return Err(LoadError::MalformedRow {
                line: 1,
                message: format!("Missing required column: `{column}`"),
            });
        }
    }
    Ok(())
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<SaleRecord, String> {
    let order_id = get_required(record, header_map, "order_id")?.to_string();
    let product = get_required(record, header_map, "product")?.to_string();
    let category = get_required(record, header_map, "category")?.to_string();
    let quantity = parse_quantity(get_required(record, header_map, "quantity")?)?;
    let unit_price = parse_amount("unit_price", get_required(record, header_map, "unit_price")?)?;
    let sale_date = parse_date(get_required(record, header_map, "sale_date")?)?;
    let region = get_required(record, header_map, "region")?.to_string();
    let customer_type = get_required(record, header_map, "customer_type")?.to_string();
    let total_sale = parse_amount("total_sale", get_required(record, header_map, "total_sale")?)?;

    Ok(SaleRecord {
        order_id,
        product,
        category,
        quantity,
        unit_price,
        sale_date,
        region,
        customer_type,
        total_sale,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn parse_quantity(s: &str) -> Result<u32, String> {
    let q = s
        .parse::<u32>()
        .map_err(|_| format!("Invalid `quantity` value '{s}' (expected a positive integer)."))?;
    if q == 0 {
        return Err("Invalid `quantity` value '0' (expected a positive integer).".to_string());
    }
    Ok(q)
}

fn parse_amount(name: &str, s: &str) -> Result<f64, String> {
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid `{name}` value '{s}' (expected a decimal number)."))?;
    if !v.is_finite() || v < 0.0 {
        return Err(format!("Invalid `{name}` value '{s}' (must be finite and >= 0)."));
    }
    Ok(v)
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid `sale_date` '{s}'. Expected YYYY-MM-DD."))
}
