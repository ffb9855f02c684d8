// src/io/loader.rs

use crate::error::{Result, SimulationError};
use crate::model::catalog::{ProductCatalog, ProductSpec};
use crate::model::forecast::{ForecastDay, ForecastTable};
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Leading non-product columns in every forecast file.
pub const METADATA_COLUMNS: usize = 2;

/// Reads the product catalog from a CSV file.
///
/// Required columns: `unit_volume`, `unit_weight`, `shelf_life`. An optional
/// `product` column names the row; anything else is ignored.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<ProductCatalog> {
    let path = path.as_ref();
    let catalog = read_catalog(std::fs::File::open(path)?)?;
    info!(path = %path.display(), products = catalog.len(), "loaded product catalog");
    Ok(catalog)
}

pub fn read_catalog<R: Read>(reader: R) -> Result<ProductCatalog> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut products = Vec::new();
    for record in rdr.deserialize::<ProductSpec>() {
        products.push(record?);
    }
    Ok(ProductCatalog::new(products))
}

/// Reads the forecast table from a CSV file.
///
/// The first two columns are metadata; each remaining column is one product,
/// each row one day. Empty cells are kept as missing values.
pub fn load_forecast<P: AsRef<Path>>(path: P) -> Result<ForecastTable> {
    let path = path.as_ref();
    let table = read_forecast(std::fs::File::open(path)?)?;
    info!(
        path = %path.display(),
        products = table.product_count(),
        days = table.day_count(),
        "loaded forecast table"
    );
    Ok(table)
}

pub fn read_forecast<R: Read>(reader: R) -> Result<ForecastTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.len() < METADATA_COLUMNS {
        return Err(SimulationError::InvalidForecastData {
            day: 0,
            product: 0,
            reason: format!(
                "expected {} metadata columns, header has {}",
                METADATA_COLUMNS,
                headers.len()
            ),
        });
    }
    let products: Vec<String> = headers
        .iter()
        .skip(METADATA_COLUMNS)
        .map(str::to_string)
        .collect();

    let mut days = Vec::new();
    for (day, record) in rdr.records().enumerate() {
        let record = record?;
        let labels = [record[0].to_string(), record[1].to_string()];
        let values = record
            .iter()
            .skip(METADATA_COLUMNS)
            .enumerate()
            .map(|(product, cell)| parse_cell(cell, day, product))
            .collect::<Result<Vec<_>>>()?;
        days.push(ForecastDay::new(labels, values));
    }

    ForecastTable::new(products, days)
}

fn parse_cell(cell: &str, day: usize, product: usize) -> Result<Option<f64>> {
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse::<f64>()
        .map(Some)
        .map_err(|_| SimulationError::InvalidForecastData {
            day,
            product,
            reason: format!("'{}' is not a number", cell),
        })
}
