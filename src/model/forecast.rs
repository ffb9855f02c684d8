// src/model/forecast.rs

use crate::error::{Result, SimulationError};

/// One historical day of the forecast table.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDay {
    /// The two leading non-product columns (e.g. date and weekday).
    pub labels: [String; 2],
    /// One cell per product. `None` is a missing value.
    pub values: Vec<Option<f64>>,
}

impl ForecastDay {
    pub fn new(labels: [String; 2], values: Vec<Option<f64>>) -> Self {
        Self { labels, values }
    }

    /// Convenience for tests and synthetic scenarios: unlabeled day of whole numbers.
    pub fn from_values(values: &[u32]) -> Self {
        Self {
            labels: [String::new(), String::new()],
            values: values.iter().map(|v| Some(*v as f64)).collect(),
        }
    }
}

/// Day-indexed, product-indexed table of historical demand forecasts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastTable {
    products: Vec<String>,
    days: Vec<ForecastDay>,
}

impl ForecastTable {
    /// Every day must carry exactly one cell per product name.
    pub fn new(products: Vec<String>, days: Vec<ForecastDay>) -> Result<Self> {
        for (day, row) in days.iter().enumerate() {
            if row.values.len() != products.len() {
                return Err(SimulationError::InvalidForecastData {
                    day,
                    product: row.values.len().min(products.len()),
                    reason: format!(
                        "row has {} product cells, header has {}",
                        row.values.len(),
                        products.len()
                    ),
                });
            }
        }
        Ok(Self { products, days })
    }

    /// Builds an unlabeled table from whole-number rows, naming products `p0, p1, ...`.
    pub fn from_rows(rows: &[Vec<u32>]) -> Result<Self> {
        let width = rows.first().map_or(0, Vec::len);
        let products = (0..width).map(|p| format!("p{}", p)).collect();
        let days = rows.iter().map(|r| ForecastDay::from_values(r)).collect();
        Self::new(products, days)
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn product_names(&self) -> &[String] {
        &self.products
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn days(&self) -> &[ForecastDay] {
        &self.days
    }

    /// Reads one cell as a whole, non-negative demand value.
    pub fn value(&self, day: usize, product: usize) -> Result<u32> {
        let row = self
            .days
            .get(day)
            .ok_or(SimulationError::InsufficientForecastHistory {
                required: day + 1,
                available: self.days.len(),
            })?;
        let cell = row.values.get(product).copied().flatten();
        whole_number(cell).map_err(|reason| SimulationError::InvalidForecastData {
            day,
            product,
            reason,
        })
    }

    /// All products' values for one day.
    pub fn row(&self, day: usize) -> Result<Vec<u32>> {
        (0..self.product_count())
            .map(|p| self.value(day, p))
            .collect()
    }

    /// The full history of one product column.
    pub fn column(&self, product: usize) -> Result<Vec<u32>> {
        (0..self.day_count())
            .map(|d| self.value(d, product))
            .collect()
    }
}

fn whole_number(cell: Option<f64>) -> std::result::Result<u32, String> {
    let v = cell.ok_or_else(|| "missing value".to_string())?;
    if !v.is_finite() {
        return Err(format!("non-finite value {}", v));
    }
    if v < 0.0 {
        return Err(format!("negative value {}", v));
    }
    if v.fract() != 0.0 {
        return Err(format!("{} is not a whole number", v));
    }
    if v > u32::MAX as f64 {
        return Err(format!("{} is out of range", v));
    }
    Ok(v as u32)
}
