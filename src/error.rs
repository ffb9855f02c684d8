// src/error.rs

use thiserror::Error;

/// Everything that can abort a simulation run.
///
/// There is no partial recovery: a run either completes or returns one of these.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Catalog and forecast table disagree on how many products exist.
    #[error("catalog has {catalog} products but forecast table has {forecast} product columns")]
    DataShapeMismatch { catalog: usize, forecast: usize },

    /// A forecast cell that must hold a whole, non-negative number does not.
    #[error("invalid forecast value at day {day}, product {product}: {reason}")]
    InvalidForecastData {
        day: usize,
        product: usize,
        reason: String,
    },

    /// The forecast table has fewer days than the run needs to read.
    #[error("forecast table has {available} days but the run needs {required}")]
    InsufficientForecastHistory { required: usize, available: usize },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimulationError>;
