// src/io/demand.rs

use crate::error::{Result, SimulationError};
use crate::io::kde::{self, GaussianKde};
use crate::model::forecast::ForecastTable;
use crate::simulation::config::DAY_LENGTH;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use tracing::debug;

/// Offsets within each day block that receive a demand draw. The last
/// timestep of every block is left at zero demand.
// NOTE: this stepping pattern looks like an indexing slip in the historical
// generator. It is kept as is so runs stay comparable; do not "fix" it here.
const FILLED_BLOCK_OFFSETS: usize = 3;

/// A fully materialized `duration x products` demand schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemandMatrix {
    duration: usize,
    products: usize,
    cells: Vec<u32>,
    /// Per product, the largest noise added on top of the forecast.
    spreads: Vec<u32>,
}

impl DemandMatrix {
    pub fn zeros(duration: usize, products: usize) -> Self {
        Self {
            duration,
            products,
            cells: vec![0; duration * products],
            spreads: vec![0; products],
        }
    }

    /// Builds a matrix from explicit rows, e.g. a recorded demand trace.
    ///
    /// # Panics
    /// If the rows do not all have the same length.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Self {
        let products = rows.first().map_or(0, Vec::len);
        let duration = rows.len();
        let cells: Vec<u32> = rows.into_iter().flatten().collect();
        assert_eq!(cells.len(), duration * products, "ragged demand rows");
        Self {
            duration,
            products,
            cells,
            spreads: vec![0; products],
        }
    }

    pub fn duration(&self) -> usize {
        self.duration
    }

    pub fn products(&self) -> usize {
        self.products
    }

    /// Integer standard deviation fitted for `product`. Every filled cell
    /// lies in `forecast..=forecast + spread`. Zero for recorded traces.
    pub fn spread(&self, product: usize) -> u32 {
        self.spreads[product]
    }

    pub fn get(&self, timestep: usize, product: usize) -> u32 {
        self.cells[timestep * self.products + product]
    }

    /// Demand of every product at one timestep.
    pub fn row(&self, timestep: usize) -> &[u32] {
        let start = timestep * self.products;
        &self.cells[start..start + self.products]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        (0..self.duration).map(move |t| self.row(t))
    }

    fn set(&mut self, timestep: usize, product: usize, value: u32) {
        self.cells[timestep * self.products + product] = value;
    }
}

/// Number of forecast days the generator reads for a run of `duration` timesteps.
pub fn required_days(duration: usize) -> usize {
    duration.div_ceil(DAY_LENGTH)
}

/// Samples synthetic demand from the empirical distribution of the forecast history.
///
/// The random source is injected so runs can be replayed from a seed.
#[derive(Debug, Clone)]
pub struct DemandGenerator<R: Rng> {
    rng: R,
}

impl DemandGenerator<Pcg64> {
    /// `None` seeds from OS entropy.
    pub fn seeded(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => Pcg64::seed_from_u64(s),
            None => Pcg64::from_entropy(),
        };
        Self { rng }
    }
}

impl<R: Rng> DemandGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generates demand for every product over `duration` timesteps.
    ///
    /// For each product a Gaussian KDE is fitted to its history and resampled
    /// once; the integer part of the resample's standard deviation bounds the
    /// noise added to the day's forecast value.
    pub fn generate(&mut self, forecast: &ForecastTable, duration: usize) -> Result<DemandMatrix> {
        let needed = required_days(duration);
        if forecast.day_count() < needed {
            return Err(SimulationError::InsufficientForecastHistory {
                required: needed,
                available: forecast.day_count(),
            });
        }

        let products = forecast.product_count();
        let mut matrix = DemandMatrix::zeros(duration, products);

        for product in 0..products {
            let history = forecast.column(product)?;
            let spread = self.sampled_spread(&history);
            debug!(product, spread, "fitted demand density");
            matrix.spreads[product] = spread;

            for block_start in (0..duration).step_by(DAY_LENGTH) {
                let day = block_start / DAY_LENGTH;
                let base = history[day];
                for offset in 0..FILLED_BLOCK_OFFSETS {
                    let timestep = block_start + offset;
                    if timestep >= duration {
                        break;
                    }
                    let noise = self.rng.gen_range(0..=spread);
                    matrix.set(timestep, product, base.saturating_add(noise));
                }
            }
        }

        Ok(matrix)
    }

    /// Integer standard deviation of one KDE resample of `history`.
    fn sampled_spread(&mut self, history: &[u32]) -> u32 {
        let data: Vec<f64> = history.iter().map(|v| *v as f64).collect();
        let density = GaussianKde::fit(&data);
        let resampled = density.resample(data.len(), &mut self.rng);
        kde::std_dev(&resampled) as u32
    }
}
