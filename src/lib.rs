//! Warehouse-to-store inventory simulation for reinforcement-learning experiments.
//!
//! Demand is sampled up front from a kernel density fitted to each product's
//! forecast history; the simulation then serves that demand timestep by
//! timestep, refreshing forecasts daily and decaying stock monthly.

pub mod error;
pub mod io;
pub mod model;
pub mod simulation;
pub mod strategy;

pub use error::{Result, SimulationError};
pub use io::demand::{DemandGenerator, DemandMatrix};
pub use model::catalog::{ProductCatalog, ProductSpec};
pub use model::forecast::{ForecastDay, ForecastTable};
pub use model::state::{InventoryState, ProductState};
pub use simulation::config::SimulationConfig;
pub use simulation::engine::{HistoryRecord, SimulationOutcome, WarehouseSimulation};
pub use strategy::traits::ActionPolicy;
