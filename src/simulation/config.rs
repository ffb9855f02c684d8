// src/simulation/config.rs

/// Timesteps per simulated day. Forecast rows are indexed by day.
pub const DAY_LENGTH: usize = 4;
/// Timesteps per simulated month. Expiry decay fires on month boundaries.
pub const MONTH_LENGTH: usize = 120;
/// Fraction of stock that survives a month boundary.
pub const DEFAULT_DECAY_FACTOR: f64 = 0.8;
/// Starting stock of every product.
pub const DEFAULT_INITIAL_INVENTORY: u32 = 10;
/// Largest value the random action policy draws.
pub const ACTION_UPPER_BOUND: u32 = 4;

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Number of timesteps to run.
    pub duration: usize,
    pub initial_inventory: u32,
    pub decay_factor: f64,
    // Truck capacities. Reported against, never enforced.
    pub weight_capacity: f64,
    pub volume_capacity: f64,
    /// Seed for the demand generator (None = entropy).
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            duration: 8,
            initial_inventory: DEFAULT_INITIAL_INVENTORY,
            decay_factor: DEFAULT_DECAY_FACTOR,
            weight_capacity: 1000.0,
            volume_capacity: 1000.0,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn with_duration(mut self, duration: usize) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Day whose forecast is current at `timestep`.
///
/// Normally `timestep / DAY_LENGTH`, except that the first timestep of every
/// day after day 0 still reports the previous day. Timestep 4 maps to day 0,
/// timestep 5 to day 1, timestep 8 to day 1, timestep 9 to day 2.
pub fn forecast_day(timestep: usize) -> usize {
    let day = timestep / DAY_LENGTH;
    if timestep != 0 && timestep % DAY_LENGTH == 0 {
        day - 1
    } else {
        day
    }
}

/// Whether expiry decay fires at `timestep`.
pub fn is_month_boundary(timestep: usize) -> bool {
    timestep != 0 && timestep % MONTH_LENGTH == 0
}
