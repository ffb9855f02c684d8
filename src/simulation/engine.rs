// src/simulation/engine.rs

use crate::error::{Result, SimulationError};
use crate::io::demand::{self, DemandGenerator, DemandMatrix};
use crate::model::catalog::ProductCatalog;
use crate::model::forecast::ForecastTable;
use crate::model::state::{InventoryState, ProductState};
use crate::simulation::config::{forecast_day, is_month_boundary, SimulationConfig};
use crate::strategy::traits::ActionPolicy;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

// One row per product per timestep, written to CSV by the reporting module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRecord {
    pub timestep: usize,
    pub product: usize,
    pub demand: u32,
    /// Demand that could not be served from stock and was lost.
    pub unmet: u32,
    pub inventory: u32,
    pub forecast_today: u32,
    pub forecast_tomorrow: u32,
    pub decayed: bool,
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub final_state: InventoryState,
    pub demand: DemandMatrix,
    pub history: Vec<HistoryRecord>,
}

impl SimulationOutcome {
    /// Total demand lost to stock-outs, per product.
    pub fn lost_sales(&self) -> Vec<u64> {
        let mut lost = vec![0u64; self.final_state.len()];
        for record in &self.history {
            lost[record.product] += u64::from(record.unmet);
        }
        lost
    }

    /// Inventory of every product after each timestep.
    pub fn trajectory(&self) -> Vec<Vec<u32>> {
        let n = self.final_state.len().max(1);
        self.history
            .chunks(n)
            .map(|step| step.iter().map(|r| r.inventory).collect())
            .collect()
    }
}

/// Number of forecast days a run of `duration` timesteps reads, counting the
/// two initial rows, bookkeeping lookups and demand generation.
pub fn required_forecast_days(duration: usize) -> usize {
    let bookkeeping = match duration {
        0 => 0,
        d => forecast_day(d - 1) + 2,
    };
    bookkeeping.max(2).max(demand::required_days(duration))
}

/// Single warehouse/store node driven by sampled demand.
pub struct WarehouseSimulation {
    config: SimulationConfig,
    catalog: ProductCatalog,
    forecast: ForecastTable,
    action_policy: Option<Box<dyn ActionPolicy>>,
}

impl WarehouseSimulation {
    pub fn new(config: SimulationConfig, catalog: ProductCatalog, forecast: ForecastTable) -> Self {
        Self {
            config,
            catalog,
            forecast,
            action_policy: None,
        }
    }

    /// Attaches an agent policy. Its proposals are recorded on the state only.
    pub fn with_action_policy(mut self, policy: Box<dyn ActionPolicy>) -> Self {
        self.action_policy = Some(policy);
        self
    }

    /// Builds the starting state: uniform initial stock, forecasts from the
    /// first two days, static columns from the catalog.
    pub fn initialize(&mut self) -> Result<InventoryState> {
        if self.catalog.len() != self.forecast.product_count() {
            return Err(SimulationError::DataShapeMismatch {
                catalog: self.catalog.len(),
                forecast: self.forecast.product_count(),
            });
        }

        let today = self.forecast.row(0)?;
        let tomorrow = self.forecast.row(1)?;

        let products = self
            .catalog
            .products()
            .iter()
            .enumerate()
            .map(|(p, spec)| {
                ProductState::new(self.config.initial_inventory, [today[p], tomorrow[p]], spec)
            })
            .collect();

        let mut state = InventoryState::new(products);
        if let Some(policy) = self.action_policy.as_mut() {
            state.action = Some(policy.propose(&state));
        }
        Ok(state)
    }

    /// Runs the whole horizon: initialize, generate all demand up front, then
    /// step through every timestep in order.
    pub fn simulate<R: Rng>(
        &mut self,
        demand_source: &mut DemandGenerator<R>,
    ) -> Result<SimulationOutcome> {
        let duration = self.config.duration;
        let mut state = self.initialize()?;

        let required = required_forecast_days(duration);
        if self.forecast.day_count() < required {
            return Err(SimulationError::InsufficientForecastHistory {
                required,
                available: self.forecast.day_count(),
            });
        }

        let demand = demand_source.generate(&self.forecast, duration)?;

        info!(
            products = state.len(),
            duration,
            initial_inventory = self.config.initial_inventory,
            "starting simulation"
        );

        let mut history = Vec::with_capacity(duration * state.len());
        for timestep in 0..duration {
            let (next, records) = self.step(state, timestep, demand.row(timestep))?;
            state = next;
            history.extend(records);
        }

        info!(
            remaining = state.quantities().iter().map(|&q| u64::from(q)).sum::<u64>(),
            "simulation complete"
        );

        Ok(SimulationOutcome {
            final_state: state,
            demand,
            history,
        })
    }

    /// Advances `state` by one timestep: serve demand, clamp at zero, bookkeep.
    ///
    /// `demand_row` must hold one entry per product in `state`.
    pub fn step(
        &self,
        mut state: InventoryState,
        timestep: usize,
        demand_row: &[u32],
    ) -> Result<(InventoryState, Vec<HistoryRecord>)> {
        if demand_row.len() != state.len() {
            return Err(SimulationError::DataShapeMismatch {
                catalog: state.len(),
                forecast: demand_row.len(),
            });
        }

        let unmet: Vec<u32> = state
            .products
            .iter_mut()
            .zip(demand_row)
            .map(|(product, &d)| product.fulfil(d))
            .collect();

        let decayed = self.bookkeep(&mut state, timestep)?;

        let forecasts: Vec<(u32, u32)> = state
            .products
            .iter()
            .map(|p| (p.forecast_today, p.forecast_tomorrow))
            .collect();
        debug!(timestep, inventory = ?state.quantities(), forecast = ?forecasts, "step");

        let records = state
            .products
            .iter()
            .enumerate()
            .map(|(p, product)| HistoryRecord {
                timestep,
                product: p,
                demand: demand_row[p],
                unmet: unmet[p],
                inventory: product.quantity,
                forecast_today: product.forecast_today,
                forecast_tomorrow: product.forecast_tomorrow,
                decayed,
            })
            .collect();

        Ok((state, records))
    }

    /// Periodic bookkeeping for `timestep`:
    ///
    /// * forecast columns are rewritten from the rows of [`forecast_day`] and
    ///   the day after, every timestep;
    /// * on month boundaries every product's stock decays by the configured
    ///   factor, rounded up.
    ///
    /// Returns whether decay fired.
    pub fn bookkeep(&self, state: &mut InventoryState, timestep: usize) -> Result<bool> {
        let day = forecast_day(timestep);
        let today = self.forecast.row(day)?;
        let tomorrow = self.forecast.row(day + 1)?;
        for (p, product) in state.products.iter_mut().enumerate() {
            product.set_forecast(today[p], tomorrow[p]);
        }

        let decayed = is_month_boundary(timestep);
        if decayed {
            for product in state.products.iter_mut() {
                product.decay(self.config.decay_factor);
            }
            info!(timestep, factor = self.config.decay_factor, "applied expiry decay");
        }

        self.report_capacity(state, timestep);
        Ok(decayed)
    }

    fn report_capacity(&self, state: &InventoryState, timestep: usize) {
        let volume = state.total_volume();
        let weight = state.total_weight();
        if volume > self.config.volume_capacity || weight > self.config.weight_capacity {
            debug!(
                timestep,
                volume,
                weight,
                volume_capacity = self.config.volume_capacity,
                weight_capacity = self.config.weight_capacity,
                "on-hand stock exceeds transport capacity"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::ProductSpec;
    use crate::simulation::config::{DAY_LENGTH, MONTH_LENGTH};
    use crate::strategy::implementations::{FixedActionPolicy, RandomActionPolicy};
    use proptest::prelude::*;

    fn catalog(n: usize) -> ProductCatalog {
        (0..n).map(|_| ProductSpec::new(1.0, 1.0, 30)).collect()
    }

    // Row d holds value 10 * d + p, so each row is identifiable.
    fn indexed_table(days: usize, products: usize) -> ForecastTable {
        let rows: Vec<Vec<u32>> = (0..days)
            .map(|d| (0..products).map(|p| (10 * d + p) as u32).collect())
            .collect();
        ForecastTable::from_rows(&rows).unwrap()
    }

    fn sim(duration: usize, products: usize) -> WarehouseSimulation {
        WarehouseSimulation::new(
            SimulationConfig::default().with_duration(duration),
            catalog(products),
            indexed_table(required_forecast_days(duration), products),
        )
    }

    #[test]
    fn initialize_seeds_state() {
        let mut s = sim(8, 2);
        let state = s.initialize().unwrap();
        assert_eq!(state.quantities(), vec![10, 10]);
        assert_eq!(state.products[1].forecast_today, 1);
        assert_eq!(state.products[1].forecast_tomorrow, 11);
        assert_eq!(state.products[0].shelf_life, 30);
        assert!(state.action.is_none());
    }

    #[test]
    fn initialize_rejects_shape_mismatch() {
        let mut s = WarehouseSimulation::new(
            SimulationConfig::default(),
            catalog(3),
            indexed_table(4, 2),
        );
        let err = s.initialize().unwrap_err();
        assert!(matches!(
            err,
            SimulationError::DataShapeMismatch {
                catalog: 3,
                forecast: 2
            }
        ));
    }

    #[test]
    fn initialize_needs_two_days() {
        let mut s = WarehouseSimulation::new(
            SimulationConfig::default(),
            catalog(1),
            indexed_table(1, 1),
        );
        assert!(matches!(
            s.initialize().unwrap_err(),
            SimulationError::InsufficientForecastHistory { required: 2, .. }
        ));
    }

    #[test]
    fn attached_policy_records_initial_action() {
        let mut s = sim(8, 5).with_action_policy(Box::new(RandomActionPolicy::new(Some(1))));
        let state = s.initialize().unwrap();
        let action = state.action.unwrap();
        assert_eq!(action.len(), 5);
        assert!(action.iter().all(|&a| a <= 4));
    }

    #[test]
    fn actions_are_not_applied_to_stock() {
        let mut s = sim(4, 1).with_action_policy(Box::new(FixedActionPolicy::new(3)));
        let state = s.initialize().unwrap();
        let (next, _) = s.step(state, 1, &[0]).unwrap();
        assert_eq!(next.quantities(), vec![10]);
        assert_eq!(next.action, Some(vec![3]));
    }

    #[test]
    fn step_clamps_and_records_lost_demand() {
        let mut s = sim(4, 2);
        let state = s.initialize().unwrap();
        let (next, records) = s.step(state, 1, &[4, 25]).unwrap();
        assert_eq!(next.quantities(), vec![6, 0]);
        assert_eq!(records[0].unmet, 0);
        assert_eq!(records[1].unmet, 15);
        assert_eq!(records[1].demand, 25);
    }

    #[test]
    fn decay_only_on_month_boundary() {
        let s = sim(MONTH_LENGTH + 1, 1);
        let spec = ProductSpec::new(1.0, 1.0, 30);
        let mut state = InventoryState::new(vec![ProductState::new(7, [0, 0], &spec)]);

        assert!(!s.bookkeep(&mut state, MONTH_LENGTH - 1).unwrap());
        assert_eq!(state.quantities(), vec![7]);

        assert!(s.bookkeep(&mut state, MONTH_LENGTH).unwrap());
        assert_eq!(state.quantities(), vec![6]);

        assert!(!s.bookkeep(&mut state, 0).unwrap());
        assert_eq!(state.quantities(), vec![6]);
    }

    #[test]
    fn required_days_covers_all_readers() {
        assert_eq!(required_forecast_days(0), 2);
        assert_eq!(required_forecast_days(4), 2);
        assert_eq!(required_forecast_days(5), 2);
        assert_eq!(required_forecast_days(6), 3);
        assert_eq!(required_forecast_days(9), 3);
    }

    #[test]
    fn short_table_aborts_before_running() {
        let mut s = WarehouseSimulation::new(
            SimulationConfig::default().with_duration(20),
            catalog(1),
            indexed_table(3, 1),
        );
        let err = s.simulate(&mut DemandGenerator::seeded(Some(0))).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::InsufficientForecastHistory { available: 3, .. }
        ));
    }

    #[test]
    fn lost_sales_sum_unmet_demand() {
        let mut s = sim(3, 1);
        let mut state = s.initialize().unwrap();
        let demand = DemandMatrix::from_rows(vec![vec![8], vec![8], vec![1]]);
        let mut history = Vec::new();
        for t in 0..3 {
            let (next, records) = s.step(state, t, demand.row(t)).unwrap();
            state = next;
            history.extend(records);
        }
        let outcome = SimulationOutcome {
            final_state: state,
            demand,
            history,
        };
        assert_eq!(outcome.lost_sales(), vec![7]);
        assert_eq!(outcome.trajectory(), vec![vec![2], vec![0], vec![0]]);
    }

    #[test]
    fn step_rejects_demand_row_of_wrong_width() {
        let mut s = sim(4, 2);
        let state = s.initialize().unwrap();
        for row in [&[3u32][..], &[1, 2, 3][..]] {
            let err = s.step(state.clone(), 0, row).unwrap_err();
            assert!(matches!(
                err,
                SimulationError::DataShapeMismatch { catalog: 2, .. }
            ));
        }
    }

    #[test]
    fn lost_sales_do_not_overflow_on_large_forecasts() {
        let mut s = WarehouseSimulation::new(
            SimulationConfig::default().with_duration(4),
            catalog(1),
            ForecastTable::from_rows(&vec![vec![3_000_000_000]; 4]).unwrap(),
        );
        let outcome = s.simulate(&mut DemandGenerator::seeded(Some(0))).unwrap();
        // constant history: demand is exactly the forecast on the three filled steps
        assert_eq!(outcome.lost_sales(), vec![3 * 3_000_000_000u64 - 10]);
    }

    proptest! {
        #[test]
        fn inventory_never_negative_and_forecast_follows_day(
            duration in 1usize..300,
            products in 1usize..4,
            seed in any::<u64>(),
        ) {
            let mut s = sim(duration, products);
            let outcome = s.simulate(&mut DemandGenerator::seeded(Some(seed))).unwrap();

            prop_assert_eq!(outcome.history.len(), duration * products);
            for r in &outcome.history {
                let day = if r.timestep % DAY_LENGTH == 0 && r.timestep != 0 {
                    r.timestep / DAY_LENGTH - 1
                } else {
                    r.timestep / DAY_LENGTH
                };
                prop_assert_eq!(r.forecast_today as usize, 10 * day + r.product);
                prop_assert_eq!(r.forecast_tomorrow as usize, 10 * (day + 1) + r.product);
                prop_assert_eq!(r.decayed, r.timestep % MONTH_LENGTH == 0 && r.timestep != 0);
            }
        }

        #[test]
        fn decay_is_ceil_of_scaled_stock(quantity in 0u32..100_000) {
            let s = sim(MONTH_LENGTH + 1, 1);
            let spec = ProductSpec::new(1.0, 1.0, 30);
            let mut state = InventoryState::new(vec![ProductState::new(quantity, [0, 0], &spec)]);
            s.bookkeep(&mut state, MONTH_LENGTH).unwrap();
            prop_assert_eq!(state.products[0].quantity, (0.8 * quantity as f64).ceil() as u32);
        }
    }
}
