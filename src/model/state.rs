// src/model/state.rs

use crate::model::catalog::ProductSpec;
use serde::Serialize;

/// Number of numeric columns exposed per product in [`InventoryState::observation`].
pub const STATE_COLUMNS: usize = 6;

/// The state of a single product at the warehouse/store node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductState {
    // Mutable columns
    pub quantity: u32,
    pub forecast_today: u32,
    pub forecast_tomorrow: u32,

    // Static after initialization
    pub unit_volume: f64,
    pub unit_weight: f64,
    pub shelf_life: u32,
}

impl ProductState {
    pub fn new(quantity: u32, forecast: [u32; 2], spec: &ProductSpec) -> Self {
        Self {
            quantity,
            forecast_today: forecast[0],
            forecast_tomorrow: forecast[1],
            unit_volume: spec.unit_volume,
            unit_weight: spec.unit_weight,
            shelf_life: spec.shelf_life,
        }
    }

    /// Removes `demand` units from stock. Stock never goes below zero; the
    /// shortfall is returned and is lost, not backlogged.
    pub fn fulfil(&mut self, demand: u32) -> u32 {
        let unmet = demand.saturating_sub(self.quantity);
        self.quantity = self.quantity.saturating_sub(demand);
        unmet
    }

    pub fn set_forecast(&mut self, today: u32, tomorrow: u32) {
        self.forecast_today = today;
        self.forecast_tomorrow = tomorrow;
    }

    /// Scales stock by `factor`, rounding up to a whole unit.
    pub fn decay(&mut self, factor: f64) {
        self.quantity = (self.quantity as f64 * factor).ceil() as u32;
    }

    fn as_row(&self) -> [f64; STATE_COLUMNS] {
        [
            self.quantity as f64,
            self.forecast_today as f64,
            self.forecast_tomorrow as f64,
            self.unit_volume,
            self.unit_weight,
            self.shelf_life as f64,
        ]
    }
}

/// Inventory state of every product for one timestep.
///
/// Owned by exactly one simulation run and moved through each step.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryState {
    pub products: Vec<ProductState>,
    /// Last action proposed by an attached policy. Recorded only, never applied.
    pub action: Option<Vec<u32>>,
}

impl InventoryState {
    pub fn new(products: Vec<ProductState>) -> Self {
        Self {
            products,
            action: None,
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn quantities(&self) -> Vec<u32> {
        self.products.iter().map(|p| p.quantity).collect()
    }

    /// Total on-hand volume across all products.
    pub fn total_volume(&self) -> f64 {
        self.products
            .iter()
            .map(|p| p.quantity as f64 * p.unit_volume)
            .sum()
    }

    /// Total on-hand weight across all products.
    pub fn total_weight(&self) -> f64 {
        self.products
            .iter()
            .map(|p| p.quantity as f64 * p.unit_weight)
            .sum()
    }

    /// Numeric `N x 6` view for agents: quantity, two forecasts, volume,
    /// weight, shelf life.
    pub fn observation(&self) -> Vec<[f64; STATE_COLUMNS]> {
        self.products.iter().map(ProductState::as_row).collect()
    }
}
