// src/strategy/implementations.rs

use crate::model::state::InventoryState;
use crate::simulation::config::ACTION_UPPER_BOUND;
use crate::strategy::traits::ActionPolicy;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

// =========================================================================
// 1. Random Policy
// =========================================================================

/// Draws each product's action uniformly from `0..=ACTION_UPPER_BOUND`.
/// Stand-in for an agent; it ignores the state apart from its size.
#[derive(Debug, Clone)]
pub struct RandomActionPolicy {
    rng: Pcg64,
}

impl RandomActionPolicy {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => Pcg64::seed_from_u64(s),
            None => Pcg64::from_entropy(),
        };
        Self { rng }
    }
}

impl ActionPolicy for RandomActionPolicy {
    fn propose(&mut self, state: &InventoryState) -> Vec<u32> {
        (0..state.len())
            .map(|_| self.rng.gen_range(0..=ACTION_UPPER_BOUND))
            .collect()
    }
}

// =========================================================================
// 2. Fixed Policy
// =========================================================================

/// Proposes the same quantity for every product. Useful in tests and as a
/// baseline when wiring up an agent.
#[derive(Debug, Clone)]
pub struct FixedActionPolicy {
    quantity: u32,
}

impl FixedActionPolicy {
    pub fn new(quantity: u32) -> Self {
        Self { quantity }
    }
}

impl ActionPolicy for FixedActionPolicy {
    fn propose(&mut self, state: &InventoryState) -> Vec<u32> {
        vec![self.quantity; state.len()]
    }
}
