// src/strategy/traits.rs

use crate::model::state::InventoryState;
use std::fmt::Debug;

/// Agent-facing decision hook.
///
/// A policy sees the inventory state and proposes one non-negative quantity
/// per product. The demand-driven simulation records the proposal on the state
/// but does not apply it to stock.
pub trait ActionPolicy: Debug + Send {
    /// Returns a vector with exactly one entry per product in `state`.
    fn propose(&mut self, state: &InventoryState) -> Vec<u32>;
}
