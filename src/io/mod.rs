pub mod demand;
pub mod kde;
pub mod loader;
pub mod reporting;
