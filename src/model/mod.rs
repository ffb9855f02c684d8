pub mod catalog;
pub mod forecast;
pub mod state;
