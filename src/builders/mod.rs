//! Builders to construct a seating manager from configuration.

pub mod manager_builder;

pub use manager_builder::{build_manager, SeatingManagerBuilder};
