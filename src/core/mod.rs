//! Core types and constants for the angle/distance acquisition pipeline

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
