//! Shared components - errors and formatting helpers

pub mod errors;
pub mod utils;
