//! Domain layer - pool records, liquidity index and yield scoring

pub mod pool;
