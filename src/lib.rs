//! Stablepools - Curve stable pool yield scanner
//! Joins gauge and liquidity snapshots, scores pools by combined APY

pub mod app;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod report;
pub mod shared;

// Re-export main types for convenience
pub use app::AppCfg;
pub use domain::pool::{LiquidityIndex, PoolAnalyzer, PoolFilterCriteria, ScoredPool};
pub use infrastructure::{ResultWriter, SnapshotLoader};
pub use report::PoolReport;
