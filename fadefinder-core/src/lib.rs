//! FadeFinder Core: gap-event filtering, stop-size backtest and descriptive
//! statistics.
//!
//! This crate contains everything the front ends share:
//! - Domain types (`GapEvent`) validated once at load
//! - Range filter with per-field inclusive/exclusive bounds
//! - Stop-size backtest in risk multiples, with profit-factor sentinels
//! - Basic statistics (red/green closes, pre-market-high breaks, largest fade)
//! - CSV and Parquet loading, TOML configuration, outcome export
//! - Deterministic synthetic data for demos and benchmarks

pub mod backtest;
pub mod config;
pub mod data;
pub mod dataset;
pub mod display;
pub mod domain;
pub mod error;
pub mod export;
pub mod filter;
pub mod query;
pub mod stats;
pub mod synthetic;

pub use backtest::{compute_backtest, BacktestParams, BacktestResult, Direction, ProfitFactor};
pub use config::{ConfigError, FadeFinderConfig};
pub use data::{load_dataset, LoadError, LoadOptions};
pub use dataset::Dataset;
pub use domain::GapEvent;
pub use error::CoreError;
pub use filter::{filter, Bounds, DateRange, FilterCriteria};
pub use query::{run_query, QueryOutcome, QueryParams};
pub use stats::{compute_basic_stats, BasicStats, LargestFadeScope};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything a front end may hand to a worker
    /// thread is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<GapEvent>();
        require_sync::<GapEvent>();
        require_send::<Dataset>();
        require_sync::<Dataset>();
        require_send::<QueryParams>();
        require_sync::<QueryParams>();
        require_send::<QueryOutcome>();
        require_sync::<QueryOutcome>();
        require_send::<CoreError>();
        require_sync::<CoreError>();
        require_send::<LoadError>();
        require_sync::<LoadError>();
    }
}
