//! One complete recomputation: filter, then backtest and basic stats.
//!
//! Front ends call `run_query` on every input change. It is a pure function
//! of the dataset and the parameters.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::backtest::{compute_backtest, BacktestParams, BacktestResult};
use crate::dataset::Dataset;
use crate::domain::GapEvent;
use crate::error::CoreError;
use crate::filter::{filter, FilterCriteria};
use crate::stats::{compute_basic_stats, BasicStats, LargestFadeScope};

/// Everything a query needs besides the dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    pub criteria: FilterCriteria,
    pub backtest: BacktestParams,
    pub fade_scope: LargestFadeScope,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOutcome {
    /// Matching rows in dataset order.
    pub rows: Vec<GapEvent>,
    pub backtest: BacktestResult,
    pub stats: BasicStats,
}

/// Run filter → backtest → stats.
///
/// Returns `EmptyResultSet` when no row matches, so callers can show an
/// explicit "no matching rows" state.
pub fn run_query(dataset: &Dataset, params: &QueryParams) -> Result<QueryOutcome, CoreError> {
    params.backtest.validate()?;

    let started = Instant::now();
    let rows = filter(dataset.events(), &params.criteria);
    tracing::debug!(
        matched = rows.len(),
        total = dataset.len(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "filter applied"
    );

    if rows.is_empty() {
        return Err(CoreError::EmptyResultSet);
    }

    let started = Instant::now();
    let backtest = compute_backtest(&rows, &params.backtest)?;
    let stats = compute_basic_stats(
        &rows,
        dataset.events(),
        params.fade_scope,
        &params.criteria.dates,
    )?;
    tracing::debug!(
        stops = backtest.per_stop.len(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "backtest computed"
    );

    Ok(QueryOutcome {
        rows,
        backtest,
        stats,
    })
}
