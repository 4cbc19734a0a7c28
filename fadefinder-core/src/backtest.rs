//! Stop-size backtest over a filtered set of gap events.
//!
//! For every stop size, each row becomes one hypothetical trade entered at
//! the open and exited at the close, unless the stop (a fraction of the gap)
//! was hit first. Outcomes are expressed in risk-multiples (R), where the
//! risk unit is `stop_size * gap_size_abs`.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::GapEvent;
use crate::error::CoreError;

/// Stop sizes evaluated when none are configured.
pub const DEFAULT_STOP_SIZES: [f64; 5] = [0.3, 0.5, 0.6, 0.7, 1.0];

/// Stop size used for the summary block, independent of the configured list.
pub const REFERENCE_STOP_SIZE: f64 = 0.5;

/// Trade direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Fade the gap: short at the open.
    #[default]
    Short,
    /// Ride the gap: long at the open.
    Long,
}

impl Direction {
    pub fn toggled(self) -> Self {
        match self {
            Direction::Short => Direction::Long,
            Direction::Long => Direction::Short,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Short => write!(f, "Short"),
            Direction::Long => write!(f, "Long"),
        }
    }
}

/// How a long trade decides whether its stop was hit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LongStopRule {
    /// Win iff `|open_to_low_gap| < stop_size`.
    #[default]
    AbsoluteExcursion,
    /// Win iff `open_to_low_gap < stop_size`. Matches the legacy dashboard,
    /// where `abs()` wrapped the comparison instead of the ratio.
    SignedExcursion,
}

/// What to do with rows whose risk unit is zero (`gap_size_abs == 0`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroRiskPolicy {
    /// Leave the outcome empty and exclude the row from every aggregate.
    #[default]
    Skip,
    /// Divide anyway. Infinities flow into every aggregate; a NaN outcome
    /// (0/0) counts as a trade for the win rate but is left out of the
    /// expected value.
    Propagate,
}

/// Inputs of one backtest computation besides the rows themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestParams {
    pub direction: Direction,
    /// Fee charged on a winning trade, as a fraction of the open price.
    pub fee_win: f64,
    /// Fee charged on a losing trade, as a fraction of the open price.
    pub fee_loss: f64,
    /// Evaluated in the given order.
    pub stop_sizes: Vec<f64>,
    pub long_stop_rule: LongStopRule,
    pub zero_risk: ZeroRiskPolicy,
}

impl Default for BacktestParams {
    fn default() -> Self {
        Self {
            direction: Direction::Short,
            fee_win: 0.01,
            fee_loss: 0.02,
            stop_sizes: DEFAULT_STOP_SIZES.to_vec(),
            long_stop_rule: LongStopRule::AbsoluteExcursion,
            zero_risk: ZeroRiskPolicy::Skip,
        }
    }
}

impl BacktestParams {
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.fee_win.is_finite() {
            return Err(CoreError::InvalidFee {
                name: "fee_win",
                value: self.fee_win,
            });
        }
        if !self.fee_loss.is_finite() {
            return Err(CoreError::InvalidFee {
                name: "fee_loss",
                value: self.fee_loss,
            });
        }
        if let Some(&bad) = self
            .stop_sizes
            .iter()
            .find(|s| !s.is_finite() || **s <= 0.0)
        {
            return Err(CoreError::InvalidStopSize(bad));
        }
        Ok(())
    }
}

/// Gross profit over gross loss, with explicit states for a zero denominator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ProfitFactor {
    Finite(f64),
    /// Winners exist but no trade lost.
    NoLosses,
    /// No trade won or lost.
    Undefined,
}

impl ProfitFactor {
    /// `|wins| / |losses|`, or a sentinel when `losses` is zero.
    pub fn from_sums(wins: f64, losses: f64) -> Self {
        if losses == 0.0 {
            if wins == 0.0 {
                ProfitFactor::Undefined
            } else {
                ProfitFactor::NoLosses
            }
        } else {
            ProfitFactor::Finite(wins.abs() / losses.abs())
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            ProfitFactor::Finite(v) => Some(*v),
            ProfitFactor::NoLosses | ProfitFactor::Undefined => None,
        }
    }
}

impl fmt::Display for ProfitFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfitFactor::Finite(v) => write!(f, "{v:.2}"),
            ProfitFactor::NoLosses | ProfitFactor::Undefined => write!(f, "N/A"),
        }
    }
}

/// Aggregates for one stop size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopMetrics {
    pub stop_size: f64,
    /// Rows that produced an outcome.
    pub trades: usize,
    /// Rows excluded by `ZeroRiskPolicy::Skip`.
    pub skipped: usize,
    pub wins: usize,
    pub win_rate_pct: f64,
    pub expected_value: f64,
    pub profit_factor: ProfitFactor,
    pub total_wins_r: f64,
    pub total_losses_r: f64,
}

/// Profit/loss summary at `REFERENCE_STOP_SIZE`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryBlock {
    pub stop_size: f64,
    pub profit_factor: ProfitFactor,
    pub total_wins_r: f64,
    pub total_losses_r: f64,
}

/// Derived per-row outcome column for one stop size.
///
/// `values[i]` belongs to row `i` of the filtered set; `None` marks a
/// skipped zero-risk row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeColumn {
    pub stop_size: f64,
    pub label: String,
    pub values: Vec<Option<f64>>,
}

/// Everything the backtest produces for one filtered set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub direction: Direction,
    /// Same order as `BacktestParams::stop_sizes`.
    pub per_stop: Vec<StopMetrics>,
    pub summary: SummaryBlock,
    pub outcomes: Vec<OutcomeColumn>,
}

impl BacktestResult {
    pub fn metrics_for(&self, stop_size: f64) -> Option<&StopMetrics> {
        self.per_stop.iter().find(|m| m.stop_size == stop_size)
    }

    pub fn outcome_column(&self, stop_size: f64) -> Option<&OutcomeColumn> {
        self.outcomes.iter().find(|c| c.stop_size == stop_size)
    }
}

/// Column label for a stop size, e.g. `SL0.5Gap` or `SL1Gap`.
pub fn outcome_label(stop_size: f64) -> String {
    format!("SL{stop_size}Gap")
}

/// Outcome of one row at one stop size, in R.
///
/// Returns `None` only for zero-risk rows under `ZeroRiskPolicy::Skip`.
pub fn trade_outcome(event: &GapEvent, stop_size: f64, params: &BacktestParams) -> Option<f64> {
    let risk = stop_size * event.gap_size_abs;
    if risk == 0.0 && params.zero_risk == ZeroRiskPolicy::Skip {
        return None;
    }

    let open = event.open_unadjusted;
    let close = event.close_unadjusted;
    let move_in_favour = match params.direction {
        Direction::Short => open - close,
        Direction::Long => close - open,
    };
    let profit = (move_in_favour - open * params.fee_win) / risk;
    let loss = (-risk - open * params.fee_loss) / risk;

    let stop_survived = match params.direction {
        Direction::Short => event.max_gain_gap < stop_size,
        Direction::Long => match params.long_stop_rule {
            LongStopRule::AbsoluteExcursion => event.open_to_low_gap.abs() < stop_size,
            LongStopRule::SignedExcursion => event.open_to_low_gap < stop_size,
        },
    };

    Some(if stop_survived { profit } else { loss })
}

/// Run the backtest for every configured stop size.
///
/// Fails with `EmptyResultSet` when there are no rows, or when every row is
/// skipped for zero risk.
pub fn compute_backtest(
    filtered: &[GapEvent],
    params: &BacktestParams,
) -> Result<BacktestResult, CoreError> {
    params.validate()?;
    if filtered.is_empty() {
        return Err(CoreError::EmptyResultSet);
    }
    // Zero risk depends only on gap_size_abs since stop sizes are > 0.
    if params.zero_risk == ZeroRiskPolicy::Skip
        && filtered.iter().all(|e| e.gap_size_abs == 0.0)
    {
        return Err(CoreError::EmptyResultSet);
    }

    let evaluated: Vec<(OutcomeColumn, StopMetrics)> = params
        .stop_sizes
        .par_iter()
        .map(|&stop| evaluate_stop(filtered, stop, params))
        .collect();

    let summary_metrics = match evaluated
        .iter()
        .find(|(_, m)| m.stop_size == REFERENCE_STOP_SIZE)
    {
        Some((_, m)) => m.clone(),
        None => evaluate_stop(filtered, REFERENCE_STOP_SIZE, params).1,
    };

    // `stop * gap_size_abs` can underflow to zero for a tiny positive gap,
    // leaving one stop size with nothing to aggregate.
    let no_trades = evaluated.iter().any(|(_, m)| m.trades == 0) || summary_metrics.trades == 0;
    if no_trades {
        return Err(CoreError::EmptyResultSet);
    }

    let (outcomes, per_stop) = evaluated.into_iter().unzip();

    Ok(BacktestResult {
        direction: params.direction,
        per_stop,
        summary: SummaryBlock {
            stop_size: REFERENCE_STOP_SIZE,
            profit_factor: summary_metrics.profit_factor,
            total_wins_r: summary_metrics.total_wins_r,
            total_losses_r: summary_metrics.total_losses_r,
        },
        outcomes,
    })
}

fn evaluate_stop(
    filtered: &[GapEvent],
    stop_size: f64,
    params: &BacktestParams,
) -> (OutcomeColumn, StopMetrics) {
    let values: Vec<Option<f64>> = filtered
        .iter()
        .map(|e| trade_outcome(e, stop_size, params))
        .collect();

    let metrics = aggregate(stop_size, &values);
    let column = OutcomeColumn {
        stop_size,
        label: outcome_label(stop_size),
        values,
    };
    (column, metrics)
}

fn aggregate(stop_size: f64, values: &[Option<f64>]) -> StopMetrics {
    let outcomes: Vec<f64> = values.iter().flatten().copied().collect();
    let trades = outcomes.len();
    let skipped = values.len() - trades;

    let wins = outcomes.iter().filter(|&&r| r > 0.0).count();
    let total_wins_r: f64 = outcomes.iter().filter(|&&r| r > 0.0).sum();
    let total_losses_r: f64 = outcomes.iter().filter(|&&r| r < 0.0).sum();

    // NaN (0/0 under `Propagate`) counts as a non-winning trade but is left
    // out of the mean.
    let defined: Vec<f64> = outcomes.iter().copied().filter(|r| !r.is_nan()).collect();
    let win_rate_pct = if trades == 0 {
        0.0
    } else {
        100.0 * (wins as f64 / trades as f64)
    };
    let expected_value = if defined.is_empty() {
        f64::NAN
    } else {
        defined.iter().sum::<f64>() / defined.len() as f64
    };

    StopMetrics {
        stop_size,
        trades,
        skipped,
        wins,
        win_rate_pct,
        expected_value,
        profit_factor: ProfitFactor::from_sums(total_wins_r, total_losses_r),
        total_wins_r,
        total_losses_r,
    }
}
