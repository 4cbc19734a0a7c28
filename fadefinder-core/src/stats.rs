//! Descriptive statistics over the filtered set (not part of the backtest).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::GapEvent;
use crate::error::CoreError;
use crate::filter::DateRange;

/// Which rows the largest-fade lookup searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LargestFadeScope {
    /// Same rows as every other statistic.
    #[default]
    Filtered,
    /// The whole dataset, ignoring the filter (legacy dashboard behaviour).
    Dataset,
}

/// The row identified as the largest fade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FadeRow {
    pub stock: String,
    pub date: NaiveDate,
    pub day1_gap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicStats {
    pub setups: usize,
    pub red_closes: usize,
    pub green_closes: usize,
    pub red_close_pct: f64,
    pub green_close_pct: f64,
    /// Share of setups that broke the pre-market high, in percent.
    pub pre_high_break_pct: f64,
    /// Minimum `day1_gap` over the filtered set.
    pub largest_fade: f64,
    pub largest_fade_row: Option<FadeRow>,
    /// Weekdays in the queried date range.
    pub trading_days: usize,
}

/// Compute the basic statistics table.
///
/// `dataset` is only consulted for `LargestFadeScope::Dataset`.
pub fn compute_basic_stats(
    filtered: &[GapEvent],
    dataset: &[GapEvent],
    scope: LargestFadeScope,
    dates: &DateRange,
) -> Result<BasicStats, CoreError> {
    if filtered.is_empty() {
        return Err(CoreError::EmptyResultSet);
    }

    let setups = filtered.len();
    let red_closes = filtered.iter().filter(|e| e.closed_red()).count();
    let green_closes = filtered.iter().filter(|e| e.closed_green()).count();
    let broke_high = filtered
        .iter()
        .filter(|e| e.broke_pre_market_high())
        .count();

    let largest_fade = filtered
        .iter()
        .map(|e| e.day1_gap)
        .fold(f64::INFINITY, f64::min);

    let lookup = match scope {
        LargestFadeScope::Filtered => filtered,
        LargestFadeScope::Dataset => dataset,
    };

    Ok(BasicStats {
        setups,
        red_closes,
        green_closes,
        red_close_pct: pct(red_closes, setups),
        green_close_pct: pct(green_closes, setups),
        pre_high_break_pct: pct(broke_high, setups),
        largest_fade,
        largest_fade_row: min_day1_row(lookup),
        trading_days: dates.weekday_count(),
    })
}

fn pct(count: usize, total: usize) -> f64 {
    count as f64 / total as f64 * 100.0
}

/// First row holding the minimum `day1_gap`.
fn min_day1_row(rows: &[GapEvent]) -> Option<FadeRow> {
    let mut best: Option<&GapEvent> = None;
    for row in rows {
        match best {
            Some(b) if row.day1_gap >= b.day1_gap => {}
            _ => best = Some(row),
        }
    }
    best.map(|e| FadeRow {
        stock: e.stock.clone(),
        date: e.date,
        day1_gap: e.day1_gap,
    })
}
