//! Application state: single owner, main thread only.
//!
//! Every change to the query parameters goes through `recompute`, which
//! runs the full query synchronously and stores the outcome for drawing.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use fadefinder_core::backtest::{LongStopRule, ZeroRiskPolicy};
use fadefinder_core::{run_query, CoreError, Dataset, LargestFadeScope, QueryOutcome, QueryParams};

use crate::sliders::{End, Slider};

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Panel {
    Filters,
    Results,
    Chart,
    Backtest,
    Help,
}

impl Panel {
    const COUNT: usize = 5;

    pub fn index(self) -> usize {
        match self {
            Panel::Filters => 0,
            Panel::Results => 1,
            Panel::Chart => 2,
            Panel::Backtest => 3,
            Panel::Help => 4,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Filters),
            1 => Some(Panel::Results),
            2 => Some(Panel::Chart),
            3 => Some(Panel::Backtest),
            4 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Filters => "Filters",
            Panel::Results => "Results",
            Panel::Chart => "Chart",
            Panel::Backtest => "Backtest",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % Self::COUNT).unwrap_or(Panel::Filters)
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + Self::COUNT - 1) % Self::COUNT)
            .unwrap_or(Panel::Filters)
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Filters panel state.
#[derive(Debug, Clone)]
pub struct FiltersPanelState {
    /// Index into `Slider::ALL`.
    pub selected: usize,
}

impl FiltersPanelState {
    pub fn slider(&self) -> Slider {
        Slider::ALL[self.selected % Slider::ALL.len()]
    }
}

/// Results panel state.
#[derive(Debug, Clone, Default)]
pub struct ResultsPanelState {
    /// First visible row.
    pub scroll: usize,
    /// Index into the outcome columns shown next to the rows.
    pub outcome_column: usize,
}

/// Top-level application state.
pub struct AppState {
    pub active_panel: Panel,
    pub running: bool,

    pub dataset: Dataset,
    /// Human-readable origin of the dataset (file path or "synthetic").
    pub source_label: String,
    pub params: QueryParams,
    /// Result of the last recompute.
    pub outcome: Result<QueryOutcome, CoreError>,
    pub last_compute: Duration,

    pub filters: FiltersPanelState,
    pub results: ResultsPanelState,

    pub status_message: Option<(String, StatusLevel)>,
    pub state_path: PathBuf,
}

impl AppState {
    pub fn new(
        dataset: Dataset,
        source_label: String,
        params: QueryParams,
        state_path: PathBuf,
    ) -> Self {
        let mut app = Self {
            active_panel: Panel::Filters,
            running: true,
            dataset,
            source_label,
            params,
            outcome: Err(CoreError::EmptyResultSet),
            last_compute: Duration::ZERO,
            filters: FiltersPanelState { selected: 0 },
            results: ResultsPanelState::default(),
            status_message: None,
            state_path,
        };
        app.recompute();
        app
    }

    /// Re-run filter, backtest and stats for the current parameters.
    pub fn recompute(&mut self) {
        let started = Instant::now();
        self.outcome = run_query(&self.dataset, &self.params);
        self.last_compute = started.elapsed();
        self.results.scroll = 0;

        match &self.outcome {
            Ok(outcome) => {
                let matched = outcome.rows.len();
                tracing::debug!(matched, elapsed_us = self.last_compute.as_micros() as u64, "recomputed");
                self.set_status(format!("{matched} matching rows"));
            }
            Err(CoreError::EmptyResultSet) => {
                self.set_warning("No rows match the current filter");
            }
            Err(e) => {
                tracing::warn!(error = %e, "query failed");
                self.status_message = Some((e.to_string(), StatusLevel::Error));
            }
        }
    }

    /// Earliest and latest dataset dates, for the date slider.
    pub fn date_limits(&self) -> (NaiveDate, NaiveDate) {
        self.dataset
            .date_span()
            .unwrap_or((self.params.criteria.dates.start, self.params.criteria.dates.end))
    }

    /// Move one end of the selected slider and recompute if anything changed.
    pub fn adjust_selected(&mut self, end: End, steps: i32) {
        let slider = self.filters.slider();
        let limits = self.date_limits();
        if slider.adjust(&mut self.params.criteria, end, steps, limits) {
            self.recompute();
        }
    }

    pub fn select_next_slider(&mut self) {
        self.filters.selected = (self.filters.selected + 1) % Slider::ALL.len();
    }

    pub fn select_prev_slider(&mut self) {
        let n = Slider::ALL.len();
        self.filters.selected = (self.filters.selected + n - 1) % n;
    }

    pub fn toggle_direction(&mut self) {
        self.params.backtest.direction = self.params.backtest.direction.toggled();
        self.recompute();
    }

    pub fn toggle_long_stop_rule(&mut self) {
        let b = &mut self.params.backtest;
        b.long_stop_rule = match b.long_stop_rule {
            LongStopRule::AbsoluteExcursion => LongStopRule::SignedExcursion,
            LongStopRule::SignedExcursion => LongStopRule::AbsoluteExcursion,
        };
        self.recompute();
    }

    pub fn toggle_zero_risk(&mut self) {
        let b = &mut self.params.backtest;
        b.zero_risk = match b.zero_risk {
            ZeroRiskPolicy::Skip => ZeroRiskPolicy::Propagate,
            ZeroRiskPolicy::Propagate => ZeroRiskPolicy::Skip,
        };
        self.recompute();
    }

    pub fn toggle_fade_scope(&mut self) {
        self.params.fade_scope = match self.params.fade_scope {
            LargestFadeScope::Filtered => LargestFadeScope::Dataset,
            LargestFadeScope::Dataset => LargestFadeScope::Filtered,
        };
        self.recompute();
    }

    /// Back to the dashboard defaults.
    pub fn reset_params(&mut self) {
        self.params = QueryParams::default();
        self.recompute();
    }

    /// Number of filtered rows, zero when the last query failed.
    pub fn row_count(&self) -> usize {
        self.outcome.as_ref().map(|o| o.rows.len()).unwrap_or(0)
    }

    pub fn cycle_outcome_column(&mut self) {
        let n = self.params.backtest.stop_sizes.len().max(1);
        self.results.outcome_column = (self.results.outcome_column + 1) % n;
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::app;
    use super::*;
    use fadefinder_core::backtest::Direction;

    #[test]
    fn panel_cycle() {
        assert_eq!(Panel::Filters.next(), Panel::Results);
        assert_eq!(Panel::Help.next(), Panel::Filters);
        assert_eq!(Panel::Filters.prev(), Panel::Help);
        assert_eq!(Panel::Results.prev(), Panel::Filters);
    }

    #[test]
    fn panel_from_index() {
        for i in 0..5 {
            let p = Panel::from_index(i).unwrap();
            assert_eq!(p.index(), i);
        }
        assert!(Panel::from_index(5).is_none());
    }

    #[test]
    fn new_app_has_computed_outcome() {
        let app = app();
        assert!(app.outcome.is_ok());
        assert!(app.row_count() > 0);
    }

    #[test]
    fn widening_a_range_keeps_or_grows_rows() {
        let mut app = app();
        let before = app.row_count();
        app.filters.selected = 3; // market cap
        app.adjust_selected(End::Upper, 20);
        assert!(app.row_count() >= before);
        assert_eq!(app.params.criteria.market_cap.max, 200.0);
    }

    #[test]
    fn collapsed_range_reports_empty() {
        let mut app = app();
        app.filters.selected = 1; // pre-volume, exclusive
        app.adjust_selected(End::Lower, 100);
        assert_eq!(app.outcome, Err(CoreError::EmptyResultSet));
        assert_eq!(app.row_count(), 0);
        assert!(matches!(app.status_message, Some((_, StatusLevel::Warning))));
    }

    #[test]
    fn direction_toggle_recomputes() {
        let mut app = app();
        app.toggle_direction();
        assert_eq!(app.params.backtest.direction, Direction::Long);
        let outcome = app.outcome.as_ref().unwrap();
        assert_eq!(outcome.backtest.direction, Direction::Long);
    }

    #[test]
    fn slider_selection_wraps() {
        let mut app = app();
        app.select_prev_slider();
        assert_eq!(app.filters.slider(), Slider::Dates);
        app.select_next_slider();
        assert_eq!(app.filters.slider(), Slider::GapSize);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut app = app();
        app.toggle_fade_scope();
        app.toggle_zero_risk();
        app.reset_params();
        assert_eq!(app.params, QueryParams::default());
    }
}
