//! App state persistence: JSON save/load across restarts.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use fadefinder_core::{BacktestParams, FilterCriteria, LargestFadeScope};

use crate::app::{AppState, Panel};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub active_panel: Panel,
    pub criteria: FilterCriteria,
    pub backtest: BacktestParams,
    pub fade_scope: LargestFadeScope,
    pub selected_slider: usize,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            active_panel: Panel::Filters,
            criteria: FilterCriteria::default(),
            backtest: BacktestParams::default(),
            fade_scope: LargestFadeScope::default(),
            selected_slider: 0,
        }
    }
}

/// `<config dir>/fadefinder/state.json`, or the working directory when the
/// platform has no config dir.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fadefinder")
        .join("state.json")
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        active_panel: app.active_panel,
        criteria: app.params.criteria.clone(),
        backtest: app.params.backtest.clone(),
        fade_scope: app.params.fade_scope,
        selected_slider: app.filters.selected,
    }
}

/// Apply persisted state and recompute. A backtest that no longer validates
/// (hand-edited file) falls back to the defaults.
pub fn apply(app: &mut AppState, state: PersistedState) {
    app.active_panel = state.active_panel;
    app.filters.selected = state.selected_slider % crate::sliders::Slider::ALL.len();
    app.params.criteria = state.criteria;
    app.params.fade_scope = state.fade_scope;
    app.params.backtest = match state.backtest.validate() {
        Ok(()) => state.backtest,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring persisted backtest settings");
            BacktestParams::default()
        }
    };
    app.recompute();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::app;
    use fadefinder_core::backtest::Direction;

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let mut state = PersistedState::default();
        state.active_panel = Panel::Backtest;
        state.criteria.gap_size.min = 35.0;
        state.backtest.direction = Direction::Long;
        state.fade_scope = LargestFadeScope::Dataset;

        save(&path, &state).unwrap();
        let loaded = load(&path);

        assert_eq!(loaded.active_panel, Panel::Backtest);
        assert_eq!(loaded.criteria.gap_size.min, 35.0);
        assert_eq!(loaded.backtest.direction, Direction::Long);
        assert_eq!(loaded.fade_scope, LargestFadeScope::Dataset);
    }

    #[test]
    fn missing_file_returns_defaults() {
        let loaded = load(Path::new("/nonexistent/path/state.json"));
        assert_eq!(loaded.active_panel, Panel::Filters);
        assert_eq!(loaded.criteria, FilterCriteria::default());
    }

    #[test]
    fn corrupt_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not valid json {{{").unwrap();

        let loaded = load(&path);
        assert_eq!(loaded.criteria, FilterCriteria::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{ "active_panel": "Chart" }"#).unwrap();

        let loaded = load(&path);
        assert_eq!(loaded.active_panel, Panel::Chart);
        assert_eq!(loaded.backtest, BacktestParams::default());
    }

    #[test]
    fn extract_then_apply() {
        let mut source = app();
        source.toggle_direction();
        source.select_next_slider();
        source.active_panel = Panel::Results;
        let state = extract(&source);

        let mut target = app();
        apply(&mut target, state);
        assert_eq!(target.params, source.params);
        assert_eq!(target.active_panel, Panel::Results);
        assert_eq!(target.filters.selected, 1);
        assert_eq!(target.row_count(), source.row_count());
    }

    #[test]
    fn invalid_backtest_falls_back() {
        let mut state = PersistedState::default();
        state.backtest.stop_sizes = vec![0.0];
        let mut target = app();
        apply(&mut target, state);
        assert_eq!(target.params.backtest, BacktestParams::default());
    }
}
