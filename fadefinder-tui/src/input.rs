//! Keyboard input dispatch: global keys first, then the active panel.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Panel};
use crate::sliders::End;

/// Rows moved by PageUp/PageDown in the results table.
const PAGE: usize = 20;

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Windows sends both Press and Release.
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Global keys.
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.running = false;
            return;
        }
        KeyCode::Char('1') => { app.active_panel = Panel::Filters; return; }
        KeyCode::Char('2') => { app.active_panel = Panel::Results; return; }
        KeyCode::Char('3') => { app.active_panel = Panel::Chart; return; }
        KeyCode::Char('4') => { app.active_panel = Panel::Backtest; return; }
        KeyCode::Char('5') | KeyCode::Char('?') => { app.active_panel = Panel::Help; return; }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel = app.active_panel.prev();
            } else {
                app.active_panel = app.active_panel.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        // Query options, available from every panel.
        KeyCode::Char('d') => { app.toggle_direction(); return; }
        KeyCode::Char('r') => { app.toggle_long_stop_rule(); return; }
        KeyCode::Char('z') => { app.toggle_zero_risk(); return; }
        KeyCode::Char('f') => { app.toggle_fade_scope(); return; }
        KeyCode::Char('R') => { app.reset_params(); return; }
        _ => {}
    }

    // 2. Panel-specific keys.
    match app.active_panel {
        Panel::Filters => handle_filters_key(app, key),
        Panel::Results => handle_results_key(app, key),
        Panel::Backtest => handle_backtest_key(app, key),
        Panel::Chart | Panel::Help => {} // display only
    }
}

fn handle_filters_key(app: &mut AppState, key: KeyEvent) {
    // Shift moves five steps at a time on the arrow keys.
    let steps = if key.modifiers.contains(KeyModifiers::SHIFT) { 5 } else { 1 };
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.select_next_slider(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev_slider(),
        KeyCode::Char('h') => app.adjust_selected(End::Lower, -1),
        KeyCode::Char('l') => app.adjust_selected(End::Lower, 1),
        KeyCode::Char('H') => app.adjust_selected(End::Upper, -1),
        KeyCode::Char('L') => app.adjust_selected(End::Upper, 1),
        KeyCode::Left => app.adjust_selected(End::Lower, -steps),
        KeyCode::Right => app.adjust_selected(End::Upper, steps),
        _ => {}
    }
}

fn handle_results_key(app: &mut AppState, key: KeyEvent) {
    let last = app.row_count().saturating_sub(1);
    let r = &mut app.results;
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => r.scroll = (r.scroll + 1).min(last),
        KeyCode::Char('k') | KeyCode::Up => r.scroll = r.scroll.saturating_sub(1),
        KeyCode::PageDown => r.scroll = (r.scroll + PAGE).min(last),
        KeyCode::PageUp => r.scroll = r.scroll.saturating_sub(PAGE),
        KeyCode::Char('g') | KeyCode::Home => r.scroll = 0,
        KeyCode::Char('G') | KeyCode::End => r.scroll = last,
        KeyCode::Char('s') => app.cycle_outcome_column(),
        _ => {}
    }
}

fn handle_backtest_key(app: &mut AppState, key: KeyEvent) {
    if key.code == KeyCode::Char('s') {
        app.cycle_outcome_column();
    }
}
