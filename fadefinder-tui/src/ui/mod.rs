//! Top-level UI layout: one full-screen panel plus a status bar.

pub mod backtest_panel;
pub mod chart_panel;
pub mod filters_panel;
pub mod help_panel;
pub mod results_panel;
pub mod status_bar;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use fadefinder_core::CoreError;

use crate::app::{AppState, Panel};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let main_area = chunks[0];
    draw_panel(f, main_area, app);
    status_bar::render(f, chunks[1], app);

    // Result panels have nothing to show without a successful query.
    let needs_outcome = matches!(
        app.active_panel,
        Panel::Results | Panel::Chart | Panel::Backtest
    );
    if needs_outcome {
        if let Err(e) = &app.outcome {
            render_query_error(f, main_area, e);
        }
    }
}

fn draw_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let panel = app.active_panel;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {} [{}] ", panel.label(), panel.index() + 1))
        .title_style(theme::panel_title(true));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match panel {
        Panel::Filters => filters_panel::render(f, inner, app),
        Panel::Results => results_panel::render(f, inner, app),
        Panel::Chart => chart_panel::render(f, inner, app),
        Panel::Backtest => backtest_panel::render(f, inner, app),
        Panel::Help => help_panel::render(f, inner, app),
    }
}

fn render_query_error(f: &mut Frame, area: Rect, err: &CoreError) {
    let popup = centered_rect(60, 30, area);
    let (title, hint) = match err {
        CoreError::EmptyResultSet => (
            " No matching rows ",
            "Widen a range in the Filters panel (press 1).",
        ),
        _ => (" Query failed ", "Press R to reset the query to its defaults."),
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(err.to_string(), theme::warning())),
        Line::from(""),
        Line::from(Span::styled(hint, theme::muted())),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::warning())
        .title(title)
        .title_style(theme::warning());
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        popup,
    );
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
