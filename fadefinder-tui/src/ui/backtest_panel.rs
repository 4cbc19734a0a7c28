//! Panel 4: per-stop backtest table, summary block and basic statistics.

use ratatui::layout::{Constraint, Direction as LayoutDirection, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use fadefinder_core::display::fmt2;
use fadefinder_core::{BacktestResult, BasicStats};

use crate::app::AppState;
use crate::sliders::render_inline;
use crate::theme;

const WIN_BAR: usize = 20;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Ok(outcome) = &app.outcome else {
        return;
    };
    let chunks = Layout::default()
        .direction(LayoutDirection::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_backtest(f, chunks[0], &outcome.backtest, app.results.outcome_column);
    render_stats(f, chunks[1], &outcome.stats);
}

fn render_backtest(f: &mut Frame, area: Rect, bt: &BacktestResult, highlight: usize) {
    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(vec![
        Span::styled(format!("Backtest ({})", bt.direction), theme::heading()),
        Span::styled("  [d]irection [s]elect stop", theme::muted()),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(
            "  {:>6} {:>7} {:>8} {:>8}  {:<w$} {:>8}",
            "Stop",
            "Trades",
            "Win %",
            "EV (R)",
            "",
            "PF",
            w = WIN_BAR + 2
        ),
        theme::heading(),
    )));

    let highlight = highlight % bt.per_stop.len().max(1);
    for (i, m) in bt.per_stop.iter().enumerate() {
        let marker = if i == highlight { "> " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(marker, theme::accent()),
            Span::styled(
                format!("{:>6} {:>7} ", m.stop_size, m.trades),
                theme::text(),
            ),
            Span::styled(format!("{:>8} ", fmt2(m.win_rate_pct)), theme::win_rate(m.win_rate_pct)),
            Span::styled(format!("{:>8}  ", fmt2(m.expected_value)), theme::pnl(m.expected_value)),
            Span::styled(
                render_inline(m.win_rate_pct, 0.0, 100.0, WIN_BAR),
                theme::win_rate(m.win_rate_pct),
            ),
            Span::styled(
                format!(" {:>8}", m.profit_factor.to_string()),
                theme::profit_factor(m.profit_factor.value()),
            ),
        ]));
    }

    if let Some(skipped) = bt.per_stop.first().map(|m| m.skipped).filter(|&n| n > 0) {
        lines.push(Line::from(Span::styled(
            format!("  {skipped} zero-risk row(s) excluded"),
            theme::warning(),
        )));
    }

    let s = &bt.summary;
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Summary at {} x gap", s.stop_size),
        theme::heading(),
    )));
    lines.push(stat_line(
        "Profit factor",
        s.profit_factor.to_string(),
        theme::profit_factor(s.profit_factor.value()),
    ));
    lines.push(stat_line("Total wins (R)", fmt2(s.total_wins_r), theme::positive()));
    lines.push(stat_line("Total losses (R)", fmt2(s.total_losses_r), theme::negative()));

    f.render_widget(Paragraph::new(lines), area);
}

fn render_stats(f: &mut Frame, area: Rect, st: &BasicStats) {
    let mut lines = vec![
        Line::from(Span::styled("Basic statistics", theme::heading())),
        Line::from(""),
        stat_line("Setups", st.setups.to_string(), theme::text()),
        stat_line("Red closes %", fmt2(st.red_close_pct), theme::negative()),
        stat_line("Green closes %", fmt2(st.green_close_pct), theme::positive()),
        stat_line("Pre-market high broken %", fmt2(st.pre_high_break_pct), theme::text()),
        stat_line("Largest fade", fmt2(st.largest_fade), theme::pnl(st.largest_fade)),
    ];
    if let Some(row) = &st.largest_fade_row {
        lines.push(stat_line(
            "  found at",
            format!("{} {}", row.stock, row.date),
            theme::muted(),
        ));
    }
    lines.push(stat_line("Trading days", st.trading_days.to_string(), theme::text()));

    f.render_widget(Paragraph::new(lines), area);
}

fn stat_line(label: &str, value: String, style: ratatui::style::Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {label:<26}"), theme::muted()),
        Span::styled(value, style),
    ])
}
