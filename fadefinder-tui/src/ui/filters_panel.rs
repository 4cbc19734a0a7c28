//! Panel 1: range sliders and the current query options.

use ratatui::layout::{Constraint, Direction as LayoutDirection, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use fadefinder_core::backtest::{LongStopRule, ZeroRiskPolicy};
use fadefinder_core::display::fmt2;
use fadefinder_core::LargestFadeScope;

use crate::app::AppState;
use crate::sliders::{render_range, Slider};
use crate::theme;

const BAR_WIDTH: usize = 40;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(8), Constraint::Length(8)])
        .split(area);

    render_source(f, chunks[0], app);
    render_sliders(f, chunks[1], app);
    render_options(f, chunks[2], app);
}

fn render_source(f: &mut Frame, area: Rect, app: &AppState) {
    let span = match app.dataset.date_span() {
        Some((first, last)) => format!("{first} to {last}"),
        None => "empty".to_string(),
    };
    let lines = vec![
        Line::from(vec![
            Span::styled("Source: ", theme::muted()),
            Span::styled(app.source_label.clone(), theme::text()),
        ]),
        Line::from(vec![
            Span::styled(format!("{} rows", app.dataset.len()), theme::accent()),
            Span::styled(
                format!("  {} stocks  {span}", app.dataset.stock_count()),
                theme::muted(),
            ),
            Span::styled("  |  ", theme::muted()),
            Span::styled(format!("{} match", app.row_count()), theme::heading()),
            Span::styled(
                format!("  ({} us)", app.last_compute.as_micros()),
                theme::muted(),
            ),
        ]),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_sliders(f: &mut Frame, area: Rect, app: &AppState) {
    let criteria = &app.params.criteria;
    let selected = app.filters.slider();
    let mut lines: Vec<Line> = vec![Line::from(Span::styled(
        "  [j/k]select  [h/l]lower  [H/L]upper",
        theme::muted(),
    ))];

    for slider in Slider::ALL {
        let is_selected = slider == selected;
        let marker = if is_selected { "> " } else { "  " };
        let label_style = if is_selected { theme::selected() } else { theme::text() };

        let (bar, values) = match (slider.scale(), slider.bounds(criteria)) {
            (Some(scale), Some(b)) => {
                let brackets = if slider.exclusive() { ("(", ")") } else { ("[", "]") };
                (
                    render_range(b.min, b.max, scale.min, scale.max, BAR_WIDTH),
                    format!("{}{}, {}{}", brackets.0, fmt2(b.min), fmt2(b.max), brackets.1),
                )
            }
            _ => {
                let (first, last) = app.date_limits();
                let day = |d: chrono::NaiveDate| (d - first).num_days() as f64;
                let d = criteria.dates;
                (
                    render_range(day(d.start), day(d.end), 0.0, day(last), BAR_WIDTH),
                    format!("[{}, {}]", d.start, d.end),
                )
            }
        };

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(marker, theme::accent()),
            Span::styled(format!("{:<24}", slider.label()), label_style),
        ]));
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(bar, if is_selected { theme::accent() } else { theme::muted() }),
            Span::raw("  "),
            Span::styled(values, theme::text()),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn render_options(f: &mut Frame, area: Rect, app: &AppState) {
    let b = &app.params.backtest;
    let long_rule = match b.long_stop_rule {
        LongStopRule::AbsoluteExcursion => "absolute excursion",
        LongStopRule::SignedExcursion => "signed excursion",
    };
    let zero_risk = match b.zero_risk {
        ZeroRiskPolicy::Skip => "skip",
        ZeroRiskPolicy::Propagate => "propagate",
    };
    let fade_scope = match app.params.fade_scope {
        LargestFadeScope::Filtered => "filtered rows",
        LargestFadeScope::Dataset => "whole dataset",
    };
    let stops = b
        .stop_sizes
        .iter()
        .map(|s| fmt2(*s))
        .collect::<Vec<_>>()
        .join(", ");

    let lines = vec![
        Line::from(Span::styled("Backtest", theme::heading())),
        option("[d] Direction", b.direction.to_string()),
        option("[r] Long stop rule", long_rule.to_string()),
        option("[z] Zero-risk rows", zero_risk.to_string()),
        option("[f] Largest fade over", fade_scope.to_string()),
        option("    Fees win / loss", format!("{} / {}", fmt2(b.fee_win), fmt2(b.fee_loss))),
        option("    Stop sizes", stops),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn option(name: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {name:<24}"), theme::muted()),
        Span::styled(value, theme::text()),
    ])
}
