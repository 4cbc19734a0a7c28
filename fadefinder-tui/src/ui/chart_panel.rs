//! Panel 3: Day1/Gap by date, red closes and green closes as separate series.

use chrono::NaiveDate;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Chart, Dataset, GraphType};
use ratatui::Frame;

use fadefinder_core::GapEvent;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Ok(outcome) = &app.outcome else {
        return;
    };
    let rows = &outcome.rows;
    let Some((origin, last)) = date_span(rows) else {
        return;
    };

    let (red, green) = split_points(rows, origin);

    let x_max = days(last, origin).max(1.0);
    let (y_min, y_max) = y_bounds(rows);

    let datasets = vec![
        Dataset::default()
            .name(format!("Red close ({})", red.len()))
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(theme::NEGATIVE))
            .data(&red),
        Dataset::default()
            .name(format!("Green close ({})", green.len()))
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(theme::POSITIVE))
            .data(&green),
    ];

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title(Span::styled("Date", theme::muted()))
                .style(theme::muted())
                .bounds([0.0, x_max])
                .labels(vec![
                    Span::styled(origin.to_string(), theme::muted()),
                    Span::styled(last.to_string(), theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Day1/Gap", theme::muted()))
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format!("{y_min:.1}"), theme::muted()),
                    Span::styled(format!("{:.1}", (y_min + y_max) / 2.0), theme::muted()),
                    Span::styled(format!("{y_max:.1}"), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}

/// Earliest and latest date; rows keep dataset order, which need not be
/// chronological.
fn date_span(rows: &[GapEvent]) -> Option<(NaiveDate, NaiveDate)> {
    let first = rows.iter().map(|e| e.date).min()?;
    let last = rows.iter().map(|e| e.date).max()?;
    Some((first, last))
}

fn days(date: NaiveDate, origin: NaiveDate) -> f64 {
    (date - origin).num_days() as f64
}

/// Points as (days since `origin`, day1_gap), split by close colour.
fn split_points(rows: &[GapEvent], origin: NaiveDate) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let mut red = Vec::new();
    let mut green = Vec::new();
    for e in rows {
        let point = (days(e.date, origin), e.day1_gap);
        if e.closed_red() {
            red.push(point);
        } else {
            green.push(point);
        }
    }
    (red, green)
}

/// Bounds that always include zero, padded by 5%.
fn y_bounds(rows: &[GapEvent]) -> (f64, f64) {
    let (lo, hi) = rows
        .iter()
        .map(|e| e.day1_gap)
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let pad = ((hi - lo).abs() * 0.05).max(0.1);
    (lo - pad, hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fadefinder_core::synthetic;

    fn event(date: NaiveDate, day1_gap: f64) -> GapEvent {
        let mut e = synthetic::generate(1, 3).remove(0);
        e.date = date;
        e.day1_gap = day1_gap;
        e
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn points_split_by_close() {
        let rows = [event(date(2021, 1, 4), -0.8), event(date(2021, 1, 6), 0.3)];
        let (r, g) = split_points(&rows, date(2021, 1, 4));
        assert_eq!(r, vec![(0.0, -0.8)]);
        assert_eq!(g, vec![(2.0, 0.3)]);
    }

    #[test]
    fn unsorted_rows_span_min_to_max_date() {
        let rows = [
            event(date(2021, 6, 1), -0.4),
            event(date(2021, 1, 1), 0.2),
            event(date(2021, 3, 15), -1.1),
        ];
        let (origin, last) = date_span(&rows).unwrap();
        assert_eq!(origin, date(2021, 1, 1));
        assert_eq!(last, date(2021, 6, 1));

        let x_max = days(last, origin);
        let (red, green) = split_points(&rows, origin);
        for &(x, _) in red.iter().chain(green.iter()) {
            assert!((0.0..=x_max).contains(&x), "{x} outside [0, {x_max}]");
        }
        assert_eq!(green, vec![(0.0, 0.2)]);
    }

    #[test]
    fn no_rows_no_span() {
        assert_eq!(date_span(&[]), None);
    }

    #[test]
    fn bounds_include_zero() {
        let (lo, hi) = y_bounds(&[event(date(2021, 1, 4), 2.0)]);
        assert!(lo < 0.0);
        assert!(hi > 2.0);
    }
}
