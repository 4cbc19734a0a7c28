//! Panel 2: filtered rows with one per-trade outcome column.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use fadefinder_core::display::fmt2;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Ok(outcome) = &app.outcome else {
        return;
    };
    let r = &app.results;
    let column = outcome
        .backtest
        .outcomes
        .get(r.outcome_column % outcome.backtest.outcomes.len().max(1));

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(vec![
        Span::styled(format!("{} rows", outcome.rows.len()), theme::accent()),
        Span::styled(
            format!(" | {} | ", outcome.backtest.direction),
            theme::muted(),
        ),
        Span::styled("[j/k]scroll [PgUp/PgDn] [g/G]top/bottom [s]top column", theme::muted()),
    ]));
    lines.push(Line::from(""));

    let sl_header = column.map(|c| c.label.as_str()).unwrap_or("SL");
    lines.push(Line::from(Span::styled(
        format!(
            "{:<10} {:<6} {:>7} {:>7} {:>7} {:>8} {:>8} {:>8} {:>8} {:>5} {:>8} {:>8}",
            "Date", "Stock", "Gap%", "PreVol", "Open", "MCap", "Day1/Gap", "MaxGain", "OTL",
            "O/PH", "PreBreak", sl_header
        ),
        theme::heading(),
    )));

    let visible = area.height.saturating_sub(4) as usize;
    let start = r.scroll.min(outcome.rows.len().saturating_sub(1));
    let end = (start + visible).min(outcome.rows.len());

    for i in start..end {
        let e = &outcome.rows[i];
        let pre_break = e
            .pre_break_time
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        let sl = column.and_then(|c| c.values.get(i).copied().flatten());
        let (sl_text, sl_style) = match sl {
            Some(v) => (fmt2(v), theme::pnl(v)),
            None => ("-".to_string(), theme::muted()),
        };

        lines.push(Line::from(vec![
            Span::styled(
                format!(
                    "{:<10} {:<6} {:>7} {:>7} {:>7} {:>8} ",
                    e.date.format("%Y-%m-%d").to_string(),
                    truncate(&e.stock, 6),
                    fmt2(e.gap_size),
                    fmt2(e.pre_volume),
                    fmt2(e.open_unadjusted),
                    fmt2(e.market_cap),
                ),
                theme::text(),
            ),
            Span::styled(format!("{:>8} ", fmt2(e.day1_gap)), theme::pnl(e.day1_gap)),
            Span::styled(
                format!(
                    "{:>8} {:>8} {:>5} {:>8} ",
                    fmt2(e.max_gain_gap),
                    fmt2(e.open_to_low_gap),
                    fmt2(e.open_pre_high),
                    pre_break
                ),
                theme::muted(),
            ),
            Span::styled(format!("{sl_text:>8}"), sl_style),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_long_symbols() {
        assert_eq!(truncate("AAPL", 6), "AAPL");
        assert_eq!(truncate("ABCDEFGH", 6), "ABCDE.");
    }
}
