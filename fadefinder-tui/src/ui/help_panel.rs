//! Panel 5: keyboard shortcuts.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, _app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global");
    key(&mut lines, "1-5", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "d", "Toggle direction (short / long)");
    key(&mut lines, "r", "Toggle long stop rule");
    key(&mut lines, "z", "Toggle zero-risk rows (skip / propagate)");
    key(&mut lines, "f", "Toggle largest-fade scope (filtered / dataset)");
    key(&mut lines, "R", "Reset every filter and option");
    key(&mut lines, "q / Esc", "Quit (settings are saved)");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 1: Filters");
    key(&mut lines, "j / k", "Select slider");
    key(&mut lines, "h / l", "Move lower bound down / up");
    key(&mut lines, "H / L", "Move upper bound down / up");
    key(&mut lines, "Left / Right", "Widen the range (Shift: 5 steps)");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 2: Results");
    key(&mut lines, "j / k", "Scroll rows");
    key(&mut lines, "PgUp / PgDn", "Scroll a page");
    key(&mut lines, "g / G", "Jump to first / last row");
    key(&mut lines, "s", "Cycle the stop-size outcome column");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 3: Chart");
    key(&mut lines, "", "Day1/Gap by date; red and green closes");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 4: Backtest");
    key(&mut lines, "s", "Highlight the next stop size");
    lines.push(Line::from(""));

    section(&mut lines, "Reading the numbers");
    key(&mut lines, "Day1/Gap", "Close relative to the gap; below 0 is a fade");
    key(&mut lines, "R", "Result in units of the gap size");
    key(&mut lines, "PF", "Profit factor; N/A when undefined");

    f.render_widget(Paragraph::new(lines), area);
}

fn section<'a>(lines: &mut Vec<Line<'a>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::heading())));
}

fn key<'a>(lines: &mut Vec<Line<'a>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {keys:>16}  "), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
