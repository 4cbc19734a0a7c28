//! Neon-on-charcoal palette and the styles built from it.
//!
//! Red and green carry meaning here: a red close is a fade, a green close
//! held the gap. Everything else uses the accent or muted tones.

use ratatui::style::{Color, Modifier, Style};

pub const BACKGROUND: Color = Color::Rgb(18, 18, 20);
pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT: Color = Color::White;

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

pub fn heading() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn selected() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::REVERSED)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        Style::default().fg(ACCENT).bg(BACKGROUND)
    } else {
        Style::default().fg(MUTED).bg(BACKGROUND)
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        heading()
    } else {
        muted()
    }
}

/// Gains green, losses pink. Zero counts as a gain.
pub fn pnl(value: f64) -> Style {
    if value >= 0.0 {
        positive()
    } else {
        negative()
    }
}

/// Win rate in percent.
pub fn win_rate(pct: f64) -> Style {
    match pct {
        w if w >= 60.0 => positive(),
        w if w >= 50.0 => accent(),
        w if w >= 40.0 => neutral(),
        _ => warning(),
    }
}

/// Profit factor; `None` means one of the sentinels.
pub fn profit_factor(pf: Option<f64>) -> Style {
    match pf {
        None => muted(),
        Some(v) if v >= 1.5 => positive(),
        Some(v) if v >= 1.0 => accent(),
        Some(_) => negative(),
    }
}
