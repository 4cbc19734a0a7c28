//! Range sliders over `FilterCriteria`.
//!
//! Each slider owns one range. Numeric sliders move by a fixed step inside
//! fixed limits; the date slider moves by whole months. The lower end never
//! passes the upper end.

use chrono::{Months, NaiveDate};

use fadefinder_core::display::round2;
use fadefinder_core::filter::{Bounds, FilterCriteria};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slider {
    GapSize,
    PreVolume,
    OpenPrice,
    MarketCap,
    OpenPreHigh,
    Dates,
}

/// Which end of a range a key moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    Lower,
    Upper,
}

/// Limits and step of a numeric slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Slider {
    pub const ALL: [Slider; 6] = [
        Slider::GapSize,
        Slider::PreVolume,
        Slider::OpenPrice,
        Slider::MarketCap,
        Slider::OpenPreHigh,
        Slider::Dates,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Slider::GapSize => "Gap size %",
            Slider::PreVolume => "Pre-market volume (M)",
            Slider::OpenPrice => "Open price",
            Slider::MarketCap => "Market cap (M)",
            Slider::OpenPreHigh => "Open / pre-market high",
            Slider::Dates => "Dates",
        }
    }

    /// `None` for the date slider.
    pub fn scale(self) -> Option<Scale> {
        let (min, max, step) = match self {
            Slider::GapSize => (10.0, 200.0, 1.0),
            Slider::PreVolume => (0.5, 30.0, 0.5),
            Slider::OpenPrice => (0.0, 50.0, 0.5),
            Slider::MarketCap => (0.0, 200.0, 5.0),
            Slider::OpenPreHigh => (0.0, 1.0, 0.1),
            Slider::Dates => return None,
        };
        Some(Scale { min, max, step })
    }

    /// True when the filter excludes the slider's end values.
    pub fn exclusive(self) -> bool {
        matches!(self, Slider::PreVolume | Slider::OpenPrice)
    }

    fn bounds_mut(self, c: &mut FilterCriteria) -> Option<&mut Bounds> {
        match self {
            Slider::GapSize => Some(&mut c.gap_size),
            Slider::PreVolume => Some(&mut c.pre_volume),
            Slider::OpenPrice => Some(&mut c.open_price),
            Slider::MarketCap => Some(&mut c.market_cap),
            Slider::OpenPreHigh => Some(&mut c.open_pre_high),
            Slider::Dates => None,
        }
    }

    pub fn bounds(self, c: &FilterCriteria) -> Option<Bounds> {
        match self {
            Slider::GapSize => Some(c.gap_size),
            Slider::PreVolume => Some(c.pre_volume),
            Slider::OpenPrice => Some(c.open_price),
            Slider::MarketCap => Some(c.market_cap),
            Slider::OpenPreHigh => Some(c.open_pre_high),
            Slider::Dates => None,
        }
    }

    /// Move one end by `steps` (negative moves left). Returns true if the
    /// criteria changed. `date_limits` bounds the date slider.
    pub fn adjust(
        self,
        c: &mut FilterCriteria,
        end: End,
        steps: i32,
        date_limits: (NaiveDate, NaiveDate),
    ) -> bool {
        if self == Slider::Dates {
            return adjust_dates(c, end, steps, date_limits);
        }
        let (Some(scale), Some(b)) = (self.scale(), self.bounds_mut(c)) else {
            return false;
        };
        let before = *b;
        let delta = scale.step * f64::from(steps);
        match end {
            End::Lower => {
                let hi = b.max.min(scale.max).max(scale.min);
                b.min = round2((b.min + delta).clamp(scale.min, hi));
            }
            End::Upper => {
                let lo = b.min.max(scale.min).min(scale.max);
                b.max = round2((b.max + delta).clamp(lo, scale.max));
            }
        }
        *b != before
    }
}

fn shift_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    }
}

fn adjust_dates(
    c: &mut FilterCriteria,
    end: End,
    steps: i32,
    (first, last): (NaiveDate, NaiveDate),
) -> bool {
    let before = c.dates;
    let d = &mut c.dates;
    match end {
        End::Lower => {
            if let Some(moved) = shift_months(d.start, steps) {
                d.start = moved.clamp(first.min(d.end), d.end);
            }
        }
        End::Upper => {
            if let Some(moved) = shift_months(d.end, steps) {
                d.end = moved.clamp(d.start, last.max(d.start));
            }
        }
    }
    c.dates != before
}

/// `[====    ]` bar showing where `value` sits between `min` and `max`.
pub fn render_inline(value: f64, min: f64, max: f64, width: usize) -> String {
    let range = max - min;
    if range <= 0.0 {
        return format!("[{}]", "=".repeat(width));
    }
    let frac = ((value - min) / range).clamp(0.0, 1.0);
    let filled = (frac * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "=".repeat(filled), " ".repeat(empty))
}

/// Range bar: spaces outside `[lo, hi]`, `=` inside.
pub fn render_range(lo: f64, hi: f64, min: f64, max: f64, width: usize) -> String {
    let range = max - min;
    if range <= 0.0 || width == 0 {
        return format!("[{}]", "=".repeat(width));
    }
    let pos = |v: f64| (((v - min) / range).clamp(0.0, 1.0) * width as f64).round() as usize;
    let (a, b) = (pos(lo), pos(hi).max(pos(lo)));
    format!(
        "[{}{}{}]",
        " ".repeat(a),
        "=".repeat(b - a),
        " ".repeat(width - b)
    )
}
