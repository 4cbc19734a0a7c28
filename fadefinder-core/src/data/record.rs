//! Source-agnostic row conversion: raw spreadsheet values → `GapEvent`.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use super::LoadOptions;
use crate::display::round2;
use crate::domain::GapEvent;

const MILLION: f64 = 1_000_000.0;

/// One row as read from a file, before normalisation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawRow {
    pub date: String,
    pub stock: String,
    pub gap_size: f64,
    pub gap_size_abs: f64,
    pub pre_volume: f64,
    pub volume: f64,
    pub market_cap: f64,
    pub open_unadjusted: f64,
    pub close_unadjusted: f64,
    pub day1_gap: f64,
    pub max_gain_gap: f64,
    pub open_to_low_gap: f64,
    pub pre_break_time: Option<String>,
    pub open_pre_high: f64,
    pub weekday: Option<String>,
}

impl RawRow {
    /// Parse text fields and apply unit scaling. Invariants are checked
    /// separately by `GapEvent::validate`.
    pub fn into_event(self, opts: &LoadOptions) -> Result<GapEvent, String> {
        let date = parse_row_date(&self.date)?;
        let pre_break_time = match self.pre_break_time.as_deref() {
            Some(text) => parse_pre_break(text, date)?,
            None => None,
        };
        let weekday = match self.weekday.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text
                .parse::<Weekday>()
                .map_err(|_| format!("unrecognised weekday '{text}'"))?,
            _ => date.weekday(),
        };

        let (gap_size, pre_volume, volume, market_cap) = if opts.scale_to_millions {
            (
                round2(self.gap_size),
                round2(self.pre_volume / MILLION),
                round2(self.volume / MILLION),
                round2(self.market_cap / MILLION),
            )
        } else {
            (self.gap_size, self.pre_volume, self.volume, self.market_cap)
        };

        Ok(GapEvent {
            date,
            stock: self.stock.trim().to_string(),
            gap_size,
            gap_size_abs: self.gap_size_abs,
            pre_volume,
            volume,
            market_cap,
            open_unadjusted: self.open_unadjusted,
            close_unadjusted: self.close_unadjusted,
            day1_gap: self.day1_gap,
            max_gain_gap: self.max_gain_gap,
            open_to_low_gap: self.open_to_low_gap,
            pre_break_time,
            open_pre_high: self.open_pre_high,
            weekday,
        })
    }
}

/// Raw units for writing; the inverse of the loader's scaling.
pub(crate) fn to_raw_units(value_in_millions: f64) -> f64 {
    (value_in_millions * MILLION).round()
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part
/// (`YYYY-MM-DD HH:MM:SS` as exported by spreadsheets).
fn parse_row_date(text: &str) -> Result<NaiveDate, String> {
    let text = text.trim();
    let date_part = match text.char_indices().nth(10) {
        Some((idx, ' ')) | Some((idx, 'T')) => &text[..idx],
        _ => text,
    };
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| format!("invalid date '{text}'"))
}

fn is_missing(text: &str) -> bool {
    matches!(
        text.trim().to_ascii_lowercase().as_str(),
        "" | "nat" | "nan" | "none" | "null"
    )
}

/// A full timestamp, or a time of day combined with the row's date.
fn parse_pre_break(text: &str, date: NaiveDate) -> Result<Option<NaiveDateTime>, String> {
    if is_missing(text) {
        return Ok(None);
    }
    let text = text.trim();
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(text, fmt) {
            return Ok(Some(ts));
        }
    }
    for fmt in ["%H:%M:%S%.f", "%H:%M"] {
        if let Ok(t) = NaiveTime::parse_from_str(text, fmt) {
            return Ok(Some(date.and_time(t)));
        }
    }
    Err(format!("invalid pre-break time '{text}'"))
}


#[cfg(test)]
mod tests {
    use super::fixtures::raw_row;
    use super::*;

    #[test]
    fn scales_to_millions_and_rounds() {
        let e = raw_row("ABC", "2021-06-07")
            .into_event(&LoadOptions::default())
            .unwrap();
        assert_eq!(e.gap_size, 45.68);
        assert_eq!(e.pre_volume, 2.35);
        assert_eq!(e.volume, 15.0);
        assert_eq!(e.market_cap, 48.5);
        assert_eq!(e.weekday, Weekday::Mon);
    }

    #[test]
    fn scaling_can_be_disabled() {
        let opts = LoadOptions {
            scale_to_millions: false,
            ..LoadOptions::default()
        };
        let e = raw_row("ABC", "2021-06-07").into_event(&opts).unwrap();
        assert_eq!(e.pre_volume, 2_345_678.0);
        assert_eq!(e.gap_size, 45.678);
    }

    #[test]
    fn accepts_spreadsheet_timestamp_dates() {
        let e = raw_row("ABC", "2021-06-07 00:00:00")
            .into_event(&LoadOptions::default())
            .unwrap();
        assert_eq!(e.date, NaiveDate::from_ymd_opt(2021, 6, 7).unwrap());
    }

    #[test]
    fn pre_break_time_variants() {
        let date = NaiveDate::from_ymd_opt(2021, 6, 7).unwrap();
        let expected = date.and_hms_opt(9, 42, 0);
        assert_eq!(parse_pre_break("09:42:00", date).unwrap(), expected);
        assert_eq!(parse_pre_break("09:42", date).unwrap(), expected);
        assert_eq!(
            parse_pre_break("2021-06-07 09:42:00", date).unwrap(),
            expected
        );
        assert_eq!(parse_pre_break("NaT", date).unwrap(), None);
        assert!(parse_pre_break("soon", date).is_err());
    }

    #[test]
    fn explicit_weekday_is_parsed() {
        let mut raw = raw_row("ABC", "2021-06-07");
        raw.weekday = Some("Friday".into());
        let e = raw.into_event(&LoadOptions::default()).unwrap();
        assert_eq!(e.weekday, Weekday::Fri);

        let mut raw = raw_row("ABC", "2021-06-07");
        raw.weekday = Some("Someday".into());
        assert!(raw.into_event(&LoadOptions::default()).is_err());
    }

    #[test]
    fn bad_date_is_reported() {
        let err = raw_row("ABC", "07/06/2021")
            .into_event(&LoadOptions::default())
            .unwrap_err();
        assert!(err.contains("07/06/2021"));
    }
}
