//! Range filter over gap events.
//!
//! Six predicates, AND-combined:
//! - gap size, market cap, open/pre-high: inclusive on both ends
//! - pre-market volume, open price: exclusive on both ends
//! - date: inclusive on both ends
//!
//! Bounds are never validated; `min > max` simply matches nothing.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::GapEvent;
use crate::error::CoreError;

/// Date format accepted from callers.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A numeric `[min, max]` pair. Whether the ends are inclusive depends on
/// the field it is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains_inclusive(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn contains_exclusive(&self, value: f64) -> bool {
        value > self.min && value < self.max
    }
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Parse both ends from `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, CoreError> {
        Ok(Self {
            start: parse_date(start)?,
            end: parse_date(end)?,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of Monday–Friday days in the range. Zero when `start > end`.
    pub fn weekday_count(&self) -> usize {
        if self.start > self.end {
            return 0;
        }
        self.start
            .iter_days()
            .take_while(|d| *d <= self.end)
            .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
            .count()
    }
}

/// Parse a `YYYY-MM-DD` date string.
pub fn parse_date(input: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| {
        CoreError::InvalidDateFormat {
            input: input.to_string(),
        }
    })
}

/// The full set of range constraints for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Percent gap, inclusive.
    pub gap_size: Bounds,
    /// Pre-market volume in millions, exclusive.
    pub pre_volume: Bounds,
    /// Unadjusted open price, exclusive.
    pub open_price: Bounds,
    /// Market cap in millions, inclusive.
    pub market_cap: Bounds,
    /// Open relative to pre-market high, inclusive.
    pub open_pre_high: Bounds,
    /// Trading date, inclusive.
    pub dates: DateRange,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            gap_size: Bounds::new(20.0, 199.0),
            pre_volume: Bounds::new(1.0, 5.0),
            open_price: Bounds::new(0.0, 6.0),
            market_cap: Bounds::new(10.0, 100.0),
            open_pre_high: Bounds::new(0.4, 1.0),
            dates: DateRange::new(
                NaiveDate::from_ymd_opt(2018, 1, 1).expect("valid constant date"),
                NaiveDate::from_ymd_opt(2023, 7, 1).expect("valid constant date"),
            ),
        }
    }
}

impl FilterCriteria {
    /// True if `event` satisfies all six predicates.
    pub fn matches(&self, event: &GapEvent) -> bool {
        self.gap_size.contains_inclusive(event.gap_size)
            && self.pre_volume.contains_exclusive(event.pre_volume)
            && self.open_price.contains_exclusive(event.open_unadjusted)
            && self.market_cap.contains_inclusive(event.market_cap)
            && self.open_pre_high.contains_inclusive(event.open_pre_high)
            && self.dates.contains(event.date)
    }
}

/// Stable filter: matching rows in their original order.
pub fn filter(events: &[GapEvent], criteria: &FilterCriteria) -> Vec<GapEvent> {
    events
        .iter()
        .filter(|e| criteria.matches(e))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gap_event::fixtures::{date, event};

    fn open_criteria() -> FilterCriteria {
        FilterCriteria {
            gap_size: Bounds::new(0.0, 1000.0),
            pre_volume: Bounds::new(0.0, 1000.0),
            open_price: Bounds::new(0.0, 1000.0),
            market_cap: Bounds::new(0.0, 1000.0),
            open_pre_high: Bounds::new(0.0, 1.0),
            dates: DateRange::new(date(2000, 1, 1), date(2030, 1, 1)),
        }
    }

    #[test]
    fn parse_date_accepts_iso() {
        assert_eq!(parse_date("2023-07-01").unwrap(), date(2023, 7, 1));
        assert_eq!(parse_date(" 2018-01-01 ").unwrap(), date(2018, 1, 1));
    }

    #[test]
    fn parse_date_rejects_garbage() {
        for bad in ["01-07-2023", "2023/07/01", "2023-13-01", "", "yesterday"] {
            assert_eq!(
                parse_date(bad),
                Err(CoreError::InvalidDateFormat { input: bad.into() }),
                "{bad}"
            );
        }
    }

    #[test]
    fn gap_size_is_inclusive() {
        let mut c = open_criteria();
        c.gap_size = Bounds::new(50.0, 50.0);
        let e = event("A", date(2021, 1, 4));
        assert!(c.matches(&e));
    }

    #[test]
    fn pre_volume_is_exclusive() {
        let mut c = open_criteria();
        let mut e = event("A", date(2021, 1, 4));
        c.pre_volume = Bounds::new(1.0, 5.0);
        e.pre_volume = 1.0;
        assert!(!c.matches(&e));
        e.pre_volume = 5.0;
        assert!(!c.matches(&e));
        e.pre_volume = 1.01;
        assert!(c.matches(&e));
    }

    #[test]
    fn open_price_is_exclusive() {
        let mut c = open_criteria();
        let mut e = event("A", date(2021, 1, 4));
        c.open_price = Bounds::new(0.0, 6.0);
        e.open_unadjusted = 6.0;
        assert!(!c.matches(&e));
        e.open_unadjusted = 5.99;
        assert!(c.matches(&e));
    }

    #[test]
    fn market_cap_and_open_pre_high_are_inclusive() {
        let mut c = open_criteria();
        let mut e = event("A", date(2021, 1, 4));
        c.market_cap = Bounds::new(10.0, 100.0);
        c.open_pre_high = Bounds::new(0.4, 1.0);
        e.market_cap = 100.0;
        e.open_pre_high = 0.4;
        assert!(c.matches(&e));
    }

    #[test]
    fn gap_size_edges() {
        let mut c = open_criteria();
        let mut e = event("A", date(2021, 1, 4));
        c.gap_size = Bounds::new(20.0, 199.0);
        e.gap_size = 20.0;
        assert!(c.matches(&e));
        e.gap_size = 199.0;
        assert!(c.matches(&e));
        e.gap_size = 19.99;
        assert!(!c.matches(&e));
        e.gap_size = 199.01;
        assert!(!c.matches(&e));
    }

    #[test]
    fn open_price_lower_edge_is_exclusive() {
        let mut c = open_criteria();
        let mut e = event("A", date(2021, 1, 4));
        c.open_price = Bounds::new(1.0, 6.0);
        e.open_unadjusted = 1.0;
        assert!(!c.matches(&e));
        e.open_unadjusted = 1.01;
        assert!(c.matches(&e));
    }

    #[test]
    fn market_cap_edges() {
        let mut c = open_criteria();
        let mut e = event("A", date(2021, 1, 4));
        c.market_cap = Bounds::new(10.0, 100.0);
        e.market_cap = 10.0;
        assert!(c.matches(&e));
        e.market_cap = 9.99;
        assert!(!c.matches(&e));
        e.market_cap = 100.01;
        assert!(!c.matches(&e));
    }

    #[test]
    fn open_pre_high_edges() {
        let mut c = open_criteria();
        let mut e = event("A", date(2021, 1, 4));
        c.open_pre_high = Bounds::new(0.4, 0.9);
        e.open_pre_high = 0.9;
        assert!(c.matches(&e));
        e.open_pre_high = 0.4;
        assert!(c.matches(&e));
        e.open_pre_high = 0.39;
        assert!(!c.matches(&e));
        e.open_pre_high = 0.91;
        assert!(!c.matches(&e));
    }

    #[test]
    fn date_range_is_inclusive() {
        let mut c = open_criteria();
        c.dates = DateRange::new(date(2021, 1, 4), date(2021, 1, 8));
        assert!(c.matches(&event("A", date(2021, 1, 4))));
        assert!(c.matches(&event("A", date(2021, 1, 8))));
        assert!(!c.matches(&event("A", date(2021, 1, 9))));
    }

    #[test]
    fn inverted_bounds_yield_empty_result() {
        let mut c = open_criteria();
        c.market_cap = Bounds::new(100.0, 10.0);
        let events = vec![event("A", date(2021, 1, 4)), event("B", date(2021, 1, 5))];
        assert!(filter(&events, &c).is_empty());
    }

    #[test]
    fn filter_preserves_order() {
        let mut events = Vec::new();
        for (i, stock) in ["C", "A", "B", "D"].iter().enumerate() {
            let mut e = event(stock, date(2021, 1, 4 + i as u32));
            e.gap_size = if *stock == "D" { 5.0 } else { 50.0 };
            events.push(e);
        }
        let mut c = open_criteria();
        c.gap_size = Bounds::new(10.0, 100.0);
        let out: Vec<String> = filter(&events, &c).into_iter().map(|e| e.stock).collect();
        assert_eq!(out, vec!["C", "A", "B"]);
    }

    #[test]
    fn weekday_count_skips_weekends() {
        // 2021-01-04 is a Monday.
        let r = DateRange::new(date(2021, 1, 4), date(2021, 1, 17));
        assert_eq!(r.weekday_count(), 10);
        let inverted = DateRange::new(date(2021, 1, 17), date(2021, 1, 4));
        assert_eq!(inverted.weekday_count(), 0);
    }

    #[test]
    fn default_criteria_match_dashboard_defaults() {
        let c = FilterCriteria::default();
        assert_eq!(c.gap_size, Bounds::new(20.0, 199.0));
        assert_eq!(c.dates.start, date(2018, 1, 1));
        assert_eq!(c.dates.end, date(2023, 7, 1));
    }
}
