//! GapEvent: one stock's gap trading day.

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

/// Precomputed daily statistics for a single gapping stock.
///
/// Volumes and market cap are expressed in millions once loaded
/// (see `data::LoadOptions::scale_to_millions`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapEvent {
    pub date: NaiveDate,
    pub stock: String,
    /// Gap in percent from the prior close to the open.
    pub gap_size: f64,
    /// Gap in price units. Never negative.
    pub gap_size_abs: f64,
    pub pre_volume: f64,
    pub volume: f64,
    pub market_cap: f64,
    pub open_unadjusted: f64,
    pub close_unadjusted: f64,
    /// Close relative to the gap; negative means a red close.
    pub day1_gap: f64,
    /// Maximum intraday gain relative to the gap.
    pub max_gain_gap: f64,
    /// Open-to-low move relative to the gap.
    pub open_to_low_gap: f64,
    /// Set only when price broke the pre-market high.
    pub pre_break_time: Option<NaiveDateTime>,
    /// Where the open sits inside the pre-market range, in [0, 1].
    pub open_pre_high: f64,
    pub weekday: Weekday,
}

/// Why a row was rejected at load time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GapEventError {
    #[error("field '{field}' is not finite ({value})")]
    NonFinite { field: &'static str, value: f64 },

    #[error("gap_size_abs must be >= 0, got {0}")]
    NegativeGapAbs(f64),

    #[error("open_pre_high must be within [0, 1], got {0}")]
    OpenPreHighOutOfRange(f64),

    #[error("stock identifier is empty")]
    EmptyStock,
}

impl GapEvent {
    /// Check the row invariants. Called once per row by the loader.
    pub fn validate(&self) -> Result<(), GapEventError> {
        if self.stock.trim().is_empty() {
            return Err(GapEventError::EmptyStock);
        }

        let numeric = [
            ("gap_size", self.gap_size),
            ("gap_size_abs", self.gap_size_abs),
            ("pre_volume", self.pre_volume),
            ("volume", self.volume),
            ("market_cap", self.market_cap),
            ("open_unadjusted", self.open_unadjusted),
            ("close_unadjusted", self.close_unadjusted),
            ("day1_gap", self.day1_gap),
            ("max_gain_gap", self.max_gain_gap),
            ("open_to_low_gap", self.open_to_low_gap),
            ("open_pre_high", self.open_pre_high),
        ];
        for (field, value) in numeric {
            if !value.is_finite() {
                return Err(GapEventError::NonFinite { field, value });
            }
        }

        if self.gap_size_abs < 0.0 {
            return Err(GapEventError::NegativeGapAbs(self.gap_size_abs));
        }
        if !(0.0..=1.0).contains(&self.open_pre_high) {
            return Err(GapEventError::OpenPreHighOutOfRange(self.open_pre_high));
        }
        Ok(())
    }

    /// True if the day closed below the gap level.
    pub fn closed_red(&self) -> bool {
        self.day1_gap < 0.0
    }

    /// True if the day closed above the gap level.
    pub fn closed_green(&self) -> bool {
        self.day1_gap > 0.0
    }

    /// True if price traded through the pre-market high.
    pub fn broke_pre_market_high(&self) -> bool {
        self.pre_break_time.is_some()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{date, event};
    use super::*;

    #[test]
    fn valid_row_passes() {
        assert!(event("ABC", date(2021, 3, 4)).validate().is_ok());
    }

    #[test]
    fn negative_gap_abs_rejected() {
        let mut e = event("ABC", date(2021, 3, 4));
        e.gap_size_abs = -0.1;
        assert_eq!(e.validate(), Err(GapEventError::NegativeGapAbs(-0.1)));
    }

    #[test]
    fn open_pre_high_bounds_are_inclusive() {
        let mut e = event("ABC", date(2021, 3, 4));
        e.open_pre_high = 1.0;
        assert!(e.validate().is_ok());
        e.open_pre_high = 0.0;
        assert!(e.validate().is_ok());
        e.open_pre_high = 1.01;
        assert!(matches!(
            e.validate(),
            Err(GapEventError::OpenPreHighOutOfRange(_))
        ));
    }

    #[test]
    fn nan_field_rejected() {
        let mut e = event("ABC", date(2021, 3, 4));
        e.max_gain_gap = f64::NAN;
        assert!(matches!(
            e.validate(),
            Err(GapEventError::NonFinite { field: "max_gain_gap", .. })
        ));
    }

    #[test]
    fn close_colour_follows_day1_sign() {
        let mut e = event("ABC", date(2021, 3, 4));
        e.day1_gap = -0.3;
        assert!(e.closed_red() && !e.closed_green());
        e.day1_gap = 0.0;
        assert!(!e.closed_red() && !e.closed_green());
    }
}
