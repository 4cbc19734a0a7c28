//! Shared, read-only handle to the loaded gap events.
//!
//! Loaded once at startup and passed explicitly to every query. Cloning the
//! handle is cheap; the rows themselves are never mutated after load.

use chrono::NaiveDate;
use std::sync::Arc;

use crate::domain::{GapEvent, GapEventError};

/// A row failed validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("row {index} ({stock}): {source}")]
pub struct InvalidRowError {
    pub index: usize,
    pub stock: String,
    pub source: GapEventError,
}

#[derive(Debug, Clone)]
pub struct Dataset {
    events: Arc<[GapEvent]>,
    fingerprint: String,
}

impl Dataset {
    /// Validate every row and wrap them in a shared handle.
    pub fn new(events: Vec<GapEvent>) -> Result<Self, InvalidRowError> {
        for (index, event) in events.iter().enumerate() {
            event.validate().map_err(|source| InvalidRowError {
                index,
                stock: event.stock.clone(),
                source,
            })?;
        }
        let fingerprint = compute_fingerprint(&events);
        Ok(Self {
            events: events.into(),
            fingerprint,
        })
    }

    pub fn events(&self) -> &[GapEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// BLAKE3 hex digest over all rows, in load order.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Earliest and latest date, or `None` for an empty dataset.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.events.iter().map(|e| e.date).min()?;
        let last = self.events.iter().map(|e| e.date).max()?;
        Some((first, last))
    }

    /// Number of distinct stock identifiers.
    pub fn stock_count(&self) -> usize {
        let mut stocks: Vec<&str> = self.events.iter().map(|e| e.stock.as_str()).collect();
        stocks.sort_unstable();
        stocks.dedup();
        stocks.len()
    }
}

fn compute_fingerprint(events: &[GapEvent]) -> String {
    let mut hasher = blake3::Hasher::new();
    for e in events {
        hasher.update(e.stock.as_bytes());
        hasher.update(e.date.to_string().as_bytes());
        for v in [
            e.gap_size,
            e.gap_size_abs,
            e.pre_volume,
            e.volume,
            e.market_cap,
            e.open_unadjusted,
            e.close_unadjusted,
            e.day1_gap,
            e.max_gain_gap,
            e.open_to_low_gap,
            e.open_pre_high,
        ] {
            hasher.update(&v.to_le_bytes());
        }
        if let Some(t) = e.pre_break_time {
            hasher.update(t.to_string().as_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}
