//! TOML configuration for queries.
//!
//! ```toml
//! [data]
//! path = "gaps.csv"
//! scale_to_millions = true
//!
//! [filter]
//! gap_size = { min = 20.0, max = 199.0 }
//! start_date = "2018-01-01"
//! end_date = "2023-07-01"
//!
//! [backtest]
//! direction = "short"
//! stop_sizes = [0.3, 0.5, 0.6, 0.7, 1.0]
//!
//! [stats]
//! largest_fade_scope = "filtered"
//! ```
//!
//! Every field is optional; omitted fields take the dashboard defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::backtest::BacktestParams;
use crate::data::LoadOptions;
use crate::error::CoreError;
use crate::filter::{Bounds, DateRange, FilterCriteria, DATE_FORMAT};
use crate::query::QueryParams;
use crate::stats::LargestFadeScope;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Invalid(#[from] CoreError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeFinderConfig {
    pub data: DataSection,
    pub filter: FilterSection,
    pub backtest: BacktestParams,
    pub stats: StatsSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSection {
    /// Dataset file; `.csv` or `.parquet`.
    pub path: Option<PathBuf>,
    #[serde(flatten)]
    pub load: LoadOptions,
}

/// Filter ranges as written in the file. Dates stay strings here so that a
/// malformed date surfaces as `InvalidDateFormat` rather than a TOML error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSection {
    pub gap_size: Bounds,
    pub pre_volume: Bounds,
    pub open_price: Bounds,
    pub market_cap: Bounds,
    pub open_pre_high: Bounds,
    pub start_date: String,
    pub end_date: String,
}

impl Default for FilterSection {
    fn default() -> Self {
        Self::from(&FilterCriteria::default())
    }
}

impl From<&FilterCriteria> for FilterSection {
    fn from(c: &FilterCriteria) -> Self {
        Self {
            gap_size: c.gap_size,
            pre_volume: c.pre_volume,
            open_price: c.open_price,
            market_cap: c.market_cap,
            open_pre_high: c.open_pre_high,
            start_date: c.dates.start.format(DATE_FORMAT).to_string(),
            end_date: c.dates.end.format(DATE_FORMAT).to_string(),
        }
    }
}

impl FilterSection {
    pub fn to_criteria(&self) -> Result<FilterCriteria, CoreError> {
        Ok(FilterCriteria {
            gap_size: self.gap_size,
            pre_volume: self.pre_volume,
            open_price: self.open_price,
            market_cap: self.market_cap,
            open_pre_high: self.open_pre_high,
            dates: DateRange::parse(&self.start_date, &self.end_date)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsSection {
    pub largest_fade_scope: LargestFadeScope,
}

impl FadeFinderConfig {
    /// Load from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Resolve into query parameters, parsing dates and checking the
    /// backtest parameters.
    pub fn to_query_params(&self) -> Result<QueryParams, ConfigError> {
        self.backtest.validate()?;
        Ok(QueryParams {
            criteria: self.filter.to_criteria()?,
            backtest: self.backtest.clone(),
            fade_scope: self.stats.largest_fade_scope,
        })
    }
}
