//! Column layout of the gap-event spreadsheet.

use polars::prelude::*;

pub const DATE: &str = "Date";
pub const STOCK: &str = "Stock";
pub const GAP_SIZE: &str = "GapSize";
pub const GAP_SIZE_ABS: &str = "GapSizeAbs";
pub const PRE_VOLUME: &str = "PreVolume";
pub const VOLUME: &str = "Volume";
pub const MARKET_CAP: &str = "MarketCap";
pub const OPEN_UNADJUSTED: &str = "OpenUnadjusted";
pub const CLOSE_UNADJUSTED: &str = "CloseUnadjusted";
pub const DAY1_GAP: &str = "Day1/Gap";
pub const MAX_GAIN_GAP: &str = "MaxGain/Gap";
pub const OPEN_TO_LOW_GAP: &str = "Open_to_low/Gap";
pub const PRE_BREAK_TIME: &str = "PreBreakTime";
pub const OPEN_PRE_HIGH: &str = "Open/PreHigh";
pub const WEEKDAY: &str = "Weekday";

/// Numeric columns, all required.
pub const NUMERIC_COLUMNS: [&str; 11] = [
    GAP_SIZE,
    GAP_SIZE_ABS,
    PRE_VOLUME,
    VOLUME,
    MARKET_CAP,
    OPEN_UNADJUSTED,
    CLOSE_UNADJUSTED,
    DAY1_GAP,
    MAX_GAIN_GAP,
    OPEN_TO_LOW_GAP,
    OPEN_PRE_HIGH,
];

/// Required non-numeric columns. `PreBreakTime` and `Weekday` are optional.
pub const KEY_COLUMNS: [&str; 2] = [DATE, STOCK];

/// Expected schema for gap-event frames.
pub struct GapEventSchema;

impl GapEventSchema {
    /// Check that every required column exists and numeric columns hold numbers.
    pub fn validate(df: &DataFrame) -> Result<(), SchemaError> {
        for name in KEY_COLUMNS.iter().chain(NUMERIC_COLUMNS.iter()) {
            if df.column(name).is_err() {
                return Err(SchemaError::MissingColumn(name.to_string()));
            }
        }

        for name in NUMERIC_COLUMNS {
            let dtype = df
                .column(name)
                .map_err(|_| SchemaError::MissingColumn(name.to_string()))?
                .dtype()
                .clone();
            let numeric = matches!(
                dtype,
                DataType::Float64
                    | DataType::Float32
                    | DataType::Int64
                    | DataType::Int32
                    | DataType::UInt64
                    | DataType::UInt32
            );
            if !numeric {
                return Err(SchemaError::NotNumeric {
                    column: name.to_string(),
                    actual: dtype,
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Column {column} must be numeric, got {actual:?}")]
    NotNumeric { column: String, actual: DataType },
}
