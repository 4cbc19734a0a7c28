//! Parquet reader and writer built on polars.

use chrono::NaiveDate;
use polars::prelude::*;
use std::fs;
use std::path::Path;

use super::record::{to_raw_units, RawRow};
use super::schema::{self, GapEventSchema, NUMERIC_COLUMNS};
use super::{collect_events, LoadError, LoadOptions};
use crate::domain::GapEvent;

fn polars_err(context: &str) -> impl Fn(PolarsError) -> LoadError + '_ {
    move |e| LoadError::Parquet(format!("{context}: {e}"))
}

/// Read gap events from a Parquet file.
///
/// Text columns are read through a string cast, so `Date` may be stored as
/// a date, a datetime or text. Numeric columns may be any integer or float
/// type.
pub fn read_parquet(path: &Path, opts: &LoadOptions) -> Result<Vec<GapEvent>, LoadError> {
    let file = fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let df = ParquetReader::new(file)
        .finish()
        .map_err(polars_err("read"))?;
    GapEventSchema::validate(&df)?;

    let text = |name: &str| -> Result<Option<Column>, LoadError> {
        match df.column(name) {
            Ok(col) => Ok(Some(
                col.cast(&DataType::String)
                    .map_err(polars_err("string cast"))?,
            )),
            Err(_) => Ok(None),
        }
    };
    let dates = text(schema::DATE)?.ok_or_else(|| missing(schema::DATE))?;
    let stocks = text(schema::STOCK)?.ok_or_else(|| missing(schema::STOCK))?;
    let breaks = text(schema::PRE_BREAK_TIME)?;
    let weekdays = text(schema::WEEKDAY)?;

    let mut numeric = Vec::with_capacity(NUMERIC_COLUMNS.len());
    for name in NUMERIC_COLUMNS {
        let col = df
            .column(name)
            .map_err(polars_err(name))?
            .cast(&DataType::Float64)
            .map_err(polars_err(name))?;
        numeric.push(col);
    }

    let date_ca = dates.str().map_err(polars_err("date column"))?;
    let stock_ca = stocks.str().map_err(polars_err("stock column"))?;
    let break_ca = breaks
        .as_ref()
        .map(|c| c.str())
        .transpose()
        .map_err(polars_err("pre-break column"))?;
    let weekday_ca = weekdays
        .as_ref()
        .map(|c| c.str())
        .transpose()
        .map_err(polars_err("weekday column"))?;
    let num_ca = numeric
        .iter()
        .map(|c| c.f64())
        .collect::<PolarsResult<Vec<_>>>()
        .map_err(polars_err("numeric column"))?;

    let rows = (0..df.height()).map(|i| {
        let row = || -> Result<RawRow, String> {
            let num = |k: usize| num_ca[k].get(i).unwrap_or(f64::NAN);
            Ok(RawRow {
                date: date_ca
                    .get(i)
                    .ok_or_else(|| "null date".to_string())?
                    .to_string(),
                stock: stock_ca.get(i).unwrap_or_default().to_string(),
                gap_size: num(0),
                gap_size_abs: num(1),
                pre_volume: num(2),
                volume: num(3),
                market_cap: num(4),
                open_unadjusted: num(5),
                close_unadjusted: num(6),
                day1_gap: num(7),
                max_gain_gap: num(8),
                open_to_low_gap: num(9),
                open_pre_high: num(10),
                pre_break_time: break_ca.and_then(|ca| ca.get(i)).map(str::to_string),
                weekday: weekday_ca.and_then(|ca| ca.get(i)).map(str::to_string),
            })
        };
        (i, row())
    });

    collect_events(rows, opts)
}

fn missing(name: &str) -> LoadError {
    LoadError::Schema(schema::SchemaError::MissingColumn(name.to_string()))
}

/// Write events as Parquet with a typed `Date` column. Scaled columns are
/// converted back to raw units when `opts.scale_to_millions` is set.
pub fn write_parquet(path: &Path, events: &[GapEvent], opts: &LoadOptions) -> Result<(), LoadError> {
    let mut df = events_to_dataframe(events, opts)?;
    let file = fs::File::create(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ParquetWriter::new(file)
        .finish(&mut df)
        .map_err(polars_err("write"))?;
    Ok(())
}

fn events_to_dataframe(events: &[GapEvent], opts: &LoadOptions) -> Result<DataFrame, LoadError> {
    let epoch = NaiveDate::default();
    let unscale = |v: f64| {
        if opts.scale_to_millions {
            to_raw_units(v)
        } else {
            v
        }
    };
    let floats = |name: &str, f: &dyn Fn(&GapEvent) -> f64| {
        Column::new(name.into(), events.iter().map(f).collect::<Vec<f64>>())
    };

    let days: Vec<i32> = events
        .iter()
        .map(|e| (e.date - epoch).num_days() as i32)
        .collect();
    let stocks: Vec<String> = events.iter().map(|e| e.stock.clone()).collect();
    let breaks: Vec<Option<String>> = events
        .iter()
        .map(|e| {
            e.pre_break_time
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        })
        .collect();
    let weekdays: Vec<String> = events.iter().map(|e| e.weekday.to_string()).collect();

    DataFrame::new(vec![
        Column::new(schema::DATE.into(), days)
            .cast(&DataType::Date)
            .map_err(polars_err("date cast"))?,
        Column::new(schema::STOCK.into(), stocks),
        floats(schema::GAP_SIZE, &|e| e.gap_size),
        floats(schema::GAP_SIZE_ABS, &|e| e.gap_size_abs),
        floats(schema::PRE_VOLUME, &|e| unscale(e.pre_volume)),
        floats(schema::VOLUME, &|e| unscale(e.volume)),
        floats(schema::MARKET_CAP, &|e| unscale(e.market_cap)),
        floats(schema::OPEN_UNADJUSTED, &|e| e.open_unadjusted),
        floats(schema::CLOSE_UNADJUSTED, &|e| e.close_unadjusted),
        floats(schema::DAY1_GAP, &|e| e.day1_gap),
        floats(schema::MAX_GAIN_GAP, &|e| e.max_gain_gap),
        floats(schema::OPEN_TO_LOW_GAP, &|e| e.open_to_low_gap),
        Column::new(schema::PRE_BREAK_TIME.into(), breaks),
        floats(schema::OPEN_PRE_HIGH, &|e| e.open_pre_high),
        Column::new(schema::WEEKDAY.into(), weekdays),
    ])
    .map_err(polars_err("dataframe creation"))
}
