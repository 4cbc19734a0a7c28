//! CSV reader and writer for gap-event spreadsheets.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::record::{to_raw_units, RawRow};
use super::{collect_events, LoadError, LoadOptions};
use crate::domain::GapEvent;

/// On-disk CSV row, using the spreadsheet's column names.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Stock")]
    stock: String,
    #[serde(rename = "GapSize")]
    gap_size: f64,
    #[serde(rename = "GapSizeAbs")]
    gap_size_abs: f64,
    #[serde(rename = "PreVolume")]
    pre_volume: f64,
    #[serde(rename = "Volume")]
    volume: f64,
    #[serde(rename = "MarketCap")]
    market_cap: f64,
    #[serde(rename = "OpenUnadjusted")]
    open_unadjusted: f64,
    #[serde(rename = "CloseUnadjusted")]
    close_unadjusted: f64,
    #[serde(rename = "Day1/Gap")]
    day1_gap: f64,
    #[serde(rename = "MaxGain/Gap")]
    max_gain_gap: f64,
    #[serde(rename = "Open_to_low/Gap")]
    open_to_low_gap: f64,
    #[serde(rename = "PreBreakTime", default)]
    pre_break_time: Option<String>,
    #[serde(rename = "Open/PreHigh")]
    open_pre_high: f64,
    #[serde(rename = "Weekday", default)]
    weekday: Option<String>,
}

impl From<CsvRecord> for RawRow {
    fn from(r: CsvRecord) -> Self {
        RawRow {
            date: r.date,
            stock: r.stock,
            gap_size: r.gap_size,
            gap_size_abs: r.gap_size_abs,
            pre_volume: r.pre_volume,
            volume: r.volume,
            market_cap: r.market_cap,
            open_unadjusted: r.open_unadjusted,
            close_unadjusted: r.close_unadjusted,
            day1_gap: r.day1_gap,
            max_gain_gap: r.max_gain_gap,
            open_to_low_gap: r.open_to_low_gap,
            pre_break_time: r.pre_break_time,
            open_pre_high: r.open_pre_high,
            weekday: r.weekday,
        }
    }
}

/// Read gap events from a CSV file with a header row.
pub fn read_csv(path: &Path, opts: &LoadOptions) -> Result<Vec<GapEvent>, LoadError> {
    let file = fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let mut rows = Vec::new();
    for (index, record) in reader.deserialize::<CsvRecord>().enumerate() {
        match record {
            Ok(record) => rows.push((index, Ok(RawRow::from(record)))),
            // Parse failures are row-level so `skip_invalid` can drop them.
            Err(e) if opts.skip_invalid => rows.push((index, Err(e.to_string()))),
            Err(e) => return Err(LoadError::Csv(e)),
        }
    }
    collect_events(rows, opts)
}

/// Write events in the spreadsheet schema. Scaled columns are converted
/// back to raw units when `opts.scale_to_millions` is set, so loading the
/// file with the same options reproduces the events.
pub fn write_csv(path: &Path, events: &[GapEvent], opts: &LoadOptions) -> Result<(), LoadError> {
    let file = fs::File::create(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = csv::Writer::from_writer(file);
    let unscale = |v: f64| {
        if opts.scale_to_millions {
            to_raw_units(v)
        } else {
            v
        }
    };

    for e in events {
        writer.serialize(CsvRecord {
            date: e.date.format("%Y-%m-%d").to_string(),
            stock: e.stock.clone(),
            gap_size: e.gap_size,
            gap_size_abs: e.gap_size_abs,
            pre_volume: unscale(e.pre_volume),
            volume: unscale(e.volume),
            market_cap: unscale(e.market_cap),
            open_unadjusted: e.open_unadjusted,
            close_unadjusted: e.close_unadjusted,
            day1_gap: e.day1_gap,
            max_gain_gap: e.max_gain_gap,
            open_to_low_gap: e.open_to_low_gap,
            pre_break_time: e
                .pre_break_time
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
            open_pre_high: e.open_pre_high,
            weekday: Some(e.weekday.to_string()),
        })?;
    }
    writer.flush().map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gap_event::fixtures::{date, event};
    use std::io::Write;

    const HEADER: &str = "Date,Stock,GapSize,GapSizeAbs,PreVolume,Volume,MarketCap,OpenUnadjusted,CloseUnadjusted,Day1/Gap,MaxGain/Gap,Open_to_low/Gap,PreBreakTime,Open/PreHigh,Weekday";

    fn write_file(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("gaps.csv");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "{HEADER}").unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_and_scales_spreadsheet_units() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "2021-06-07 00:00:00,ABC,45.678,0.9,2345678,15000000,48500000,3.1,2.6,-0.55,0.25,-0.7,09:41:00,0.75,Monday\n\
             2021-06-08,XYZ,30,0.5,1500000,9000000,20000000,2.0,1.9,-0.2,0.1,-0.3,,0.5,\n",
        );
        let events = read_csv(&path, &LoadOptions::default()).unwrap();
        assert_eq!(events.len(), 2);

        let abc = &events[0];
        assert_eq!(abc.date, date(2021, 6, 7));
        assert_eq!(abc.gap_size, 45.68);
        assert_eq!(abc.pre_volume, 2.35);
        assert_eq!(abc.market_cap, 48.5);
        assert_eq!(
            abc.pre_break_time,
            date(2021, 6, 7).and_hms_opt(9, 41, 0)
        );

        let xyz = &events[1];
        assert_eq!(xyz.pre_break_time, None);
        assert_eq!(xyz.weekday, chrono::Weekday::Tue);
    }

    #[test]
    fn malformed_number_fails_unless_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "2021-06-07,ABC,lots,0.9,2345678,15000000,48500000,3.1,2.6,-0.55,0.25,-0.7,,0.75,\n\
             2021-06-08,XYZ,30,0.5,1500000,9000000,20000000,2.0,1.9,-0.2,0.1,-0.3,,0.5,\n",
        );
        assert!(matches!(
            read_csv(&path, &LoadOptions::default()),
            Err(LoadError::Csv(_))
        ));

        let opts = LoadOptions {
            skip_invalid: true,
            ..LoadOptions::default()
        };
        let events = read_csv(&path, &opts).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].stock, "XYZ");
    }

    #[test]
    fn written_file_loads_back_identically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut a = event("AAA", date(2022, 2, 1));
        a.pre_break_time = date(2022, 2, 1).and_hms_opt(10, 5, 0);
        let events = vec![a, event("BBB", date(2022, 2, 2))];

        let opts = LoadOptions::default();
        write_csv(&path, &events, &opts).unwrap();
        assert_eq!(read_csv(&path, &opts).unwrap(), events);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_csv(&dir.path().join("nope.csv"), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
