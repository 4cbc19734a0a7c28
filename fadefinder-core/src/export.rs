//! Export of filtered rows with their derived outcome columns.

use std::fs;
use std::io;
use std::path::Path;

use crate::data::schema;
use crate::data::LoadError;
use crate::query::QueryOutcome;

/// Write the filtered rows as CSV, followed by one `SL{stop}Gap` column per
/// stop size. Volumes and market cap are in millions, as displayed.
pub fn write_outcomes_csv(path: &Path, outcome: &QueryOutcome) -> Result<(), LoadError> {
    let file = fs::File::create(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_outcomes(file, outcome)?;
    tracing::info!(path = %path.display(), rows = outcome.rows.len(), "outcomes exported");
    Ok(())
}

/// Same as [`write_outcomes_csv`], to any writer.
pub fn write_outcomes<W: io::Write>(writer: W, outcome: &QueryOutcome) -> Result<(), LoadError> {
    let mut out = csv::Writer::from_writer(writer);

    let mut header: Vec<String> = [
        schema::DATE,
        schema::STOCK,
        schema::GAP_SIZE,
        schema::GAP_SIZE_ABS,
        schema::PRE_VOLUME,
        schema::VOLUME,
        schema::MARKET_CAP,
        schema::OPEN_UNADJUSTED,
        schema::CLOSE_UNADJUSTED,
        schema::DAY1_GAP,
        schema::MAX_GAIN_GAP,
        schema::OPEN_TO_LOW_GAP,
        schema::PRE_BREAK_TIME,
        schema::OPEN_PRE_HIGH,
        schema::WEEKDAY,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    header.extend(outcome.backtest.outcomes.iter().map(|c| c.label.clone()));
    out.write_record(&header)?;

    for (i, e) in outcome.rows.iter().enumerate() {
        let mut record = vec![
            e.date.to_string(),
            e.stock.clone(),
            e.gap_size.to_string(),
            e.gap_size_abs.to_string(),
            e.pre_volume.to_string(),
            e.volume.to_string(),
            e.market_cap.to_string(),
            e.open_unadjusted.to_string(),
            e.close_unadjusted.to_string(),
            e.day1_gap.to_string(),
            e.max_gain_gap.to_string(),
            e.open_to_low_gap.to_string(),
            e.pre_break_time
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
            e.open_pre_high.to_string(),
            e.weekday.to_string(),
        ];
        for column in &outcome.backtest.outcomes {
            record.push(
                column
                    .values
                    .get(i)
                    .copied()
                    .flatten()
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
            );
        }
        out.write_record(&record)?;
    }

    out.flush().map_err(|source| LoadError::Io {
        path: "<writer>".into(),
        source,
    })?;
    Ok(())
}
