//! Plain-text rendering of query results.

use std::fmt::Write;

use fadefinder_core::backtest::StopMetrics;
use fadefinder_core::display::fmt2;
use fadefinder_core::{Dataset, QueryOutcome};

const LABEL_WIDTH: usize = 26;
const CELL_WIDTH: usize = 10;

/// Backtest table: one column per stop size, then the summary block.
pub fn backtest_table(outcome: &QueryOutcome) -> String {
    let bt = &outcome.backtest;
    let mut out = String::new();

    let _ = writeln!(out, "--- Backtest ({}) ---", bt.direction);
    let _ = write!(out, "{:<LABEL_WIDTH$}", "Stop size (x gap)");
    for m in &bt.per_stop {
        let _ = write!(out, "{:>CELL_WIDTH$}", m.stop_size);
    }
    out.push('\n');

    let rows: [(&str, fn(&StopMetrics) -> String); 4] = [
        ("Trades", |m| m.trades.to_string()),
        ("Win rate %", |m| fmt2(m.win_rate_pct)),
        ("Expected value (R)", |m| fmt2(m.expected_value)),
        ("Profit factor", |m| m.profit_factor.to_string()),
    ];
    for (label, cell) in rows {
        let _ = write!(out, "{label:<LABEL_WIDTH$}");
        for m in &bt.per_stop {
            let _ = write!(out, "{:>CELL_WIDTH$}", cell(m));
        }
        out.push('\n');
    }

    let skipped = bt.per_stop.first().map(|m| m.skipped).unwrap_or(0);
    if skipped > 0 {
        let _ = writeln!(out, "({skipped} zero-risk row(s) excluded)");
    }

    let s = &bt.summary;
    out.push('\n');
    let _ = writeln!(out, "--- Summary at {} x gap ---", s.stop_size);
    let _ = writeln!(out, "{:<LABEL_WIDTH$}{:>CELL_WIDTH$}", "Profit factor", s.profit_factor.to_string());
    let _ = writeln!(out, "{:<LABEL_WIDTH$}{:>CELL_WIDTH$}", "Total wins (R)", fmt2(s.total_wins_r));
    let _ = writeln!(out, "{:<LABEL_WIDTH$}{:>CELL_WIDTH$}", "Total losses (R)", fmt2(s.total_losses_r));
    out
}

/// Basic statistics block.
pub fn stats_table(outcome: &QueryOutcome) -> String {
    let st = &outcome.stats;
    let mut out = String::new();
    let _ = writeln!(out, "--- Basic statistics ---");
    let line = |out: &mut String, label: &str, value: String| {
        let _ = writeln!(out, "{label:<LABEL_WIDTH$}{value:>CELL_WIDTH$}");
    };
    line(&mut out, "Setups", st.setups.to_string());
    line(&mut out, "Red closes %", fmt2(st.red_close_pct));
    line(&mut out, "Green closes %", fmt2(st.green_close_pct));
    line(&mut out, "Pre-market high broken %", fmt2(st.pre_high_break_pct));
    line(&mut out, "Largest fade (Day1/Gap)", fmt2(st.largest_fade));
    if let Some(row) = &st.largest_fade_row {
        let _ = writeln!(out, "{:<LABEL_WIDTH$}{} on {}", "  found at", row.stock, row.date);
    }
    line(&mut out, "Trading days in period", st.trading_days.to_string());
    out
}

/// First `limit` filtered rows.
pub fn rows_table(outcome: &QueryOutcome, limit: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:<6} {:>8} {:>8} {:>8} {:>7} {:>9} {:>7}",
        "Date", "Stock", "Gap%", "PreVol", "MktCap", "Open", "Day1/Gap", "O/PH"
    );
    for e in outcome.rows.iter().take(limit) {
        let _ = writeln!(
            out,
            "{:<10} {:<6} {:>8} {:>8} {:>8} {:>7} {:>9} {:>7}",
            e.date,
            e.stock,
            fmt2(e.gap_size),
            fmt2(e.pre_volume),
            fmt2(e.market_cap),
            fmt2(e.open_unadjusted),
            fmt2(e.day1_gap),
            fmt2(e.open_pre_high),
        );
    }
    if outcome.rows.len() > limit {
        let _ = writeln!(out, "... {} more row(s)", outcome.rows.len() - limit);
    }
    out
}

/// Dataset overview for `inspect`.
pub fn dataset_summary(dataset: &Dataset) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Rows:         {}", dataset.len());
    let _ = writeln!(out, "Stocks:       {}", dataset.stock_count());
    match dataset.date_span() {
        Some((first, last)) => {
            let _ = writeln!(out, "Date span:    {first} to {last}");
        }
        None => {
            let _ = writeln!(out, "Date span:    (empty)");
        }
    }
    let _ = writeln!(out, "Fingerprint:  {}", dataset.fingerprint());
    out
}
