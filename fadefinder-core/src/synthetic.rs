//! Deterministic synthetic gap events for demos, benchmarks and tests.
//!
//! Same seed, same rows. Values are drawn so that every row passes
//! `GapEvent::validate` and the intraday columns stay mutually consistent
//! (`open_to_low_gap <= min(day1_gap, 0) <= max(day1_gap, 0) <= max_gain_gap`).

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::display::round2;
use crate::domain::GapEvent;

const FIRST_DAY: (i32, u32, u32) = (2018, 1, 1);
const SPAN_DAYS: i64 = 2007; // through 2023-06-30
const SYMBOL_POOL: usize = 120;

/// Generate `count` events sorted by date.
pub fn generate(count: usize, seed: u64) -> Vec<GapEvent> {
    let mut rng = StdRng::seed_from_u64(seed);
    let symbols = symbol_pool(&mut rng);
    let first = NaiveDate::from_ymd_opt(FIRST_DAY.0, FIRST_DAY.1, FIRST_DAY.2)
        .expect("valid constant date");
    let open_bell = NaiveTime::from_hms_opt(9, 30, 0).expect("valid constant time");

    let mut events: Vec<GapEvent> = (0..count)
        .map(|_| {
            let date = trading_day(&mut rng, first);
            let stock = symbols[rng.gen_range(0..symbols.len())].clone();

            let gap_size = round2(rng.gen_range(5.0..320.0));
            let open = round2(rng.gen_range(0.3..12.0));
            // Gap in dollars, derived from the percent gap over a prior close.
            let prior_close = open / (1.0 + gap_size / 100.0);
            let gap_size_abs = round2((open - prior_close).max(0.01));

            let pre_volume = round2(rng.gen_range(0.05..15.0));
            let volume = round2(pre_volume * rng.gen_range(1.5..12.0));
            let market_cap = round2(rng.gen_range(2.0..400.0));

            // Fades dominate: most days close below the open.
            let day1_gap = round2(rng.gen_range(-1.8..0.9));
            let max_gain_gap = round2(day1_gap.max(0.0) + rng.gen_range(0.0..0.9));
            let open_to_low_gap = round2(day1_gap.min(0.0) - rng.gen_range(0.0..0.9));
            let close = round2((open + day1_gap * gap_size_abs).max(0.01));

            let pre_break_time = if rng.gen_bool(0.35) {
                let minutes = rng.gen_range(0..390);
                Some(date.and_time(open_bell) + Duration::minutes(minutes))
            } else {
                None
            };

            GapEvent {
                date,
                weekday: date.weekday(),
                stock,
                gap_size,
                gap_size_abs,
                pre_volume,
                volume,
                market_cap,
                open_unadjusted: open,
                close_unadjusted: close,
                day1_gap,
                max_gain_gap,
                open_to_low_gap,
                pre_break_time,
                open_pre_high: round2(rng.gen_range(0.2..=1.0)),
            }
        })
        .collect();

    events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.stock.cmp(&b.stock)));
    events
}

fn symbol_pool(rng: &mut StdRng) -> Vec<String> {
    (0..SYMBOL_POOL)
        .map(|_| {
            let len = rng.gen_range(3..=4);
            (0..len)
                .map(|_| char::from(b'A' + rng.gen_range(0..26u8)))
                .collect()
        })
        .collect()
}

fn trading_day(rng: &mut StdRng, first: NaiveDate) -> NaiveDate {
    let date = first + Duration::days(rng.gen_range(0..SPAN_DAYS));
    match date.weekday() {
        Weekday::Sat => date - Duration::days(1),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}
