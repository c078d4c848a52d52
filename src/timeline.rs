use crate::state::DAYS_PER_YEAR;
use chrono::{Datelike, NaiveDate};

/// Calendar year the synthetic cube is labelled with.
pub const CUBE_YEAR: i32 = 2024;

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

#[derive(PartialEq, Clone, Debug)]
pub struct MonthTick {
    pub label: &'static str,
    pub depth: f32,
}

pub fn month_ticks(extent: f32) -> Vec<MonthTick> {
    let last = (MONTHS.len() - 1) as f32;
    MONTHS
        .iter()
        .enumerate()
        .map(|(i, label)| MonthTick {
            label: *label,
            depth: -extent / 2.0 + (i as f32 / last) * extent,
        })
        .collect()
}

pub fn calendar_date(day: f32) -> Option<NaiveDate> {
    let ordinal = (day.max(0.0).floor() as u32 + 1).min(DAYS_PER_YEAR as u32);
    NaiveDate::from_yo_opt(CUBE_YEAR, ordinal)
}

/// Readout such as `DAY 180 / 365 · JUN 29`.
pub fn day_label(day: f32) -> String {
    let whole = day.max(0.0).floor() as u32;
    match calendar_date(day) {
        Some(date) => format!(
            "DAY {} / {} · {} {:02}",
            whole,
            DAYS_PER_YEAR as u32,
            MONTHS[date.month0() as usize],
            date.day()
        ),
        None => format!("DAY {} / {}", whole, DAYS_PER_YEAR as u32),
    }
}
