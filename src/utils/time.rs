use chrono::{Datelike, Days, NaiveDate};

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// This is the standard way of converting a date to a string in screentime.
pub fn date_to_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Inverse of [date_to_key]. Only accepts ISO `YYYY-MM-DD`.
pub fn key_to_date(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), DATE_KEY_FORMAT).ok()
}

/// Returns the Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset))
        .unwrap_or(NaiveDate::MIN)
}

/// Returns `days` consecutive dates ending at `end` (inclusive), oldest first.
pub fn days_ending_at(end: NaiveDate, days: u32) -> impl Iterator<Item = NaiveDate> {
    let start = match days {
        0 => end,
        days => end
            .checked_sub_days(Days::new(u64::from(days - 1)))
            .unwrap_or(NaiveDate::MIN),
    };
    start
        .iter_days()
        .take_while(move |v| *v <= end)
        .take(days as usize)
}
