//! Text rendering of ledger queries. Everything here only formats what the ledger returned.

use std::fmt::Write;

use ansi_term::{Colour, Style};
use chrono::NaiveDate;

use crate::{
    ledger::{Category, CategoryStatus, DailyRecord, Minutes},
    utils::time::date_to_key,
};

/// Width of a category column in the calendar sheet.
const SHEET_COLUMN: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    plain: bool,
}

impl Palette {
    pub fn new(plain: bool) -> Self {
        Self { plain }
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.plain {
            text.to_string()
        } else {
            style.paint(text).to_string()
        }
    }
}

/// Calendar sheet with one row per day and one column per category.
pub fn render_calendar(window: &[(NaiveDate, DailyRecord)], palette: Palette) -> String {
    let mut out = String::new();
    let header = Category::ALL
        .iter()
        .map(|c| format!("{:>SHEET_COLUMN$}", short_name(*c)))
        .collect::<Vec<_>>()
        .join(" | ");
    let header = format!("{:<12} | {header}", "Date");
    let _ = writeln!(out, "{}", palette.paint(Style::new().bold(), &header));
    let _ = writeln!(out, "{}", "-".repeat(header.len()));

    for (date, record) in window {
        let row = Category::ALL
            .iter()
            .map(|c| format!("{:>SHEET_COLUMN$}", *record.get(*c)))
            .collect::<Vec<_>>()
            .join(" | ");
        let _ = writeln!(out, "{:<12} | {row}", date_to_key(*date));
    }
    out
}

/// Daily limit check. Prints a notice instead of a table when nothing was entered for the day.
pub fn render_daily_status(
    date: NaiveDate,
    has_entry: bool,
    statuses: &[CategoryStatus],
    palette: Palette,
) -> String {
    if !has_entry {
        return format!("No usage entered for {}.\n", date_to_key(date));
    }
    let mut out = format!("Usage for {}:\n", date_to_key(date));
    write_statuses(&mut out, statuses, "no limit", palette);
    out
}

pub fn render_weekly_status(
    week_start: NaiveDate,
    reference: NaiveDate,
    statuses: &[CategoryStatus],
    palette: Palette,
) -> String {
    let mut out = format!(
        "Weekly usage from {} to {}:\n",
        date_to_key(week_start),
        date_to_key(reference)
    );
    write_statuses(&mut out, statuses, "no weekly limit", palette);
    out
}

fn write_statuses(
    out: &mut String,
    statuses: &[CategoryStatus],
    unlimited: &str,
    palette: Palette,
) {
    for status in statuses {
        let line = match status.limit {
            Some(limit) => format!("{}: {} (limit: {})", status.category, status.used, limit),
            None => format!("{}: {} ({unlimited})", status.category, status.used),
        };
        let marker = match (status.limit, status.exceeded) {
            (Some(_), true) => palette.paint(Colour::Red.bold(), "OVER"),
            (Some(_), false) => palette.paint(Colour::Green.normal(), "ok  "),
            (None, _) => "    ".to_string(),
        };
        let _ = writeln!(out, "  {marker}  {line}");
    }
}

/// Time left per category. `None` means the category has no limit.
pub fn render_remaining(
    date: NaiveDate,
    remaining: &[(Category, Option<Minutes>)],
    palette: Palette,
) -> String {
    let mut out = format!("Remaining time for {}:\n", date_to_key(date));
    for (category, left) in remaining {
        let value = match left {
            Some(left) if **left == 0 => palette.paint(Colour::Red.normal(), "none left"),
            Some(left) => left.to_string(),
            None => "unlimited".to_string(),
        };
        let _ = writeln!(out, "  {category}: {value}");
    }
    out
}

/// Every recorded day in date order.
pub fn render_summary<'a>(entries: impl IntoIterator<Item = (NaiveDate, &'a DailyRecord)>) -> String {
    let mut out = String::new();
    for (date, record) in entries {
        let _ = writeln!(out, "  {}:", date_to_key(date));
        for (category, minutes) in record.iter() {
            let _ = writeln!(out, "    {category}: {minutes}");
        }
        let _ = writeln!(out, "    total: {}", record.total());
    }
    if out.is_empty() {
        return "No usage recorded yet.\n".to_string();
    }
    format!("Daily usage summary:\n{out}")
}

fn short_name(category: Category) -> &'static str {
    &category.name()[..4]
}
