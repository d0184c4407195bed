use std::fmt::Display;

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate};
use chrono_english::parse_date_string;
use clap::{CommandFactory, ValueEnum};

use crate::utils::time::key_to_date;

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct DateArg {
    #[arg(
        long,
        short,
        help = "Date to use, today when omitted. Examples are \"2025-03-15\", \"yesterday\", \"15/03/2025\", \"last monday\""
    )]
    pub date: Option<String>,
}

impl DateArg {
    pub fn resolve(&self, now: DateTime<Local>, style: DateStyle) -> Result<NaiveDate> {
        parse_date(self.date.as_deref(), now, style)
    }
}

/// A blank date means today. ISO dates are tried first, anything else goes through
/// chrono-english with the selected dialect.
pub fn parse_date(input: Option<&str>, now: DateTime<Local>, style: DateStyle) -> Result<NaiveDate> {
    let input = match input.map(str::trim) {
        None | Some("") => return Ok(now.date_naive()),
        Some(v) => v,
    };
    if let Some(date) = key_to_date(input) {
        return Ok(date);
    }
    match parse_date_string(input, now, style.into()) {
        Ok(v) => Ok(v.date_naive()),
        Err(e) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate date {input:?}: {e}"),
            )
            .into()),
    }
}
