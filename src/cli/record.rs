use anyhow::Result;
use clap::CommandFactory;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::warn;

use crate::ledger::{Category, Minutes};

use super::Args;

/// Entry collected from the user. `accepted` is false when the input was replaced by 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageEntry {
    pub category: Category,
    pub minutes: Minutes,
    pub accepted: bool,
}

impl UsageEntry {
    fn from_input(category: Category, input: &str) -> Self {
        match input.parse::<Minutes>() {
            Ok(minutes) => Self {
                category,
                minutes,
                accepted: true,
            },
            Err(e) => {
                warn!("{category}: {e}, recording 0 instead");
                Self {
                    category,
                    minutes: Minutes::ZERO,
                    accepted: false,
                }
            }
        }
    }
}

/// Parses `category=minutes` pairs given on the command line. An unknown category is a usage
/// error, a bad amount is recorded as 0.
pub fn parse_pairs(pairs: &[String]) -> Result<Vec<UsageEntry>> {
    pairs
        .iter()
        .map(|pair| {
            let Some((name, value)) = pair.split_once('=') else {
                return Err(validation_error(format!(
                    "Expected CATEGORY=MINUTES but got {pair:?}"
                )));
            };
            let category = name
                .parse::<Category>()
                .map_err(|e| validation_error(e.to_string()))?;
            Ok(UsageEntry::from_input(category, value))
        })
        .collect()
}

fn validation_error(message: String) -> anyhow::Error {
    Args::command()
        .error(clap::error::ErrorKind::ValueValidation, message)
        .into()
}

/// Asks for every category in order, one line each. A closed input counts as an empty answer.
pub async fn prompt_entries(
    input: &mut (impl AsyncBufRead + Unpin),
    output: &mut (impl AsyncWrite + Unpin),
) -> Result<Vec<UsageEntry>> {
    let mut entries = Vec::with_capacity(Category::ALL.len());
    for category in Category::ALL {
        output
            .write_all(format!("  {} usage (min): ", capitalize(category.name())).as_bytes())
            .await?;
        output.flush().await?;

        let mut line = String::new();
        input.read_line(&mut line).await?;
        let entry = UsageEntry::from_input(category, &line);
        if !entry.accepted {
            output
                .write_all(b"  Invalid input, recorded 0. Please enter a number next time.\n")
                .await?;
        }
        entries.push(entry);
    }
    Ok(entries)
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
