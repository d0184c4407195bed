use std::{collections::BTreeMap, io::ErrorKind, path::Path};

use serde_json::Value;
use tracing::{debug, warn};

use crate::ledger::{Category, CategoryLimits};

use super::entities::minutes_from_value;

pub const LIMITS_FILE: &str = "limits.json";

/// Reads daily limits from `limits.json` in the application directory, for example
/// `{ "games": 60, "education": 300, "video": null }`.
///
/// When the file exists, only the categories listed with a number are limited. A missing or
/// unreadable file falls back to [CategoryLimits::default].
pub async fn load_limits(app_dir: &Path) -> CategoryLimits {
    let path = app_dir.join(LIMITS_FILE);
    let content = match tokio::fs::read_to_string(&path).await {
        Ok(v) => v,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No {path:?}, using default limits");
            return CategoryLimits::default();
        }
        Err(e) => {
            warn!("Failed to read {path:?}, using default limits: {e}");
            return CategoryLimits::default();
        }
    };
    parse_limits(&content).unwrap_or_else(|e| {
        warn!("Failed to parse {path:?}, using default limits: {e}");
        CategoryLimits::default()
    })
}

fn parse_limits(content: &str) -> serde_json::Result<CategoryLimits> {
    let raw = serde_json::from_str::<BTreeMap<String, Value>>(content)?;
    Ok(raw
        .into_iter()
        .filter_map(|(name, value)| {
            let category = name
                .parse::<Category>()
                .inspect_err(|e| warn!("Ignoring limit for {name:?}: {e}"))
                .ok()?;
            if value.is_null() {
                return None;
            }
            let limit = minutes_from_value(&value)
                .inspect_err(|e| warn!("Ignoring limit for {category}: {e}"))
                .ok()?;
            Some((category, limit))
        })
        .collect())
}
