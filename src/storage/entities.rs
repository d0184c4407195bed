use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::{
    ledger::{Category, DailyRecord, InvalidUsageValue, Minutes, UsageLedger},
    utils::time::{date_to_key, key_to_date},
};

/// The shape written to disk: ISO date -> category name -> minutes. Dates are sorted and
/// categories follow [Category] order.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LedgerEntity {
    pub days: BTreeMap<String, BTreeMap<Category, Minutes>>,
}

impl From<&UsageLedger> for LedgerEntity {
    fn from(ledger: &UsageLedger) -> Self {
        Self {
            days: ledger
                .entries()
                .map(|(date, record)| (date_to_key(date), record.iter().collect()))
                .collect(),
        }
    }
}

/// The shape read from disk. Kept loose on purpose so that one bad value doesn't make the whole
/// ledger unreadable.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct RawLedgerEntity {
    pub days: BTreeMap<String, Value>,
}

impl RawLedgerEntity {
    /// Converts into ledger records, skipping dates and categories that can't be understood and
    /// recording 0 for invalid amounts.
    pub fn into_records(self) -> Vec<(NaiveDate, DailyRecord)> {
        self.days
            .into_iter()
            .filter_map(|(key, value)| {
                let Some(date) = key_to_date(&key) else {
                    warn!("Skipping ledger entry with illegal date {key:?}");
                    return None;
                };
                let categories = match value {
                    Value::Object(categories) => categories,
                    other => {
                        warn!("Skipping ledger entry {key}, expected an object but found {other}");
                        return None;
                    }
                };
                let record = categories
                    .into_iter()
                    .filter_map(|(name, value)| match name.parse::<Category>() {
                        Ok(category) => Some((category, minutes_or_zero(&key, category, &value))),
                        Err(e) => {
                            warn!("Skipping {name:?} in ledger entry {key}: {e}");
                            None
                        }
                    })
                    .collect();
                Some((date, record))
            })
            .collect()
    }
}

fn minutes_or_zero(key: &str, category: Category, value: &Value) -> Minutes {
    minutes_from_value(value).unwrap_or_else(|e| {
        warn!("Ledger entry {key} {category}: {e}, using 0");
        Minutes::ZERO
    })
}

/// Accepts whole non-negative numbers and strings containing them.
pub fn minutes_from_value(value: &Value) -> Result<Minutes, InvalidUsageValue> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .map(Minutes::new)
            .ok_or_else(|| InvalidUsageValue {
                input: n.to_string(),
            }),
        Value::String(s) => s.parse(),
        other => Err(InvalidUsageValue {
            input: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use crate::ledger::{Category, CategoryLimits, DailyRecord, Minutes, UsageLedger};

    use super::{minutes_from_value, LedgerEntity, RawLedgerEntity};

    const TEST_DATE: NaiveDate = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();

    #[test]
    fn test_minutes_from_value() {
        assert_eq!(minutes_from_value(&json!(30)), Ok(Minutes::new(30)));
        assert_eq!(minutes_from_value(&json!("30")), Ok(Minutes::new(30)));
        assert!(minutes_from_value(&json!(-1)).is_err());
        assert!(minutes_from_value(&json!(2.5)).is_err());
        assert!(minutes_from_value(&json!("abc")).is_err());
        assert!(minutes_from_value(&json!(null)).is_err());
        assert!(minutes_from_value(&json!(u64::from(u32::MAX) + 1)).is_err());
    }

    #[test]
    fn test_raw_entity_coerces_and_skips() {
        let raw: RawLedgerEntity = serde_json::from_value(json!({
            "2024-06-03": { "games": "abc", "education": 120, "SNS": 15, "homework": 30 },
            "not a date": { "games": 10 },
            "2024-06-04": 12,
        }))
        .unwrap();

        let records = raw.into_records();
        assert_eq!(records.len(), 1);
        let (date, record) = &records[0];
        assert_eq!(*date, TEST_DATE);
        assert_eq!(record.get(Category::Games), Minutes::ZERO);
        assert_eq!(record.get(Category::Education), Minutes::new(120));
        assert_eq!(record.get(Category::Social), Minutes::new(15));
        assert_eq!(record.iter().count(), 3);
    }

    #[test]
    fn test_entity_layout() {
        let ledger = UsageLedger::from_records(
            CategoryLimits::default(),
            [(
                TEST_DATE,
                DailyRecord::complete([(Category::Games, Minutes::new(90))]),
            )],
        );
        let value = serde_json::to_value(LedgerEntity::from(&ledger)).unwrap();
        assert_eq!(
            value,
            json!({
                "2024-06-03": {
                    "education": 0,
                    "games": 90,
                    "entertainment": 0,
                    "video": 0,
                    "social": 0,
                    "messaging": 0,
                }
            })
        );
    }
}
