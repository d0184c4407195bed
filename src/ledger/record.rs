use std::collections::BTreeMap;

use super::{category::Category, minutes::Minutes};

/// Minutes per category for a single day. A category that isn't present counts as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyRecord {
    minutes: BTreeMap<Category, Minutes>,
}

impl DailyRecord {
    /// Record with an explicit entry for every category, zero unless given in `entries`.
    pub fn complete(entries: impl IntoIterator<Item = (Category, Minutes)>) -> Self {
        let mut record = Self::zeroed();
        for (category, minutes) in entries {
            record.set(category, minutes);
        }
        record
    }

    pub fn zeroed() -> Self {
        Category::ALL
            .into_iter()
            .map(|category| (category, Minutes::ZERO))
            .collect()
    }

    pub fn get(&self, category: Category) -> Minutes {
        self.minutes.get(&category).copied().unwrap_or_default()
    }

    pub fn set(&mut self, category: Category, minutes: Minutes) {
        self.minutes.insert(category, minutes);
    }

    /// Stored entries in category order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, Minutes)> + '_ {
        self.minutes.iter().map(|(c, m)| (*c, *m))
    }

    pub fn total(&self) -> Minutes {
        self.minutes.values().copied().sum()
    }
}

impl FromIterator<(Category, Minutes)> for DailyRecord {
    fn from_iter<T: IntoIterator<Item = (Category, Minutes)>>(iter: T) -> Self {
        Self {
            minutes: iter.into_iter().collect(),
        }
    }
}
