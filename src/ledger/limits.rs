use std::collections::BTreeMap;

use super::{category::Category, minutes::Minutes};

pub const DAYS_IN_WEEK: u32 = 7;

/// Daily limits per category. Categories without an entry are unlimited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLimits {
    daily: BTreeMap<Category, Minutes>,
}

impl Default for CategoryLimits {
    fn default() -> Self {
        Self::unlimited()
            .with_limit(Category::Education, Minutes::new(300))
            .with_limit(Category::Games, Minutes::new(60))
            .with_limit(Category::Entertainment, Minutes::new(100))
            .with_limit(Category::Social, Minutes::new(60))
    }
}

impl CategoryLimits {
    pub fn unlimited() -> Self {
        Self {
            daily: BTreeMap::new(),
        }
    }

    pub fn with_limit(mut self, category: Category, limit: Minutes) -> Self {
        self.daily.insert(category, limit);
        self
    }

    pub fn daily(&self, category: Category) -> Option<Minutes> {
        self.daily.get(&category).copied()
    }

    pub fn weekly(&self, category: Category) -> Option<Minutes> {
        self.daily(category)
            .map(|limit| limit.saturating_mul(DAYS_IN_WEEK))
    }

    /// Weekly limits derived from the daily ones. Unlimited categories stay unlimited.
    pub fn to_weekly(&self) -> CategoryLimits {
        Self {
            daily: self
                .daily
                .keys()
                .filter_map(|c| self.weekly(*c).map(|limit| (*c, limit)))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, Minutes)> + '_ {
        self.daily.iter().map(|(c, m)| (*c, *m))
    }
}

impl FromIterator<(Category, Minutes)> for CategoryLimits {
    fn from_iter<T: IntoIterator<Item = (Category, Minutes)>>(iter: T) -> Self {
        Self {
            daily: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ledger::{category::Category, minutes::Minutes};

    use super::CategoryLimits;

    #[test]
    fn test_default_limits() {
        let limits = CategoryLimits::default();
        assert_eq!(limits.daily(Category::Games), Some(Minutes::new(60)));
        assert_eq!(limits.daily(Category::Education), Some(Minutes::new(300)));
        assert_eq!(limits.daily(Category::Video), None);
        assert_eq!(limits.daily(Category::Messaging), None);
    }

    #[test]
    fn test_weekly_is_seven_times_daily() {
        let limits = CategoryLimits::default();
        assert_eq!(limits.weekly(Category::Games), Some(Minutes::new(420)));
        assert_eq!(limits.weekly(Category::Video), None);

        let weekly = limits.to_weekly();
        assert_eq!(weekly.daily(Category::Entertainment), Some(Minutes::new(700)));
        assert_eq!(weekly.daily(Category::Video), None);
        assert_eq!(weekly.iter().count(), limits.iter().count());
    }
}
