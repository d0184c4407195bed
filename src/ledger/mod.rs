//! In-memory usage ledger. Maps a calendar date to the minutes spent in each [Category] and
//! answers limit questions over it.
//!
//! The ledger itself never touches the disk; loading and saving is done wholesale by
//! [crate::storage].

pub mod category;
pub mod limits;
pub mod minutes;
pub mod record;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, instrument};

pub use category::Category;
pub use limits::CategoryLimits;
pub use minutes::{InvalidUsageValue, Minutes};
pub use record::DailyRecord;

use crate::utils::time::{days_ending_at, week_start};

/// Number of days shown by the calendar sheet unless asked otherwise.
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// Longest window the calendar sheet will build, a little over a year.
pub const MAX_WINDOW_DAYS: u32 = 366;

/// Usage of one category compared against its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStatus {
    pub category: Category,
    pub used: Minutes,
    pub limit: Option<Minutes>,
    /// Usage is strictly greater than the limit. Always false for unlimited categories.
    pub exceeded: bool,
}

impl CategoryStatus {
    fn evaluate(category: Category, used: Minutes, limit: Option<Minutes>) -> Self {
        Self {
            category,
            used,
            limit,
            exceeded: limit.is_some_and(|limit| used > limit),
        }
    }

    /// Minutes left before the limit is reached. None for unlimited categories.
    pub fn remaining(&self) -> Option<Minutes> {
        self.limit.map(|limit| limit.saturating_sub(self.used))
    }
}

#[derive(Debug, Clone, Default)]
pub struct UsageLedger {
    records: BTreeMap<NaiveDate, DailyRecord>,
    limits: CategoryLimits,
}

impl UsageLedger {
    pub fn new(limits: CategoryLimits) -> Self {
        Self {
            records: BTreeMap::new(),
            limits,
        }
    }

    pub fn from_records(
        limits: CategoryLimits,
        records: impl IntoIterator<Item = (NaiveDate, DailyRecord)>,
    ) -> Self {
        Self {
            records: records.into_iter().collect(),
            limits,
        }
    }

    /// Replaces the record for `date`. Categories missing from `minutes` are recorded as 0.
    #[instrument(skip(self, minutes))]
    pub fn record_usage(
        &mut self,
        date: NaiveDate,
        minutes: impl IntoIterator<Item = (Category, Minutes)>,
    ) {
        let record = DailyRecord::complete(minutes);
        debug!("Recording {record:?}");
        self.records.insert(date, record);
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyRecord> {
        self.records.get(&date)
    }

    pub fn has_entry(&self, date: NaiveDate) -> bool {
        self.records.contains_key(&date)
    }

    /// Every recorded day, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = (NaiveDate, &DailyRecord)> {
        self.records.iter().map(|(date, record)| (*date, record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn usage(&self, date: NaiveDate, category: Category) -> Minutes {
        self.get(date)
            .map(|record| record.get(category))
            .unwrap_or_default()
    }

    /// Usage of every category on `date` compared against the daily limits.
    pub fn daily_status(&self, date: NaiveDate) -> Vec<CategoryStatus> {
        Category::ALL
            .into_iter()
            .map(|category| {
                CategoryStatus::evaluate(
                    category,
                    self.usage(date, category),
                    self.limits.daily(category),
                )
            })
            .collect()
    }

    /// Usage summed from the Monday on or before `reference` through `reference`, compared
    /// against the weekly limits.
    pub fn weekly_status(&self, reference: NaiveDate) -> Vec<CategoryStatus> {
        let week = week_start(reference)..=reference;
        Category::ALL
            .into_iter()
            .map(|category| {
                let used: Minutes = self
                    .records
                    .range(week.clone())
                    .map(|(_, record)| record.get(category))
                    .sum();
                CategoryStatus::evaluate(category, used, self.limits.weekly(category))
            })
            .collect()
    }

    /// `days` dates ending at `reference`, oldest first. Days without an entry come back zeroed.
    /// Never longer than [MAX_WINDOW_DAYS].
    pub fn recent_window(&self, reference: NaiveDate, days: u32) -> Vec<(NaiveDate, DailyRecord)> {
        days_ending_at(reference, days.min(MAX_WINDOW_DAYS))
            .map(|date| {
                let record = self
                    .get(date)
                    .cloned()
                    .unwrap_or_else(DailyRecord::zeroed);
                (date, record)
            })
            .collect()
    }

    /// Minutes left for `category` on `date`, never negative. None when the category has no limit.
    pub fn remaining(&self, date: NaiveDate, category: Category) -> Option<Minutes> {
        CategoryStatus::evaluate(
            category,
            self.usage(date, category),
            self.limits.daily(category),
        )
        .remaining()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};

    use super::{Category, CategoryLimits, CategoryStatus, DailyRecord, Minutes, UsageLedger};

    const MONDAY: NaiveDate = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
    const SUNDAY: NaiveDate = NaiveDate::from_ymd_opt(2024, 6, 9).unwrap();

    fn games_limited() -> CategoryLimits {
        CategoryLimits::unlimited().with_limit(Category::Games, Minutes::new(60))
    }

    fn find(statuses: &[CategoryStatus], category: Category) -> CategoryStatus {
        *statuses.iter().find(|v| v.category == category).unwrap()
    }

    #[test]
    fn test_daily_status_over_limit() {
        let mut ledger = UsageLedger::new(games_limited());
        ledger.record_usage(MONDAY, [(Category::Games, Minutes::new(90))]);

        let games = find(&ledger.daily_status(MONDAY), Category::Games);
        assert_eq!(
            games,
            CategoryStatus {
                category: Category::Games,
                used: Minutes::new(90),
                limit: Some(Minutes::new(60)),
                exceeded: true,
            }
        );
        assert_eq!(ledger.remaining(MONDAY, Category::Games), Some(Minutes::ZERO));
        assert_eq!(games.remaining(), Some(Minutes::ZERO));
    }

    #[test]
    fn test_daily_status_empty_date_is_zero() {
        let ledger = UsageLedger::new(CategoryLimits::default());
        let statuses = ledger.daily_status(MONDAY);

        assert_eq!(statuses.len(), Category::ALL.len());
        for status in statuses {
            assert_eq!(status.used, Minutes::ZERO);
            assert!(!status.exceeded);
        }
    }

    #[test]
    fn test_daily_status_follows_category_order() {
        let mut ledger = UsageLedger::new(CategoryLimits::default());
        ledger.record_usage(
            MONDAY,
            [
                (Category::Messaging, Minutes::new(1)),
                (Category::Education, Minutes::new(2)),
            ],
        );
        let order = ledger
            .daily_status(MONDAY)
            .into_iter()
            .map(|v| v.category)
            .collect::<Vec<_>>();
        assert_eq!(order, Category::ALL.to_vec());
    }

    #[test]
    fn test_unlimited_category_never_exceeded() {
        let mut ledger = UsageLedger::new(games_limited());
        for (offset, date) in MONDAY.iter_days().take(7).enumerate() {
            ledger.record_usage(date, [(Category::Video, Minutes::new(u32::MAX - offset as u32))]);
        }

        let daily = find(&ledger.daily_status(MONDAY), Category::Video);
        assert_eq!(daily.limit, None);
        assert!(!daily.exceeded);

        let weekly = find(&ledger.weekly_status(SUNDAY), Category::Video);
        assert_eq!(weekly.used, Minutes::new(u32::MAX));
        assert!(!weekly.exceeded);
        assert_eq!(ledger.remaining(MONDAY, Category::Video), None);
    }

    #[test]
    fn test_remaining_within_limit() {
        let mut ledger = UsageLedger::new(games_limited());
        ledger.record_usage(MONDAY, [(Category::Games, Minutes::new(45))]);
        assert_eq!(ledger.remaining(MONDAY, Category::Games), Some(Minutes::new(15)));

        ledger.record_usage(MONDAY, [(Category::Games, Minutes::new(60))]);
        assert_eq!(ledger.remaining(MONDAY, Category::Games), Some(Minutes::ZERO));
        assert!(!find(&ledger.daily_status(MONDAY), Category::Games).exceeded);

        assert_eq!(ledger.remaining(SUNDAY, Category::Games), Some(Minutes::new(60)));
    }

    #[test]
    fn test_record_usage_replaces_day() {
        let mut ledger = UsageLedger::new(CategoryLimits::default());
        ledger.record_usage(
            MONDAY,
            [
                (Category::Games, Minutes::new(30)),
                (Category::Social, Minutes::new(20)),
            ],
        );
        ledger.record_usage(MONDAY, [(Category::Games, Minutes::new(10))]);

        assert_eq!(ledger.usage(MONDAY, Category::Games), Minutes::new(10));
        assert_eq!(ledger.usage(MONDAY, Category::Social), Minutes::ZERO);
        assert_eq!(
            ledger.get(MONDAY).unwrap(),
            &DailyRecord::complete([(Category::Games, Minutes::new(10))])
        );
    }

    #[test]
    fn test_record_usage_is_idempotent() {
        let entries = [
            (Category::Games, Minutes::new(61)),
            (Category::Education, Minutes::new(120)),
        ];
        let mut once = UsageLedger::new(CategoryLimits::default());
        once.record_usage(MONDAY, entries);

        let mut twice = UsageLedger::new(CategoryLimits::default());
        twice.record_usage(MONDAY, entries);
        twice.record_usage(MONDAY, entries);

        assert_eq!(once.daily_status(MONDAY), twice.daily_status(MONDAY));
        assert_eq!(twice.len(), 1);
    }

    #[test]
    fn test_weekly_status_exceeds_by_one_minute() {
        let mut ledger = UsageLedger::new(games_limited());
        for date in MONDAY.iter_days().take(6) {
            ledger.record_usage(date, [(Category::Games, Minutes::new(60))]);
        }
        ledger.record_usage(SUNDAY, [(Category::Games, Minutes::new(61))]);

        let games = find(&ledger.weekly_status(SUNDAY), Category::Games);
        assert_eq!(games.used, Minutes::new(421));
        assert_eq!(games.limit, Some(Minutes::new(420)));
        assert!(games.exceeded);
    }

    #[test]
    fn test_weekly_status_matches_daily_sum_and_ignores_outside_dates() {
        let mut ledger = UsageLedger::new(CategoryLimits::default());
        let previous_sunday = MONDAY.checked_sub_days(Days::new(1)).unwrap();
        let next_monday = SUNDAY.checked_add_days(Days::new(1)).unwrap();
        ledger.record_usage(previous_sunday, [(Category::Games, Minutes::new(500))]);
        ledger.record_usage(next_monday, [(Category::Games, Minutes::new(500))]);
        for (offset, date) in MONDAY.iter_days().take(7).enumerate() {
            ledger.record_usage(
                date,
                [
                    (Category::Games, Minutes::new(offset as u32 * 10)),
                    (Category::Education, Minutes::new(5)),
                ],
            );
        }

        let weekly = ledger.weekly_status(SUNDAY);
        for category in Category::ALL {
            let expected: Minutes = MONDAY
                .iter_days()
                .take(7)
                .map(|date| find(&ledger.daily_status(date), category).used)
                .sum();
            assert_eq!(find(&weekly, category).used, expected);
        }
        assert_eq!(find(&weekly, Category::Games).used, Minutes::new(210));
        assert_eq!(find(&weekly, Category::Education).used, Minutes::new(35));
    }

    #[test]
    fn test_weekly_status_stops_at_reference_date() {
        let mut ledger = UsageLedger::new(games_limited());
        let wednesday = MONDAY.checked_add_days(Days::new(2)).unwrap();
        for date in MONDAY.iter_days().take(7) {
            ledger.record_usage(date, [(Category::Games, Minutes::new(100))]);
        }

        let games = find(&ledger.weekly_status(wednesday), Category::Games);
        assert_eq!(games.used, Minutes::new(300));
        assert!(!games.exceeded);
    }

    #[test]
    fn test_recent_window_defaults_missing_days() {
        let mut ledger = UsageLedger::new(CategoryLimits::default());
        ledger.record_usage(SUNDAY, [(Category::Games, Minutes::new(15))]);
        ledger.record_usage(MONDAY, [(Category::Social, Minutes::new(25))]);

        let window = ledger.recent_window(SUNDAY, super::DEFAULT_WINDOW_DAYS);
        assert_eq!(window.len(), 7);
        assert_eq!(window.first().unwrap().0, MONDAY);
        assert_eq!(window.last().unwrap().0, SUNDAY);
        assert_eq!(window[0].1.get(Category::Social), Minutes::new(25));
        assert_eq!(window[3].1, DailyRecord::zeroed());
        assert_eq!(window[6].1.get(Category::Games), Minutes::new(15));

        assert!(ledger.recent_window(SUNDAY, 0).is_empty());
    }

    #[test]
    fn test_recent_window_is_capped() {
        let ledger = UsageLedger::new(CategoryLimits::default());

        let window = ledger.recent_window(SUNDAY, u32::MAX);

        assert_eq!(window.len(), super::MAX_WINDOW_DAYS as usize);
        assert_eq!(window.last().unwrap().0, SUNDAY);
    }

    #[test]
    fn test_entries_sorted_by_date() {
        let mut ledger = UsageLedger::new(CategoryLimits::default());
        ledger.record_usage(SUNDAY, Vec::new());
        ledger.record_usage(MONDAY, Vec::new());
        let dates = ledger.entries().map(|v| v.0).collect::<Vec<_>>();
        assert_eq!(dates, vec![MONDAY, SUNDAY]);
        assert!(ledger.has_entry(MONDAY));
        assert!(!ledger.has_entry(MONDAY.succ_opt().unwrap()));
    }
}
