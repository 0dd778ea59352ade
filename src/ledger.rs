//! Session ledger
//!
//! A session's transactions in upstream page order (newest first). Records
//! are appended while paging and only ever removed by the trailing window.

use chrono::{Months, NaiveDate};
use serde::Serialize;

use crate::error::AppErrors as Error;
use crate::model::transaction::TransactionRecord;

#[derive(Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct Ledger {
    records: Vec<TransactionRecord>,
}

impl Ledger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = TransactionRecord>) {
        self.records.extend(records);
    }

    /// Drop the cutoff record and everything after it.
    ///
    /// The cut starts at the first record dated exactly `cutoff`. When no record
    /// falls on that day it starts at the first record dated before it. Returns
    /// the number of records removed.
    pub fn truncate_from_cutoff(&mut self, cutoff: NaiveDate) -> usize {
        let position = self
            .records
            .iter()
            .position(|r| r.date == cutoff)
            .or_else(|| self.records.iter().position(|r| r.date < cutoff));

        match position {
            Some(index) => {
                let removed = self.records.len() - index;
                self.records.truncate(index);
                removed
            }
            None => 0,
        }
    }
}

/// The oldest day outside a `months` wide window ending yesterday.
///
/// One day is taken off `today` first, then whole calendar months. A day that
/// doesn't exist in the target month clamps to that month's last day.
///
/// # Errors
/// Will return an error if the result falls outside the supported date range.
pub fn cutoff_date(today: NaiveDate, months: u32) -> Result<NaiveDate, Error> {
    today
        .pred_opt()
        .and_then(|yesterday| yesterday.checked_sub_months(Months::new(months)))
        .ok_or_else(|| Error::DateOutOfRange(format!("{today} minus {months} months and a day")))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tests::test::record;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily_ledger(newest: NaiveDate, days: u64) -> Ledger {
        let mut ledger = Ledger::new();
        ledger.extend((0..days).map(|i| {
            let date = newest - chrono::Days::new(i);
            record(&date.format("%Y-%m-%d").to_string(), "Daily")
        }));
        ledger
    }

    #[test]
    fn cutoff_subtracts_a_day_then_months() {
        assert_eq!(cutoff_date(ymd(2024, 6, 15), 3).unwrap(), ymd(2024, 3, 14));
        assert_eq!(cutoff_date(ymd(2024, 1, 1), 3).unwrap(), ymd(2023, 9, 30));
    }

    #[test]
    fn cutoff_clamps_to_the_end_of_short_months() {
        // 2024-06-01 -> 2024-05-31 -> no 31st of February
        assert_eq!(cutoff_date(ymd(2024, 6, 1), 3).unwrap(), ymd(2024, 2, 29));
        assert_eq!(cutoff_date(ymd(2023, 6, 1), 3).unwrap(), ymd(2023, 2, 28));
        // 2024-08-01 -> 2024-07-31 -> no 31st of April
        assert_eq!(cutoff_date(ymd(2024, 8, 1), 3).unwrap(), ymd(2024, 4, 30));
    }

    #[test]
    fn window_over_two_hundred_days_keeps_only_recent_records() {
        let today = ymd(2024, 6, 15);
        let mut ledger = daily_ledger(today, 200);
        let cutoff = cutoff_date(today, 3).unwrap();

        ledger.truncate_from_cutoff(cutoff);

        assert!(ledger.records().iter().all(|r| r.date > cutoff));
        let too_old = ymd(2024, 3, 13);
        assert!(!ledger.records().iter().any(|r| r.date == too_old));
        assert_eq!(ledger.records().last().unwrap().date, ymd(2024, 3, 15));
        // 15 June back to 15 March inclusive
        assert_eq!(ledger.len(), 93);
    }

    #[test]
    fn missing_cutoff_day_cuts_at_first_older_record() {
        let mut ledger = Ledger::new();
        ledger.extend([
            record("2024-03-18", "Mon"),
            record("2024-03-15", "Fri"),
            record("2024-03-14", "Thu"),
        ]);

        // Saturday, nothing booked
        let removed = ledger.truncate_from_cutoff(ymd(2024, 3, 16));

        assert_eq!(removed, 2);
        assert_eq!(ledger.records(), &[record("2024-03-18", "Mon")]);
    }

    #[test]
    fn exact_match_wins_over_earlier_older_record() {
        let mut ledger = Ledger::new();
        ledger.extend([
            record("2024-03-20", "New"),
            record("2024-03-01", "Stray old"),
            record("2024-03-14", "Cutoff"),
            record("2024-03-10", "Older"),
        ]);

        ledger.truncate_from_cutoff(ymd(2024, 3, 14));

        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn nothing_old_enough_leaves_the_ledger_alone() {
        let mut ledger = daily_ledger(ymd(2024, 6, 15), 10);

        let removed = ledger.truncate_from_cutoff(ymd(2024, 3, 14));

        assert_eq!(removed, 0);
        assert_eq!(ledger.len(), 10);
    }

    #[test]
    fn empty_ledger_stays_empty() {
        let mut ledger = Ledger::new();

        assert_eq!(ledger.truncate_from_cutoff(ymd(2024, 3, 14)), 0);
        assert!(ledger.is_empty());
    }
}
