//! The query engine: pure filters over a snapshot of records.
//!
//! Two query shapes are supported:
//!
//! - [`upcoming_within`]: records whose next anniversary falls inside an
//!   inclusive window starting today.
//! - [`search_by`]: records whose birthday matches every supplied component
//!   of a [`DateFilter`].
//!
//! Both preserve the order of the input slice.

use chrono::{Datelike, Days, NaiveDate};

use crate::{BirthdayRecord, Result, error::check_range};

// ─── Anniversaries ───────────────────────────────────────────────────────────

/// The occurrence of `birthday`'s month and day in `year`.
///
/// A February 29 birthday lands on February 28 when `year` is not a leap
/// year. Returns `None` only when `year` is outside the range chrono can
/// represent.
pub fn anniversary_in(birthday: NaiveDate, year: i32) -> Option<NaiveDate> {
  birthday
    .with_year(year)
    .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
}

/// The first anniversary of `birthday` on or after `today`.
pub fn next_anniversary(
  birthday: NaiveDate,
  today: NaiveDate,
) -> Option<NaiveDate> {
  let this_year = anniversary_in(birthday, today.year())?;
  if this_year < today {
    anniversary_in(birthday, today.year() + 1)
  } else {
    Some(this_year)
  }
}

// ─── Upcoming window ─────────────────────────────────────────────────────────

/// A validated look-ahead of 1 to 365 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpcomingWindow {
  days: u16,
}

impl UpcomingWindow {
  pub const DEFAULT_DAYS: i64 = 7;
  pub const MAX_DAYS: i64 = 365;
  pub const MIN_DAYS: i64 = 1;

  pub fn new(days: i64) -> Result<Self> {
    check_range("days", days, Self::MIN_DAYS, Self::MAX_DAYS)?;
    Ok(Self { days: days as u16 })
  }

  pub fn days(&self) -> u16 { self.days }

  /// Last date inside the window that starts on `today`.
  pub fn end(&self, today: NaiveDate) -> NaiveDate {
    today
      .checked_add_days(Days::new(u64::from(self.days)))
      .unwrap_or(NaiveDate::MAX)
  }

  /// Whether `date` lies in `[today, today + days]`.
  pub fn contains(&self, today: NaiveDate, date: NaiveDate) -> bool {
    today <= date && date <= self.end(today)
  }
}

impl Default for UpcomingWindow {
  fn default() -> Self {
    Self {
      days: Self::DEFAULT_DAYS as u16,
    }
  }
}

/// Records whose next anniversary falls within `window` of `today`.
pub fn upcoming_within<'a>(
  records: &'a [BirthdayRecord],
  today: NaiveDate,
  window: UpcomingWindow,
) -> impl Iterator<Item = &'a BirthdayRecord> + 'a {
  records.iter().filter(move |r| {
    next_anniversary(r.birthday, today)
      .is_some_and(|next| window.contains(today, next))
  })
}

// ─── Search ──────────────────────────────────────────────────────────────────

/// Optional day, month and year constraints on a birthday.
///
/// Each component is either absent (no constraint) or a validated value;
/// there is no sentinel for "unset".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateFilter {
  day:   Option<u32>,
  month: Option<u32>,
  year:  Option<i32>,
}

impl DateFilter {
  /// Validate the supplied components: day 1–31, month 1–12, year 1900–2100.
  pub fn new(
    day: Option<i64>,
    month: Option<i64>,
    year: Option<i64>,
  ) -> Result<Self> {
    if let Some(d) = day {
      check_range("day", d, 1, 31)?;
    }
    if let Some(m) = month {
      check_range("month", m, 1, 12)?;
    }
    if let Some(y) = year {
      check_range("year", y, 1900, 2100)?;
    }
    Ok(Self {
      day:   day.map(|d| d as u32),
      month: month.map(|m| m as u32),
      year:  year.map(|y| y as i32),
    })
  }

  /// True when no component is constrained.
  pub fn is_empty(&self) -> bool {
    self.day.is_none() && self.month.is_none() && self.year.is_none()
  }

  pub fn matches(&self, date: NaiveDate) -> bool {
    self.day.is_none_or(|d| date.day() == d)
      && self.month.is_none_or(|m| date.month() == m)
      && self.year.is_none_or(|y| date.year() == y)
  }
}

/// Records whose birthday satisfies `filter`.
pub fn search_by<'a>(
  records: &'a [BirthdayRecord],
  filter: DateFilter,
) -> impl Iterator<Item = &'a BirthdayRecord> + 'a {
  records.iter().filter(move |r| filter.matches(r.birthday))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn rec(name: &str, birthday: NaiveDate) -> BirthdayRecord {
    BirthdayRecord::new(name, birthday, None).unwrap()
  }

  fn names<'a>(it: impl Iterator<Item = &'a BirthdayRecord>) -> Vec<&'a str> {
    it.map(|r| r.name.as_str()).collect()
  }

  fn window(days: i64) -> UpcomingWindow { UpcomingWindow::new(days).unwrap() }

  // ── Anniversaries ─────────────────────────────────────────────────────────

  #[test]
  fn leap_day_maps_to_feb_28_in_common_year() {
    assert_eq!(anniversary_in(date(2000, 2, 29), 2025), Some(date(2025, 2, 28)));
    assert_eq!(anniversary_in(date(2000, 2, 29), 2028), Some(date(2028, 2, 29)));
  }

  #[test]
  fn next_anniversary_rolls_into_next_year_once_passed() {
    let today = date(2024, 6, 1);
    assert_eq!(next_anniversary(date(1990, 1, 15), today), Some(date(2025, 1, 15)));
    assert_eq!(next_anniversary(date(1990, 6, 1), today), Some(date(2024, 6, 1)));
    assert_eq!(next_anniversary(date(1990, 7, 4), today), Some(date(2024, 7, 4)));
  }

  #[test]
  fn leap_day_birthday_is_celebrated_on_feb_28() {
    let records = [rec("leap", date(2004, 2, 29))];
    let today = date(2025, 2, 28);
    assert_eq!(names(upcoming_within(&records, today, window(1))), ["leap"]);

    let today = date(2025, 2, 27);
    assert_eq!(names(upcoming_within(&records, today, window(1))), ["leap"]);
  }

  // ── Window validation ─────────────────────────────────────────────────────

  #[test]
  fn window_rejects_out_of_range_days() {
    assert!(matches!(
      UpcomingWindow::new(0),
      Err(Error::OutOfRange { field: "days", value: 0, .. })
    ));
    assert!(UpcomingWindow::new(366).is_err());
    assert!(UpcomingWindow::new(-3).is_err());
    assert_eq!(window(365).days(), 365);
    assert_eq!(UpcomingWindow::default().days(), 7);
  }

  // ── Upcoming ──────────────────────────────────────────────────────────────

  #[test]
  fn birthday_today_is_included_for_every_window() {
    let today = date(2024, 3, 10);
    let records = [rec("today", date(1980, 3, 10))];
    for days in 1..=365 {
      let hits = upcoming_within(&records, today, window(days)).count();
      assert_eq!(hits, 1, "days = {days}");
    }
  }

  #[test]
  fn day_after_window_is_excluded_for_every_window() {
    let today = date(2023, 3, 10);
    // Past 364 days the day after the window is a year out and wraps back
    // onto today's anniversary.
    for days in 1..=364 {
      let just_outside = today
        .checked_add_days(Days::new(days as u64 + 1))
        .unwrap();
      let records = [rec("outside", just_outside)];
      let hits = upcoming_within(&records, today, window(days)).count();
      assert_eq!(hits, 0, "days = {days}");
    }
  }

  #[test]
  fn last_day_of_window_is_included() {
    let today = date(2024, 3, 10);
    let records = [rec("edge", date(1970, 3, 17))];
    assert_eq!(upcoming_within(&records, today, window(7)).count(), 1);
    assert_eq!(upcoming_within(&records, today, window(6)).count(), 0);
  }

  #[test]
  fn one_day_window_includes_tomorrow_only() {
    let today = date(2024, 8, 20);
    let records = [
      rec("tomorrow", date(1990, 8, 21)),
      rec("day-after", date(1990, 8, 22)),
    ];
    assert_eq!(names(upcoming_within(&records, today, window(1))), ["tomorrow"]);
  }

  #[test]
  fn passed_birthday_is_evaluated_against_next_year() {
    let today = date(2024, 6, 1);
    let records = [rec("january", date(2024, 1, 15))];
    assert_eq!(upcoming_within(&records, today, window(30)).count(), 0);
    assert_eq!(upcoming_within(&records, today, window(365)).count(), 1);
  }

  #[test]
  fn window_wraps_across_new_year() {
    let today = date(2024, 12, 30);
    let records = [rec("new-year", date(2020, 1, 2))];
    // Next anniversary is 2025-01-02, three days out.
    assert_eq!(upcoming_within(&records, today, window(2)).count(), 0);
    assert_eq!(upcoming_within(&records, today, window(3)).count(), 1);
    assert_eq!(upcoming_within(&records, today, window(7)).count(), 1);
    assert_eq!(upcoming_within(&records, today, window(10)).count(), 1);
  }

  #[test]
  fn upcoming_preserves_store_order() {
    let today = date(2024, 5, 1);
    let records = [
      rec("c", date(1990, 5, 5)),
      rec("skip", date(1990, 9, 1)),
      rec("a", date(1990, 5, 2)),
      rec("b", date(1990, 5, 1)),
    ];
    assert_eq!(names(upcoming_within(&records, today, window(7))), ["c", "a", "b"]);
  }

  // ── Search ────────────────────────────────────────────────────────────────

  fn sample() -> Vec<BirthdayRecord> {
    vec![
      rec("jan15-1990", date(1990, 1, 15)),
      rec("feb15-1990", date(1990, 2, 15)),
      rec("jan15-2001", date(2001, 1, 15)),
      rec("jan16-2001", date(2001, 1, 16)),
    ]
  }

  #[test]
  fn empty_filter_returns_everything_in_order() {
    let records = sample();
    let filter = DateFilter::new(None, None, None).unwrap();
    assert!(filter.is_empty());
    assert_eq!(search_by(&records, filter).collect::<Vec<_>>(), records.iter().collect::<Vec<_>>());
  }

  #[test]
  fn day_and_month_match_any_year() {
    let records = sample();
    let filter = DateFilter::new(Some(15), Some(1), None).unwrap();
    assert_eq!(names(search_by(&records, filter)), ["jan15-1990", "jan15-2001"]);
  }

  #[test]
  fn single_component_filters() {
    let records = sample();
    let by_year = DateFilter::new(None, None, Some(2001)).unwrap();
    assert_eq!(names(search_by(&records, by_year)), ["jan15-2001", "jan16-2001"]);

    let by_day = DateFilter::new(Some(15), None, None).unwrap();
    assert_eq!(
      names(search_by(&records, by_day)),
      ["jan15-1990", "feb15-1990", "jan15-2001"]
    );
  }

  #[test]
  fn all_components_must_match() {
    let records = sample();
    let filter = DateFilter::new(Some(16), Some(1), Some(1990)).unwrap();
    assert_eq!(search_by(&records, filter).count(), 0);
  }

  #[test]
  fn filter_rejects_out_of_range_components() {
    assert!(matches!(
      DateFilter::new(Some(40), None, None),
      Err(Error::OutOfRange { field: "day", .. })
    ));
    assert!(DateFilter::new(Some(0), None, None).is_err());
    assert!(DateFilter::new(None, Some(13), None).is_err());
    assert!(DateFilter::new(None, None, Some(1899)).is_err());
    assert!(DateFilter::new(None, None, Some(2101)).is_err());
    assert!(DateFilter::new(Some(31), Some(12), Some(2100)).is_ok());
  }
}
