use chrono::{Datelike, NaiveDateTime, Timelike};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;

pub(crate) const MONTHS: RangeInclusive<u32> = 1..=12;
pub(crate) const DAYS: RangeInclusive<u32> = 1..=31;
pub(crate) const HOURS: RangeInclusive<u32> = 0..=23;

/// A calendar month of a specific year.
///
/// Ordering is chronological: by year first, then by month.
///
/// # Examples
///
/// ```
/// use era5::YearMonth;
///
/// let month = YearMonth::new(2021, 2);
/// assert_eq!(month.to_string(), "2021-02");
/// assert!(YearMonth::new(2020, 12) < month);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct YearMonth(pub i32, pub u32);

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self(year, month)
    }
    pub fn year(self) -> i32 {
        self.0
    }
    pub fn month(self) -> u32 {
        self.1
    }

    /// Month containing the given date or instant.
    pub fn of(date: impl Datelike) -> Self {
        Self(date.year(), date.month())
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0, self.1)
    }
}

/// Floors an instant to the start of its hour.
pub(crate) fn floor_to_hour(instant: NaiveDateTime) -> NaiveDateTime {
    instant
        .date()
        .and_hms_opt(instant.hour(), 0, 0)
        .unwrap_or(instant)
}

/// Formats an hour of the day the way the retrieval service expects it.
pub(crate) fn time_of_day(hour: u32) -> String {
    format!("{:02}:00", hour)
}

/// Which values of a calendar axis (months, days or hours) a request covers.
///
/// `All` is the default full range of the axis. `Only` is an explicit
/// narrowing and shows up in the cache file name. Selections built from
/// request input are sorted and free of duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Selection {
    #[default]
    All,
    Only(Vec<u32>),
}

impl Selection {
    pub(crate) fn from_option(values: Option<Vec<u32>>) -> Self {
        values.map_or(Selection::All, |mut values| {
            values.sort_unstable();
            values.dedup();
            Selection::Only(values)
        })
    }

    pub fn is_narrowed(&self) -> bool {
        matches!(self, Selection::Only(_))
    }

    /// Concrete values covered, expanding `All` to `full_range`.
    pub fn values(&self, full_range: RangeInclusive<u32>) -> Vec<u32> {
        match self {
            Selection::All => full_range.collect(),
            Selection::Only(values) => values.clone(),
        }
    }

    /// The first value outside `full_range`, if any.
    pub(crate) fn first_out_of(&self, full_range: &RangeInclusive<u32>) -> Option<u32> {
        match self {
            Selection::All => None,
            Selection::Only(values) => values.iter().copied().find(|v| !full_range.contains(v)),
        }
    }
}
