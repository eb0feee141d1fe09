//! Splits a [`LogicalRequest`] into [`DownloadUnit`]s.
//!
//! Every unit corresponds to exactly one retrieval call and one cache file.
//! Partitioning is lazy: units are produced while iterating, so a multi-year
//! hourly range never holds more than one unit in memory.

use crate::request::download_unit::{DownloadUnit, TemporalSelector};
use crate::request::logical_request::{Dataset, LogicalRequest, TemporalSpec};
use crate::types::calendar::{floor_to_hour, Selection, YearMonth};
use crate::types::data_source::Resolution;
use chrono::{Duration, NaiveDateTime};
use std::iter::FusedIterator;
use std::slice;

/// Lazily enumerates the download units of a request, in download order.
///
/// # Examples
///
/// ```
/// use era5::{partition, Dataset, LogicalRequest, Product, Resolution, TemporalSelector, YearMonth};
/// use chrono::NaiveDate;
///
/// let dataset = Dataset::new(Product::SingleLevels, Resolution::Monthly, ["tp"]);
/// let at = |y, m| NaiveDate::from_ymd_opt(y, m, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let request = LogicalRequest::builder()
///     .dataset(dataset)
///     .range_start(at(2020, 3))
///     .range_end(at(2020, 7))
///     .build()
///     .unwrap();
///
/// let months: Vec<_> = partition(&request)
///     .map(|unit| match unit.selector {
///         TemporalSelector::Month(month) => month,
///         _ => unreachable!(),
///     })
///     .collect();
/// assert_eq!(months.first(), Some(&YearMonth::new(2020, 3)));
/// assert_eq!(months.len(), 5);
/// ```
pub fn partition(request: &LogicalRequest) -> Partition<'_> {
    let dataset = request.dataset();
    let units = match request.temporal() {
        TemporalSpec::PerYear {
            years,
            months,
            days,
            hours,
        } => Units::Years {
            years: years.iter(),
            months,
            days,
            hours,
        },
        TemporalSpec::Range { start, end } => match dataset.resolution() {
            Resolution::Monthly if end < start => Units::Months(MonthUnits::empty()),
            Resolution::Monthly => {
                Units::Months(month_units(YearMonth::of(*start), YearMonth::of(*end)))
            }
            Resolution::Hourly => Units::Hours(hour_units(*start, *end)),
        },
        TemporalSpec::Composite(timesteps) => Units::Composite(timesteps.iter()),
    };
    Partition { dataset, units }
}

impl LogicalRequest {
    /// Shorthand for [`partition`].
    pub fn partition(&self) -> Partition<'_> {
        partition(self)
    }
}

/// Iterator returned by [`partition`].
#[derive(Debug, Clone)]
pub struct Partition<'a> {
    dataset: &'a Dataset,
    units: Units<'a>,
}

#[derive(Debug, Clone)]
enum Units<'a> {
    Years {
        years: slice::Iter<'a, i32>,
        months: &'a Selection,
        days: &'a Selection,
        hours: &'a Selection,
    },
    Months(MonthUnits),
    Hours(HourUnits),
    Composite(slice::Iter<'a, NaiveDateTime>),
}

impl<'a> Iterator for Partition<'a> {
    type Item = DownloadUnit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let selector = match &mut self.units {
            Units::Years {
                years,
                months,
                days,
                hours,
            } => TemporalSelector::Year {
                year: *years.next()?,
                months: *months,
                days: *days,
                hours: *hours,
            },
            Units::Months(months) => TemporalSelector::Month(months.next()?),
            Units::Hours(hours) => TemporalSelector::Hour(hours.next()?),
            Units::Composite(timesteps) => TemporalSelector::Hour(*timesteps.next()?),
        };
        Some(DownloadUnit::new(self.dataset, selector))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.units {
            Units::Years { years, .. } => years.size_hint(),
            Units::Months(months) => months.size_hint(),
            Units::Hours(hours) => hours.size_hint(),
            Units::Composite(timesteps) => timesteps.size_hint(),
        }
    }
}

impl FusedIterator for Partition<'_> {}

/// Calendar months touched by a monthly range.
///
/// Within one year this runs from `start` to `end`, both included. Across years
/// the start month itself is skipped: enumeration begins at the month after
/// `start` and ends with `end` included.
pub fn month_units(start: YearMonth, end: YearMonth) -> MonthUnits {
    let first = if start.year() == end.year() {
        start
    } else {
        next_month(start)
    };
    MonthUnits {
        next: Some(first).filter(|first| *first <= end),
        last: end,
    }
}

fn next_month(month: YearMonth) -> YearMonth {
    if month.month() >= 12 {
        YearMonth::new(month.year() + 1, 1)
    } else {
        YearMonth::new(month.year(), month.month() + 1)
    }
}

/// Iterator returned by [`month_units`].
#[derive(Debug, Clone)]
pub struct MonthUnits {
    next: Option<YearMonth>,
    last: YearMonth,
}

impl MonthUnits {
    fn empty() -> Self {
        Self {
            next: None,
            last: YearMonth::new(0, 1),
        }
    }
}

impl Iterator for MonthUnits {
    type Item = YearMonth;

    fn next(&mut self) -> Option<YearMonth> {
        let current = self.next?;
        let following = next_month(current);
        self.next = Some(following).filter(|m| *m <= self.last);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.next.map_or(0, |next| {
            let months = (self.last.year() - next.year()) as i64 * 12 + self.last.month() as i64
                - next.month() as i64
                + 1;
            months.max(0) as usize
        });
        (remaining, Some(remaining))
    }
}

impl FusedIterator for MonthUnits {}

/// Every whole hour from `start` (floored to its hour) up to and including `end`.
pub fn hour_units(start: NaiveDateTime, end: NaiveDateTime) -> HourUnits {
    let first = floor_to_hour(start);
    HourUnits {
        next: Some(first).filter(|first| *first <= end),
        end,
    }
}

/// Iterator returned by [`hour_units`].
#[derive(Debug, Clone)]
pub struct HourUnits {
    next: Option<NaiveDateTime>,
    end: NaiveDateTime,
}

impl Iterator for HourUnits {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<NaiveDateTime> {
        let current = self.next?;
        self.next = current
            .checked_add_signed(Duration::hours(1))
            .filter(|following| *following <= self.end);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .next
            .map_or(0, |next| (self.end - next).num_hours() as usize + 1);
        (remaining, Some(remaining))
    }
}

impl FusedIterator for HourUnits {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::data_source::Product;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn monthly() -> Dataset {
        Dataset::new(Product::SingleLevels, Resolution::Monthly, ["tp"])
    }

    fn hourly() -> Dataset {
        Dataset::new(Product::PressureLevels, Resolution::Hourly, ["u", "v"])
    }

    fn range(dataset: Dataset, start: NaiveDateTime, end: NaiveDateTime) -> LogicalRequest {
        LogicalRequest::builder()
            .dataset(dataset)
            .range_start(start)
            .range_end(end)
            .build()
            .unwrap()
    }

    fn months_of(request: &LogicalRequest) -> Vec<(i32, u32)> {
        partition(request)
            .map(|unit| match unit.selector {
                TemporalSelector::Month(month) => (month.year(), month.month()),
                other => panic!("expected a month selector, got {other:?}"),
            })
            .collect()
    }

    fn hours_of(request: &LogicalRequest) -> Vec<NaiveDateTime> {
        partition(request)
            .map(|unit| match unit.selector {
                TemporalSelector::Hour(instant) => instant,
                other => panic!("expected an hour selector, got {other:?}"),
            })
            .collect()
    }

    #[test]
    fn one_unit_per_requested_year() {
        let request = LogicalRequest::builder()
            .dataset(hourly())
            .years(vec![2018, 2019, 2021])
            .months(vec![1, 2])
            .build()
            .unwrap();
        let years: Vec<i32> = partition(&request)
            .map(|unit| match unit.selector {
                TemporalSelector::Year { year, months, .. } => {
                    assert_eq!(months, &Selection::Only(vec![1, 2]));
                    year
                }
                other => panic!("expected a year selector, got {other:?}"),
            })
            .collect();
        assert_eq!(years, vec![2018, 2019, 2021]);
    }

    #[test]
    fn monthly_range_within_one_year_is_inclusive() {
        let request = range(monthly(), at(2020, 3, 15, 0), at(2020, 7, 2, 0));
        assert_eq!(
            months_of(&request),
            vec![(2020, 3), (2020, 4), (2020, 5), (2020, 6), (2020, 7)]
        );
    }

    #[test]
    fn monthly_range_across_years_skips_start_month() {
        let request = range(monthly(), at(2019, 11, 1, 0), at(2021, 2, 1, 0));
        let months = months_of(&request);

        let mut expected = vec![(2019, 12)];
        expected.extend((1..=12).map(|m| (2020, m)));
        expected.extend([(2021, 1), (2021, 2)]);
        assert_eq!(months, expected);
    }

    #[test]
    fn monthly_range_starting_in_december_begins_next_year() {
        let request = range(monthly(), at(2019, 12, 1, 0), at(2020, 2, 1, 0));
        assert_eq!(months_of(&request), vec![(2020, 1), (2020, 2)]);
    }

    #[test]
    fn reversed_ranges_are_empty() {
        let request = range(monthly(), at(2020, 7, 1, 0), at(2020, 3, 1, 0));
        assert!(months_of(&request).is_empty());
        let request = range(monthly(), at(2020, 3, 20, 0), at(2020, 3, 10, 0));
        assert!(months_of(&request).is_empty());
        let request = range(hourly(), at(2020, 1, 2, 0), at(2020, 1, 1, 0));
        assert_eq!(partition(&request).count(), 0);
    }

    #[test]
    fn hourly_range_is_inclusive_of_both_ends() {
        let request = range(hourly(), at(2020, 12, 31, 22), at(2021, 1, 1, 1));
        assert_eq!(
            hours_of(&request),
            vec![
                at(2020, 12, 31, 22),
                at(2020, 12, 31, 23),
                at(2021, 1, 1, 0),
                at(2021, 1, 1, 1)
            ]
        );
    }

    #[test]
    fn hourly_range_floors_the_start() {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(3, 30, 0)
            .unwrap();
        let request = range(hourly(), start, at(2020, 1, 1, 5));
        assert_eq!(
            hours_of(&request),
            vec![at(2020, 1, 1, 3), at(2020, 1, 1, 4), at(2020, 1, 1, 5)]
        );
    }

    #[test]
    fn hourly_range_is_lazy_with_exact_size() {
        let request = range(hourly(), at(2000, 1, 1, 0), at(2019, 12, 31, 23));
        let mut units = partition(&request);
        assert_eq!(units.size_hint(), (175_320, Some(175_320)));
        units.next();
        assert_eq!(units.size_hint().0, 175_319);
        let last = units.last().unwrap();
        assert_eq!(last.selector, TemporalSelector::Hour(at(2019, 12, 31, 23)));
    }

    #[test]
    fn composites_keep_input_order_and_duplicates() {
        let timesteps = vec![at(2021, 6, 1, 12), at(2019, 1, 5, 0), at(2021, 6, 1, 12)];
        let request = LogicalRequest::builder()
            .dataset(hourly())
            .composites(timesteps.clone())
            .build()
            .unwrap();
        assert_eq!(hours_of(&request), timesteps);
    }

    #[test]
    fn empty_inputs_produce_no_units() {
        let request = LogicalRequest::builder()
            .dataset(hourly())
            .years(vec![])
            .build()
            .unwrap();
        assert_eq!(partition(&request).next(), None);
    }

    #[test]
    fn month_units_size_hint_matches_count() {
        let units = month_units(YearMonth::new(2019, 11), YearMonth::new(2021, 2));
        assert_eq!(units.size_hint(), (14, Some(14)));
        assert_eq!(units.count(), 14);
    }
}
