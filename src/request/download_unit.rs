//! One atomic download: a dataset plus one concrete temporal selector.

use crate::request::logical_request::Dataset;
use crate::retrieve::parameters::{RetrieveParameters, NETCDF};
use crate::types::calendar::{time_of_day, Selection, YearMonth, DAYS, HOURS, MONTHS};
use crate::types::data_source::{ProductType, Resolution};
use chrono::{Datelike, NaiveDateTime, Timelike};

/// The temporal part of a [`DownloadUnit`].
#[derive(Debug, Clone, PartialEq)]
pub enum TemporalSelector<'a> {
    /// One year with its month, day and hour selections.
    Year {
        year: i32,
        months: &'a Selection,
        days: &'a Selection,
        hours: &'a Selection,
    },
    /// A single month of monthly means.
    Month(YearMonth),
    /// A single hourly timestep.
    Hour(NaiveDateTime),
}

/// One fully resolved download. One unit maps to one cache file and at most
/// one call to the retrieval service.
///
/// Units borrow their dataset from the [`crate::LogicalRequest`] they were
/// partitioned from and are cheap to create and drop.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadUnit<'a> {
    pub dataset: &'a Dataset,
    pub selector: TemporalSelector<'a>,
}

fn strings(values: impl IntoIterator<Item = u32>) -> Vec<String> {
    values.into_iter().map(|v| format!("{:02}", v)).collect()
}

impl<'a> DownloadUnit<'a> {
    pub fn new(dataset: &'a Dataset, selector: TemporalSelector<'a>) -> Self {
        Self { dataset, selector }
    }

    /// Name of the dataset on the retrieval service, e.g. `reanalysis-era5-land-monthly-means`.
    pub fn dataset_name(&self) -> String {
        format!("reanalysis-era5-{}", self.dataset.download_key())
    }

    /// Product type to request.
    ///
    /// Monthly per-year downloads switch to the by-hour-of-day product as soon as
    /// hours are given explicitly; without hours they use plain monthly averages.
    pub fn product_type(&self) -> ProductType {
        match (&self.selector, self.dataset.resolution()) {
            (TemporalSelector::Year { hours, .. }, Resolution::Monthly) if hours.is_narrowed() => {
                ProductType::MonthlyAveragedReanalysisByHourOfDay
            }
            (TemporalSelector::Year { .. }, Resolution::Monthly)
            | (TemporalSelector::Month(_), _) => ProductType::MonthlyAveragedReanalysis,
            (TemporalSelector::Year { .. }, Resolution::Hourly) | (TemporalSelector::Hour(_), _) => {
                ProductType::Reanalysis
            }
        }
    }

    /// Builds the parameter set sent to the retrieval service for this unit.
    pub fn parameters(&self) -> RetrieveParameters {
        let product_type = self.product_type();
        let (year, month, day, time) = match &self.selector {
            TemporalSelector::Year {
                year,
                months,
                days,
                hours,
            } => {
                let day = match self.dataset.resolution() {
                    Resolution::Hourly => Some(strings(days.values(DAYS))),
                    Resolution::Monthly => None,
                };
                let time = match product_type {
                    ProductType::MonthlyAveragedReanalysis => vec![time_of_day(0)],
                    _ => hours.values(HOURS).into_iter().map(time_of_day).collect(),
                };
                (vec![year.to_string()], strings(months.values(MONTHS)), day, time)
            }
            TemporalSelector::Month(month) => (
                vec![month.year().to_string()],
                strings([month.month()]),
                None,
                vec![time_of_day(0)],
            ),
            TemporalSelector::Hour(instant) => (
                vec![instant.year().to_string()],
                strings([instant.month()]),
                Some(strings([instant.day()])),
                vec![time_of_day(instant.hour())],
            ),
        };

        RetrieveParameters {
            product_type,
            format: NETCDF.to_string(),
            area: self.dataset.domain().to_area_string(),
            variable: self.dataset.variables().to_vec(),
            year,
            month,
            day,
            time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::data_source::Product;
    use crate::types::domain::Domain;
    use chrono::NaiveDate;

    #[test]
    fn monthly_without_hours_is_monthly_averaged() {
        let dataset = Dataset::new(Product::SingleLevels, Resolution::Monthly, ["tp"]);
        let all = Selection::All;
        let unit = DownloadUnit::new(
            &dataset,
            TemporalSelector::Year {
                year: 2020,
                months: &all,
                days: &all,
                hours: &all,
            },
        );
        assert_eq!(unit.product_type(), ProductType::MonthlyAveragedReanalysis);
        assert_eq!(unit.dataset_name(), "reanalysis-era5-single-levels-monthly-means");

        let parameters = unit.parameters();
        assert_eq!(parameters.time, vec!["00:00"]);
        assert_eq!(parameters.day, None);
        assert_eq!(parameters.month.len(), 12);
    }

    #[test]
    fn monthly_with_explicit_hours_is_synoptic() {
        let dataset = Dataset::new(Product::SingleLevels, Resolution::Monthly, ["tp"]);
        let all = Selection::All;
        let hours = Selection::Only(vec![0, 12]);
        let unit = DownloadUnit::new(
            &dataset,
            TemporalSelector::Year {
                year: 2020,
                months: &all,
                days: &all,
                hours: &hours,
            },
        );
        assert_eq!(
            unit.product_type(),
            ProductType::MonthlyAveragedReanalysisByHourOfDay
        );
        assert_eq!(unit.parameters().time, vec!["00:00", "12:00"]);
    }

    #[test]
    fn hourly_timestep_parameters() {
        let dataset = Dataset::new(Product::PressureLevels, Resolution::Hourly, ["u", "v"])
            .with_domain(Domain::area(60.0, -10.0, 35.0, 30.0).unwrap());
        let instant = NaiveDate::from_ymd_opt(2021, 7, 4)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap();
        let unit = DownloadUnit::new(&dataset, TemporalSelector::Hour(instant));
        let parameters = unit.parameters();

        assert_eq!(unit.dataset_name(), "reanalysis-era5-pressure-levels");
        assert_eq!(parameters.product_type, ProductType::Reanalysis);
        assert_eq!(parameters.area.as_deref(), Some("60/-10/35/30"));
        assert_eq!(parameters.year, vec!["2021"]);
        assert_eq!(parameters.month, vec!["07"]);
        assert_eq!(parameters.day, Some(vec!["04".to_string()]));
        assert_eq!(parameters.time, vec!["18:00"]);
    }

    #[test]
    fn global_parameters_serialize_without_area() {
        let dataset = Dataset::new(Product::Land, Resolution::Monthly, ["t2m"]);
        let unit = DownloadUnit::new(&dataset, TemporalSelector::Month(YearMonth::new(2019, 12)));
        let json = serde_json::to_value(unit.parameters()).unwrap();

        assert!(json.get("area").is_none());
        assert!(json.get("day").is_none());
        assert_eq!(json["product_type"], "monthly_averaged_reanalysis");
        assert_eq!(json["format"], "netcdf");
        assert_eq!(json["month"][0], "12");
    }
}
