//! The user-facing description of what to download.

use crate::request::error::RequestError;
use crate::types::calendar::{Selection, DAYS, HOURS, MONTHS};
use crate::types::data_source::{Product, Resolution};
use crate::types::domain::Domain;
use bon::bon;
use chrono::NaiveDateTime;

/// What is downloaded, independent of when: product, resolution, variables and domain.
///
/// Passed explicitly to every request; nothing about a dataset is implied.
///
/// # Examples
///
/// ```
/// use era5::{Dataset, Domain, Product, Resolution};
///
/// let dataset = Dataset::new(Product::PressureLevels, Resolution::Hourly, ["u", "v", "z"])
///     .with_domain(Domain::area(60.0, -10.0, 35.0, 30.0).unwrap());
/// assert_eq!(dataset.variables().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    product: Product,
    resolution: Resolution,
    variables: Vec<String>,
    domain: Domain,
}

impl Dataset {
    /// Creates a global dataset description.
    pub fn new(
        product: Product,
        resolution: Resolution,
        variables: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            product,
            resolution,
            variables: variables.into_iter().map(Into::into).collect(),
            domain: Domain::Global,
        }
    }

    /// Restricts the dataset to a spatial domain.
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }

    pub fn product(&self) -> Product {
        self.product
    }
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }
    pub fn variables(&self) -> &[String] {
        &self.variables
    }
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Checks that at least one variable is given and that every identifier
    /// is a valid variable name.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.variables.is_empty() {
            return Err(RequestError::NoVariables);
        }
        match self.variables.iter().find(|v| !is_variable_name(v)) {
            Some(bad) => Err(RequestError::InvalidVariable(bad.clone())),
            None => Ok(()),
        }
    }

    /// Dataset key on the retrieval service, without the `reanalysis-era5-` prefix.
    pub(crate) fn download_key(&self) -> String {
        match self.resolution {
            Resolution::Hourly => self.product.tag().to_string(),
            Resolution::Monthly => format!("{}-monthly-means", self.product.tag()),
        }
    }
}

/// The temporal part of a request. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq)]
pub enum TemporalSpec {
    /// Whole years, optionally narrowed to some months, days or hours.
    /// Each year becomes one download.
    PerYear {
        years: Vec<i32>,
        months: Selection,
        days: Selection,
        hours: Selection,
    },
    /// Every calendar unit between two instants.
    Range {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    /// Discrete hourly timesteps, in the given order.
    Composite(Vec<NaiveDateTime>),
}

/// A validated download request: a [`Dataset`] plus a [`TemporalSpec`].
///
/// Build one with [`LogicalRequest::builder`], giving exactly one of `years`,
/// `range_start`/`range_end` or `composites`.
///
/// # Examples
///
/// ```
/// use era5::{Dataset, LogicalRequest, Product, Resolution, RequestError};
///
/// let dataset = Dataset::new(Product::SingleLevels, Resolution::Monthly, ["2m_temperature"]);
///
/// let request = LogicalRequest::builder()
///     .dataset(dataset.clone())
///     .years(vec![2019, 2020])
///     .months(vec![6, 7, 8])
///     .build()?;
/// assert_eq!(request.dataset(), &dataset);
///
/// let missing = LogicalRequest::builder().dataset(dataset).build();
/// assert_eq!(missing.unwrap_err(), RequestError::MissingTemporalSpec);
/// # Ok::<(), RequestError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalRequest {
    dataset: Dataset,
    temporal: TemporalSpec,
}

#[bon]
impl LogicalRequest {
    #[builder]
    pub fn new(
        dataset: Dataset,
        years: Option<Vec<i32>>,
        months: Option<Vec<u32>>,
        days: Option<Vec<u32>>,
        hours: Option<Vec<u32>>,
        range_start: Option<NaiveDateTime>,
        range_end: Option<NaiveDateTime>,
        composites: Option<Vec<NaiveDateTime>>,
    ) -> Result<Self, RequestError> {
        let range = match (range_start, range_end) {
            (Some(start), Some(end)) => Some((start, end)),
            (None, None) => None,
            _ => return Err(RequestError::IncompleteRange),
        };

        let given = [years.is_some(), range.is_some(), composites.is_some()]
            .into_iter()
            .filter(|given| *given)
            .count();
        if given == 0 {
            return Err(RequestError::MissingTemporalSpec);
        }
        if given > 1 {
            return Err(RequestError::ConflictingTemporalSpecs(
                "give only one of years, a range or composites",
            ));
        }

        let temporal = if let Some(years) = years {
            TemporalSpec::PerYear {
                years,
                months: Selection::from_option(months),
                days: Selection::from_option(days),
                hours: Selection::from_option(hours),
            }
        } else if months.is_some() || days.is_some() || hours.is_some() {
            return Err(RequestError::ConflictingTemporalSpecs(
                "months, days and hours only narrow a per-year request",
            ));
        } else if let Some((start, end)) = range {
            TemporalSpec::Range { start, end }
        } else if let Some(timesteps) = composites {
            TemporalSpec::Composite(timesteps)
        } else {
            return Err(RequestError::MissingTemporalSpec);
        };

        Self::from_spec(dataset, temporal)
    }

    /// Creates a request from an already assembled [`TemporalSpec`], applying the
    /// same validation as the builder.
    pub fn from_spec(dataset: Dataset, temporal: TemporalSpec) -> Result<Self, RequestError> {
        dataset.validate()?;
        match &temporal {
            TemporalSpec::PerYear {
                months,
                days,
                hours,
                ..
            } => {
                let checks = [("month", months, MONTHS), ("day", days, DAYS), ("hour", hours, HOURS)];
                for (axis, selection, full_range) in checks {
                    if let Some(value) = selection.first_out_of(&full_range) {
                        return Err(RequestError::OutOfRange { axis, value });
                    }
                }
            }
            TemporalSpec::Composite(_) if dataset.resolution == Resolution::Monthly => {
                return Err(RequestError::CompositeRequiresHourly);
            }
            TemporalSpec::Range { .. } | TemporalSpec::Composite(_) => {}
        }
        Ok(Self { dataset, temporal })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn temporal(&self) -> &TemporalSpec {
        &self.temporal
    }
}

/// Variable identifiers are joined with `-` in cache file names, so they may
/// not contain it.
fn is_variable_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.')
}
