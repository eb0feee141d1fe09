//! Defines the ERA5 data products, their temporal resolution and the product
//! types understood by the retrieval service.

use crate::request::error::RequestError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The ERA5 data product a request targets.
///
/// The product decides which dataset on the retrieval service is queried and is
/// the leading component of every cache file name.
///
/// # Examples
///
/// ```
/// use era5::Product;
///
/// let product: Product = "pressure-levels".parse().unwrap();
/// assert_eq!(product, Product::PressureLevels);
/// assert_eq!(Product::SingleLevels.to_string(), "single-levels");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Product {
    /// ERA5-Land, surface variables at an enhanced resolution over land.
    Land,
    /// Surface and column-integrated variables, two-dimensional per timestep.
    SingleLevels,
    /// Upper-air variables on 37 pressure levels (1000 hPa to 1 hPa).
    PressureLevels,
}

impl Product {
    pub(crate) fn tag(&self) -> &'static str {
        match self {
            Product::Land => "land",
            Product::SingleLevels => "single-levels",
            Product::PressureLevels => "pressure-levels",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Product {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "land" => Ok(Product::Land),
            "single-levels" | "single-level" => Ok(Product::SingleLevels),
            "pressure-levels" | "pressure-level" => Ok(Product::PressureLevels),
            _ => Err(RequestError::UnknownProduct(s.to_string())),
        }
    }
}

/// Temporal granularity of the downloaded data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// One field per hour.
    Hourly,
    /// Monthly means.
    Monthly,
}

impl Resolution {
    pub(crate) fn tag(&self) -> &'static str {
        match self {
            Resolution::Hourly => "hourly",
            Resolution::Monthly => "monthly",
        }
    }
}

/// Allows formatting a `Resolution` variant using its tag.
///
/// # Examples
///
/// ```
/// use era5::Resolution;
///
/// assert_eq!(format!("{}", Resolution::Hourly), "hourly");
/// assert_eq!(Resolution::Monthly.to_string(), "monthly");
/// ```
impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Resolution {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hourly" => Ok(Resolution::Hourly),
            "monthly" => Ok(Resolution::Monthly),
            _ => Err(RequestError::UnknownResolution(s.to_string())),
        }
    }
}

/// The `product_type` field sent along with every retrieval.
///
/// Monthly data comes in two flavours: plain monthly averages, and the
/// synoptic monthly means that keep one average per hour of the day. The
/// latter is selected whenever a monthly request names its hours explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    Reanalysis,
    MonthlyAveragedReanalysis,
    MonthlyAveragedReanalysisByHourOfDay,
}

impl ProductType {
    pub fn tag(&self) -> &'static str {
        match self {
            ProductType::Reanalysis => "reanalysis",
            ProductType::MonthlyAveragedReanalysis => "monthly_averaged_reanalysis",
            ProductType::MonthlyAveragedReanalysisByHourOfDay => {
                "monthly_averaged_reanalysis_by_hour_of_day"
            }
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
