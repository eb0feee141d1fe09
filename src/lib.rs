//! Cached, idempotent downloads of ERA5 reanalysis data.
//!
//! A [`LogicalRequest`] (a [`Dataset`] plus years, a date range or a list of
//! timesteps) is split into [`DownloadUnit`]s by [`partition`]. Every unit maps
//! to one deterministic file in the [`DownloadCache`]; units whose file already
//! exists are skipped and the rest are fetched one by one through a
//! [`Retrieve`] implementation. [`Era5`] ties these together.

mod cache;
mod era5;
mod error;
mod partition;
mod request;
mod retrieve;
pub mod transforms;
mod types;
mod utils;

pub use era5::*;
pub use error::Era5Error;

pub use cache::cache_key::CacheKey;
pub use cache::download_cache::DownloadCache;
pub use cache::error::CacheError;

pub use partition::{hour_units, month_units, partition, HourUnits, MonthUnits, Partition};

pub use request::download_unit::{DownloadUnit, TemporalSelector};
pub use request::error::RequestError;
pub use request::logical_request::{Dataset, LogicalRequest, TemporalSpec};

pub use retrieve::error::RetrieveError;
pub use retrieve::http_retriever::HttpRetriever;
pub use retrieve::parameters::RetrieveParameters;
pub use retrieve::Retrieve;

pub use transforms::TransformError;

pub use types::calendar::{Selection, YearMonth};
pub use types::data_source::{Product, ProductType, Resolution};
pub use types::domain::Domain;
