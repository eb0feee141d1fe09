//! This module provides the main entry point: a client that downloads one ERA5
//! dataset into a local cache, one file per download unit.

use crate::cache::download_cache::DownloadCache;
use crate::error::Era5Error;
use crate::partition::partition;
use crate::request::logical_request::{Dataset, LogicalRequest};
use crate::retrieve::http_retriever::HttpRetriever;
use crate::retrieve::parameters::RetrieveParameters;
use crate::retrieve::Retrieve;
use crate::utils::get_cache_dir;
use bon::bon;
use chrono::NaiveDateTime;
use log::{debug, info};
use std::path::PathBuf;

/// Where a download unit is in its lifecycle.
///
/// A unit starts `Pending`, then is either `Skipped` because its file is
/// already cached, or goes through `Fetching` to `Complete`. A failing fetch
/// has no state of its own: the error aborts the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitState {
    Pending,
    Skipped,
    Fetching,
    Complete,
}

/// Final state of one processed download unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitOutcome {
    pub path: PathBuf,
    pub state: UnitState,
}

/// A download unit as it would be processed, without fetching anything.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedUnit {
    /// Dataset name on the retrieval service.
    pub dataset: String,
    pub parameters: RetrieveParameters,
    pub path: PathBuf,
    /// Whether a file already exists at `path`.
    pub cached: bool,
}

/// Downloads a single [`Dataset`] into a local cache.
///
/// Requests are split into download units; each unit maps to one file in the
/// cache folder. Units whose file already exists are skipped, the others are
/// fetched one after another through the retriever `R`.
///
/// # Examples
///
/// ```no_run
/// # use era5::{Dataset, Era5, Era5Error, HttpRetriever, Product, Resolution};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Era5Error> {
/// let dataset = Dataset::new(Product::SingleLevels, Resolution::Monthly, ["2m_temperature"]);
/// let retriever = HttpRetriever::new("http://localhost:8080/resources");
/// let mut era5 = Era5::with_cache_folder(dataset, retriever, "cache".into()).await?;
///
/// era5.per_year().years(vec![2019, 2020]).call().await?;
/// for file in era5.files() {
///     println!("downloaded {}", file.display());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Era5<R = HttpRetriever> {
    dataset: Dataset,
    cache: DownloadCache,
    retriever: R,
}

#[bon]
impl<R: Retrieve> Era5<R> {
    /// Creates a client storing its files in `cache_folder`.
    ///
    /// The folder is created if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`Era5Error::Cache`] if the folder cannot be created or a file is in its place.
    pub async fn with_cache_folder(
        dataset: Dataset,
        retriever: R,
        cache_folder: PathBuf,
    ) -> Result<Self, Era5Error> {
        Ok(Self {
            dataset,
            cache: DownloadCache::with_root(cache_folder).await?,
            retriever,
        })
    }

    /// Creates a client using the default cache folder, typically
    /// `~/.cache/era5_rs_cache` on Linux.
    ///
    /// # Errors
    ///
    /// Returns [`Era5Error::CacheDirResolution`] if there is no system cache
    /// directory, or [`Era5Error::Cache`] if the folder cannot be created.
    pub async fn new(dataset: Dataset, retriever: R) -> Result<Self, Era5Error> {
        let cache_folder = get_cache_dir().map_err(Era5Error::CacheDirResolution)?;
        Self::with_cache_folder(dataset, retriever, cache_folder).await
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Downloads whole years, one file per year.
    ///
    /// `months`, `days` and `hours` narrow every year to the given values and
    /// default to the full range. For monthly data, giving `hours` switches to
    /// the monthly means by hour of day.
    ///
    /// ```no_run
    /// # use era5::{Dataset, Era5, Era5Error, HttpRetriever, Product, Resolution};
    /// # async fn run(mut era5: Era5) -> Result<(), Era5Error> {
    /// let outcomes = era5
    ///     .per_year()
    ///     .years(vec![2018, 2019])
    ///     .months(vec![12, 1, 2])
    ///     .hours(vec![0, 12])
    ///     .call()
    ///     .await?;
    /// assert_eq!(outcomes.len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn per_year(
        &mut self,
        years: Vec<i32>,
        months: Option<Vec<u32>>,
        days: Option<Vec<u32>>,
        hours: Option<Vec<u32>>,
    ) -> Result<Vec<UnitOutcome>, Era5Error> {
        let request = LogicalRequest::builder()
            .dataset(self.dataset.clone())
            .years(years)
            .maybe_months(months)
            .maybe_days(days)
            .maybe_hours(hours)
            .build()?;
        self.download(&request).await
    }

    /// Downloads every unit between `start` and `end`: one file per month for
    /// monthly data, one per hour for hourly data.
    ///
    /// For monthly ranges spanning several years, the month of `start` itself
    /// is not included.
    pub async fn range(
        &mut self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<UnitOutcome>, Era5Error> {
        let request = LogicalRequest::builder()
            .dataset(self.dataset.clone())
            .range_start(start)
            .range_end(end)
            .build()?;
        self.download(&request).await
    }

    /// Downloads discrete hourly timesteps, one file each, in the given order.
    pub async fn composites(
        &mut self,
        timesteps: Vec<NaiveDateTime>,
    ) -> Result<Vec<UnitOutcome>, Era5Error> {
        let request = LogicalRequest::builder()
            .dataset(self.dataset.clone())
            .composites(timesteps)
            .build()?;
        self.download(&request).await
    }

    /// Processes every download unit of `request` in order.
    ///
    /// # Errors
    ///
    /// The first failing retrieval stops the batch and is returned as
    /// [`Era5Error::Retrieve`]. Files completed before it stay cached and
    /// listed in [`Era5::files`].
    pub async fn download(
        &mut self,
        request: &LogicalRequest,
    ) -> Result<Vec<UnitOutcome>, Era5Error> {
        let mut outcomes = Vec::new();
        for unit in partition(request) {
            let path = self.cache.resolve_path(&unit);
            debug!("{:?}: {}", UnitState::Pending, path.display());

            if self.cache.exists(&path).await {
                info!("Omitted download for {}, file already cached", path.display());
                outcomes.push(UnitOutcome {
                    path,
                    state: UnitState::Skipped,
                });
                continue;
            }

            let dataset = unit.dataset_name();
            debug!("{:?}: {} from {}", UnitState::Fetching, path.display(), dataset);
            self.retriever
                .retrieve(&dataset, &unit.parameters(), &path)
                .await
                .map_err(|source| Era5Error::Retrieve {
                    path: path.clone(),
                    source,
                })?;

            info!("File downloaded and saved as {}", path.display());
            self.cache.record(path.clone());
            outcomes.push(UnitOutcome {
                path,
                state: UnitState::Complete,
            });
        }
        Ok(outcomes)
    }

    /// Lists what [`Era5::download`] would do for `request`, without fetching.
    pub async fn plan(&self, request: &LogicalRequest) -> Vec<PlannedUnit> {
        let mut planned = Vec::new();
        for unit in partition(request) {
            let path = self.cache.resolve_path(&unit);
            planned.push(PlannedUnit {
                dataset: unit.dataset_name(),
                parameters: unit.parameters(),
                cached: self.cache.exists(&path).await,
                path,
            });
        }
        planned
    }

    /// Files downloaded by this client so far, in download order.
    pub fn files(&self) -> &[PathBuf] {
        self.cache.files()
    }

    /// All cached files of this client's dataset, including earlier sessions.
    pub async fn find_files(&self) -> Result<Vec<PathBuf>, Era5Error> {
        self.dataset.validate()?;
        Ok(self.cache.find_files(&self.dataset).await?)
    }
}
